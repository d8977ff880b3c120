use phpcli_core::{
    ConfigRead, Configuration, InitOutcome, Initializer, Rule, Target, TieredConfig, Validator,
};
use serde_json::json;

fn run_defaults(config: &mut Configuration) -> phpcli_core::InitReport {
    let mut init = Initializer::new(config, "dev");
    init.init("mount-workdir", true, Target::Environment);
    init.init("service-name", "Project", Target::Project);
    init.init("environment", json!({"EXAMPLE": "value"}), Target::Environment);
    init.finish()
}

// ── Initializer ──

#[test]
fn init_writes_to_requested_tier() {
    let mut config = Configuration::new();
    let report = run_defaults(&mut config);

    assert_eq!(report.written().count(), 3);
    assert!(config.get_bool("project.environments.dev.mount-workdir", false).unwrap());
    assert_eq!(
        config.get_str("project.default.service-name", "").unwrap(),
        "Project"
    );
    assert!(!config.has("project.default.mount-workdir"));
}

#[test]
fn init_never_overwrites_existing_value_in_any_tier() {
    let mut config = Configuration::new();
    config.set("project.default.mount-workdir", json!(false));
    config.set("project.environments.dev.service-name", json!("worker"));

    let report = run_defaults(&mut config);

    assert!(!config.has("project.environments.dev.mount-workdir"));
    assert!(!config.has("project.default.service-name"));
    assert_eq!(
        config
            .get_str("project.environments.dev.service-name", "")
            .unwrap(),
        "worker"
    );
    let skipped: Vec<_> = report
        .entries
        .iter()
        .filter_map(|e| match &e.outcome {
            InitOutcome::Skipped { tier } => Some((e.key.as_str(), tier.as_str())),
            InitOutcome::Set { .. } => None,
        })
        .collect();
    assert_eq!(
        skipped,
        vec![("mount-workdir", "project"), ("service-name", "environment")]
    );
}

#[test]
fn init_is_idempotent() {
    let mut config = Configuration::new();
    run_defaults(&mut config);
    let after_first = config.clone();

    let second = run_defaults(&mut config);

    assert!(second.is_noop());
    assert_eq!(config, after_first);
}

#[test]
fn init_leaves_every_key_resolvable() {
    let mut config = Configuration::new();
    run_defaults(&mut config);

    let view = TieredConfig::for_environment(&config, "dev");
    for key in ["mount-workdir", "service-name", "environment"] {
        assert!(view.has(key), "{key} should resolve after init");
    }
}

#[test]
fn init_report_display_lists_entries() {
    let mut config = Configuration::new();
    config.set("project.default.service-name", json!("x"));
    let report = run_defaults(&mut config);
    let text = report.to_string();

    assert!(text.contains("set      project.environments.dev.mount-workdir = true"));
    assert!(text.contains("exists   service-name (project)"));
}

// ── Validator ──

#[test]
fn validate_passes_with_required_key_in_project_defaults() {
    let config = Configuration::from_value(json!({
        "project": { "default": { "service-name": "api" } }
    }));
    let view = TieredConfig::for_environment(&config, "production");

    let validator = Validator::new().rule("service-name", Rule::Required);
    assert!(validator.validate(&view).is_ok());
}

#[test]
fn validate_reports_every_missing_key() {
    let config = Configuration::from_value(json!({
        "project": { "default": { "service-name": "   " } }
    }));
    let view = TieredConfig::for_environment(&config, "production");

    let validator = Validator::new()
        .rule("service-name", Rule::Required)
        .rule("docker.repository", Rule::Required);
    let failure = validator.validate(&view).unwrap_err();

    let keys: Vec<_> = failure.failures.iter().map(|f| f.key.as_str()).collect();
    assert_eq!(keys, vec!["service-name", "docker.repository"]);
    assert_eq!(
        failure.to_string(),
        "configuration validation failed: `service-name` is required, `docker.repository` is required"
    );
}

#[test]
fn validate_does_not_touch_configuration() {
    let config = Configuration::new();
    let before = config.clone();
    let view = TieredConfig::for_environment(&config, "dev");

    let _ = Validator::new()
        .rule("service-name", Rule::Required)
        .validate(&view);

    assert_eq!(config, before);
}
