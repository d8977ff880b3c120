use phpcli_core::{ConfigRead, Configuration, Tier, TieredConfig};
use proptest::prelude::*;
use serde_json::json;

fn layered() -> Configuration {
    Configuration::from_value(json!({
        "project": {
            "default": {
                "service-name": "api",
                "php": "7.0",
                "docker": { "repository": "acme/api" },
                "environment": { "SHARED": "default" }
            },
            "environments": {
                "staging": {
                    "php": "7.2",
                    "environment": { "SHARED": "staging" }
                }
            }
        }
    }))
}

#[test]
fn environment_value_wins() {
    let config = layered();
    let view = TieredConfig::for_environment(&config, "staging");

    assert_eq!(view.get_str("php", "5.6").unwrap(), "7.2");
    assert_eq!(view.resolved_tier("php"), Some("environment"));
}

#[test]
fn project_default_used_when_environment_absent() {
    let config = layered();
    let view = TieredConfig::for_environment(&config, "staging");

    assert_eq!(view.get_str("service-name", "fallback").unwrap(), "api");
    assert_eq!(view.resolved_tier("service-name"), Some("project"));
}

#[test]
fn literal_default_used_when_no_tier_has_key() {
    let config = layered();
    let view = TieredConfig::for_environment(&config, "staging");

    assert_eq!(view.get_str("command", "-i").unwrap(), "-i");
    assert_eq!(view.resolved_tier("command"), None);
    assert!(!view.has("command"));
}

#[test]
fn unknown_environment_falls_through_to_project() {
    let config = layered();
    let view = TieredConfig::for_environment(&config, "production");

    assert_eq!(view.get_str("php", "5.6").unwrap(), "7.0");
}

#[test]
fn nested_keys_resolve_through_tiers() {
    let config = layered();
    let view = TieredConfig::for_environment(&config, "staging");

    assert_eq!(
        view.get_str("docker.repository", "repo/name").unwrap(),
        "acme/api"
    );
}

#[test]
fn tier_view_reads_single_layer() {
    let config = layered();
    let view = TieredConfig::for_environment(&config, "staging");
    let project = view.tier("project").unwrap();

    assert_eq!(project.name(), "project");
    assert_eq!(project.get_str("php", "").unwrap(), "7.0");
    assert_eq!(
        project.get_string_map("environment").unwrap()["SHARED"],
        "default"
    );
    assert!(view.tier("missing").is_none());
}

#[test]
fn custom_tier_order_is_respected() {
    let config = layered();
    let view = TieredConfig::new(
        &config,
        vec![Tier::project(), Tier::environment("staging")],
    );

    assert_eq!(view.get_str("php", "").unwrap(), "7.0");
    assert_eq!(view.tiers().len(), 2);
}

fn config_with(env: Option<&str>, project: Option<&str>) -> Configuration {
    let mut config = Configuration::new();
    if let Some(v) = env {
        config.set("project.environments.test.key", json!(v));
    }
    if let Some(v) = project {
        config.set("project.default.key", json!(v));
    }
    config
}

proptest! {
    #[test]
    fn environment_present_always_wins(
        env in "[a-z0-9]{1,12}",
        project in proptest::option::of("[a-z0-9]{1,12}"),
        literal in "[a-z0-9]{0,12}",
    ) {
        let config = config_with(Some(&env), project.as_deref());
        let view = TieredConfig::for_environment(&config, "test");
        prop_assert_eq!(view.get_str("key", &literal).unwrap(), env);
    }

    #[test]
    fn project_used_when_environment_absent(
        project in "[a-z0-9]{1,12}",
        literal in "[a-z0-9]{0,12}",
    ) {
        let config = config_with(None, Some(&project));
        let view = TieredConfig::for_environment(&config, "test");
        prop_assert_eq!(view.get_str("key", &literal).unwrap(), project);
    }

    #[test]
    fn literal_used_when_both_absent(literal in "[a-z0-9]{0,12}") {
        let config = config_with(None, None);
        let view = TieredConfig::for_environment(&config, "test");
        prop_assert_eq!(view.get_str("key", &literal).unwrap(), literal);
    }
}
