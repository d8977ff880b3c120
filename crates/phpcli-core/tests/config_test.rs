use phpcli_core::{ConfigRead, Configuration, Error};
use serde_json::json;
use tempfile::TempDir;

#[test]
fn load_returns_empty_when_no_config_file() {
    let tmp = TempDir::new().unwrap();
    let config = Configuration::load(tmp.path()).unwrap();

    assert_eq!(config, Configuration::new());
    assert!(!config.has("project"));
}

#[test]
fn load_parses_nested_config() {
    let tmp = TempDir::new().unwrap();
    let content = r#"{
  "project": {
    "default": {
      "service-name": "api",
      "docker": { "repository": "acme/api", "version-prefix": "v" }
    },
    "environments": {
      "production": { "use-app-container": true }
    }
  }
}"#;
    std::fs::write(tmp.path().join("rancherize.json"), content).unwrap();

    let config = Configuration::load(tmp.path()).unwrap();

    assert_eq!(
        config.get_str("project.default.service-name", "").unwrap(),
        "api"
    );
    assert_eq!(
        config
            .get_str("project.default.docker.repository", "")
            .unwrap(),
        "acme/api"
    );
    assert!(
        config
            .get_bool("project.environments.production.use-app-container", false)
            .unwrap()
    );
}

#[test]
fn load_empty_file_returns_empty_config() {
    let tmp = TempDir::new().unwrap();
    std::fs::write(tmp.path().join("rancherize.json"), "").unwrap();

    let config = Configuration::load(tmp.path()).unwrap();
    assert_eq!(config, Configuration::new());
}

#[test]
fn load_invalid_json_returns_parse_error() {
    let tmp = TempDir::new().unwrap();
    std::fs::write(tmp.path().join("rancherize.json"), "not valid {{{{ json").unwrap();

    let result = Configuration::load(tmp.path());
    assert!(matches!(result, Err(Error::ConfigParse { .. })));

    let err = result.unwrap_err().to_string();
    assert!(err.contains("parse"));
}

#[test]
fn load_rejects_non_object_root() {
    let tmp = TempDir::new().unwrap();
    std::fs::write(tmp.path().join("rancherize.json"), "[1, 2]").unwrap();

    let result = Configuration::load(tmp.path());
    assert!(matches!(result, Err(Error::ConfigRoot { .. })));
}

#[test]
fn save_then_load_preserves_tree() {
    let tmp = TempDir::new().unwrap();
    let mut config = Configuration::new();
    config.set("project.default.service-name", json!("worker"));
    config.set("project.default.environment", json!({"APP_ENV": "prod"}));

    let path = config.save(tmp.path()).unwrap();
    assert!(path.ends_with("rancherize.json"));

    let loaded = Configuration::load(tmp.path()).unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn set_creates_intermediate_objects() {
    let mut config = Configuration::new();
    config.set("a.b.c", json!(1));

    assert_eq!(config.as_value(), &json!({"a": {"b": {"c": 1}}}));
}

#[test]
fn set_replaces_scalar_intermediate() {
    let mut config = Configuration::from_value(json!({"a": "scalar"}));
    config.set("a.b", json!(true));

    assert_eq!(config.as_value(), &json!({"a": {"b": true}}));
}

#[test]
fn set_replaces_array_root_and_deep_intermediates() {
    let mut config = Configuration::from_value(json!([1, 2]));
    config.set("a.b", json!([]));
    config.set("a.b.c.d", json!("x"));

    assert_eq!(config.as_value(), &json!({"a": {"b": {"c": {"d": "x"}}}}));
}

#[test]
fn null_counts_as_absent() {
    let config = Configuration::from_value(json!({"key": null}));

    assert!(!config.has("key"));
    assert_eq!(config.get_str("key", "fallback").unwrap(), "fallback");
}

// ── typed accessors ──

#[test]
fn get_bool_accepts_string_and_numeric_forms() {
    let config = Configuration::from_value(json!({
        "a": "true", "b": "FALSE", "c": 1, "d": 0
    }));

    assert!(config.get_bool("a", false).unwrap());
    assert!(!config.get_bool("b", true).unwrap());
    assert!(config.get_bool("c", false).unwrap());
    assert!(!config.get_bool("d", true).unwrap());
}

#[test]
fn get_bool_rejects_other_shapes() {
    let config = Configuration::from_value(json!({"flag": {"nested": true}}));

    let err = config.get_bool("flag", false).unwrap_err();
    assert!(matches!(err, Error::InvalidValue { ref key, .. } if key == "flag"));
    assert!(err.to_string().contains("expected a boolean"));
}

#[test]
fn get_str_stringifies_numbers() {
    let config = Configuration::from_value(json!({"php": 7.1}));
    assert_eq!(config.get_str("php", "7.0").unwrap(), "7.1");
}

#[test]
fn get_map_treats_empty_array_as_empty_map() {
    let config = Configuration::from_value(json!({"external_links": []}));
    assert!(config.get_map("external_links").unwrap().is_empty());
}

#[test]
fn get_string_map_stringifies_scalars() {
    let config = Configuration::from_value(json!({
        "environment": {"PORT": 8080, "DEBUG": false, "NAME": "x"}
    }));

    let map = config.get_string_map("environment").unwrap();
    assert_eq!(map["PORT"], "8080");
    assert_eq!(map["DEBUG"], "false");
    assert_eq!(map["NAME"], "x");
}

#[test]
fn get_string_map_rejects_nested_values() {
    let config = Configuration::from_value(json!({"labels": {"a": {"b": 1}}}));

    let err = config.get_string_map("labels").unwrap_err();
    assert!(matches!(err, Error::InvalidValue { ref key, .. } if key == "labels.a"));
}
