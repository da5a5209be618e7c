//! Integration tests for config loading across all file formats.

use backhaul::config::model::Config;
use backhaul::config::sources::parse_config_str;
use backhaul::config::validation::validate;

fn load_example(name: &str) -> String {
    let path = format!("example/{name}");
    std::fs::read_to_string(&path).unwrap_or_else(|e| panic!("failed to read {path}: {e}"))
}

#[test]
fn yaml_example_loads_and_validates() {
    let content = load_example("backhaul.yaml");
    let config = parse_config_str("yaml", &content, "backhaul.yaml").unwrap();
    validate(&config).unwrap();
    assert!(!config.services.is_empty());
    assert!(config.total_upstreams() > 0);
}

#[test]
fn yaml_full_example_loads_and_validates() {
    let content = load_example("full.yaml");
    let config = parse_config_str("yaml", &content, "full.yaml").unwrap();
    validate(&config).unwrap();
    assert!(config.services.len() >= 3);
    assert_eq!(config.defaults.max_fail, 2);
    assert_eq!(config.services[1].pause, Some(30));
}

#[cfg(feature = "json")]
#[test]
fn json_example_loads_and_validates() {
    let content = load_example("backhaul.json");
    let config = parse_config_str("json", &content, "backhaul.json").unwrap();
    validate(&config).unwrap();
    assert!(!config.services.is_empty());
}

#[cfg(feature = "toml")]
#[test]
fn toml_example_loads_and_validates() {
    let content = load_example("backhaul.toml");
    let config = parse_config_str("toml", &content, "backhaul.toml").unwrap();
    validate(&config).unwrap();
    assert!(!config.services.is_empty());
}

#[cfg(all(feature = "json", feature = "toml"))]
#[test]
fn all_formats_produce_equivalent_configs() {
    let yaml_config =
        parse_config_str("yaml", &load_example("backhaul.yaml"), "yaml").unwrap();
    let json_config =
        parse_config_str("json", &load_example("backhaul.json"), "json").unwrap();
    let toml_config =
        parse_config_str("toml", &load_example("backhaul.toml"), "toml").unwrap();

    assert_eq!(yaml_config.services.len(), json_config.services.len());
    assert_eq!(yaml_config.services.len(), toml_config.services.len());
    assert_eq!(yaml_config.total_upstreams(), json_config.total_upstreams());
    assert_eq!(yaml_config.total_upstreams(), toml_config.total_upstreams());

    assert_eq!(yaml_config.services[0].host, json_config.services[0].host);
    assert_eq!(yaml_config.services[0].host, toml_config.services[0].host);
}

#[test]
fn unsupported_format_returns_error() {
    let result = parse_config_str("xml", "{}", "test.xml");
    assert!(result.is_err());
}

#[test]
fn invalid_config_fails_validation() {
    let empty = r#"{"services": []}"#;
    let config: Config = serde_json::from_str(empty).unwrap();
    assert!(validate(&config).is_err());
}

#[test]
fn unknown_fields_are_rejected() {
    let json = r#"{
        "services": [
            {"host": "a.example.com", "upstreams": ["http://a:80"], "weight": 3}
        ]
    }"#;
    assert!(serde_json::from_str::<Config>(json).is_err());
}

#[test]
fn config_total_upstreams_counts_correctly() {
    let json = r#"{
        "services": [
            {"host": "a.example.com", "upstreams": ["http://a:80", "http://b:80"]},
            {"host": "b.example.com", "upstreams": ["http://c:80"]}
        ]
    }"#;
    let config: Config = serde_json::from_str(json).unwrap();
    assert_eq!(config.total_upstreams(), 3);
}
