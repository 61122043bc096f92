use configcraft::loader::ConfigLoader;
use configcraft::resolve::{lookup, merge_all, resolve_layers, ResolveOptions};
use configcraft::ConfigError;
use std::path::Path;
use toml::map::Map;
use toml::Value;

fn map_from_str(s: &str) -> Map<String, Value> {
    toml::from_str(s).unwrap()
}

#[test]
fn resolve_fixture_project() {
    let loader = ConfigLoader::new(Path::new("tests/fixtures/basic")).unwrap();
    let layers = loader.load_layers().unwrap();
    let resolution = resolve_layers(&layers, &ResolveOptions::from(loader.settings())).unwrap();

    assert!(resolution.merged.contains_key("_defaults"));
    assert!(resolution.merged.contains_key("_shared"));

    let resolved = &resolution.resolved;
    assert!(!resolved.contains_key("_defaults"));
    assert!(!resolved.contains_key("_shared"));

    let get = |path: &str| lookup(resolved, path).unwrap().clone();
    assert_eq!(get("dev.timeout").as_integer(), Some(30));
    assert_eq!(get("dev.region").as_str(), Some("us-east-1"));
    assert_eq!(get("dev.log_level").as_str(), Some("info"));
    assert_eq!(get("dev.database.port").as_integer(), Some(5432));
    assert_eq!(get("dev.database.password").as_str(), Some("dev-secret"));

    assert_eq!(get("prod.timeout").as_integer(), Some(60));
    assert_eq!(get("prod.log_level").as_str(), Some("warn"));
    assert_eq!(get("prod.database.port").as_integer(), Some(6432));
    assert_eq!(get("prod.database.host").as_str(), Some("db.prod.example.com"));
    assert_eq!(get("prod.database.password").as_str(), Some("prod-secret"));
}

#[test]
fn later_layers_override_earlier_ones() {
    let base = map_from_str(
        r#"
[_defaults]
timeout = 30

[svc]
port = 1
"#,
    );
    let site = map_from_str(
        r#"
[_defaults]
timeout = 45
"#,
    );
    let resolution = resolve_layers(&[base, site], &ResolveOptions::default()).unwrap();
    assert_eq!(resolution.resolved["svc"]["timeout"].as_integer(), Some(45));
}

#[test]
fn strict_option_rejects_overwrites() {
    let base = map_from_str("[svc]\nport = 1\n");
    let overlay = map_from_str("[svc]\nport = 2\n");
    let options = ResolveOptions {
        strict: true,
        ..ResolveOptions::default()
    };
    let err = resolve_layers(&[base.clone(), overlay.clone()], &options).unwrap_err();
    assert_eq!(
        err,
        ConfigError::Conflict {
            path: ".svc.port".to_string()
        }
    );

    let merged = merge_all(&[base, overlay], &ResolveOptions::default()).unwrap();
    assert_eq!(merged["svc"]["port"].as_integer(), Some(2));
}

#[test]
fn shared_rules_can_be_disabled() {
    let layer = map_from_str(
        r#"
[_shared]
"*.a" = 1

[svc]
"#,
    );
    let options = ResolveOptions {
        shared: false,
        ..ResolveOptions::default()
    };
    let resolution = resolve_layers(&[layer], &options).unwrap();
    // without rules the section is an ordinary table and stays in the output
    assert!(resolution.resolved.contains_key("_shared"));
    assert!(resolution.resolved["svc"].get("a").is_none());
}

#[test]
fn shared_rules_feed_defaults_sections() {
    let layer = map_from_str(
        r#"
[_shared]
"envs._defaults.retries" = 3

[envs._defaults]
timeout = 30

[envs.dev]
"#,
    );
    let resolution = resolve_layers(&[layer], &ResolveOptions::default()).unwrap();
    let dev = &resolution.resolved["envs"]["dev"];
    assert_eq!(dev["timeout"].as_integer(), Some(30));
    assert_eq!(dev["retries"].as_integer(), Some(3));
}

#[test]
fn custom_defaults_key() {
    let layer = map_from_str(
        r#"
[_base]
timeout = 30

[svc]
"#,
    );
    let options = ResolveOptions {
        defaults_key: "_base".to_string(),
        ..ResolveOptions::default()
    };
    let resolution = resolve_layers(&[layer], &options).unwrap();
    assert_eq!(resolution.resolved["svc"]["timeout"].as_integer(), Some(30));
    assert!(!resolution.resolved.contains_key("_base"));
}

#[test]
fn invalid_defaults_fails_resolution() {
    let layer = map_from_str("_defaults = 1\n");
    assert!(matches!(
        resolve_layers(&[layer], &ResolveOptions::default()),
        Err(ConfigError::InvalidDefaults { .. })
    ));
}

#[test]
fn wildcard_rules_skip_custom_defaults_section() {
    let layer_for = |key: &str| {
        map_from_str(&format!(
            r#"
[_shared]
"*.db.port" = 5432

[{key}]
timeout = 30

[dev.db]
host = "a"
"#
        ))
    };

    for key in ["_defaults", "base"] {
        let options = ResolveOptions {
            defaults_key: key.to_string(),
            ..ResolveOptions::default()
        };
        let resolution = resolve_layers(&[layer_for(key)], &options).unwrap();
        let dev = &resolution.resolved["dev"];
        assert_eq!(dev["db"]["port"].as_integer(), Some(5432), "key {key}");
        assert_eq!(dev["timeout"].as_integer(), Some(30), "key {key}");
        assert!(!resolution.resolved.contains_key(key), "key {key}");
    }
}
