use configcraft::merge::{deep_merge, merge_layers};
use toml::map::Map;
use toml::Value;

fn map_from_str(s: &str) -> Map<String, Value> {
    let val: Value = toml::from_str(s).unwrap();
    val.as_table().unwrap().clone()
}

#[test]
fn merge_empty_into_empty() {
    let base = Map::new();
    let overlay = Map::new();
    let result = deep_merge(&base, &overlay);
    assert!(result.is_empty());
}

#[test]
fn merge_with_empty_is_identity() {
    let a = map_from_str(
        r#"
name = "svc"
[db]
port = 1
"#,
    );
    assert_eq!(deep_merge(&a, &Map::new()), a);
    assert_eq!(deep_merge(&Map::new(), &a), a);
}

#[test]
fn merge_adds_new_keys() {
    let base = map_from_str(r#"a = 1"#);
    let overlay = map_from_str(r#"b = 2"#);
    let result = deep_merge(&base, &overlay);
    assert_eq!(result.get("a").unwrap().as_integer().unwrap(), 1);
    assert_eq!(result.get("b").unwrap().as_integer().unwrap(), 2);
}

#[test]
fn merge_overlay_wins() {
    let base = map_from_str(r#"a = 1"#);
    let overlay = map_from_str(r#"a = 99"#);
    let result = deep_merge(&base, &overlay);
    assert_eq!(result.get("a").unwrap().as_integer().unwrap(), 99);
}

#[test]
fn merge_nested_tables() {
    let base = map_from_str(
        r#"
[a]
b = 1
"#,
    );
    let overlay = map_from_str(
        r#"
[a]
c = 2
"#,
    );
    let result = deep_merge(&base, &overlay);
    let expected = map_from_str(
        r#"
[a]
b = 1
c = 2
"#,
    );
    assert_eq!(result, expected);
}

#[test]
fn merge_deeply_nested() {
    let base = map_from_str(
        r#"
[level1.level2.level3.level4]
username = "user"
"#,
    );
    let overlay = map_from_str(
        r#"
[level1.level2.level3.level4]
password = "pass"
"#,
    );
    let result = deep_merge(&base, &overlay);
    let level4 = &result["level1"]["level2"]["level3"]["level4"];
    assert_eq!(level4["username"].as_str(), Some("user"));
    assert_eq!(level4["password"].as_str(), Some("pass"));
}

#[test]
fn merge_scalar_replaces_table() {
    let base = map_from_str(
        r#"
[display]
resolution = "1920x1080"
"#,
    );
    let overlay = map_from_str(r#"display = "off""#);
    let result = deep_merge(&base, &overlay);
    assert_eq!(result.get("display").unwrap().as_str(), Some("off"));
}

#[test]
fn merge_table_replaces_scalar() {
    let base = map_from_str(r#"display = "off""#);
    let overlay = map_from_str(
        r#"
[display]
refresh = 60
"#,
    );
    let result = deep_merge(&base, &overlay);
    let display = result.get("display").unwrap().as_table().unwrap();
    assert_eq!(display.len(), 1);
    assert_eq!(display.get("refresh").unwrap().as_integer(), Some(60));
}

#[test]
fn merge_arrays_are_replaced() {
    let base = map_from_str(r#"schemes = ["A", "B", "C"]"#);
    let overlay = map_from_str(r#"schemes = ["X"]"#);
    let result = deep_merge(&base, &overlay);
    let schemes = result.get("schemes").unwrap().as_array().unwrap();
    assert_eq!(schemes.len(), 1);
    assert_eq!(schemes[0].as_str(), Some("X"));
}

#[test]
fn merge_does_not_touch_inputs() {
    let base = map_from_str(
        r#"
unique1 = "value1"
[shared]
username = "user"
"#,
    );
    let overlay = map_from_str(
        r#"
unique2 = "value2"
[shared]
password = "pass"
"#,
    );
    let base_copy = base.clone();
    let overlay_copy = overlay.clone();

    let result = deep_merge(&base, &overlay);

    assert_eq!(base, base_copy);
    assert_eq!(overlay, overlay_copy);
    let shared = result.get("shared").unwrap().as_table().unwrap();
    assert_eq!(shared.len(), 2);
}

#[test]
fn merge_layers_last_wins() {
    let builtin = map_from_str(
        r#"
timeout = 100
[cache]
mode = "off"
"#,
    );
    let host = map_from_str(r#"timeout = 200"#);
    let repo = map_from_str(
        r#"
[cache]
mode = "on"
"#,
    );
    let cli = map_from_str(r#"timeout = 50"#);

    let result = merge_layers(&[builtin, host, repo, cli]);
    assert_eq!(result["timeout"].as_integer(), Some(50));
    assert_eq!(result["cache"]["mode"].as_str(), Some("on"));
}

#[test]
fn merge_layers_of_nothing_is_empty() {
    let layers: Vec<Map<String, Value>> = Vec::new();
    assert!(merge_layers(&layers).is_empty());
}
