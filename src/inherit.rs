use crate::error::{ConfigError, ROOT_PATH, Result, index_path, join_path};
use crate::merge::deep_merge;
use crate::Node;
use toml::Value;

/// Key of the section whose entries are inherited by its sibling tables.
pub const DEFAULTS: &str = "_defaults";

/// Look up `key` in `target`, falling back to `defaults`.
pub fn inherit_value<'a>(defaults: &'a Node, target: &'a Node, key: &str) -> Result<&'a Value> {
    target
        .get(key)
        .or_else(|| defaults.get(key))
        .ok_or_else(|| ConfigError::MissingKey {
            key: key.to_string(),
        })
}

/// Resolve every [`DEFAULTS`] section in `config`. See [`apply_inheritance_with`].
pub fn apply_inheritance(config: &Node) -> Result<Node> {
    apply_inheritance_with(config, DEFAULTS)
}

/// Resolve every `defaults_key` section in `config` into its siblings.
///
/// At each level the defaults table is removed and every sibling table is
/// replaced by `deep_merge(defaults, sibling)`, so the sibling's own values
/// win. Levels are resolved outermost-first: defaults are merged into the
/// siblings before the siblings' own nested levels are resolved. An outer
/// defaults table therefore only reaches deeper levels through keys it nests
/// explicitly, and a nested defaults section it carries is combined with the
/// sibling's own one at that depth.
///
/// Non-table siblings are kept as they are. Tables inside lists are resolved
/// as levels of their own.
pub fn apply_inheritance_with(config: &Node, defaults_key: &str) -> Result<Node> {
    resolve_level(config, defaults_key, ROOT_PATH)
}

fn resolve_level(level: &Node, defaults_key: &str, path: &str) -> Result<Node> {
    let defaults = match level.get(defaults_key) {
        None => None,
        Some(Value::Table(table)) => Some(table),
        Some(_) => {
            return Err(ConfigError::InvalidDefaults {
                path: join_path(path, defaults_key),
            });
        }
    };

    let mut resolved = Node::new();
    for (name, value) in level {
        if name == defaults_key {
            continue;
        }
        let value = match (defaults, value) {
            (Some(defaults), Value::Table(section)) => Value::Table(deep_merge(defaults, section)),
            _ => value.clone(),
        };
        let value = resolve_value(value, defaults_key, &join_path(path, name))?;
        resolved.insert(name.clone(), value);
    }

    Ok(resolved)
}

fn resolve_value(value: Value, defaults_key: &str, path: &str) -> Result<Value> {
    match value {
        Value::Table(table) => Ok(Value::Table(resolve_level(&table, defaults_key, path)?)),
        Value::Array(items) => items
            .into_iter()
            .enumerate()
            .map(|(i, item)| resolve_value(item, defaults_key, &index_path(path, i)))
            .collect::<Result<Vec<_>>>()
            .map(Value::Array),
        other => Ok(other),
    }
}
