//! Path-pattern defaults.
//!
//! A `_shared` section maps dotted key paths to values:
//!
//! ```toml
//! [_shared]
//! "*.username" = "root"
//! "*.servers.*.cpu" = 1
//! "prod.databases.port" = 5432
//! ```
//!
//! Each value is written at every location its pattern matches, but only
//! where nothing is set yet. `*` matches every key of a table, and a list of
//! tables is walked transparently so the rest of the pattern applies to each
//! item.

use crate::error::{ConfigError, ROOT_PATH, Result, index_path, join_path};
use crate::inherit::DEFAULTS;
use crate::Node;
use toml::Value;

/// Key of the section holding path-pattern rules.
pub const SHARED: &str = "_shared";

const WILDCARD: &str = "*";

/// Return a copy of `data` with `value` set wherever `pattern` matches and no
/// value exists yet. Wildcards skip [`SHARED`] and [`DEFAULTS`] sections.
pub fn with_default_at(data: &Node, pattern: &str, value: &Value) -> Result<Node> {
    let parts = parse_pattern(pattern)?;
    let mut data = data.clone();
    set_in_table(&mut data, &parts, value, DEFAULTS, ROOT_PATH)?;
    Ok(data)
}

/// Consume every [`SHARED`] section in `config` and apply its rules to the
/// section's siblings.
///
/// Nested sections are applied first. Since rules never overwrite, a rule in
/// an inner section wins over an outer rule targeting the same key.
pub fn apply_shared(config: &Node) -> Result<Node> {
    apply_shared_with(config, DEFAULTS)
}

/// Like [`apply_shared`], with wildcards skipping `defaults_key` sections
/// instead of [`DEFAULTS`].
pub fn apply_shared_with(config: &Node, defaults_key: &str) -> Result<Node> {
    let mut config = config.clone();
    resolve_shared(&mut config, defaults_key, ROOT_PATH)?;
    Ok(config)
}

fn resolve_shared(table: &mut Node, defaults_key: &str, path: &str) -> Result<()> {
    for (name, value) in table.iter_mut() {
        if name == SHARED {
            continue;
        }
        resolve_shared_value(value, defaults_key, &join_path(path, name))?;
    }

    let Some(rules) = table.remove(SHARED) else {
        return Ok(());
    };
    let Value::Table(rules) = rules else {
        return Err(ConfigError::InvalidDefaults {
            path: join_path(path, SHARED),
        });
    };

    for (pattern, value) in &rules {
        let parts = parse_pattern(pattern)?;
        set_in_table(table, &parts, value, defaults_key, path)?;
    }
    Ok(())
}

fn resolve_shared_value(value: &mut Value, defaults_key: &str, path: &str) -> Result<()> {
    match value {
        Value::Table(table) => resolve_shared(table, defaults_key, path),
        Value::Array(items) => {
            for (i, item) in items.iter_mut().enumerate() {
                resolve_shared_value(item, defaults_key, &index_path(path, i))?;
            }
            Ok(())
        }
        _ => Ok(()),
    }
}

fn parse_pattern(pattern: &str) -> Result<Vec<&str>> {
    let invalid = |reason: &str| ConfigError::InvalidPath {
        pattern: pattern.to_string(),
        reason: reason.to_string(),
    };

    if pattern.is_empty() {
        return Err(invalid("path is empty"));
    }
    if pattern.ends_with(WILDCARD) {
        return Err(invalid("path cannot end with '*'"));
    }
    let parts: Vec<&str> = pattern.split('.').collect();
    if parts.iter().any(|p| p.is_empty()) {
        return Err(invalid("path has an empty segment"));
    }
    Ok(parts)
}

fn set_in_table(
    table: &mut Node,
    parts: &[&str],
    value: &Value,
    defaults_key: &str,
    path: &str,
) -> Result<()> {
    let Some((key, rest)) = parts.split_first() else {
        return Ok(());
    };

    if rest.is_empty() {
        if !table.contains_key(*key) {
            table.insert(key.to_string(), value.clone());
        }
        return Ok(());
    }

    if *key == WILDCARD {
        for (name, child) in table.iter_mut() {
            if name == SHARED || name == defaults_key {
                continue;
            }
            set_in_value(child, rest, value, defaults_key, &join_path(path, name))?;
        }
        return Ok(());
    }

    let child = table
        .get_mut(*key)
        .ok_or_else(|| ConfigError::PathNotFound {
            path: path.to_string(),
            key: key.to_string(),
        })?;
    set_in_value(child, rest, value, defaults_key, &join_path(path, key))
}

fn set_in_value(
    data: &mut Value,
    parts: &[&str],
    value: &Value,
    defaults_key: &str,
    path: &str,
) -> Result<()> {
    match data {
        Value::Table(table) => set_in_table(table, parts, value, defaults_key, path),
        Value::Array(items) => {
            for item in items.iter_mut() {
                match item {
                    Value::Table(table) => set_in_table(table, parts, value, defaults_key, path)?,
                    _ => return Err(not_a_table(path, parts)),
                }
            }
            Ok(())
        }
        _ => Err(not_a_table(path, parts)),
    }
}

fn not_a_table(path: &str, parts: &[&str]) -> ConfigError {
    ConfigError::NotATable {
        path: path.to_string(),
        key: parts.first().copied().unwrap_or_default().to_string(),
    }
}
