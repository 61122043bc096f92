use crate::error::{ConfigError, ROOT_PATH, Result, index_path, join_path};
use crate::Node;
use toml::Value;

/// Deep-merge two tables. Values in `overlay` take precedence.
/// Nested tables are merged recursively; all other types are replaced.
pub fn deep_merge(base: &Node, overlay: &Node) -> Node {
    let mut result = base.clone();

    for (key, overlay_val) in overlay {
        match (result.get(key), overlay_val) {
            (Some(Value::Table(base_table)), Value::Table(overlay_table)) => {
                let merged = deep_merge(base_table, overlay_table);
                result.insert(key.clone(), Value::Table(merged));
            }
            _ => {
                result.insert(key.clone(), overlay_val.clone());
            }
        }
    }

    result
}

/// Merge layers in order. The first layer is the base, the last one has the
/// highest precedence.
pub fn merge_layers<'a, I>(layers: I) -> Node
where
    I: IntoIterator<Item = &'a Node>,
{
    layers
        .into_iter()
        .fold(Node::new(), |acc, layer| deep_merge(&acc, layer))
}

/// Merge `overlay` into `base` where the overlay may only add data.
///
/// Tables merge by key. Lists merge positionally and must have the same
/// length and hold only tables. Any other value present on both sides is a
/// [`ConfigError::Conflict`]. Typical use is combining a public config with a
/// separate file of secrets for the same sections.
pub fn strict_merge(base: &Node, overlay: &Node) -> Result<Node> {
    strict_merge_at(base, overlay, ROOT_PATH)
}

fn strict_merge_at(base: &Node, overlay: &Node, path: &str) -> Result<Node> {
    let mut result = base.clone();

    for (key, overlay_val) in overlay {
        let merged = match result.get(key) {
            Some(base_val) => strict_merge_value(base_val, overlay_val, &join_path(path, key))?,
            None => overlay_val.clone(),
        };
        result.insert(key.clone(), merged);
    }

    Ok(result)
}

fn strict_merge_value(base: &Value, overlay: &Value, path: &str) -> Result<Value> {
    match (base, overlay) {
        (Value::Table(base_table), Value::Table(overlay_table)) => {
            Ok(Value::Table(strict_merge_at(base_table, overlay_table, path)?))
        }
        (Value::Array(base_items), Value::Array(overlay_items)) => {
            if base_items.len() != overlay_items.len() {
                return Err(ConfigError::ListLengthMismatch {
                    path: path.to_string(),
                    base: base_items.len(),
                    overlay: overlay_items.len(),
                });
            }
            let mut merged = Vec::with_capacity(base_items.len());
            for (i, (b, o)) in base_items.iter().zip(overlay_items).enumerate() {
                match (b, o) {
                    (Value::Table(bt), Value::Table(ot)) => {
                        merged.push(Value::Table(strict_merge_at(bt, ot, &index_path(path, i))?));
                    }
                    _ => {
                        return Err(ConfigError::NonTableItems {
                            path: path.to_string(),
                        });
                    }
                }
            }
            Ok(Value::Array(merged))
        }
        _ => Err(ConfigError::Conflict {
            path: path.to_string(),
        }),
    }
}
