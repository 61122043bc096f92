use crate::config::OutputFormat;
use crate::error::{ROOT_PATH, index_path, join_path};
use anyhow::{Context, Result, bail};
use toml::Value;
use toml::map::Map;

/// Render a configuration tree in the requested format.
pub fn render(node: &Map<String, Value>, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Toml => {
            toml::to_string_pretty(node).context("failed to render configuration as TOML")
        }
        OutputFormat::Json => {
            let json = serde_json::Value::Object(toml_map_to_json(node));
            let mut out = serde_json::to_string_pretty(&json)
                .context("failed to render configuration as JSON")?;
            out.push('\n');
            Ok(out)
        }
    }
}

/// Render a single value. Tables render as a document, strings bare, other
/// values inline.
pub fn render_value(value: &Value, format: OutputFormat) -> Result<String> {
    match (value, format) {
        (Value::Table(table), _) => render(table, format),
        (_, OutputFormat::Json) => {
            let out = serde_json::to_string_pretty(&toml_value_to_json(value))
                .context("failed to render value as JSON")?;
            Ok(format!("{out}\n"))
        }
        (Value::String(s), OutputFormat::Toml) => Ok(format!("{s}\n")),
        (other, OutputFormat::Toml) => Ok(format!("{other}\n")),
    }
}

fn toml_map_to_json(map: &Map<String, Value>) -> serde_json::Map<String, serde_json::Value> {
    map.iter()
        .map(|(k, v)| (k.clone(), toml_value_to_json(v)))
        .collect()
}

fn toml_value_to_json(value: &Value) -> serde_json::Value {
    match value {
        Value::String(s) => serde_json::Value::String(s.clone()),
        Value::Integer(i) => serde_json::json!(*i),
        Value::Float(f) => serde_json::json!(*f),
        Value::Boolean(b) => serde_json::Value::Bool(*b),
        Value::Datetime(dt) => serde_json::Value::String(dt.to_string()),
        Value::Array(arr) => serde_json::Value::Array(arr.iter().map(toml_value_to_json).collect()),
        Value::Table(table) => serde_json::Value::Object(toml_map_to_json(table)),
    }
}

/// Convert a parsed JSON document into a TOML table. The top level must be an
/// object and `null` is rejected, since TOML has no way to express it.
pub fn json_to_toml(value: serde_json::Value) -> Result<Map<String, Value>> {
    match value {
        serde_json::Value::Object(object) => json_object_to_toml(object, ROOT_PATH),
        _ => bail!("top level of a JSON layer must be an object"),
    }
}

fn json_object_to_toml(
    object: serde_json::Map<String, serde_json::Value>,
    path: &str,
) -> Result<Map<String, Value>> {
    let mut table = Map::new();
    for (key, value) in object {
        let converted = json_value_to_toml(value, &join_path(path, &key))?;
        table.insert(key, converted);
    }
    Ok(table)
}

fn json_value_to_toml(value: serde_json::Value, path: &str) -> Result<Value> {
    Ok(match value {
        serde_json::Value::Null => bail!("null value at '{path}' is not supported"),
        serde_json::Value::Bool(b) => Value::Boolean(b),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Integer(i)
            } else if let Some(f) = n.as_f64() {
                if n.is_u64() {
                    bail!("integer at '{path}' is out of range: {n}");
                }
                Value::Float(f)
            } else {
                bail!("unsupported number at '{path}': {n}");
            }
        }
        serde_json::Value::String(s) => Value::String(s),
        serde_json::Value::Array(items) => Value::Array(
            items
                .into_iter()
                .enumerate()
                .map(|(i, item)| json_value_to_toml(item, &index_path(path, i)))
                .collect::<Result<Vec<_>>>()?,
        ),
        serde_json::Value::Object(object) => Value::Table(json_object_to_toml(object, path)?),
    })
}
