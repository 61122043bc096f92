use crate::config::ProjectSettings;
use crate::error::Result;
use crate::inherit::{DEFAULTS, apply_inheritance_with};
use crate::merge::{merge_layers, strict_merge};
use crate::shared::apply_shared_with;
use crate::Node;
use toml::Value;

#[derive(Debug, Clone)]
pub struct ResolveOptions {
    pub defaults_key: String,
    pub strict: bool,
    pub shared: bool,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            defaults_key: DEFAULTS.to_string(),
            strict: false,
            shared: true,
        }
    }
}

impl From<&ProjectSettings> for ResolveOptions {
    fn from(settings: &ProjectSettings) -> Self {
        Self {
            defaults_key: settings.defaults_key.clone(),
            strict: settings.strict,
            shared: settings.shared,
        }
    }
}

/// Outcome of running the pipeline over a set of layers.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    /// All layers merged, defaults and shared sections still in place.
    pub merged: Node,
    pub resolved: Node,
}

/// Merge `layers` in order, strictly if `options.strict` is set.
pub fn merge_all(layers: &[Node], options: &ResolveOptions) -> Result<Node> {
    if !options.strict {
        return Ok(merge_layers(layers));
    }
    let mut acc = Node::new();
    for layer in layers {
        acc = strict_merge(&acc, layer)?;
    }
    Ok(acc)
}

/// Merge `layers` in order, then apply shared rules and defaults sections.
pub fn resolve_layers(layers: &[Node], options: &ResolveOptions) -> Result<Resolution> {
    let merged = merge_all(layers, options)?;
    let shared = if options.shared {
        apply_shared_with(&merged, &options.defaults_key)?
    } else {
        merged.clone()
    };
    let resolved = apply_inheritance_with(&shared, &options.defaults_key)?;

    Ok(Resolution { merged, resolved })
}

/// Value at a dotted path, e.g. `"prod.database.port"`.
pub fn lookup<'a>(node: &'a Node, dotted: &str) -> Option<&'a Value> {
    let mut parts = dotted.split('.');
    let mut current = node.get(parts.next()?)?;
    for part in parts {
        current = current.as_table()?.get(part)?;
    }
    Some(current)
}

/// Table at a dotted path. An empty path selects `node` itself.
pub fn lookup_table<'a>(node: &'a Node, dotted: &str) -> Option<&'a Node> {
    if dotted.is_empty() {
        return Some(node);
    }
    lookup(node, dotted)?.as_table()
}
