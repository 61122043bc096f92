use crate::inherit::DEFAULTS;
use crate::shared::SHARED;
use serde::Deserialize;

/// Contents of `configcraft.toml`.
#[derive(Debug, Deserialize)]
pub struct ProjectConfig {
    pub configcraft: ProjectSettings,
}

#[derive(Debug, Deserialize)]
pub struct ProjectSettings {
    /// Layer files, merged in order. Later layers take precedence.
    #[serde(default)]
    pub layers: Vec<String>,
    #[serde(default = "default_defaults_key")]
    pub defaults_key: String,
    #[serde(default)]
    pub strict: bool,
    #[serde(default = "default_shared")]
    pub shared: bool,
    #[serde(default)]
    pub format: OutputFormat,
}

fn default_defaults_key() -> String {
    DEFAULTS.to_string()
}

fn default_shared() -> bool {
    true
}

#[derive(Debug, Default, Deserialize, PartialEq, Eq, Clone, Copy, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Toml,
    Json,
}

pub fn validate_project(config: &ProjectConfig) -> Vec<String> {
    let mut errors = Vec::new();
    let settings = &config.configcraft;

    if settings.layers.is_empty() {
        errors.push("no layers configured: set 'layers' in [configcraft]".to_string());
    }
    for (i, layer) in settings.layers.iter().enumerate() {
        if layer.trim().is_empty() {
            errors.push(format!("layer #{} has an empty path", i + 1));
        }
    }

    let key = &settings.defaults_key;
    if key.is_empty() {
        errors.push("defaults_key must not be empty".to_string());
    } else if key.contains('.') {
        errors.push(format!("defaults_key '{key}' must not contain '.'"));
    } else if key == SHARED {
        errors.push(format!("defaults_key '{key}' collides with the shared rules key"));
    }

    errors
}
