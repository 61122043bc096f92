use crate::config::{ProjectConfig, ProjectSettings};
use crate::format::json_to_toml;
use anyhow::{Context, Result, bail};
use std::path::{Path, PathBuf};
use toml::Value;
use toml::map::Map;

pub const PROJECT_FILE: &str = "configcraft.toml";

pub struct ConfigLoader {
    base_dir: PathBuf,
    project: ProjectConfig,
}

impl ConfigLoader {
    pub fn new(base_dir: &Path) -> Result<Self> {
        let config_path = base_dir.join(PROJECT_FILE);
        let content = std::fs::read_to_string(&config_path)
            .with_context(|| format!("failed to read {}", config_path.display()))?;
        let project: ProjectConfig = toml::from_str(&content)
            .with_context(|| format!("failed to parse {}", config_path.display()))?;

        Ok(Self {
            base_dir: base_dir.to_path_buf(),
            project,
        })
    }

    pub fn project(&self) -> &ProjectConfig {
        &self.project
    }

    pub fn settings(&self) -> &ProjectSettings {
        &self.project.configcraft
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Expand variables in one layer path and join it onto the project
    /// directory when relative.
    pub fn layer_path(&self, layer: &str) -> Result<PathBuf> {
        let expanded = expand_path(layer, Some(&format!("layer '{layer}'")))?;
        Ok(self.base_dir.join(expanded))
    }

    pub fn layer_paths(&self) -> Result<Vec<PathBuf>> {
        self.settings()
            .layers
            .iter()
            .map(|layer| self.layer_path(layer))
            .collect()
    }

    pub fn load_layers(&self) -> Result<Vec<Map<String, Value>>> {
        self.layer_paths()?
            .iter()
            .map(|path| load_layer(path))
            .collect()
    }
}

/// Expand `~` and environment variables in a path. `context` is added to the
/// error message when a variable is undefined.
pub fn expand_path(path: &str, context: Option<&str>) -> Result<String> {
    match shellexpand::full(path) {
        Ok(expanded) => Ok(expanded.into_owned()),
        Err(e) => match context {
            Some(ctx) => bail!("{ctx}: failed to expand '{path}': {e}"),
            None => bail!("failed to expand '{path}': {e}"),
        },
    }
}

/// Load one layer file. `.json` files are parsed as JSON, everything else as TOML.
pub fn load_layer(path: &Path) -> Result<Map<String, Value>> {
    if !path.exists() {
        bail!("layer not found: {}", path.display());
    }
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;

    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));

    if is_json {
        let value: serde_json::Value = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        json_to_toml(value).with_context(|| format!("invalid layer {}", path.display()))
    } else {
        toml::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
    }
}
