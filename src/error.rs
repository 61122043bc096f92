use thiserror::Error;

/// Key path of the top-level node in error messages.
pub const ROOT_PATH: &str = ".";

/// Errors raised by the merge and inheritance operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Key absent from both the target and the defaults.
    #[error("key '{key}' is missing from both the target and the defaults")]
    MissingKey { key: String },

    /// A defaults (or shared) section that is not a table.
    #[error("defaults section at '{path}' is not a table")]
    InvalidDefaults { path: String },

    /// Strict merge found a value on both sides that cannot be combined.
    #[error("type of value at '{path}' in base and overlay cannot be merged")]
    Conflict { path: String },

    #[error("list length mismatch: path = '{path}', base has {base} items, overlay has {overlay}")]
    ListLengthMismatch {
        path: String,
        base: usize,
        overlay: usize,
    },

    #[error("items in '{path}' are not tables")]
    NonTableItems { path: String },

    #[error("invalid key path '{pattern}': {reason}")]
    InvalidPath { pattern: String, reason: String },

    /// Tried to set a key below something that is not a table or list of tables.
    #[error("node at '{path}' is not a table or list of tables, cannot set '{key}'")]
    NotATable { path: String, key: String },

    #[error("key '{key}' not found under '{path}'")]
    PathNotFound { path: String, key: String },
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Extend a dotted key path with one more key.
pub(crate) fn join_path(parent: &str, key: &str) -> String {
    if parent == ROOT_PATH {
        format!(".{key}")
    } else {
        format!("{parent}.{key}")
    }
}

pub(crate) fn index_path(parent: &str, index: usize) -> String {
    format!("{parent}[{index}]")
}
