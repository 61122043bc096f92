//! Layered configuration merging with inherited defaults.
//!
//! A `_defaults` table supplies fallback values to every sibling table at the
//! same level:
//!
//! ```
//! use configcraft::apply_inheritance;
//!
//! let config: toml::Table = toml::from_str(r#"
//! [_defaults]
//! timeout = 30
//!
//! [svc_a]
//! port = 1
//!
//! [svc_b]
//! timeout = 60
//! port = 2
//! "#).unwrap();
//!
//! let resolved = apply_inheritance(&config).unwrap();
//! assert_eq!(resolved["svc_a"]["timeout"].as_integer(), Some(30));
//! assert_eq!(resolved["svc_b"]["timeout"].as_integer(), Some(60));
//! assert!(!resolved.contains_key("_defaults"));
//! ```

pub mod config;
pub mod diff;
pub mod error;
pub mod format;
pub mod inherit;
pub mod loader;
pub mod merge;
pub mod resolve;
pub mod shared;

pub use error::{ConfigError, Result};
pub use inherit::{DEFAULTS, apply_inheritance, apply_inheritance_with, inherit_value};
pub use merge::{deep_merge, merge_layers, strict_merge};
pub use shared::{SHARED, apply_shared, apply_shared_with, with_default_at};

/// One level of configuration data.
pub type Node = toml::map::Map<String, toml::Value>;
