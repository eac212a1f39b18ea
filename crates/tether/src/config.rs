//! Runtime configuration.
//!
//! Configuration is plain TOML. Every key is optional and unknown keys are
//! rejected:
//!
//! ```toml
//! [registry]
//! name-policy = "strict"     # or "hyphenated"
//!
//! [watcher]
//! scan-strategy = "walk"     # or "query"
//! detach-on-removal = true
//! upgrade-on-register = true
//! max-flush-rounds = 64
//! ```

use std::path::Path;

use serde::Deserialize;

use crate::{ConfigError, NamePolicy};

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct Config {
	pub registry: RegistryConfig,
	pub watcher: WatcherConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct RegistryConfig {
	pub name_policy: NamePolicy,
}

/// How a sweep finds qualifying elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScanStrategy {
	/// One pre-order walk, looking up each attribute of each element.
	#[default]
	Walk,
	/// One attribute query per registered behavior.
	Query,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct WatcherConfig {
	pub scan_strategy: ScanStrategy,
	/// Detach behaviors on elements of removed subtrees.
	pub detach_on_removal: bool,
	/// Sweep the document for a behavior registered after observing began.
	pub upgrade_on_register: bool,
	/// Delivery rounds per flush before remaining records are left queued.
	pub max_flush_rounds: usize,
}

impl Default for WatcherConfig {
	fn default() -> Self {
		Self {
			scan_strategy: ScanStrategy::Walk,
			detach_on_removal: true,
			upgrade_on_register: true,
			max_flush_rounds: 64,
		}
	}
}

impl Config {
	pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
		Ok(toml::from_str(input)?)
	}

	/// Reads and parses a TOML file.
	pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
		let path = path.as_ref();
		let input = std::fs::read_to_string(path).map_err(|error| ConfigError::Io {
			path: path.to_path_buf(),
			error,
		})?;
		Self::from_toml_str(&input)
	}
}
