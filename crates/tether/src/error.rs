//! Error types for registration and configuration.

use std::path::PathBuf;

use thiserror::Error;

/// Errors returned synchronously from behavior registration.
///
/// Messages mirror the host exception text so callers matching on strings keep
/// working.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistrationError {
	/// The name does not satisfy the active [`NamePolicy`](crate::NamePolicy).
	#[error(
		"Failed to execute 'registerBehavior' on 'Document': Registration failed for type '{name}'. The type name is invalid."
	)]
	InvalidName { name: String },

	/// A behavior with the same (lower-cased) name exists.
	#[error(
		"Failed to execute 'registerBehavior' on 'Document': Registration failed for type '{name}'. A type with that name is already registered."
	)]
	AlreadyRegistered { name: String },
}

impl RegistrationError {
	/// The offending name, after lower-casing.
	pub fn name(&self) -> &str {
		match self {
			Self::InvalidName { name } | Self::AlreadyRegistered { name } => name,
		}
	}
}

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// The TOML text is malformed or does not match the schema.
	#[error("TOML parse error: {0}")]
	Toml(#[from] toml::de::Error),

	/// Error reading a configuration file.
	#[error("I/O error reading {}: {error}", .path.display())]
	Io {
		/// Path to the file that failed to read.
		path: PathBuf,
		/// The underlying I/O error.
		error: std::io::Error,
	},
}
