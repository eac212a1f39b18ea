//! Behavior name normalization and validation.

use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;

use crate::RegistrationError;

static STRICT_NAME: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"^[a-z][a-z0-9]*-[a-z0-9-]+$").expect("behavior name pattern is valid"));

/// Shape a behavior name must have to be registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NamePolicy {
	/// A letter, then letters or digits, a hyphen, and at least one more
	/// letter, digit or hyphen.
	#[default]
	Strict,
	/// Anything containing a hyphen.
	Hyphenated,
}

impl NamePolicy {
	/// Whether an already lower-cased `name` is acceptable.
	pub fn accepts(self, name: &str) -> bool {
		match self {
			Self::Strict => STRICT_NAME.is_match(name),
			Self::Hyphenated => name.contains('-'),
		}
	}
}

/// A lower-cased, validated behavior name. Doubles as the attribute name the
/// behavior binds to.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BehaviorName(Box<str>);

impl BehaviorName {
	/// ASCII lower-cases `raw`, matching how the document folds attribute
	/// names, and checks it against `policy`.
	pub fn parse(raw: &str, policy: NamePolicy) -> Result<Self, RegistrationError> {
		let name = raw.to_ascii_lowercase();
		if policy.accepts(&name) {
			Ok(Self(name.into_boxed_str()))
		} else {
			Err(RegistrationError::InvalidName { name })
		}
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl core::ops::Deref for BehaviorName {
	type Target = str;

	fn deref(&self) -> &str {
		&self.0
	}
}

impl AsRef<str> for BehaviorName {
	fn as_ref(&self) -> &str {
		&self.0
	}
}

impl PartialEq<str> for BehaviorName {
	fn eq(&self, other: &str) -> bool {
		&*self.0 == other
	}
}

impl PartialEq<&str> for BehaviorName {
	fn eq(&self, other: &&str) -> bool {
		&*self.0 == *other
	}
}

impl core::fmt::Display for BehaviorName {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		f.write_str(&self.0)
	}
}
