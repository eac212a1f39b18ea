//! In-memory document tree for the behavior runtime.
//!
//! Provides the host surface the runtime is written against:
//!
//! - an element tree with ordered, lower-cased attributes ([`Document`])
//! - a ready state that flips once the tree is built ([`ReadyState`])
//! - subtree queries ([`Document::descendants`], [`Document::elements_with_attribute`])
//! - mutation observers that queue [`MutationRecord`]s for batched delivery
//!   ([`Document::observe`], [`Document::take_records`])

mod document;
mod error;
mod node;
mod observer;

pub use document::{Descendants, Document, ReadyState};
pub use error::{DomError, Result};
pub use node::{Attribute, NodeId, NodeKind};
pub use observer::{MutationRecord, ObserveFlags, ObserverId};
