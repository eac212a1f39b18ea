//! Attribute-driven behaviors for document elements.
//!
//! A behavior is registered under an attribute name such as `data-tooltip`.
//! Every connected element carrying that attribute gets its own instance of
//! the behavior; the instance is dropped when the attribute goes away or the
//! element leaves the document.
//!
//! ```
//! use tether::{Behavior, Config, HookContext, HookSet, Page};
//! use tether_dom::Document;
//!
//! struct Counter(u32);
//!
//! impl Behavior for Counter {
//!     const HOOKS: HookSet = HookSet::ATTACHED;
//!
//!     fn attached(&mut self, _cx: &mut HookContext<'_>) {
//!         self.0 += 1;
//!     }
//! }
//!
//! let mut page = Page::with_document(Document::ready(), &Config::default());
//! let counter = page.register_behavior("x-counter", || Counter(0)).unwrap();
//!
//! let doc = page.document_mut();
//! let el = doc.create_element_with("div", &[("x-counter", "")]).unwrap();
//! doc.append_child(doc.root(), el).unwrap();
//! page.flush();
//!
//! assert_eq!(page.instance::<Counter>(el, &counter).map(|c| c.0), Some(1));
//! ```
//!
//! Mutations are batched: nothing is attached or detached until the next
//! [`Page::flush`] (or [`Runtime::flush`]).

mod attach;
mod behavior;
mod config;
mod context;
mod error;
mod instance;
mod name;
mod page;
mod registry;
mod runtime;
mod scan;
mod watcher;

pub use behavior::{AttributeChange, Behavior, HookSet};
pub use config::{Config, RegistryConfig, ScanStrategy, WatcherConfig};
pub use context::HookContext;
pub use error::{ConfigError, RegistrationError};
pub use name::{BehaviorName, NamePolicy};
pub use page::Page;
pub use registry::{BehaviorDef, BehaviorHandle, BehaviorId, Registry};
pub use runtime::{Runtime, Subscriptions, WatchState};
pub use watcher::FlushStats;
