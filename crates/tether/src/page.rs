use tether_dom::{Document, NodeId, ReadyState};

use crate::{Behavior, BehaviorHandle, BehaviorName, Config, FlushStats, RegistrationError, Runtime};

/// A document together with the runtime bound to it.
///
/// This is the usual entry point: build the tree, register behaviors, and call
/// [`flush`](Self::flush) wherever the host would run its microtask checkpoint.
#[derive(Debug)]
pub struct Page {
	document: Document,
	runtime: Runtime,
}

impl Page {
	/// Creates a page around an empty, still loading document.
	pub fn new(config: &Config) -> Self {
		Self::with_document(Document::new(), config)
	}

	pub fn with_document(document: Document, config: &Config) -> Self {
		Self {
			document,
			runtime: Runtime::new(config),
		}
	}

	pub fn document(&self) -> &Document {
		&self.document
	}

	pub fn document_mut(&mut self) -> &mut Document {
		&mut self.document
	}

	pub fn runtime(&self) -> &Runtime {
		&self.runtime
	}

	/// See [`Runtime::register_behavior`].
	pub fn register_behavior<B, F>(&mut self, name: &str, factory: F) -> Result<BehaviorHandle, RegistrationError>
	where
		B: Behavior,
		F: Fn() -> B + 'static,
	{
		self.runtime.register_behavior(&mut self.document, name, factory)
	}

	/// Delivers pending mutations. See [`Runtime::flush`].
	pub fn flush(&mut self) -> FlushStats {
		self.runtime.flush(&mut self.document)
	}

	/// Marks the document interactive and flushes, which starts a deferred
	/// watcher.
	pub fn finish_loading(&mut self) -> FlushStats {
		self.document.set_ready_state(ReadyState::Interactive);
		self.flush()
	}

	pub fn is_attached(&self, el: NodeId, name: &str) -> bool {
		self.runtime.is_attached(el, name)
	}

	pub fn attached(&self, el: NodeId) -> Vec<&BehaviorName> {
		self.runtime.attached(el)
	}

	pub fn instance<B: Behavior>(&self, el: NodeId, handle: &BehaviorHandle) -> Option<&B> {
		self.runtime.instance(el, handle)
	}

	pub fn instance_mut<B: Behavior>(&mut self, el: NodeId, handle: &BehaviorHandle) -> Option<&mut B> {
		self.runtime.instance_mut(el, handle)
	}
}
