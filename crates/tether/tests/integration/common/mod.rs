//! Shared fixtures for runtime integration tests.
#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use tether::{AttributeChange, Behavior, Config, HookContext, HookSet, Page};
use tether_dom::{Document, NodeId};

pub fn init_tracing() {
	let _ = tracing_subscriber::fmt::try_init();
}

/// A lifecycle event observed by a [`Recorder`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
	Attached { behavior: String, el: NodeId },
	Detached { behavior: String, el: NodeId },
	Changed { behavior: String, el: NodeId, change: AttributeChange },
}

pub fn attached(behavior: &str, el: NodeId) -> Event {
	Event::Attached { behavior: behavior.into(), el }
}

pub fn detached(behavior: &str, el: NodeId) -> Event {
	Event::Detached { behavior: behavior.into(), el }
}

pub fn changed(behavior: &str, el: NodeId, name: &str, old: Option<&str>, new: Option<&str>) -> Event {
	Event::Changed {
		behavior: behavior.into(),
		el,
		change: AttributeChange {
			name: name.into(),
			old_value: old.map(str::to_owned),
			new_value: new.map(str::to_owned),
		},
	}
}

/// Event sink shared between a test and the instances it creates.
#[derive(Debug, Clone, Default)]
pub struct Log(Rc<RefCell<Vec<Event>>>);

impl Log {
	pub fn push(&self, event: Event) {
		self.0.borrow_mut().push(event);
	}

	pub fn events(&self) -> Vec<Event> {
		self.0.borrow().clone()
	}

	/// Returns and clears everything recorded so far.
	pub fn take(&self) -> Vec<Event> {
		std::mem::take(&mut *self.0.borrow_mut())
	}

	pub fn is_empty(&self) -> bool {
		self.0.borrow().is_empty()
	}
}

/// Records every hook call into a [`Log`].
pub struct Recorder {
	log: Log,
}

impl Recorder {
	pub fn factory(log: &Log) -> impl Fn() -> Recorder + 'static {
		let log = log.clone();
		move || Recorder { log: log.clone() }
	}
}

impl Behavior for Recorder {
	const HOOKS: HookSet = HookSet::all();

	fn attached(&mut self, cx: &mut HookContext<'_>) {
		self.log.push(attached(cx.behavior(), cx.target()));
	}

	fn detached(&mut self, cx: &mut HookContext<'_>) {
		self.log.push(detached(cx.behavior(), cx.target()));
	}

	fn attribute_changed(&mut self, cx: &mut HookContext<'_>, change: &AttributeChange) {
		self.log.push(Event::Changed {
			behavior: cx.behavior().to_string(),
			el: cx.target(),
			change: change.clone(),
		});
	}
}

pub fn ready_page() -> Page {
	page_with(&Config::default())
}

pub fn page_with(config: &Config) -> Page {
	init_tracing();
	Page::with_document(Document::ready(), config)
}

/// Creates an element carrying `attrs` and appends it to `parent`.
pub fn add(page: &mut Page, parent: NodeId, name: &str, attrs: &[(&str, &str)]) -> NodeId {
	let doc = page.document_mut();
	let el = doc.create_element_with(name, attrs).unwrap();
	doc.append_child(parent, el).unwrap();
	el
}
