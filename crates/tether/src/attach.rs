//! Instance attach/detach and hook dispatch.

use tether_dom::{Document, NodeId};

use crate::behavior::Hook;
use crate::instance::Instance;
use crate::registry::{BehaviorDef, BehaviorId};
use crate::runtime::Runtime;
use crate::HookContext;

impl Runtime {
	/// Creates the `id` instance on `el` unless one exists, then runs its
	/// `attached` hook. Returns whether an instance was created.
	pub(crate) fn attach(&mut self, doc: &mut Document, el: NodeId, id: BehaviorId) -> bool {
		if self.instances.contains(el, id) {
			return false;
		}
		let Some(def) = self.registry.shared(id) else {
			return false;
		};
		self.instances.insert(Instance {
			target: el,
			behavior: id,
			state: Some(def.instantiate()),
		});
		tracing::trace!(behavior = %def.name(), element = %el, "attached");
		self.invoke(doc, el, &def, Hook::Attached);
		true
	}

	/// Runs the `detached` hook of the `id` instance on `el` and removes it.
	///
	/// Callers check that the instance exists.
	pub(crate) fn detach(&mut self, doc: &mut Document, el: NodeId, id: BehaviorId) {
		let Some(def) = self.registry.shared(id) else {
			return;
		};
		let attached = self.instances.contains(el, id);
		debug_assert!(attached, "detach of {} on {el} without an instance", def.name());
		if !attached {
			tracing::error!(behavior = %def.name(), element = %el, "detach without an attached instance");
			return;
		}
		self.invoke(doc, el, &def, Hook::Detached);
		self.instances.remove(el, id);
		tracing::trace!(behavior = %def.name(), element = %el, "detached");
	}

	/// Detaches every behavior on `node` and its descendants.
	pub(crate) fn detach_subtree(&mut self, doc: &mut Document, node: NodeId) {
		let nodes: Vec<NodeId> = std::iter::once(node).chain(doc.descendants(node)).collect();
		for el in nodes {
			for id in self.instances.ids(el) {
				if self.instances.contains(el, id) {
					self.detach(doc, el, id);
				}
			}
		}
	}

	/// Detaches behaviors on every element that is no longer connected.
	///
	/// Catches elements that left the document inside a subtree which was
	/// rearranged before the removal was delivered.
	pub(crate) fn detach_disconnected(&mut self, doc: &mut Document) {
		let mut stale: Vec<NodeId> = self.instances.elements().filter(|&el| !doc.is_connected(el)).collect();
		stale.sort_unstable();
		for el in stale {
			for id in self.instances.ids(el) {
				if self.instances.contains(el, id) {
					self.detach(doc, el, id);
				}
			}
		}
	}

	/// Calls `hook` on the instance if its behavior declared it.
	///
	/// The state is lent out of its slot for the duration of the call so the
	/// hook can read sibling instances through its context.
	pub(crate) fn invoke(&mut self, doc: &mut Document, el: NodeId, def: &BehaviorDef, hook: Hook<'_>) {
		if !def.hooks().contains(hook.flag()) {
			return;
		}
		let Some(mut state) = self.instances.take_state(el, def.id()) else {
			return;
		};
		{
			let mut cx = HookContext {
				target: el,
				behavior: def,
				document: doc,
				registry: &mut self.registry,
				instances: &self.instances,
				upgrades: &mut self.upgrades,
			};
			match hook {
				Hook::Attached => state.attached(&mut cx),
				Hook::Detached => state.detached(&mut cx),
				Hook::AttributeChanged(change) => state.attribute_changed(&mut cx, change),
			}
		}
		self.instances.restore_state(el, def.id(), state);
	}
}
