//! Side table of behavior instances, keyed by element.

use rustc_hash::FxHashMap as HashMap;
use smallvec::SmallVec;
use tether_dom::NodeId;

use crate::behavior::ErasedBehavior;
use crate::registry::BehaviorId;

/// One behavior bound to one element.
pub(crate) struct Instance {
	pub(crate) target: NodeId,
	pub(crate) behavior: BehaviorId,
	/// `None` while the state is lent out to a running hook.
	pub(crate) state: Option<Box<dyn ErasedBehavior>>,
}

/// Instances on one element, in attach order.
#[derive(Default)]
pub(crate) struct ElementInstances {
	slots: SmallVec<[Instance; 2]>,
}

impl ElementInstances {
	fn slot(&self, id: BehaviorId) -> Option<&Instance> {
		self.slots.iter().find(|inst| inst.behavior == id)
	}

	fn slot_mut(&mut self, id: BehaviorId) -> Option<&mut Instance> {
		self.slots.iter_mut().find(|inst| inst.behavior == id)
	}

	pub(crate) fn ids(&self) -> impl Iterator<Item = BehaviorId> + '_ {
		self.slots.iter().map(|inst| inst.behavior)
	}
}

/// Every live instance, grouped per element. An element appears only while it
/// has at least one instance.
#[derive(Default)]
pub(crate) struct InstanceTables {
	by_element: HashMap<NodeId, ElementInstances>,
	len: usize,
}

impl InstanceTables {
	pub(crate) fn contains(&self, el: NodeId, id: BehaviorId) -> bool {
		self.by_element.get(&el).is_some_and(|table| table.slot(id).is_some())
	}

	pub(crate) fn get(&self, el: NodeId) -> Option<&ElementInstances> {
		self.by_element.get(&el)
	}

	/// Snapshot of the behaviors on `el`, safe to hold across hook calls.
	pub(crate) fn ids(&self, el: NodeId) -> SmallVec<[BehaviorId; 4]> {
		self.by_element
			.get(&el)
			.map(|table| table.ids().collect())
			.unwrap_or_default()
	}

	/// Links `instance` into its element's table. The caller guarantees no
	/// instance of the same behavior is present.
	pub(crate) fn insert(&mut self, instance: Instance) {
		debug_assert!(!self.contains(instance.target, instance.behavior));
		self.by_element.entry(instance.target).or_default().slots.push(instance);
		self.len += 1;
	}

	pub(crate) fn remove(&mut self, el: NodeId, id: BehaviorId) -> Option<Instance> {
		let table = self.by_element.get_mut(&el)?;
		let pos = table.slots.iter().position(|inst| inst.behavior == id)?;
		let instance = table.slots.remove(pos);
		if table.slots.is_empty() {
			self.by_element.remove(&el);
		}
		self.len -= 1;
		Some(instance)
	}

	pub(crate) fn take_state(&mut self, el: NodeId, id: BehaviorId) -> Option<Box<dyn ErasedBehavior>> {
		self.by_element.get_mut(&el)?.slot_mut(id)?.state.take()
	}

	pub(crate) fn restore_state(&mut self, el: NodeId, id: BehaviorId, state: Box<dyn ErasedBehavior>) {
		if let Some(slot) = self.by_element.get_mut(&el).and_then(|table| table.slot_mut(id)) {
			slot.state = Some(state);
		}
	}

	pub(crate) fn state(&self, el: NodeId, id: BehaviorId) -> Option<&dyn ErasedBehavior> {
		self.by_element.get(&el)?.slot(id)?.state.as_deref()
	}

	pub(crate) fn state_mut(&mut self, el: NodeId, id: BehaviorId) -> Option<&mut (dyn ErasedBehavior + 'static)> {
		self.by_element.get_mut(&el)?.slot_mut(id)?.state.as_deref_mut()
	}

	/// Elements that carry at least one instance.
	pub(crate) fn elements(&self) -> impl Iterator<Item = NodeId> + '_ {
		self.by_element.keys().copied()
	}

	pub(crate) fn len(&self) -> usize {
		self.len
	}
}
