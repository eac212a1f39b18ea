//! Mutation observer registrations and their record queues.
//!
//! Observers never run code. A mutation appends a [`MutationRecord`] to the
//! queue of every interested registration, and the owner of the observer drains
//! the queue with [`Document::take_records`](crate::Document::take_records) at a
//! point of its choosing. This keeps delivery batched and out of band with the
//! mutations that produced the records.

use crate::NodeId;

bitflags::bitflags! {
	/// What an observer registration listens to.
	#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
	pub struct ObserveFlags: u8 {
		/// Child insertions and removals on the observed node.
		const CHILD_LIST = 1 << 0;
		/// Attribute sets and removals on the observed node.
		const ATTRIBUTES = 1 << 1;
		/// Capture the previous attribute value. Implies `ATTRIBUTES`.
		const ATTRIBUTE_OLD_VALUE = 1 << 2;
		/// Extend the above to every descendant of the observed node.
		const SUBTREE = 1 << 3;
	}
}

/// Handle to one observer registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u32);

/// A single observed change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationRecord {
	/// An attribute was set (possibly to the same value) or removed.
	Attributes {
		target: NodeId,
		name: String,
		/// Previous value, present only when the attribute existed and the
		/// registration asked for [`ObserveFlags::ATTRIBUTE_OLD_VALUE`].
		old_value: Option<String>,
	},
	/// Children were inserted into or removed from `target`.
	ChildList {
		target: NodeId,
		added: Vec<NodeId>,
		removed: Vec<NodeId>,
	},
}

impl MutationRecord {
	/// Node the mutation happened on.
	pub fn target(&self) -> NodeId {
		match self {
			Self::Attributes { target, .. } | Self::ChildList { target, .. } => *target,
		}
	}
}

#[derive(Debug)]
struct Registration {
	target: NodeId,
	flags: ObserveFlags,
	queue: Vec<MutationRecord>,
}

impl Registration {
	/// `path` is the mutated node followed by its ancestors.
	fn covers(&self, path: &[NodeId]) -> bool {
		match path.split_first() {
			Some((first, _)) if *first == self.target => true,
			Some((_, ancestors)) => self.flags.contains(ObserveFlags::SUBTREE) && ancestors.contains(&self.target),
			None => false,
		}
	}
}

#[derive(Debug, Default)]
pub(crate) struct Observers {
	slots: Vec<Option<Registration>>,
	live: usize,
}

impl Observers {
	pub(crate) fn observe(&mut self, target: NodeId, mut flags: ObserveFlags) -> ObserverId {
		if flags.contains(ObserveFlags::ATTRIBUTE_OLD_VALUE) {
			flags |= ObserveFlags::ATTRIBUTES;
		}
		let id = ObserverId(self.slots.len() as u32);
		self.slots.push(Some(Registration {
			target,
			flags,
			queue: Vec::new(),
		}));
		self.live += 1;
		id
	}

	pub(crate) fn disconnect(&mut self, id: ObserverId) -> bool {
		let removed = self.slots.get_mut(id.0 as usize).and_then(Option::take).is_some();
		if removed {
			self.live -= 1;
		}
		removed
	}

	pub(crate) fn is_empty(&self) -> bool {
		self.live == 0
	}

	pub(crate) fn take(&mut self, id: ObserverId) -> Vec<MutationRecord> {
		self.slots
			.get_mut(id.0 as usize)
			.and_then(Option::as_mut)
			.map(|reg| std::mem::take(&mut reg.queue))
			.unwrap_or_default()
	}

	pub(crate) fn pending(&self, id: ObserverId) -> usize {
		self.slots
			.get(id.0 as usize)
			.and_then(Option::as_ref)
			.map_or(0, |reg| reg.queue.len())
	}

	pub(crate) fn has_pending(&self) -> bool {
		self.slots.iter().flatten().any(|reg| !reg.queue.is_empty())
	}

	pub(crate) fn notify_attribute(&mut self, path: &[NodeId], name: &str, old_value: Option<&str>) {
		let Some(&target) = path.first() else {
			return;
		};
		for reg in self.slots.iter_mut().flatten() {
			if !reg.flags.contains(ObserveFlags::ATTRIBUTES) || !reg.covers(path) {
				continue;
			}
			let old_value = if reg.flags.contains(ObserveFlags::ATTRIBUTE_OLD_VALUE) {
				old_value.map(str::to_owned)
			} else {
				None
			};
			reg.queue.push(MutationRecord::Attributes {
				target,
				name: name.to_owned(),
				old_value,
			});
		}
	}

	pub(crate) fn notify_child_list(&mut self, path: &[NodeId], added: &[NodeId], removed: &[NodeId]) {
		let Some(&target) = path.first() else {
			return;
		};
		for reg in self.slots.iter_mut().flatten() {
			if !reg.flags.contains(ObserveFlags::CHILD_LIST) || !reg.covers(path) {
				continue;
			}
			reg.queue.push(MutationRecord::ChildList {
				target,
				added: added.to_vec(),
				removed: removed.to_vec(),
			});
		}
	}
}
