//! Mutation watcher: arming, record delivery and upgrades.

use rustc_hash::FxHashSet as HashSet;
use tether_dom::{Document, MutationRecord, NodeId, ObserveFlags};

use crate::behavior::{AttributeChange, Hook, HookSet};
use crate::runtime::{Runtime, Subscriptions, WatchState};

/// Counters from one [`Runtime::flush`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FlushStats {
	/// Delivery rounds that had at least one record.
	pub rounds: usize,
	pub attribute_records: usize,
	pub child_list_records: usize,
}

impl FlushStats {
	pub fn is_empty(&self) -> bool {
		self.rounds == 0
	}
}

impl Runtime {
	/// Installs both subscriptions on the document root and sweeps it.
	///
	/// Subscriptions go in first so mutations made by hooks during the sweep
	/// are delivered on the next flush instead of being lost.
	pub(crate) fn start(&mut self, doc: &mut Document) {
		let root = doc.root();
		let subs = Subscriptions {
			attributes: doc.observe(root, ObserveFlags::SUBTREE | ObserveFlags::ATTRIBUTE_OLD_VALUE),
			child_list: doc.observe(root, ObserveFlags::SUBTREE | ObserveFlags::CHILD_LIST),
		};
		self.state = WatchState::Observing(subs);
		tracing::debug!(behaviors = self.registry.len(), "watcher observing");

		// Registrations before this point are covered by the full sweep.
		self.upgrades.clear();
		let attached = self.scan(doc, root, None);
		tracing::debug!(attached, "initial sweep complete");
	}

	/// Delivers queued mutation records until none remain.
	///
	/// Starts a deferred watcher first when the document has become ready.
	/// Hooks run during delivery may queue further records; those are
	/// delivered in later rounds, up to the configured maximum.
	pub fn flush(&mut self, doc: &mut Document) -> FlushStats {
		let mut stats = FlushStats::default();
		if self.state == WatchState::Deferred && doc.is_ready() {
			self.start(doc);
			self.drain_upgrades(doc);
		}
		let WatchState::Observing(subs) = self.state else {
			return stats;
		};

		let max_rounds = self.config.max_flush_rounds.max(1);
		while stats.rounds < max_rounds {
			let attributes = doc.take_records(subs.attributes);
			let child_list = doc.take_records(subs.child_list);
			if attributes.is_empty() && child_list.is_empty() {
				return stats;
			}
			stats.rounds += 1;
			stats.attribute_records += attributes.len();
			stats.child_list_records += child_list.len();

			self.apply_attribute_records(doc, attributes);
			self.apply_child_list_records(doc, child_list);
			self.drain_upgrades(doc);
		}

		let pending = doc.pending_records(subs.attributes) + doc.pending_records(subs.child_list);
		if pending > 0 {
			tracing::warn!(rounds = stats.rounds, pending, "flush stopped with mutation records still queued");
		}
		stats
	}

	fn apply_attribute_records(&mut self, doc: &mut Document, records: Vec<MutationRecord>) {
		for record in records {
			let MutationRecord::Attributes { target, name, old_value } = record else {
				continue;
			};
			if let Some(id) = self.registry.lookup(&name) {
				if doc.has_attribute(target, &name) {
					if doc.is_connected(target) {
						self.attach(doc, target, id);
					}
				} else if self.instances.contains(target, id) {
					self.detach(doc, target, id);
				}
			}
			self.notify_attribute_changed(doc, target, name, old_value);
		}
	}

	/// Forwards a change to every other behavior on `target` that asked for it.
	fn notify_attribute_changed(&mut self, doc: &mut Document, target: NodeId, name: String, old_value: Option<String>) {
		let new_value = doc.attribute(target, &name).map(str::to_owned);
		if new_value == old_value {
			return;
		}
		let change = AttributeChange {
			name,
			old_value,
			new_value,
		};
		for id in self.instances.ids(target) {
			let Some(def) = self.registry.shared(id) else {
				continue;
			};
			if def.name().as_str() == change.name || !def.hooks().contains(HookSet::ATTRIBUTE_CHANGED) {
				continue;
			}
			tracing::trace!(behavior = %def.name(), element = %target, attribute = %change.name, "attribute changed");
			self.invoke(doc, target, &def, Hook::AttributeChanged(&change));
		}
	}

	fn apply_child_list_records(&mut self, doc: &mut Document, records: Vec<MutationRecord>) {
		let mut scanned = HashSet::default();
		let mut removals = false;
		for record in records {
			let MutationRecord::ChildList { target, added, removed } = record else {
				continue;
			};
			if self.config.detach_on_removal {
				removals |= !removed.is_empty();
				for node in removed {
					if !doc.is_connected(node) {
						self.detach_subtree(doc, node);
					}
				}
			}
			if !added.is_empty() && doc.is_connected(target) && scanned.insert(target) {
				self.scan(doc, target, None);
			}
		}
		if removals {
			self.detach_disconnected(doc);
		}
	}

	/// Runs the sweeps owed to behaviors registered since the last call.
	pub(crate) fn drain_upgrades(&mut self, doc: &mut Document) {
		while !self.upgrades.is_empty() {
			let pending = std::mem::take(&mut self.upgrades);
			if !self.config.upgrade_on_register || !self.is_observing() {
				continue;
			}
			let root = doc.root();
			for id in pending {
				let attached = self.scan(doc, root, Some(id));
				tracing::trace!(?id, attached, "upgrade sweep complete");
			}
		}
	}
}
