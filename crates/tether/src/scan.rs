//! Tree scanner: attaches behaviors to qualifying elements under a root.

use smallvec::SmallVec;
use tether_dom::{Document, NodeId};

use crate::config::ScanStrategy;
use crate::registry::BehaviorId;
use crate::runtime::Runtime;

impl Runtime {
	/// Attaches every registered behavior (or only `only`) to the elements
	/// under `root` that carry its attribute. Returns the number of new
	/// instances.
	///
	/// Hooks may mutate the document or register behaviors while this runs:
	/// each element is rechecked before attaching and the registry is read
	/// live.
	pub(crate) fn scan(&mut self, doc: &mut Document, root: NodeId, only: Option<BehaviorId>) -> usize {
		match self.config.scan_strategy {
			ScanStrategy::Walk => self.scan_walk(doc, root, only),
			ScanStrategy::Query => self.scan_query(doc, root, only),
		}
	}

	fn scan_walk(&mut self, doc: &mut Document, root: NodeId, only: Option<BehaviorId>) -> usize {
		let elements: Vec<NodeId> = doc.descendants(root).filter(|&id| doc.is_element(id)).collect();
		let mut attached = 0;
		for el in elements {
			if !doc.is_connected(el) {
				continue;
			}
			let names: SmallVec<[String; 4]> = doc.attributes(el).iter().map(|attr| attr.name.clone()).collect();
			for name in names {
				let Some(id) = self.registry.lookup(&name) else {
					continue;
				};
				if only.is_some_and(|only| only != id) || !doc.has_attribute(el, &name) {
					continue;
				}
				attached += usize::from(self.attach(doc, el, id));
			}
		}
		attached
	}

	fn scan_query(&mut self, doc: &mut Document, root: NodeId, only: Option<BehaviorId>) -> usize {
		let mut attached = 0;
		let mut index = 0;
		while let Some(id) = self.registry.id_at(index) {
			index += 1;
			if only.is_some_and(|only| only != id) {
				continue;
			}
			let Some(def) = self.registry.shared(id) else {
				continue;
			};
			for el in doc.elements_with_attribute(root, def.name()) {
				if doc.is_connected(el) && doc.has_attribute(el, def.name()) {
					attached += usize::from(self.attach(doc, el, id));
				}
			}
		}
		attached
	}
}
