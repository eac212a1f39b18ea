use smallvec::SmallVec;

use crate::error::{DomError, Result};
use crate::node::{Attribute, ElementData, Node, NodeData, NodeKind};
use crate::observer::{MutationRecord, ObserveFlags, ObserverId, Observers};
use crate::NodeId;

/// Loading progress of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum ReadyState {
	/// Still being built; no body to observe yet.
	#[default]
	Loading,
	/// Fully built, subresources may still be pending.
	Interactive,
	/// Everything loaded.
	Complete,
}

/// An arena-backed document tree.
///
/// Node `0` is the document node. Every other node starts out disconnected and
/// joins the tree through [`append_child`](Self::append_child) or
/// [`insert_before`](Self::insert_before).
#[derive(Debug)]
pub struct Document {
	nodes: Vec<Node>,
	ready_state: ReadyState,
	observers: Observers,
}

impl Default for Document {
	fn default() -> Self {
		Self::new()
	}
}

impl Document {
	/// Creates an empty document in the [`ReadyState::Loading`] state.
	pub fn new() -> Self {
		Self {
			nodes: vec![Node::new(NodeData::Document)],
			ready_state: ReadyState::Loading,
			observers: Observers::default(),
		}
	}

	/// Creates an empty document that is already interactive.
	pub fn ready() -> Self {
		let mut doc = Self::new();
		doc.ready_state = ReadyState::Interactive;
		doc
	}

	#[inline]
	pub fn root(&self) -> NodeId {
		NodeId::ROOT
	}

	pub fn ready_state(&self) -> ReadyState {
		self.ready_state
	}

	/// Whether the document has finished building its tree.
	pub fn is_ready(&self) -> bool {
		self.ready_state != ReadyState::Loading
	}

	/// Advances the ready state. Going backwards is ignored.
	pub fn set_ready_state(&mut self, state: ReadyState) {
		if state > self.ready_state {
			tracing::debug!(from = ?self.ready_state, to = ?state, "document ready state changed");
			self.ready_state = state;
		}
	}

	/// Number of nodes ever created, including the document node.
	pub fn len(&self) -> usize {
		self.nodes.len()
	}

	pub fn is_empty(&self) -> bool {
		self.nodes.len() == 1
	}

	pub fn create_element(&mut self, local_name: &str) -> Result<NodeId> {
		check_name(local_name)?;
		Ok(self.push(NodeData::Element(ElementData {
			local_name: local_name.to_ascii_lowercase(),
			attrs: SmallVec::new(),
		})))
	}

	/// Creates a disconnected element carrying `attrs`.
	pub fn create_element_with(&mut self, local_name: &str, attrs: &[(&str, &str)]) -> Result<NodeId> {
		let id = self.create_element(local_name)?;
		for (name, value) in attrs {
			self.set_attribute(id, name, value)?;
		}
		Ok(id)
	}

	pub fn create_text(&mut self, text: impl Into<String>) -> NodeId {
		self.push(NodeData::Text(text.into()))
	}

	fn push(&mut self, data: NodeData) -> NodeId {
		let id = NodeId(self.nodes.len() as u32);
		self.nodes.push(Node::new(data));
		id
	}

	fn node(&self, id: NodeId) -> Result<&Node> {
		self.nodes.get(id.index()).ok_or(DomError::UnknownNode(id))
	}

	fn element(&self, id: NodeId) -> Result<&ElementData> {
		self.node(id)?.element().ok_or(DomError::NotAnElement(id))
	}

	pub fn kind(&self, id: NodeId) -> Option<NodeKind> {
		self.nodes.get(id.index()).map(Node::kind)
	}

	pub fn is_element(&self, id: NodeId) -> bool {
		self.kind(id) == Some(NodeKind::Element)
	}

	pub fn local_name(&self, id: NodeId) -> Option<&str> {
		self.element(id).ok().map(|el| el.local_name.as_str())
	}

	pub fn text(&self, id: NodeId) -> Option<&str> {
		match &self.nodes.get(id.index())?.data {
			NodeData::Text(text) => Some(text),
			_ => None,
		}
	}

	pub fn parent(&self, id: NodeId) -> Option<NodeId> {
		self.nodes.get(id.index())?.parent
	}

	pub fn children(&self, id: NodeId) -> &[NodeId] {
		self.nodes.get(id.index()).map_or(&[], |node| node.children.as_slice())
	}

	/// Returns `node` followed by each of its ancestors.
	fn inclusive_ancestors(&self, node: NodeId) -> SmallVec<[NodeId; 16]> {
		let mut path = SmallVec::new();
		let mut cur = Some(node);
		while let Some(id) = cur {
			path.push(id);
			cur = self.parent(id);
		}
		path
	}

	/// Whether `node` is reachable from the document node.
	pub fn is_connected(&self, node: NodeId) -> bool {
		self.contains(NodeId::ROOT, node)
	}

	/// Whether `node` is `ancestor` or one of its descendants.
	pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
		let mut cur = Some(node);
		while let Some(id) = cur {
			if id == ancestor {
				return true;
			}
			cur = self.parent(id);
		}
		false
	}

	/// Pre-order iterator over the descendants of `root`, excluding `root`.
	pub fn descendants(&self, root: NodeId) -> Descendants<'_> {
		let mut stack: Vec<NodeId> = self.children(root).to_vec();
		stack.reverse();
		Descendants { doc: self, stack }
	}

	/// Elements under `root` (exclusive) carrying attribute `name`, in tree order.
	pub fn elements_with_attribute(&self, root: NodeId, name: &str) -> Vec<NodeId> {
		let name = name.to_ascii_lowercase();
		self.descendants(root)
			.filter(|&id| self.has_attribute(id, &name))
			.collect()
	}

	pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
		self.insert_before(parent, child, None)
	}

	/// Inserts `child` into `parent` before `reference`, or last when `reference`
	/// is `None`. A child that already has a parent is moved.
	pub fn insert_before(&mut self, parent: NodeId, child: NodeId, reference: Option<NodeId>) -> Result<()> {
		if self.node(parent)?.kind() == NodeKind::Text {
			return Err(DomError::HierarchyRequest { parent, child });
		}
		if self.node(child)?.kind() == NodeKind::Document || self.contains(child, parent) {
			return Err(DomError::HierarchyRequest { parent, child });
		}
		if let Some(reference) = reference {
			self.node(reference)?;
			if reference == child {
				return Ok(());
			}
			if self.parent(reference) != Some(parent) {
				return Err(DomError::NotAChild { parent, child: reference });
			}
		}

		if let Some(old_parent) = self.parent(child) {
			self.detach(old_parent, child);
		}

		let children = &mut self.nodes[parent.index()].children;
		let at = reference
			.and_then(|r| children.iter().position(|&c| c == r))
			.unwrap_or(children.len());
		children.insert(at, child);
		self.nodes[child.index()].parent = Some(parent);

		if !self.observers.is_empty() {
			let path = self.inclusive_ancestors(parent);
			self.observers.notify_child_list(&path, &[child], &[]);
		}
		Ok(())
	}

	pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
		self.node(child)?;
		if self.parent(child) != Some(parent) {
			return Err(DomError::NotAChild { parent, child });
		}
		self.detach(parent, child);
		Ok(())
	}

	/// Removes `node` from its parent. Does nothing for a parentless node.
	pub fn remove(&mut self, node: NodeId) -> Result<()> {
		self.node(node)?;
		if let Some(parent) = self.parent(node) {
			self.detach(parent, node);
		}
		Ok(())
	}

	fn detach(&mut self, parent: NodeId, child: NodeId) {
		self.nodes[parent.index()].children.retain(|&c| c != child);
		self.nodes[child.index()].parent = None;
		if !self.observers.is_empty() {
			let path = self.inclusive_ancestors(parent);
			self.observers.notify_child_list(&path, &[], &[child]);
		}
	}

	pub fn attribute(&self, el: NodeId, name: &str) -> Option<&str> {
		let data = self.element(el).ok()?;
		let name = name.to_ascii_lowercase();
		data.position(&name).map(|i| data.attrs[i].value.as_str())
	}

	pub fn has_attribute(&self, el: NodeId, name: &str) -> bool {
		self.attribute(el, name).is_some()
	}

	/// Attributes of `el` in insertion order; empty for non-elements.
	pub fn attributes(&self, el: NodeId) -> &[Attribute] {
		self.element(el).map_or(&[], |data| data.attrs.as_slice())
	}

	/// Sets an attribute. Always queues a mutation record, even when the value
	/// is unchanged.
	pub fn set_attribute(&mut self, el: NodeId, name: &str, value: &str) -> Result<()> {
		check_name(name)?;
		self.element(el)?;
		let name = name.to_ascii_lowercase();
		let data = self.nodes[el.index()]
			.element_mut()
			.ok_or(DomError::NotAnElement(el))?;
		let old = match data.position(&name) {
			Some(i) => Some(std::mem::replace(&mut data.attrs[i].value, value.to_owned())),
			None => {
				data.attrs.push(Attribute {
					name: name.clone(),
					value: value.to_owned(),
				});
				None
			}
		};
		self.notify_attribute(el, &name, old.as_deref());
		Ok(())
	}

	/// Removes an attribute and returns its previous value. Removing an absent
	/// attribute is not a mutation and queues nothing.
	pub fn remove_attribute(&mut self, el: NodeId, name: &str) -> Result<Option<String>> {
		self.element(el)?;
		let name = name.to_ascii_lowercase();
		let data = self.nodes[el.index()]
			.element_mut()
			.ok_or(DomError::NotAnElement(el))?;
		let Some(i) = data.position(&name) else {
			return Ok(None);
		};
		let old = data.attrs.remove(i).value;
		self.notify_attribute(el, &name, Some(&old));
		Ok(Some(old))
	}

	/// Adds the attribute with an empty value when absent, removes it otherwise.
	/// Returns whether the attribute is present afterwards.
	pub fn toggle_attribute(&mut self, el: NodeId, name: &str) -> Result<bool> {
		if self.has_attribute(el, name) {
			self.remove_attribute(el, name)?;
			Ok(false)
		} else {
			self.set_attribute(el, name, "")?;
			Ok(true)
		}
	}

	fn notify_attribute(&mut self, el: NodeId, name: &str, old_value: Option<&str>) {
		if self.observers.is_empty() {
			return;
		}
		let path = self.inclusive_ancestors(el);
		self.observers.notify_attribute(&path, name, old_value);
	}

	/// Registers an observer on `target`. An id outside the document never
	/// receives records.
	pub fn observe(&mut self, target: NodeId, flags: ObserveFlags) -> ObserverId {
		let id = self.observers.observe(target, flags);
		tracing::trace!(?id, %target, ?flags, "observer registered");
		id
	}

	/// Drops a registration and its pending records.
	pub fn disconnect(&mut self, observer: ObserverId) -> bool {
		self.observers.disconnect(observer)
	}

	/// Drains the records queued for `observer`, oldest first.
	pub fn take_records(&mut self, observer: ObserverId) -> Vec<MutationRecord> {
		self.observers.take(observer)
	}

	pub fn pending_records(&self, observer: ObserverId) -> usize {
		self.observers.pending(observer)
	}

	/// Whether any registration has undelivered records.
	pub fn has_pending_records(&self) -> bool {
		self.observers.has_pending()
	}
}

fn check_name(name: &str) -> Result<()> {
	let valid = !name.is_empty()
		&& !name
			.chars()
			.any(|c| c.is_whitespace() || c.is_control() || matches!(c, '"' | '\'' | '>' | '/' | '=' | '<'));
	if valid { Ok(()) } else { Err(DomError::InvalidName(name.to_owned())) }
}

/// Iterator returned by [`Document::descendants`].
pub struct Descendants<'a> {
	doc: &'a Document,
	stack: Vec<NodeId>,
}

impl Iterator for Descendants<'_> {
	type Item = NodeId;

	fn next(&mut self) -> Option<NodeId> {
		let id = self.stack.pop()?;
		self.stack.extend(self.doc.children(id).iter().rev());
		Some(id)
	}
}
