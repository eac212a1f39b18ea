use smallvec::SmallVec;

/// Index of a node in its owning [`Document`](crate::Document).
///
/// Ids stay valid for the lifetime of the document; removed nodes remain
/// addressable but disconnected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
	/// The document node.
	pub const ROOT: NodeId = NodeId(0);

	/// Returns the raw arena index.
	#[inline]
	pub const fn index(self) -> usize {
		self.0 as usize
	}
}

impl core::fmt::Display for NodeId {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		write!(f, "#{}", self.0)
	}
}

/// One name/value pair on an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
	pub name: String,
	pub value: String,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct ElementData {
	pub(crate) local_name: String,
	pub(crate) attrs: SmallVec<[Attribute; 4]>,
}

impl ElementData {
	pub(crate) fn position(&self, name: &str) -> Option<usize> {
		self.attrs.iter().position(|attr| attr.name == name)
	}
}

#[derive(Debug, Clone)]
pub(crate) enum NodeData {
	Document,
	Element(ElementData),
	Text(String),
}

/// Kind of a node, as seen from outside the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
	Document,
	Element,
	Text,
}

#[derive(Debug, Clone)]
pub(crate) struct Node {
	pub(crate) parent: Option<NodeId>,
	pub(crate) children: Vec<NodeId>,
	pub(crate) data: NodeData,
}

impl Node {
	pub(crate) fn new(data: NodeData) -> Self {
		Self {
			parent: None,
			children: Vec::new(),
			data,
		}
	}

	pub(crate) fn kind(&self) -> NodeKind {
		match self.data {
			NodeData::Document => NodeKind::Document,
			NodeData::Element(_) => NodeKind::Element,
			NodeData::Text(_) => NodeKind::Text,
		}
	}

	pub(crate) fn element(&self) -> Option<&ElementData> {
		match &self.data {
			NodeData::Element(data) => Some(data),
			_ => None,
		}
	}

	pub(crate) fn element_mut(&mut self) -> Option<&mut ElementData> {
		match &mut self.data {
			NodeData::Element(data) => Some(data),
			_ => None,
		}
	}
}
