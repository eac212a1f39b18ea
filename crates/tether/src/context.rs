use tether_dom::{Document, NodeId};

use crate::instance::InstanceTables;
use crate::registry::{BehaviorDef, BehaviorId, Registry};
use crate::{Behavior, BehaviorHandle, BehaviorName, RegistrationError};

/// What a running hook can see and touch.
///
/// The hook's own state is the `&mut self` receiver; through the context it
/// reaches its element, sibling behaviors on that element, the document and
/// the registry. Document mutations made here are queued like any other and
/// delivered on the next flush.
pub struct HookContext<'a> {
	pub(crate) target: NodeId,
	pub(crate) behavior: &'a BehaviorDef,
	pub(crate) document: &'a mut Document,
	pub(crate) registry: &'a mut Registry,
	pub(crate) instances: &'a InstanceTables,
	pub(crate) upgrades: &'a mut Vec<BehaviorId>,
}

impl HookContext<'_> {
	/// Element the behavior is bound to.
	pub fn target(&self) -> NodeId {
		self.target
	}

	/// Name of the running behavior.
	pub fn behavior(&self) -> &BehaviorName {
		self.behavior.name()
	}

	/// Current value of the behavior's own attribute on the target.
	pub fn value(&self) -> Option<&str> {
		self.document.attribute(self.target, self.behavior.name())
	}

	/// Current value of any attribute on the target.
	pub fn attribute(&self, name: &str) -> Option<&str> {
		self.document.attribute(self.target, name)
	}

	pub fn document(&self) -> &Document {
		&*self.document
	}

	pub fn document_mut(&mut self) -> &mut Document {
		&mut *self.document
	}

	pub fn registry(&self) -> &Registry {
		&*self.registry
	}

	/// State of another behavior attached to the same element.
	///
	/// Returns `None` for the running behavior itself, for behaviors that are
	/// not attached, and when the state is not a `B`.
	pub fn sibling<B: Behavior>(&self, name: &str) -> Option<&B> {
		let id = self.registry.lookup(&name.to_ascii_lowercase())?;
		self.instances.state(self.target, id)?.as_any().downcast_ref()
	}

	/// Names of every behavior attached to the target, the running one included.
	pub fn attached(&self) -> Vec<&BehaviorName> {
		self.instances
			.get(self.target)
			.into_iter()
			.flat_map(|table| table.ids())
			.filter_map(|id| self.registry.by_id(id).map(BehaviorDef::name))
			.collect()
	}

	/// Registers a behavior from inside a hook.
	///
	/// Elements already carrying the new attribute are swept once the current
	/// operation finishes.
	pub fn register_behavior<B, F>(&mut self, name: &str, factory: F) -> Result<BehaviorHandle, RegistrationError>
	where
		B: Behavior,
		F: Fn() -> B + 'static,
	{
		let handle = self.registry.register(name, factory)?;
		self.upgrades.push(handle.id());
		Ok(handle)
	}
}
