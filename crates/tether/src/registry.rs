//! Append-only registry of behavior descriptors.

use std::any::TypeId;
use std::rc::Rc;

use rustc_hash::FxHashMap as HashMap;

use crate::behavior::{Behavior, ErasedBehavior, HookSet};
use crate::{BehaviorName, NamePolicy, RegistrationError};

/// Dense index of a registered behavior, in registration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BehaviorId(u32);

impl BehaviorId {
	#[inline]
	pub const fn index(self) -> usize {
		self.0 as usize
	}
}

type Factory = Box<dyn Fn() -> Box<dyn ErasedBehavior>>;

/// A registered behavior: name, captured hooks and instance factory.
pub struct BehaviorDef {
	id: BehaviorId,
	name: BehaviorName,
	hooks: HookSet,
	type_id: TypeId,
	type_name: &'static str,
	factory: Factory,
}

impl BehaviorDef {
	pub fn id(&self) -> BehaviorId {
		self.id
	}

	pub fn name(&self) -> &BehaviorName {
		&self.name
	}

	pub fn hooks(&self) -> HookSet {
		self.hooks
	}

	/// Rust type name of the instance state, for diagnostics.
	pub fn type_name(&self) -> &'static str {
		self.type_name
	}

	pub(crate) fn instantiate(&self) -> Box<dyn ErasedBehavior> {
		(self.factory)()
	}
}

impl core::fmt::Debug for BehaviorDef {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		f.debug_struct("BehaviorDef")
			.field("id", &self.id)
			.field("name", &self.name)
			.field("hooks", &self.hooks)
			.field("type_name", &self.type_name)
			.finish_non_exhaustive()
	}
}

/// Identity of a registered behavior, returned from registration.
///
/// Used to look up typed instance state and to compare behaviors without
/// going through names.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BehaviorHandle {
	id: BehaviorId,
	name: BehaviorName,
	type_id: TypeId,
}

impl BehaviorHandle {
	pub fn id(&self) -> BehaviorId {
		self.id
	}

	pub fn name(&self) -> &BehaviorName {
		&self.name
	}

	/// Whether the instance state of this behavior is a `B`.
	pub fn is<B: Behavior>(&self) -> bool {
		self.type_id == TypeId::of::<B>()
	}
}

/// Behavior descriptors keyed by attribute name.
///
/// Descriptors are never removed, so a [`BehaviorId`] stays valid for the
/// registry's lifetime and iterating by index tolerates registrations made
/// mid-iteration.
#[derive(Debug)]
pub struct Registry {
	policy: NamePolicy,
	defs: Vec<Rc<BehaviorDef>>,
	by_name: HashMap<Box<str>, BehaviorId>,
}

impl Registry {
	pub fn new(policy: NamePolicy) -> Self {
		Self {
			policy,
			defs: Vec::new(),
			by_name: HashMap::default(),
		}
	}

	pub fn policy(&self) -> NamePolicy {
		self.policy
	}

	/// Validates `name` and stores a descriptor for `B`.
	///
	/// Validation completes before anything is stored, so a failed call
	/// leaves the registry untouched.
	pub fn register<B, F>(&mut self, name: &str, factory: F) -> Result<BehaviorHandle, RegistrationError>
	where
		B: Behavior,
		F: Fn() -> B + 'static,
	{
		let name = BehaviorName::parse(name, self.policy)?;
		if self.by_name.contains_key(name.as_str()) {
			return Err(RegistrationError::AlreadyRegistered {
				name: name.as_str().to_owned(),
			});
		}

		let id = BehaviorId(self.defs.len() as u32);
		let def = BehaviorDef {
			id,
			name: name.clone(),
			hooks: B::HOOKS,
			type_id: TypeId::of::<B>(),
			type_name: std::any::type_name::<B>(),
			factory: Box::new(move || Box::new(factory()) as Box<dyn ErasedBehavior>),
		};
		self.by_name.insert(name.as_str().into(), id);
		self.defs.push(Rc::new(def));

		tracing::debug!(behavior = %name, ?id, hooks = ?B::HOOKS, "behavior registered");
		Ok(BehaviorHandle {
			id,
			name,
			type_id: TypeId::of::<B>(),
		})
	}

	/// Id of the behavior bound to attribute `name`. Expects a lower-cased name.
	#[inline]
	pub fn lookup(&self, name: &str) -> Option<BehaviorId> {
		self.by_name.get(name).copied()
	}

	pub fn get(&self, name: &str) -> Option<&BehaviorDef> {
		self.lookup(name).and_then(|id| self.by_id(id))
	}

	pub fn by_id(&self, id: BehaviorId) -> Option<&BehaviorDef> {
		self.defs.get(id.index()).map(|def| &**def)
	}

	/// Shared descriptor, kept alive across hook calls that may grow the registry.
	pub(crate) fn shared(&self, id: BehaviorId) -> Option<Rc<BehaviorDef>> {
		self.defs.get(id.index()).cloned()
	}

	pub(crate) fn id_at(&self, index: usize) -> Option<BehaviorId> {
		(index < self.defs.len()).then(|| BehaviorId(index as u32))
	}

	pub fn contains(&self, name: &str) -> bool {
		self.by_name.contains_key(&*name.to_ascii_lowercase())
	}

	pub fn len(&self) -> usize {
		self.defs.len()
	}

	pub fn is_empty(&self) -> bool {
		self.defs.is_empty()
	}

	/// Descriptors in registration order.
	pub fn iter(&self) -> impl Iterator<Item = &BehaviorDef> {
		self.defs.iter().map(|def| &**def)
	}
}
