//! The behavior runtime: registry, instance side table and mutation watcher.

use tether_dom::{Document, NodeId, ObserverId};

use crate::config::{Config, WatcherConfig};
use crate::instance::InstanceTables;
use crate::registry::{BehaviorId, Registry};
use crate::{Behavior, BehaviorHandle, BehaviorName, RegistrationError};

/// The two observer registrations installed when watching starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Subscriptions {
	/// Attribute changes with old values, whole document.
	pub attributes: ObserverId,
	/// Child insertions and removals, whole document.
	pub child_list: ObserverId,
}

/// Lifecycle of the mutation watcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WatchState {
	/// No behavior registered yet.
	#[default]
	Uninitialized,
	/// A behavior was registered while the document was loading; watching
	/// starts on the first flush after it becomes ready.
	Deferred,
	/// Subscriptions installed and the initial sweep done. Terminal.
	Observing(Subscriptions),
}

/// Binds registered behaviors to the elements of one document.
///
/// The runtime does not own the document; every operation that can touch it
/// takes it explicitly. [`Page`](crate::Page) pairs the two.
pub struct Runtime {
	pub(crate) config: WatcherConfig,
	pub(crate) registry: Registry,
	pub(crate) instances: InstanceTables,
	pub(crate) state: WatchState,
	/// Behaviors registered since the last upgrade sweep.
	pub(crate) upgrades: Vec<BehaviorId>,
}

impl Runtime {
	pub fn new(config: &Config) -> Self {
		Self {
			config: config.watcher.clone(),
			registry: Registry::new(config.registry.name_policy),
			instances: InstanceTables::default(),
			state: WatchState::Uninitialized,
			upgrades: Vec::new(),
		}
	}

	pub fn registry(&self) -> &Registry {
		&self.registry
	}

	pub fn config(&self) -> &WatcherConfig {
		&self.config
	}

	pub fn state(&self) -> WatchState {
		self.state
	}

	pub fn is_observing(&self) -> bool {
		matches!(self.state, WatchState::Observing(_))
	}

	/// Registers a behavior bound to attribute `name`.
	///
	/// The first successful registration starts watching `doc`, or defers it
	/// until the document is ready. Later registrations sweep the document for
	/// the new behavior when upgrades are enabled.
	pub fn register_behavior<B, F>(
		&mut self,
		doc: &mut Document,
		name: &str,
		factory: F,
	) -> Result<BehaviorHandle, RegistrationError>
	where
		B: Behavior,
		F: Fn() -> B + 'static,
	{
		let handle = self.registry.register(name, factory)?;
		match self.state {
			WatchState::Uninitialized if doc.is_ready() => self.start(doc),
			WatchState::Uninitialized => {
				tracing::debug!(behavior = %handle.name(), "document still loading, deferring watcher start");
				self.state = WatchState::Deferred;
			}
			WatchState::Deferred => {}
			WatchState::Observing(_) => self.upgrades.push(handle.id()),
		}
		self.drain_upgrades(doc);
		Ok(handle)
	}

	/// Whether behavior `name` is attached to `el`.
	pub fn is_attached(&self, el: NodeId, name: &str) -> bool {
		self.registry
			.lookup(&name.to_ascii_lowercase())
			.is_some_and(|id| self.instances.contains(el, id))
	}

	/// Behaviors attached to `el`, in attach order.
	pub fn attached(&self, el: NodeId) -> Vec<&BehaviorName> {
		self.instances
			.ids(el)
			.into_iter()
			.filter_map(|id| self.registry.by_id(id).map(|def| def.name()))
			.collect()
	}

	/// Elements with at least one attached behavior, in no particular order.
	pub fn elements(&self) -> impl Iterator<Item = NodeId> + '_ {
		self.instances.elements()
	}

	/// Total number of live instances.
	pub fn instance_count(&self) -> usize {
		self.instances.len()
	}

	/// Typed state of the `handle` behavior on `el`.
	pub fn instance<B: Behavior>(&self, el: NodeId, handle: &BehaviorHandle) -> Option<&B> {
		self.instances.state(el, handle.id())?.as_any().downcast_ref()
	}

	pub fn instance_mut<B: Behavior>(&mut self, el: NodeId, handle: &BehaviorHandle) -> Option<&mut B> {
		self.instances.state_mut(el, handle.id())?.as_any_mut().downcast_mut()
	}
}

impl core::fmt::Debug for Runtime {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		f.debug_struct("Runtime")
			.field("state", &self.state)
			.field("behaviors", &self.registry.len())
			.field("instances", &self.instances.len())
			.finish_non_exhaustive()
	}
}
