//! The behavior contract implemented by applications.

use std::any::Any;

use crate::HookContext;

bitflags::bitflags! {
	/// Lifecycle hooks a behavior responds to.
	///
	/// Captured once when the behavior is registered; the runtime only
	/// dispatches hooks present in the set.
	#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
	pub struct HookSet: u8 {
		/// [`Behavior::attached`].
		const ATTACHED = 1 << 0;
		/// [`Behavior::detached`].
		const DETACHED = 1 << 1;
		/// [`Behavior::attribute_changed`].
		const ATTRIBUTE_CHANGED = 1 << 2;
	}
}

/// An attribute change forwarded to other behaviors on the same element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeChange {
	pub name: String,
	/// Value before the change, `None` if the attribute was absent.
	pub old_value: Option<String>,
	/// Value when the change was delivered, `None` if the attribute is absent.
	pub new_value: Option<String>,
}

/// Instance state for one behavior bound to one element.
///
/// A fresh value is built by the factory passed at registration for every
/// element that gains the behavior's attribute. Hooks not listed in
/// [`HOOKS`](Self::HOOKS) are never called.
///
/// ```
/// use tether::{Behavior, HookContext, HookSet};
///
/// #[derive(Default)]
/// struct Tooltip {
///     shown: bool,
/// }
///
/// impl Behavior for Tooltip {
///     const HOOKS: HookSet = HookSet::ATTACHED;
///
///     fn attached(&mut self, cx: &mut HookContext<'_>) {
///         self.shown = cx.value().is_some();
///     }
/// }
/// ```
pub trait Behavior: Any {
	/// Hooks this behavior implements.
	const HOOKS: HookSet;

	/// Called once after the instance is linked to its element.
	fn attached(&mut self, _cx: &mut HookContext<'_>) {}

	/// Called once before the instance is unlinked.
	fn detached(&mut self, _cx: &mut HookContext<'_>) {}

	/// Called when another attribute of the element changes value.
	fn attribute_changed(&mut self, _cx: &mut HookContext<'_>, _change: &AttributeChange) {}
}

/// Object-safe view of [`Behavior`] used for storage.
pub(crate) trait ErasedBehavior: Any {
	fn attached(&mut self, cx: &mut HookContext<'_>);
	fn detached(&mut self, cx: &mut HookContext<'_>);
	fn attribute_changed(&mut self, cx: &mut HookContext<'_>, change: &AttributeChange);
	fn as_any(&self) -> &dyn Any;
	fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<B: Behavior> ErasedBehavior for B {
	fn attached(&mut self, cx: &mut HookContext<'_>) {
		Behavior::attached(self, cx);
	}

	fn detached(&mut self, cx: &mut HookContext<'_>) {
		Behavior::detached(self, cx);
	}

	fn attribute_changed(&mut self, cx: &mut HookContext<'_>, change: &AttributeChange) {
		Behavior::attribute_changed(self, cx, change);
	}

	fn as_any(&self) -> &dyn Any {
		self
	}

	fn as_any_mut(&mut self) -> &mut dyn Any {
		self
	}
}

/// A lifecycle event to dispatch.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Hook<'a> {
	Attached,
	Detached,
	AttributeChanged(&'a AttributeChange),
}

impl Hook<'_> {
	pub(crate) const fn flag(self) -> HookSet {
		match self {
			Self::Attached => HookSet::ATTACHED,
			Self::Detached => HookSet::DETACHED,
			Self::AttributeChanged(_) => HookSet::ATTRIBUTE_CHANGED,
		}
	}
}
