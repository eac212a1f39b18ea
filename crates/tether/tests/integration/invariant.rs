//! Randomized mutation sequences: after every flush, a behavior is attached
//! to an element exactly when the element is connected and carries the
//! behavior's attribute.

use proptest::prelude::*;
use tether::{Config, Page, ScanStrategy};
use tether_dom::{Document, NodeId};

use crate::common::{Event, Log, Recorder, init_tracing};

const POOL: usize = 6;
const NAMES: [&str; 3] = ["x-a", "x-b", "data-plain"];
const BEHAVIORS: [&str; 2] = ["x-a", "x-b"];

#[derive(Debug, Clone)]
enum Op {
	Set(usize, usize),
	Unset(usize, usize),
	/// Append pool element `.0` to pool element `.1`, or to the root.
	Append(usize, Option<usize>),
	Remove(usize),
	Flush,
}

fn op() -> impl Strategy<Value = Op> {
	prop_oneof![
		3 => (0..POOL, 0..NAMES.len()).prop_map(|(el, name)| Op::Set(el, name)),
		2 => (0..POOL, 0..NAMES.len()).prop_map(|(el, name)| Op::Unset(el, name)),
		3 => (0..POOL, proptest::option::of(0..POOL)).prop_map(|(el, parent)| Op::Append(el, parent)),
		1 => (0..POOL).prop_map(Op::Remove),
		2 => Just(Op::Flush),
	]
}

fn strategy() -> impl Strategy<Value = ScanStrategy> {
	prop_oneof![Just(ScanStrategy::Walk), Just(ScanStrategy::Query)]
}

struct Harness {
	page: Page,
	pool: Vec<NodeId>,
	log: Log,
}

impl Harness {
	fn new(scan_strategy: ScanStrategy) -> Self {
		init_tracing();
		let mut config = Config::default();
		config.watcher.scan_strategy = scan_strategy;
		let mut page = Page::with_document(Document::ready(), &config);
		let log = Log::default();
		for name in BEHAVIORS {
			page.register_behavior(name, Recorder::factory(&log)).unwrap();
		}
		let doc = page.document_mut();
		let pool = (0..POOL).map(|_| doc.create_element("div").unwrap()).collect();
		Self { page, pool, log }
	}

	fn apply(&mut self, op: &Op) {
		let doc = self.page.document_mut();
		match *op {
			Op::Set(el, name) => doc.set_attribute(self.pool[el], NAMES[name], "v").unwrap(),
			Op::Unset(el, name) => {
				doc.remove_attribute(self.pool[el], NAMES[name]).unwrap();
			}
			Op::Append(el, parent) => {
				let parent = parent.map_or(doc.root(), |p| self.pool[p]);
				// Cycles are rejected by the document; that is fine here.
				let _ = doc.append_child(parent, self.pool[el]);
			}
			Op::Remove(el) => doc.remove(self.pool[el]).unwrap(),
			Op::Flush => {
				self.page.flush();
			}
		}
	}

	fn check(&self) -> Result<(), TestCaseError> {
		let doc = self.page.document();
		for &el in &self.pool {
			for name in BEHAVIORS {
				let expected = doc.is_connected(el) && doc.has_attribute(el, name);
				prop_assert_eq!(self.page.is_attached(el, name), expected, "{} on {}", name, el);
			}
		}
		Ok(())
	}

	/// Attached and detached events for each pair must alternate, starting
	/// with an attach.
	fn check_pairing(&self) -> Result<(), TestCaseError> {
		let mut live = std::collections::BTreeSet::new();
		for event in self.log.events() {
			match event {
				Event::Attached { behavior, el } => prop_assert!(live.insert((el, behavior))),
				Event::Detached { behavior, el } => prop_assert!(live.remove(&(el, behavior))),
				Event::Changed { .. } => {}
			}
		}
		prop_assert_eq!(live.len(), self.page.runtime().instance_count());
		Ok(())
	}
}

proptest! {
	#![proptest_config(ProptestConfig::with_cases(128))]

	#[test]
	fn attached_iff_connected_with_attribute(
		scan_strategy in strategy(),
		ops in proptest::collection::vec(op(), 1..40),
	) {
		let mut harness = Harness::new(scan_strategy);
		for op in &ops {
			harness.apply(op);
			if matches!(op, Op::Flush) {
				harness.check()?;
			}
		}
		harness.page.flush();
		harness.check()?;
		harness.check_pairing()?;
	}

	#[test]
	fn strategies_agree(ops in proptest::collection::vec(op(), 1..40)) {
		let mut walk = Harness::new(ScanStrategy::Walk);
		let mut query = Harness::new(ScanStrategy::Query);
		for op in &ops {
			walk.apply(op);
			query.apply(op);
		}
		walk.page.flush();
		query.page.flush();
		for (&a, &b) in walk.pool.iter().zip(&query.pool) {
			let left: Vec<String> = {
				let mut names: Vec<String> = walk.page.attached(a).iter().map(|n| n.to_string()).collect();
				names.sort();
				names
			};
			let right: Vec<String> = {
				let mut names: Vec<String> = query.page.attached(b).iter().map(|n| n.to_string()).collect();
				names.sort();
				names
			};
			prop_assert_eq!(left, right);
		}
	}
}
