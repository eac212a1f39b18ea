use std::io;
use std::sync::{Arc, Mutex};

use pretty_assertions::assert_eq;
use tether::{Behavior, HookContext, HookSet};

use crate::common::{Log, Recorder, add, attached, changed, detached, ready_page};

#[test]
fn attach_happens_once_per_element() {
	let mut page = ready_page();
	let root = page.document().root();
	let log = Log::default();
	page.register_behavior("x-foo", Recorder::factory(&log)).unwrap();

	let el = add(&mut page, root, "div", &[("x-foo", "a")]);
	let doc = page.document_mut();
	doc.set_attribute(el, "x-foo", "a").unwrap();
	doc.set_attribute(el, "X-Foo", "b").unwrap();
	let stats = page.flush();

	assert_eq!(stats.rounds, 1);
	assert_eq!(stats.attribute_records, 2);
	assert_eq!(stats.child_list_records, 1);
	assert_eq!(log.take(), vec![attached("x-foo", el)]);
	assert_eq!(page.runtime().instance_count(), 1);
}

#[test]
fn removing_the_attribute_detaches_once() {
	let mut page = ready_page();
	let root = page.document().root();
	let el = add(&mut page, root, "div", &[("x-foo", ""), ("data-role", "a")]);
	let log = Log::default();
	page.register_behavior("x-foo", Recorder::factory(&log)).unwrap();
	log.take();

	page.document_mut().remove_attribute(el, "x-foo").unwrap();
	page.flush();
	assert_eq!(log.take(), vec![detached("x-foo", el)]);
	assert!(!page.is_attached(el, "x-foo"));

	page.document_mut().set_attribute(el, "data-role", "b").unwrap();
	page.flush();
	assert!(log.is_empty());
}

#[test]
fn re_adding_the_attribute_creates_a_fresh_instance() {
	let mut page = ready_page();
	let root = page.document().root();
	let el = add(&mut page, root, "div", &[("x-foo", "")]);
	let log = Log::default();
	page.register_behavior("x-foo", Recorder::factory(&log)).unwrap();

	page.document_mut().toggle_attribute(el, "x-foo").unwrap();
	page.flush();
	page.document_mut().toggle_attribute(el, "x-foo").unwrap();
	page.flush();

	assert_eq!(
		log.take(),
		vec![attached("x-foo", el), detached("x-foo", el), attached("x-foo", el)]
	);
}

#[test]
fn inserted_subtree_attaches_every_match() {
	let mut page = ready_page();
	let root = page.document().root();
	let log = Log::default();
	page.register_behavior("x-foo", Recorder::factory(&log)).unwrap();

	let doc = page.document_mut();
	let outer = doc.create_element("section").unwrap();
	let inner = doc.create_element_with("div", &[("x-foo", "")]).unwrap();
	let leaf = doc.create_element_with("span", &[("x-foo", "")]).unwrap();
	let text = doc.create_text("hello");
	doc.append_child(inner, leaf).unwrap();
	doc.append_child(inner, text).unwrap();
	doc.append_child(outer, inner).unwrap();
	doc.append_child(root, outer).unwrap();
	page.flush();

	assert_eq!(log.take(), vec![attached("x-foo", inner), attached("x-foo", leaf)]);
}

#[test]
fn unchanged_value_is_not_forwarded() {
	let mut page = ready_page();
	let root = page.document().root();
	let el = add(&mut page, root, "div", &[("x-watch", ""), ("data-role", "a")]);
	let log = Log::default();
	page.register_behavior("x-watch", Recorder::factory(&log)).unwrap();
	log.take();

	let doc = page.document_mut();
	doc.set_attribute(el, "data-role", "b").unwrap();
	doc.set_attribute(el, "data-role", "b").unwrap();
	page.flush();
	page.document_mut().set_attribute(el, "data-role", "b").unwrap();
	page.flush();

	assert_eq!(log.take(), vec![changed("x-watch", el, "data-role", Some("a"), Some("b"))]);
}

/// In-memory sink for formatted log lines.
#[derive(Clone, Default)]
struct Captured(Arc<Mutex<Vec<u8>>>);

impl Captured {
	fn contents(&self) -> String {
		String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
	}
}

impl io::Write for Captured {
	fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
		self.0.lock().unwrap().extend_from_slice(buf);
		Ok(buf.len())
	}

	fn flush(&mut self) -> io::Result<()> {
		Ok(())
	}
}

#[test]
fn forwarded_changes_are_traced() {
	let captured = Captured::default();
	let writer = captured.clone();
	let subscriber = tracing_subscriber::fmt()
		.with_max_level(tracing::Level::TRACE)
		.with_ansi(false)
		.with_writer(move || writer.clone())
		.finish();

	tracing::subscriber::with_default(subscriber, || {
		let mut page = ready_page();
		let root = page.document().root();
		let el = add(&mut page, root, "div", &[("x-watch", ""), ("data-role", "a")]);
		let log = Log::default();
		page.register_behavior("x-watch", Recorder::factory(&log)).unwrap();

		page.document_mut().set_attribute(el, "data-role", "b").unwrap();
		page.flush();
	});

	let output = captured.contents();
	let line = output
		.lines()
		.find(|line| line.contains("attribute changed"))
		.unwrap_or_else(|| panic!("no trace line in:\n{output}"));
	assert!(line.contains("behavior=x-watch"), "{line}");
	assert!(line.contains("attribute=data-role"), "{line}");
}

#[test]
fn own_attribute_is_not_forwarded_to_itself() {
	let mut page = ready_page();
	let root = page.document().root();
	let el = add(&mut page, root, "div", &[("x-one", "1"), ("x-two", "1")]);
	let log = Log::default();
	page.register_behavior("x-one", Recorder::factory(&log)).unwrap();
	page.register_behavior("x-two", Recorder::factory(&log)).unwrap();
	log.take();

	page.document_mut().set_attribute(el, "x-one", "2").unwrap();
	page.flush();

	assert_eq!(log.take(), vec![changed("x-two", el, "x-one", Some("1"), Some("2"))]);
}

#[test]
fn removal_of_a_watched_attribute_reports_none() {
	let mut page = ready_page();
	let root = page.document().root();
	let el = add(&mut page, root, "div", &[("x-watch", ""), ("title", "hi")]);
	let log = Log::default();
	page.register_behavior("x-watch", Recorder::factory(&log)).unwrap();
	log.take();

	page.document_mut().remove_attribute(el, "title").unwrap();
	page.flush();

	assert_eq!(log.take(), vec![changed("x-watch", el, "title", Some("hi"), None)]);
}

/// Reads the `x-label` sibling when attached.
struct Reader {
	seen: Option<String>,
}

impl Behavior for Reader {
	const HOOKS: HookSet = HookSet::ATTACHED;

	fn attached(&mut self, cx: &mut HookContext<'_>) {
		self.seen = cx.sibling::<Label>("X-Label").map(|label| label.text.clone());
		assert!(cx.sibling::<Reader>("x-reader").is_none());
	}
}

struct Label {
	text: String,
}

impl Behavior for Label {
	const HOOKS: HookSet = HookSet::ATTACHED;

	fn attached(&mut self, cx: &mut HookContext<'_>) {
		self.text = cx.value().unwrap_or_default().to_owned();
	}
}

#[test]
fn hooks_can_read_sibling_instances() {
	let mut page = ready_page();
	let root = page.document().root();
	let el = add(&mut page, root, "div", &[("x-label", "greeting"), ("x-reader", "")]);
	let label = page.register_behavior("x-label", || Label { text: String::new() }).unwrap();
	let reader = page.register_behavior("x-reader", || Reader { seen: None }).unwrap();

	assert_eq!(page.instance::<Label>(el, &label).map(|l| l.text.as_str()), Some("greeting"));
	assert_eq!(page.instance::<Reader>(el, &reader).and_then(|r| r.seen.as_deref()), Some("greeting"));
	assert!(page.instance::<Label>(el, &reader).is_none());

	page.instance_mut::<Label>(el, &label).unwrap().text.push('!');
	assert_eq!(page.instance::<Label>(el, &label).unwrap().text, "greeting!");
}
