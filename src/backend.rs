//! UI backend abstraction.
//!
//! The router never talks to a browser directly. Everything it needs from the
//! surrounding UI framework goes through [`UiBackend`]: mounting elements into
//! a slot, clearing a slot, running a snippet of browser-side script and
//! setting the page title.
//!
//! [`MemoryBackend`] keeps the whole UI in memory and records every script
//! and title. It is what the test-suite renders into, and it is handy for
//! server-side previews.

use crate::frame::FrameId;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Where an element is mounted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Slot {
    /// The page body, outside of any router frame.
    Page,
    /// The content area of a router frame.
    Frame(FrameId),
}

/// A minimal, framework-neutral UI element description.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    pub kind: String,
    pub text: Option<String>,
    pub classes: Vec<String>,
    pub props: BTreeMap<String, String>,
}

impl Element {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            ..Self::default()
        }
    }

    /// A text label.
    pub fn label(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::new("label")
        }
    }

    /// A link to `href` handled by the router.
    pub fn link(text: impl Into<String>, href: impl Into<String>) -> Self {
        Self::label(text).with_kind("link").prop("href", href)
    }

    fn with_kind(mut self, kind: &str) -> Self {
        self.kind = kind.to_string();
        self
    }

    #[must_use]
    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    #[must_use]
    pub fn prop(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.props.insert(key.into(), value.into());
        self
    }
}

/// The operations the router needs from the UI framework.
pub trait UiBackend: Send {
    /// Append `element` to `slot`.
    fn mount(&mut self, slot: Slot, element: Element);

    /// Remove every element from `slot`.
    fn clear(&mut self, slot: Slot);

    /// Run a snippet of browser-side script.
    fn run_javascript(&mut self, script: &str);

    fn set_title(&mut self, title: &str);

    /// A router frame was mounted inside `parent`.
    fn frame_created(&mut self, _frame: FrameId, _parent: Slot) {}

    /// A router frame and its content were unmounted.
    fn frame_removed(&mut self, _frame: FrameId) {}
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Node {
    Element(Element),
    Frame(FrameId),
}

#[derive(Debug, Default)]
struct MemoryState {
    slots: HashMap<Slot, Vec<Node>>,
    scripts: Vec<String>,
    titles: Vec<String>,
}

/// In-memory [`UiBackend`].
///
/// Clones share the same state, so a test can keep one handle while the
/// session owns another.
///
/// ```
/// use frame_navigator::{Element, MemoryBackend, Slot, UiBackend};
///
/// let backend = MemoryBackend::new();
/// let mut handle = backend.clone();
/// handle.mount(Slot::Page, Element::label("hello"));
/// handle.set_title("Home");
///
/// assert_eq!(backend.render(), vec!["hello".to_string()]);
/// assert_eq!(backend.title().as_deref(), Some("Home"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Every script run so far, oldest first.
    pub fn scripts(&self) -> Vec<String> {
        self.state().scripts.clone()
    }

    /// Every title set so far, oldest first.
    pub fn titles(&self) -> Vec<String> {
        self.state().titles.clone()
    }

    /// The current page title.
    pub fn title(&self) -> Option<String> {
        self.state().titles.last().cloned()
    }

    /// Forget recorded scripts and titles, keeping the mounted UI.
    pub fn clear_log(&self) {
        let mut state = self.state();
        state.scripts.clear();
        state.titles.clear();
    }

    /// Texts of the whole page in document order, descending into frames.
    pub fn render(&self) -> Vec<String> {
        self.render_slot(Slot::Page)
    }

    /// Texts of `slot` in document order, descending into nested frames.
    pub fn render_slot(&self, slot: Slot) -> Vec<String> {
        let state = self.state();
        let mut out = Vec::new();
        render_into(&state, slot, &mut out);
        out
    }

    /// Elements mounted directly in `slot` (nested frames excluded).
    pub fn elements(&self, slot: Slot) -> Vec<Element> {
        self.state()
            .slots
            .get(&slot)
            .into_iter()
            .flatten()
            .filter_map(|node| match node {
                Node::Element(element) => Some(element.clone()),
                Node::Frame(_) => None,
            })
            .collect()
    }

    /// Whether `frame` is currently mounted somewhere.
    pub fn has_frame(&self, frame: FrameId) -> bool {
        self.state()
            .slots
            .values()
            .flatten()
            .any(|node| *node == Node::Frame(frame))
    }
}

fn render_into(state: &MemoryState, slot: Slot, out: &mut Vec<String>) {
    let Some(nodes) = state.slots.get(&slot) else {
        return;
    };
    for node in nodes {
        match node {
            Node::Element(element) => {
                if let Some(text) = &element.text {
                    out.push(text.clone());
                }
            }
            Node::Frame(frame) => render_into(state, Slot::Frame(*frame), out),
        }
    }
}

impl UiBackend for MemoryBackend {
    fn mount(&mut self, slot: Slot, element: Element) {
        self.state()
            .slots
            .entry(slot)
            .or_default()
            .push(Node::Element(element));
    }

    fn clear(&mut self, slot: Slot) {
        self.state().slots.remove(&slot);
    }

    fn run_javascript(&mut self, script: &str) {
        self.state().scripts.push(script.to_string());
    }

    fn set_title(&mut self, title: &str) {
        self.state().titles.push(title.to_string());
    }

    fn frame_created(&mut self, frame: FrameId, parent: Slot) {
        self.state()
            .slots
            .entry(parent)
            .or_default()
            .push(Node::Frame(frame));
    }

    fn frame_removed(&mut self, frame: FrameId) {
        let mut state = self.state();
        state.slots.remove(&Slot::Frame(frame));
        for nodes in state.slots.values_mut() {
            nodes.retain(|node| *node != Node::Frame(frame));
        }
    }
}
