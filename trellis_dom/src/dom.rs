// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The shared [`Dom`] handle: document access, listener registry, event dispatch,
//! and the browser default actions the primitives rely on.

use core::cell::RefCell;
use std::rc::{Rc, Weak};

use hashbrown::HashMap;
use kurbo::{Size, Vec2};
use smallvec::SmallVec;

use crate::dispatch::{Outcome, Phase, route, run};
use crate::document::Document;
use crate::event::{Event, EventKind, EventType, Key, KeyboardEvent, PointerEvent};
use crate::selector::Selector;
use crate::types::{ElementFlags, ElementId};

/// Shared listener callback.
pub type Handler = Rc<dyn Fn(&mut Event)>;

/// Identifier of a registered listener.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

/// Registration options for a listener.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ListenerOptions {
    /// Run during the capture phase instead of the bubble phase.
    pub capture: bool,
}

impl ListenerOptions {
    /// Capture-phase registration.
    pub const CAPTURE: Self = Self { capture: true };
    /// Bubble-phase registration.
    pub const BUBBLE: Self = Self { capture: false };
}

struct Listener {
    capture: bool,
    key: (ElementId, EventType),
    handler: Handler,
}

#[derive(Default)]
struct Registry {
    next: u64,
    by_id: HashMap<ListenerId, Listener>,
    by_target: HashMap<(ElementId, EventType), SmallVec<[ListenerId; 2]>>,
}

impl Registry {
    fn add(&mut self, key: (ElementId, EventType), capture: bool, handler: Handler) -> ListenerId {
        self.next += 1;
        let id = ListenerId(self.next);
        self.by_id.insert(
            id,
            Listener {
                capture,
                key,
                handler,
            },
        );
        self.by_target.entry(key).or_default().push(id);
        id
    }

    fn remove(&mut self, id: ListenerId) -> bool {
        let Some(listener) = self.by_id.remove(&id) else {
            return false;
        };
        if let Some(ids) = self.by_target.get_mut(&listener.key) {
            ids.retain(|l| *l != id);
            if ids.is_empty() {
                self.by_target.remove(&listener.key);
            }
        }
        true
    }

    fn collect(
        &self,
        node: ElementId,
        ty: EventType,
        phase: Phase,
    ) -> SmallVec<[(ListenerId, Handler); 4]> {
        let Some(ids) = self.by_target.get(&(node, ty)) else {
            return SmallVec::new();
        };
        ids.iter()
            .filter_map(|id| {
                let l = self.by_id.get(id)?;
                let wanted = match phase {
                    Phase::Capture => l.capture,
                    Phase::Target => true,
                    Phase::Bubble => !l.capture,
                };
                wanted.then(|| (*id, l.handler.clone()))
            })
            .collect()
    }
}

struct DomInner {
    document: RefCell<Document>,
    registry: RefCell<Registry>,
}

/// A clonable handle to a document plus its event machinery.
///
/// Every primitive takes a `Dom`. Clones share the same document. A handle
/// created with [`Dom::server`] has no document at all: queries return empty
/// results, mutations and listener registration are no-ops, and dispatch
/// runs no listeners. This is the server-side-rendering path and is never an
/// error.
///
/// Dispatch never holds a borrow of the document or the listener registry
/// while a listener runs, so listeners may freely mutate the document,
/// register or remove listeners (including themselves), and dispatch nested
/// events. Listeners removed during a dispatch do not run afterwards.
///
/// ```rust
/// use std::cell::Cell;
/// use std::rc::Rc;
/// use kurbo::Size;
/// use trellis_dom::{Dom, EventType, Key, ListenerOptions};
///
/// let dom = Dom::new(Size::new(800.0, 600.0));
/// let button = dom.create_element("button").unwrap();
/// dom.append_child(dom.body().unwrap(), button);
///
/// let presses = Rc::new(Cell::new(0));
/// let seen = presses.clone();
/// dom.add_listener(button, EventType::KeyDown, ListenerOptions::BUBBLE, move |_| {
///     seen.set(seen.get() + 1);
/// });
///
/// dom.focus(button);
/// dom.press(Key::Enter);
/// assert_eq!(presses.get(), 1);
///
/// let ssr = Dom::server();
/// assert!(!ssr.is_available());
/// assert_eq!(ssr.body(), None);
/// ```
#[derive(Clone)]
pub struct Dom {
    inner: Option<Rc<DomInner>>,
}

impl core::fmt::Debug for Dom {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match &self.inner {
            None => f.write_str("Dom(server)"),
            Some(inner) => f
                .debug_struct("Dom")
                .field("document", &*inner.document.borrow())
                .field("listeners", &inner.registry.borrow().by_id.len())
                .finish(),
        }
    }
}

/// A non-owning [`Dom`] handle for use inside listeners.
#[derive(Clone, Debug)]
pub struct WeakDom {
    inner: Option<Weak<DomInner>>,
}

impl WeakDom {
    /// Upgrade to a strong handle; `None` once the document has been dropped.
    ///
    /// A weak server handle always upgrades to a server handle.
    pub fn upgrade(&self) -> Option<Dom> {
        match &self.inner {
            None => Some(Dom::server()),
            Some(weak) => weak.upgrade().map(|inner| Dom { inner: Some(inner) }),
        }
    }
}

impl Dom {
    /// Create a browser-like environment with an empty body and the given viewport.
    pub fn new(viewport: Size) -> Self {
        Self {
            inner: Some(Rc::new(DomInner {
                document: RefCell::new(Document::new(viewport)),
                registry: RefCell::new(Registry::default()),
            })),
        }
    }

    /// A handle with no document (server-side rendering).
    pub fn server() -> Self {
        Self { inner: None }
    }

    /// Whether a document is available.
    pub fn is_available(&self) -> bool {
        self.inner.is_some()
    }

    /// Create a non-owning handle.
    pub fn downgrade(&self) -> WeakDom {
        WeakDom {
            inner: self.inner.as_ref().map(Rc::downgrade),
        }
    }

    /// Returns true if both handles refer to the same document (or both are server handles).
    pub fn ptr_eq(&self, other: &Self) -> bool {
        match (&self.inner, &other.inner) {
            (Some(a), Some(b)) => Rc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        }
    }

    /// Run `f` with shared access to the document.
    pub fn read<R>(&self, f: impl FnOnce(&Document) -> R) -> Option<R> {
        self.inner.as_ref().map(|i| f(&i.document.borrow()))
    }

    /// Run `f` with exclusive access to the document.
    ///
    /// No events are dispatched for changes made here; prefer the dedicated
    /// methods on `Dom` for tree mutations that observers care about.
    pub fn write<R>(&self, f: impl FnOnce(&mut Document) -> R) -> Option<R> {
        self.inner.as_ref().map(|i| f(&mut i.document.borrow_mut()))
    }

    // --- document shortcuts ---

    /// The body element.
    pub fn body(&self) -> Option<ElementId> {
        self.read(Document::body)
    }

    /// The root element.
    pub fn root(&self) -> Option<ElementId> {
        self.read(Document::root)
    }

    /// Create a detached element.
    pub fn create_element(&self, tag: &str) -> Option<ElementId> {
        self.write(|d| d.create_element(tag))
    }

    /// Append `child` to `parent` and notify child-list observers.
    pub fn append_child(&self, parent: ElementId, child: ElementId) -> bool {
        self.insert_before(parent, child, None)
    }

    /// Insert `child` under `parent` before `reference` and notify child-list observers.
    pub fn insert_before(
        &self,
        parent: ElementId,
        child: ElementId,
        reference: Option<ElementId>,
    ) -> bool {
        let Some((old_parent, ok)) = self.write(|d| {
            let old = d.parent_of(child);
            (old, d.insert_before(parent, child, reference))
        }) else {
            return false;
        };
        if ok {
            if let Some(old) = old_parent
                && old != parent
            {
                self.dispatch(old, EventKind::ChildListChange);
            }
            self.dispatch(parent, EventKind::ChildListChange);
        }
        ok
    }

    /// Detach an element from its parent and notify child-list observers.
    pub fn detach(&self, id: ElementId) {
        if let Some(Some(parent)) = self.write(|d| {
            let parent = d.parent_of(id);
            d.detach(id);
            parent
        }) {
            self.dispatch(parent, EventKind::ChildListChange);
        }
    }

    /// Remove an element and its subtree and notify child-list observers.
    ///
    /// Listeners registered on removed elements are dropped.
    pub fn remove(&self, id: ElementId) {
        let Some(inner) = &self.inner else {
            return;
        };
        let (parent, removed) = {
            let mut doc = inner.document.borrow_mut();
            if !doc.is_alive(id) {
                return;
            }
            let parent = doc.parent_of(id);
            let mut removed: Vec<ElementId> = doc.descendants(id).collect();
            removed.push(id);
            doc.remove(id);
            (parent, removed)
        };
        {
            let mut registry = inner.registry.borrow_mut();
            let stale: Vec<ListenerId> = registry
                .by_id
                .iter()
                .filter(|(_, l)| removed.contains(&l.key.0))
                .map(|(id, _)| *id)
                .collect();
            for l in stale {
                registry.remove(l);
            }
        }
        if let Some(parent) = parent {
            self.dispatch(parent, EventKind::ChildListChange);
        }
    }

    /// Read an attribute as an owned string.
    pub fn attribute(&self, id: ElementId, name: &str) -> Option<String> {
        self.read(|d| d.attribute(id, name).map(str::to_owned))
            .flatten()
    }

    /// Set an attribute.
    pub fn set_attribute(&self, id: ElementId, name: &str, value: &str) {
        self.write(|d| d.set_attribute(id, name, value));
    }

    /// Remove an attribute.
    pub fn remove_attribute(&self, id: ElementId, name: &str) {
        self.write(|d| d.remove_attribute(id, name));
    }

    /// Insert or remove element flags.
    pub fn toggle_flags(&self, id: ElementId, flags: ElementFlags, on: bool) {
        self.write(|d| d.toggle_flags(id, flags, on));
    }

    /// Returns true if `node` is `ancestor` or inside it.
    pub fn contains(&self, ancestor: ElementId, node: ElementId) -> bool {
        self.read(|d| d.contains(ancestor, node)).unwrap_or(false)
    }

    /// Returns true if the element is live.
    pub fn is_alive(&self, id: ElementId) -> bool {
        self.read(|d| d.is_alive(id)).unwrap_or(false)
    }

    /// All descendants of `container` matching `selector`, in document order.
    pub fn query_all(&self, container: ElementId, selector: &Selector) -> Vec<ElementId> {
        self.read(|d| d.query_all(container, selector))
            .unwrap_or_default()
    }

    /// The focused element.
    pub fn active_element(&self) -> Option<ElementId> {
        self.read(Document::active_element).flatten()
    }

    /// Set the `prefers-reduced-motion` preference.
    pub fn set_prefers_reduced_motion(&self, reduce: bool) {
        self.write(|d| d.set_prefers_reduced_motion(reduce));
    }

    /// The `prefers-reduced-motion` preference; false without a document.
    pub fn prefers_reduced_motion(&self) -> bool {
        self.read(Document::prefers_reduced_motion)
            .unwrap_or(false)
    }

    // --- listeners ---

    /// Register a listener. Returns `None` without a document or for a stale target.
    pub fn add_listener(
        &self,
        target: ElementId,
        ty: EventType,
        options: ListenerOptions,
        handler: impl Fn(&mut Event) + 'static,
    ) -> Option<ListenerId> {
        let inner = self.inner.as_ref()?;
        if !inner.document.borrow().is_alive(target) {
            return None;
        }
        Some(
            inner
                .registry
                .borrow_mut()
                .add((target, ty), options.capture, Rc::new(handler)),
        )
    }

    /// Remove a listener. Returns false if it was not registered.
    pub fn remove_listener(&self, id: ListenerId) -> bool {
        self.inner
            .as_ref()
            .is_some_and(|i| i.registry.borrow_mut().remove(id))
    }

    /// Number of registered listeners.
    pub fn listener_count(&self) -> usize {
        self.inner
            .as_ref()
            .map_or(0, |i| i.registry.borrow().by_id.len())
    }

    /// Dispatch an event at `target` and return it after propagation.
    pub fn dispatch(&self, target: ElementId, kind: EventKind) -> Event {
        let mut event = Event::new(kind, target);
        let Some(inner) = &self.inner else {
            return event;
        };
        let ty = event.event_type();
        let path = inner.document.borrow().path_to(target);
        let seq = route(&path, ty.bubbles());
        tracing::trace!(?ty, ?target, steps = seq.len(), "dispatch");
        run(&seq, &mut event, |d, ev| {
            ev.phase = d.phase;
            ev.current_target = d.node;
            let handlers = inner.registry.borrow().collect(d.node, ty, d.phase);
            for (id, handler) in handlers {
                if !inner.registry.borrow().by_id.contains_key(&id) {
                    continue;
                }
                handler(ev);
                if ev.immediate_stopped {
                    return Outcome::Stop;
                }
            }
            if ev.propagation_stopped {
                Outcome::Stop
            } else {
                Outcome::Continue
            }
        });
        event
    }

    // --- focus ---

    /// Move focus to `id`. Returns false if the element cannot take focus.
    ///
    /// Dispatches `FocusOut` at the previously focused element and `FocusIn` at `id`.
    pub fn focus(&self, id: ElementId) -> bool {
        let Some(inner) = &self.inner else {
            return false;
        };
        let previous = {
            let mut doc = inner.document.borrow_mut();
            if !doc.is_focusable(id) {
                return false;
            }
            let previous = doc.active_element();
            if previous == Some(id) {
                return true;
            }
            doc.set_active(Some(id));
            previous
        };
        if let Some(prev) = previous {
            self.dispatch(prev, EventKind::FocusOut { related: Some(id) });
        }
        self.dispatch(id, EventKind::FocusIn { related: previous });
        true
    }

    /// Clear focus.
    pub fn blur(&self) {
        let Some(Some(previous)) = self.write(|d| {
            let previous = d.active_element();
            d.set_active(None);
            previous
        }) else {
            return;
        };
        self.dispatch(previous, EventKind::FocusOut { related: None });
    }

    // --- input simulation / host event entry points ---

    /// Deliver a key press to the focused element (or the body).
    ///
    /// An unprevented Tab moves focus to the next (Shift: previous) tabbable
    /// element in document order, wrapping at the ends.
    pub fn key_down(&self, key: KeyboardEvent) -> Event {
        let Some(target) = self.read(|d| d.active_element().unwrap_or(d.body())) else {
            return Event::new(EventKind::KeyDown(key), ElementId::INERT);
        };
        let event = self.dispatch(target, EventKind::KeyDown(key));
        if key.key == Key::Tab && !event.default_prevented() && !key.has_command_modifier() {
            self.sequential_focus(!key.shift());
        }
        event
    }

    /// Shorthand for [`Dom::key_down`] with no modifiers.
    pub fn press(&self, key: Key) -> Event {
        self.key_down(KeyboardEvent::new(key))
    }

    /// Deliver a pointer press at `target`.
    ///
    /// An unprevented press focuses the nearest focusable ancestor of the
    /// target, or blurs if there is none.
    pub fn pointer_down(&self, target: ElementId, pointer: PointerEvent) -> Event {
        let event = self.dispatch(target, EventKind::PointerDown(pointer));
        if self.is_available() && !event.default_prevented() {
            let focus_target = self
                .read(|d| d.ancestors(target).find(|&a| d.is_focusable(a)))
                .flatten();
            match focus_target {
                Some(el) => {
                    self.focus(el);
                }
                None => self.blur(),
            }
        }
        event
    }

    /// Deliver a pointer move at `target`.
    pub fn pointer_move(&self, target: ElementId, pointer: PointerEvent) -> Event {
        self.dispatch(target, EventKind::PointerMove(pointer))
    }

    /// Deliver a pointer release at `target`.
    pub fn pointer_up(&self, target: ElementId, pointer: PointerEvent) -> Event {
        self.dispatch(target, EventKind::PointerUp(pointer))
    }

    /// Press and release the primary pointer at the center of `target`.
    pub fn click(&self, target: ElementId) -> Event {
        let center = self
            .read(|d| d.rect(target))
            .flatten()
            .map(|r| r.center())
            .unwrap_or_default();
        let pointer = PointerEvent::at(center);
        let down = self.pointer_down(target, pointer);
        self.pointer_up(target, pointer);
        down
    }

    /// Scroll a container and notify scroll listeners on it.
    pub fn scroll_by(&self, container: ElementId, delta: Vec2) {
        if self
            .write(|d| d.apply_scroll(container, delta))
            .unwrap_or(false)
        {
            self.dispatch(container, EventKind::Scroll);
        }
    }

    /// Resize the viewport and notify resize listeners on the root.
    pub fn resize(&self, size: Size) {
        let Some(root) = self.write(|d| {
            d.set_viewport(size);
            d.root()
        }) else {
            return;
        };
        self.dispatch(root, EventKind::Resize);
    }

    /// Report that an animation on `target` finished.
    pub fn animation_end(&self, target: ElementId) {
        self.dispatch(target, EventKind::AnimationEnd);
    }

    fn sequential_focus(&self, forward: bool) {
        let Some(next) = self
            .read(|d| {
                let order = d.tabbable_elements();
                if order.is_empty() {
                    return None;
                }
                let current = d
                    .active_element()
                    .and_then(|a| order.iter().position(|&e| e == a));
                let idx = match (current, forward) {
                    (Some(i), true) => (i + 1) % order.len(),
                    (Some(i), false) => (i + order.len() - 1) % order.len(),
                    (None, true) => 0,
                    (None, false) => order.len() - 1,
                };
                Some(order[idx])
            })
            .flatten()
        else {
            return;
        };
        self.focus(next);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::Cell;
    use kurbo::{Point, Rect};

    fn setup() -> (Dom, ElementId, ElementId, ElementId) {
        let dom = Dom::new(Size::new(800.0, 600.0));
        let body = dom.body().unwrap();
        let panel = dom.create_element("div").unwrap();
        let a = dom.create_element("button").unwrap();
        let b = dom.create_element("button").unwrap();
        dom.append_child(body, panel);
        dom.append_child(panel, a);
        dom.append_child(panel, b);
        (dom, panel, a, b)
    }

    #[test]
    fn capture_target_bubble_order() {
        let (dom, panel, a, _) = setup();
        let log = Rc::new(RefCell::new(Vec::new()));
        for (el, capture, tag) in [
            (panel, true, "panel-capture"),
            (panel, false, "panel-bubble"),
            (a, false, "a-bubble"),
            (a, true, "a-capture"),
        ] {
            let log = log.clone();
            dom.add_listener(
                el,
                EventType::KeyDown,
                ListenerOptions { capture },
                move |_| log.borrow_mut().push(tag),
            );
        }
        dom.focus(a);
        dom.press(Key::Enter);
        assert_eq!(
            *log.borrow(),
            vec!["panel-capture", "a-bubble", "a-capture", "panel-bubble"]
        );
    }

    #[test]
    fn stop_propagation_finishes_current_node() {
        let (dom, panel, a, _) = setup();
        let count = Rc::new(Cell::new(0));
        let c1 = count.clone();
        let c2 = count.clone();
        let c3 = count.clone();
        dom.add_listener(a, EventType::KeyDown, ListenerOptions::BUBBLE, move |e| {
            c1.set(c1.get() + 1);
            e.stop_propagation();
        });
        dom.add_listener(a, EventType::KeyDown, ListenerOptions::BUBBLE, move |_| {
            c2.set(c2.get() + 1);
        });
        dom.add_listener(panel, EventType::KeyDown, ListenerOptions::BUBBLE, move |_| {
            c3.set(c3.get() + 100);
        });
        dom.focus(a);
        dom.press(Key::Enter);
        assert_eq!(count.get(), 2);
    }

    #[test]
    fn listener_removed_mid_dispatch_does_not_run() {
        let (dom, panel, a, _) = setup();
        let second: Rc<Cell<Option<ListenerId>>> = Rc::new(Cell::new(None));
        let ran = Rc::new(Cell::new(false));
        let weak = dom.downgrade();
        let second_id = second.clone();
        dom.add_listener(panel, EventType::KeyDown, ListenerOptions::CAPTURE, move |_| {
            if let (Some(dom), Some(id)) = (weak.upgrade(), second_id.get()) {
                dom.remove_listener(id);
            }
        });
        let flag = ran.clone();
        second.set(dom.add_listener(a, EventType::KeyDown, ListenerOptions::BUBBLE, move |_| {
            flag.set(true);
        }));
        dom.focus(a);
        dom.press(Key::Enter);
        assert!(!ran.get());
        assert_eq!(dom.listener_count(), 1);
    }

    #[test]
    fn tab_default_action_cycles_tabbables() {
        let (dom, _, a, b) = setup();
        dom.focus(a);
        dom.press(Key::Tab);
        assert_eq!(dom.active_element(), Some(b));
        dom.press(Key::Tab);
        assert_eq!(dom.active_element(), Some(a), "wraps at the end");
        dom.key_down(KeyboardEvent::shifted(Key::Tab));
        assert_eq!(dom.active_element(), Some(b));
    }

    #[test]
    fn prevented_tab_keeps_focus() {
        let (dom, _, a, _) = setup();
        let root = dom.root().unwrap();
        dom.add_listener(root, EventType::KeyDown, ListenerOptions::CAPTURE, |e| {
            e.prevent_default();
        });
        dom.focus(a);
        dom.press(Key::Tab);
        assert_eq!(dom.active_element(), Some(a));
    }

    #[test]
    fn pointer_down_focuses_nearest_focusable() {
        let (dom, panel, a, _) = setup();
        let icon = dom.create_element("span").unwrap();
        dom.append_child(a, icon);
        dom.pointer_down(icon, PointerEvent::at(Point::ZERO));
        assert_eq!(dom.active_element(), Some(a));
        dom.pointer_down(panel, PointerEvent::at(Point::ZERO));
        assert_eq!(dom.active_element(), None);
    }

    #[test]
    fn focus_events_carry_related_target() {
        let (dom, panel, a, b) = setup();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let log = seen.clone();
        dom.add_listener(panel, EventType::FocusIn, ListenerOptions::BUBBLE, move |e| {
            if let EventKind::FocusIn { related } = e.kind() {
                log.borrow_mut().push((e.target(), *related));
            }
        });
        dom.focus(a);
        dom.focus(b);
        assert_eq!(*seen.borrow(), vec![(a, None), (b, Some(a))]);
    }

    #[test]
    fn removal_drops_listeners_and_notifies_parent() {
        let (dom, panel, a, _) = setup();
        let changes = Rc::new(Cell::new(0));
        let c = changes.clone();
        dom.add_listener(panel, EventType::ChildListChange, ListenerOptions::BUBBLE, move |_| {
            c.set(c.get() + 1);
        });
        dom.add_listener(a, EventType::KeyDown, ListenerOptions::BUBBLE, |_| {});
        dom.remove(a);
        assert_eq!(changes.get(), 1);
        assert_eq!(dom.listener_count(), 1);
    }

    #[test]
    fn scroll_and_resize_notify_targets_only() {
        let (dom, panel, _, _) = setup();
        dom.toggle_flags(panel, ElementFlags::SCROLLABLE, true);
        let root = dom.root().unwrap();
        let scrolls = Rc::new(Cell::new(0));
        let s = scrolls.clone();
        dom.add_listener(panel, EventType::Scroll, ListenerOptions::BUBBLE, move |_| {
            s.set(s.get() + 1);
        });
        let s = scrolls.clone();
        dom.add_listener(root, EventType::Scroll, ListenerOptions::BUBBLE, move |_| {
            s.set(s.get() + 10);
        });
        dom.scroll_by(panel, Vec2::new(0.0, 5.0));
        assert_eq!(scrolls.get(), 1, "scroll does not bubble");

        dom.resize(Size::new(400.0, 300.0));
        assert_eq!(
            dom.read(|d| d.viewport()),
            Some(Rect::new(0.0, 0.0, 400.0, 300.0))
        );
    }

    #[test]
    fn server_dom_is_inert() {
        let dom = Dom::server();
        assert_eq!(dom.create_element("div"), None);
        assert!(!dom.focus(ElementId::INERT));
        let ev = dom.press(Key::Tab);
        assert!(!ev.default_prevented());
        assert_eq!(
            dom.add_listener(ElementId::INERT, EventType::KeyDown, ListenerOptions::BUBBLE, |_| {}),
            None
        );
        assert!(dom.query_all(ElementId::INERT, &Selector::focusable()).is_empty());
    }
}
