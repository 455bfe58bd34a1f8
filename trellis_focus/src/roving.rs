// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Roving tabindex over the items of a composite widget.

use core::cell::RefCell;
use std::rc::{Rc, Weak};

use trellis_dom::{
    Dom, ElementId, Event, EventType, Key, ListenerGroup, ListenerOptions,
    Orientation, Selector, TextDirection,
};

use crate::policy::{DefaultPolicy, FocusEntry, FocusPolicy, FocusSpace, Navigation, WrapMode};

/// Callback invoked after roving focus moves to an item.
pub type OnFocus = Rc<dyn Fn(ElementId)>;

/// Configuration for [`RovingFocus`].
#[derive(Clone)]
pub struct RovingFocusOptions {
    /// Element containing the items.
    pub container: ElementId,
    /// Which descendants of the container are items.
    pub selector: Selector,
    /// Which arrow keys move between items.
    pub orientation: Orientation,
    /// Wrap from the last item to the first (and back) instead of stopping.
    pub wrap: bool,
    /// Skip disabled items when moving.
    pub skip_disabled: bool,
    /// Text direction; horizontal arrows are mirrored under RTL.
    pub direction: TextDirection,
    /// Rescan items automatically when the container's children change.
    pub observe_children: bool,
    /// Called with the new item after each move.
    pub on_focus: Option<OnFocus>,
}

impl core::fmt::Debug for RovingFocusOptions {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RovingFocusOptions")
            .field("container", &self.container)
            .field("selector", &self.selector.as_str())
            .field("orientation", &self.orientation)
            .field("wrap", &self.wrap)
            .field("skip_disabled", &self.skip_disabled)
            .field("direction", &self.direction)
            .field("observe_children", &self.observe_children)
            .field("on_focus", &self.on_focus.is_some())
            .finish()
    }
}

impl RovingFocusOptions {
    /// Vertical, wrapping, disabled-skipping roving focus over `selector` matches.
    pub fn new(container: ElementId, selector: Selector) -> Self {
        Self {
            container,
            selector,
            orientation: Orientation::Vertical,
            wrap: true,
            skip_disabled: true,
            direction: TextDirection::Ltr,
            observe_children: false,
            on_focus: None,
        }
    }
}

/// Roving tabindex handle.
///
/// Exactly one item carries `tabindex="0"` (the active item); every other
/// item carries `tabindex="-1"`, so Tab enters and leaves the widget as a
/// single stop while arrow keys move between items.
///
/// The initial active item is the first item marked `data-active`, or else
/// the first eligible item. Arrow keys follow [`Orientation`]; `Home`/`End`
/// jump to the first/last eligible item. Focus arriving on an item by other
/// means (pointer, script) makes that item active.
///
/// Items are captured when the handle is created and on every
/// [`RovingFocus::recompute`]; set `observe_children` to rescan automatically.
///
/// ```rust
/// use kurbo::Size;
/// use trellis_dom::{Dom, Key, Orientation, Selector};
/// use trellis_focus::{RovingFocus, RovingFocusOptions};
///
/// let dom = Dom::new(Size::new(800.0, 600.0));
/// let toolbar = dom.create_element("div").unwrap();
/// dom.append_child(dom.body().unwrap(), toolbar);
/// let buttons: Vec<_> = (0..3)
///     .map(|_| {
///         let b = dom.create_element("button").unwrap();
///         dom.append_child(toolbar, b);
///         b
///     })
///     .collect();
///
/// let roving = RovingFocus::new(
///     &dom,
///     RovingFocusOptions {
///         orientation: Orientation::Horizontal,
///         ..RovingFocusOptions::new(toolbar, Selector::parse("button").unwrap())
///     },
/// );
/// assert_eq!(roving.active(), Some(buttons[0]));
///
/// dom.focus(buttons[0]);
/// dom.press(Key::ArrowRight);
/// assert_eq!(dom.active_element(), Some(buttons[1]));
/// assert_eq!(dom.attribute(buttons[1], "tabindex").as_deref(), Some("0"));
/// assert_eq!(dom.attribute(buttons[0], "tabindex").as_deref(), Some("-1"));
/// ```
#[derive(Clone, Debug)]
pub struct RovingFocus {
    inner: Rc<RefCell<RovingInner>>,
}

#[derive(Debug)]
struct RovingInner {
    dom: Dom,
    options: RovingFocusOptions,
    items: Vec<ElementId>,
    active: Option<ElementId>,
    listeners: ListenerGroup,
}

impl RovingFocus {
    /// Scan items, assign tabindex values, and start listening on the container.
    pub fn new(dom: &Dom, options: RovingFocusOptions) -> Self {
        let container = options.container;
        let observe = options.observe_children;
        let this = Self {
            inner: Rc::new(RefCell::new(RovingInner {
                dom: dom.clone(),
                options,
                items: Vec::new(),
                active: None,
                listeners: ListenerGroup::new(dom),
            })),
        };
        {
            let mut inner = this.inner.borrow_mut();
            let weak = Rc::downgrade(&this.inner);
            inner.listeners.listen(
                container,
                EventType::KeyDown,
                ListenerOptions::BUBBLE,
                move |event| with_handle(&weak, |r| r.handle_key(event)),
            );
            let weak = Rc::downgrade(&this.inner);
            inner.listeners.listen(
                container,
                EventType::FocusIn,
                ListenerOptions::BUBBLE,
                move |event| {
                    let target = event.target();
                    with_handle(&weak, |r| r.sync_to(target));
                },
            );
            if observe {
                let weak = Rc::downgrade(&this.inner);
                inner.listeners.listen(
                    container,
                    EventType::ChildListChange,
                    ListenerOptions::BUBBLE,
                    move |_| with_handle(&weak, RovingFocus::recompute),
                );
            }
        }
        this.recompute();
        this
    }

    /// Rescan items and restore the single-tabstop invariant.
    ///
    /// The current active item is kept if it is still an eligible item;
    /// otherwise a `data-active` item or the first eligible item takes over.
    pub fn recompute(&self) {
        let mut inner = self.inner.borrow_mut();
        let dom = inner.dom.clone();
        let container = inner.options.container;
        let skip_disabled = inner.options.skip_disabled;
        let Some(scan) = dom.read(|doc| {
            let items: Vec<ElementId> = doc
                .query_all(container, &inner.options.selector)
                .into_iter()
                .filter(|&id| !doc.is_hidden(id))
                .collect();
            let eligible = |id: ElementId| !skip_disabled || !doc.is_disabled(id);
            let active = inner
                .active
                .filter(|a| items.contains(a) && eligible(*a))
                .or_else(|| {
                    items
                        .iter()
                        .copied()
                        .find(|&id| doc.has_attribute(id, "data-active") && eligible(id))
                })
                .or_else(|| items.iter().copied().find(|&id| eligible(id)));
            (items, active)
        }) else {
            return;
        };
        let (items, active) = scan;
        inner.items = items;
        inner.active = active;
        tracing::trace!(items = inner.items.len(), active = ?inner.active, "roving focus rescanned");
        for &item in &inner.items {
            let value = if Some(item) == inner.active { "0" } else { "-1" };
            dom.set_attribute(item, "tabindex", value);
        }
    }

    /// Make `item` the active item, focus it, and call `on_focus`.
    ///
    /// Returns false if `item` is not an eligible item.
    pub fn focus_item(&self, item: ElementId) -> bool {
        let (dom, on_focus) = {
            let mut inner = self.inner.borrow_mut();
            if !inner.items.contains(&item) || !inner.is_eligible(item) {
                return false;
            }
            inner.set_active(item);
            (inner.dom.clone(), inner.options.on_focus.clone())
        };
        dom.focus(item);
        if let Some(cb) = on_focus {
            cb(item);
        }
        true
    }

    /// The item currently carrying `tabindex="0"`.
    pub fn active(&self) -> Option<ElementId> {
        self.inner.borrow().active
    }

    /// The items captured by the last scan, in document order.
    pub fn items(&self) -> Vec<ElementId> {
        self.inner.borrow().items.clone()
    }

    /// Stop listening. Tabindex attributes are left as they are.
    pub fn destroy(&self) {
        let mut inner = self.inner.borrow_mut();
        inner.listeners.clear();
        inner.items.clear();
        inner.active = None;
    }

    fn sync_to(&self, target: ElementId) {
        let mut inner = self.inner.borrow_mut();
        if inner.active != Some(target) && inner.items.contains(&target) && inner.is_eligible(target)
        {
            inner.set_active(target);
        }
    }

    fn handle_key(&self, event: &mut Event) {
        let Some(key) = event.keyboard().copied() else {
            return;
        };
        if key.has_command_modifier() {
            return;
        }
        let (next, dom) = {
            let inner = self.inner.borrow();
            let Some(nav) = inner.navigation_for(key.key) else {
                return;
            };
            let target = event.target();
            if !inner.items.contains(&target) {
                return;
            }
            event.prevent_default();
            let entries: Vec<FocusEntry<ElementId>> = inner
                .dom
                .read(|doc| {
                    inner
                        .items
                        .iter()
                        .map(|&id| FocusEntry {
                            id,
                            rect: doc.rect(id).unwrap_or_default(),
                            enabled: !inner.options.skip_disabled || !doc.is_disabled(id),
                        })
                        .collect()
                })
                .unwrap_or_default();
            let policy = DefaultPolicy {
                wrap: if inner.options.wrap {
                    WrapMode::Loop
                } else {
                    WrapMode::Clamp
                },
                direction: inner.options.direction,
            };
            let next = policy.next(Some(target), nav, &FocusSpace { nodes: &entries });
            (next, inner.dom.clone())
        };
        if let Some(next) = next
            && Some(next) != dom.active_element()
        {
            self.focus_item(next);
        }
    }
}

impl RovingInner {
    fn is_eligible(&self, item: ElementId) -> bool {
        !self.options.skip_disabled
            || !self
                .dom
                .read(|d| d.is_disabled(item))
                .unwrap_or(true)
    }

    fn set_active(&mut self, item: ElementId) {
        if let Some(old) = self.active.replace(item)
            && old != item
        {
            self.dom.set_attribute(old, "tabindex", "-1");
        }
        self.dom.set_attribute(item, "tabindex", "0");
    }

    fn navigation_for(&self, key: Key) -> Option<Navigation> {
        let rtl = self.options.direction == TextDirection::Rtl;
        match (self.options.orientation, key) {
            (_, Key::Home) => Some(Navigation::First),
            (_, Key::End) => Some(Navigation::Last),
            (Orientation::Horizontal, Key::ArrowRight) => {
                Some(if rtl { Navigation::Prev } else { Navigation::Next })
            }
            (Orientation::Horizontal, Key::ArrowLeft) => {
                Some(if rtl { Navigation::Next } else { Navigation::Prev })
            }
            (Orientation::Vertical, Key::ArrowDown) => Some(Navigation::Next),
            (Orientation::Vertical, Key::ArrowUp) => Some(Navigation::Prev),
            (Orientation::Both, Key::ArrowUp) => Some(Navigation::Up),
            (Orientation::Both, Key::ArrowDown) => Some(Navigation::Down),
            (Orientation::Both, Key::ArrowLeft) => Some(Navigation::Left),
            (Orientation::Both, Key::ArrowRight) => Some(Navigation::Right),
            _ => None,
        }
    }
}

fn with_handle(weak: &Weak<RefCell<RovingInner>>, f: impl FnOnce(&RovingFocus)) {
    if let Some(inner) = weak.upgrade() {
        f(&RovingFocus { inner });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::{Rect, Size};
    use std::cell::RefCell as StdRefCell;
    use trellis_dom::KeyboardEvent;

    fn list(dom: &Dom, n: usize) -> (ElementId, Vec<ElementId>) {
        let container = dom.create_element("div").unwrap();
        dom.append_child(dom.body().unwrap(), container);
        let items = (0..n)
            .map(|i| {
                let el = dom.create_element("div").unwrap();
                dom.set_attribute(el, "role", "option");
                dom.append_child(container, el);
                dom.write(|d| {
                    d.set_rect(el, Rect::new(0.0, 20.0 * i as f64, 100.0, 20.0 * (i + 1) as f64));
                });
                el
            })
            .collect();
        (container, items)
    }

    fn tabindexes(dom: &Dom, items: &[ElementId]) -> Vec<String> {
        items
            .iter()
            .map(|&i| dom.attribute(i, "tabindex").unwrap_or_default())
            .collect()
    }

    fn options(container: ElementId) -> RovingFocusOptions {
        RovingFocusOptions::new(container, Selector::parse("[role=\"option\"]").unwrap())
    }

    #[test]
    fn setup_marks_single_tabstop() {
        let dom = Dom::new(Size::new(800.0, 600.0));
        let (container, items) = list(&dom, 3);
        let roving = RovingFocus::new(&dom, options(container));
        assert_eq!(roving.active(), Some(items[0]));
        assert_eq!(tabindexes(&dom, &items), ["0", "-1", "-1"]);
        assert_eq!(roving.items(), items);
    }

    #[test]
    fn data_active_item_wins_initially() {
        let dom = Dom::new(Size::new(800.0, 600.0));
        let (container, items) = list(&dom, 3);
        dom.set_attribute(items[2], "data-active", "");
        let roving = RovingFocus::new(&dom, options(container));
        assert_eq!(roving.active(), Some(items[2]));
        assert_eq!(tabindexes(&dom, &items), ["-1", "-1", "0"]);
    }

    #[test]
    fn arrows_wrap_and_skip_disabled() {
        let dom = Dom::new(Size::new(800.0, 600.0));
        let (container, items) = list(&dom, 4);
        dom.set_attribute(items[1], "aria-disabled", "true");
        let seen = Rc::new(StdRefCell::new(Vec::new()));
        let log = seen.clone();
        let roving = RovingFocus::new(
            &dom,
            RovingFocusOptions {
                on_focus: Some(Rc::new(move |el| log.borrow_mut().push(el))),
                ..options(container)
            },
        );
        dom.focus(items[0]);
        dom.press(Key::ArrowDown);
        assert_eq!(dom.active_element(), Some(items[2]));
        dom.press(Key::ArrowDown);
        dom.press(Key::ArrowDown);
        assert_eq!(dom.active_element(), Some(items[0]), "wraps to first");
        dom.press(Key::ArrowUp);
        assert_eq!(dom.active_element(), Some(items[3]));
        dom.press(Key::Home);
        assert_eq!(roving.active(), Some(items[0]));
        assert_eq!(*seen.borrow(), vec![items[2], items[3], items[0], items[3], items[0]]);
        // Horizontal keys do nothing in a vertical list.
        let ev = dom.press(Key::ArrowRight);
        assert!(!ev.default_prevented());
        assert_eq!(roving.active(), Some(items[0]));
    }

    #[test]
    fn clamp_stays_at_edges() {
        let dom = Dom::new(Size::new(800.0, 600.0));
        let (container, items) = list(&dom, 2);
        let roving = RovingFocus::new(
            &dom,
            RovingFocusOptions {
                wrap: false,
                ..options(container)
            },
        );
        dom.focus(items[1]);
        assert_eq!(roving.active(), Some(items[1]), "focus syncs the active item");
        dom.press(Key::ArrowDown);
        assert_eq!(dom.active_element(), Some(items[1]));
        dom.press(Key::End);
        dom.press(Key::ArrowUp);
        dom.press(Key::ArrowUp);
        assert_eq!(dom.active_element(), Some(items[0]));
        assert_eq!(tabindexes(&dom, &items), ["0", "-1"]);
    }

    #[test]
    fn rtl_mirrors_horizontal_arrows() {
        let dom = Dom::new(Size::new(800.0, 600.0));
        let (container, items) = list(&dom, 3);
        let _roving = RovingFocus::new(
            &dom,
            RovingFocusOptions {
                orientation: Orientation::Horizontal,
                direction: TextDirection::Rtl,
                ..options(container)
            },
        );
        dom.focus(items[1]);
        dom.press(Key::ArrowLeft);
        assert_eq!(dom.active_element(), Some(items[2]));
        dom.press(Key::ArrowRight);
        dom.press(Key::ArrowRight);
        assert_eq!(dom.active_element(), Some(items[0]));
    }

    #[test]
    fn both_orientation_moves_spatially() {
        let dom = Dom::new(Size::new(800.0, 600.0));
        let (container, items) = list(&dom, 4);
        // 2x2 grid.
        for (i, &el) in items.iter().enumerate() {
            let (col, row) = ((i % 2) as f64, (i / 2) as f64);
            dom.write(|d| {
                d.set_rect(el, Rect::new(col * 50.0, row * 50.0, col * 50.0 + 40.0, row * 50.0 + 40.0));
            });
        }
        let _roving = RovingFocus::new(
            &dom,
            RovingFocusOptions {
                orientation: Orientation::Both,
                ..options(container)
            },
        );
        dom.focus(items[0]);
        dom.press(Key::ArrowDown);
        assert_eq!(dom.active_element(), Some(items[2]));
        dom.press(Key::ArrowRight);
        assert_eq!(dom.active_element(), Some(items[3]));
        dom.press(Key::ArrowUp);
        assert_eq!(dom.active_element(), Some(items[1]));
    }

    #[test]
    fn observe_children_rescans() {
        let dom = Dom::new(Size::new(800.0, 600.0));
        let (container, items) = list(&dom, 2);
        let roving = RovingFocus::new(
            &dom,
            RovingFocusOptions {
                observe_children: true,
                ..options(container)
            },
        );
        let added = dom.create_element("div").unwrap();
        dom.set_attribute(added, "role", "option");
        dom.append_child(container, added);
        assert_eq!(roving.items(), vec![items[0], items[1], added]);
        assert_eq!(dom.attribute(added, "tabindex").as_deref(), Some("-1"));

        dom.remove(items[0]);
        assert_eq!(roving.active(), Some(items[1]));
        assert_eq!(dom.attribute(items[1], "tabindex").as_deref(), Some("0"));
    }

    #[test]
    fn destroy_removes_listeners() {
        let dom = Dom::new(Size::new(800.0, 600.0));
        let (container, items) = list(&dom, 2);
        let roving = RovingFocus::new(&dom, options(container));
        roving.destroy();
        assert_eq!(dom.listener_count(), 0);
        dom.focus(items[0]);
        dom.key_down(KeyboardEvent::new(Key::ArrowDown));
        assert_eq!(dom.active_element(), Some(items[0]));
    }
}
