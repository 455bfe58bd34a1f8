// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Focus traps: confine Tab and Shift+Tab cycling to a container.

use core::cell::RefCell;
use std::rc::{Rc, Weak};

use trellis_dom::{
    ActivationStack, Dom, ElementId, Event, EventType, Key, ListenerGroup, ListenerOptions,
    StackEntryId,
};

use crate::focusable::focusable_elements;

/// Stack of active focus traps; only the topmost one handles Tab.
///
/// Clones share the same stack. [`TrapStack::global`] returns the per-thread
/// default that traps use when no stack is configured.
#[derive(Clone, Debug, Default)]
pub struct TrapStack {
    entries: ActivationStack,
}

thread_local! {
    static GLOBAL_TRAPS: TrapStack = TrapStack::new();
}

impl TrapStack {
    /// A fresh, empty stack.
    pub fn new() -> Self {
        Self::default()
    }

    /// The per-thread default stack.
    pub fn global() -> Self {
        GLOBAL_TRAPS.with(Clone::clone)
    }

    /// Number of active traps.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no trap is active.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Configuration for [`FocusTrap`].
#[derive(Clone, Debug)]
pub struct FocusTrapOptions {
    /// Element whose descendants focus is confined to.
    pub container: ElementId,
    /// Element to focus on activation instead of the first tabbable one.
    pub initial_focus: Option<ElementId>,
    /// Restore focus to the element focused before activation.
    pub return_focus_on_deactivate: bool,
    /// Stack to register on; `None` uses [`TrapStack::global`].
    pub stack: Option<TrapStack>,
}

impl FocusTrapOptions {
    /// Options for a trap over `container` with default settings.
    pub fn new(container: ElementId) -> Self {
        Self {
            container,
            initial_focus: None,
            return_focus_on_deactivate: true,
            stack: None,
        }
    }
}

/// A focus trap handle.
///
/// While active, a document-level capture `keydown` listener intercepts Tab:
/// the tabbable set is recomputed on each press and focus cycles from the
/// last element to the first (Shift+Tab: first to last). Tab pressed while
/// focus sits outside the container pulls it back in. Focus that leaves by
/// other means (pointer, assistive technology) is left alone until the next
/// Tab.
///
/// Traps nest: activating a second trap on the same [`TrapStack`] pauses the
/// first until the second deactivates.
///
/// Clones share the same trap. Dropping the last clone deactivates it without
/// moving focus.
#[derive(Clone, Debug)]
pub struct FocusTrap {
    inner: Rc<RefCell<TrapInner>>,
}

#[derive(Debug)]
struct TrapInner {
    dom: Dom,
    container: ElementId,
    initial_focus: Option<ElementId>,
    return_focus: bool,
    stack: TrapStack,
    entry: Option<StackEntryId>,
    listeners: ListenerGroup,
    return_to: Option<ElementId>,
    destroyed: bool,
}

impl Drop for TrapInner {
    fn drop(&mut self) {
        if let Some(entry) = self.entry.take() {
            self.stack.entries.remove(entry);
        }
    }
}

impl FocusTrap {
    /// Create an inactive trap.
    pub fn new(dom: &Dom, options: FocusTrapOptions) -> Self {
        Self {
            inner: Rc::new(RefCell::new(TrapInner {
                dom: dom.clone(),
                container: options.container,
                initial_focus: options.initial_focus,
                return_focus: options.return_focus_on_deactivate,
                stack: options.stack.unwrap_or_else(TrapStack::global),
                entry: None,
                listeners: ListenerGroup::new(dom),
                return_to: None,
                destroyed: false,
            })),
        }
    }

    /// Activate the trap and move focus into the container.
    ///
    /// Does nothing if already active, destroyed, without a document, or if
    /// the container no longer exists.
    pub fn activate(&self) {
        let (dom, container, initial) = {
            let inner = self.inner.borrow();
            if inner.entry.is_some() || inner.destroyed {
                return;
            }
            (inner.dom.clone(), inner.container, inner.initial_focus)
        };
        if !dom.is_available() {
            tracing::debug!("focus trap activation skipped: no document");
            return;
        }
        let Some(root) = dom.root().filter(|_| dom.is_alive(container)) else {
            return;
        };

        {
            let mut inner = self.inner.borrow_mut();
            inner.return_to = dom.active_element();
            let entry = inner.stack.entries.push();
            inner.entry = Some(entry);
            let weak = Rc::downgrade(&self.inner);
            inner.listeners.listen(
                root,
                EventType::KeyDown,
                ListenerOptions::CAPTURE,
                move |event| handle_key(&weak, event),
            );
        }
        tracing::debug!(?container, "focus trap activated");

        let set = focusable_elements(&dom, container);
        match initial
            .filter(|&el| dom.contains(container, el) && dom.read(|d| d.is_focusable(el)) == Some(true))
            .or_else(|| set.first().copied())
        {
            Some(target) => {
                dom.focus(target);
            }
            None => focus_container(&dom, container),
        }
    }

    /// Deactivate the trap, optionally restoring the previously focused element.
    pub fn deactivate(&self) {
        let (dom, return_to) = {
            let mut inner = self.inner.borrow_mut();
            let Some(entry) = inner.entry.take() else {
                return;
            };
            inner.listeners.clear();
            inner.stack.entries.remove(entry);
            let restore = inner.return_focus;
            let return_to = inner.return_to.take().filter(|_| restore);
            (inner.dom.clone(), return_to)
        };
        tracing::debug!("focus trap deactivated");
        if let Some(el) = return_to
            && dom.is_alive(el)
        {
            dom.focus(el);
        }
    }

    /// Deactivate permanently; later [`FocusTrap::activate`] calls do nothing.
    pub fn destroy(&self) {
        self.deactivate();
        self.inner.borrow_mut().destroyed = true;
    }

    /// Returns true while activated.
    pub fn is_active(&self) -> bool {
        self.inner.borrow().entry.is_some()
    }

    /// Returns true while active but shadowed by a trap activated later on the same stack.
    pub fn is_paused(&self) -> bool {
        let inner = self.inner.borrow();
        inner.entry.is_some_and(|e| !inner.stack.entries.is_top(e))
    }

    /// The container this trap confines focus to.
    pub fn container(&self) -> ElementId {
        self.inner.borrow().container
    }
}

fn focus_container(dom: &Dom, container: ElementId) {
    if dom.attribute(container, "tabindex").is_none() {
        dom.set_attribute(container, "tabindex", "-1");
    }
    dom.focus(container);
}

fn handle_key(weak: &Weak<RefCell<TrapInner>>, event: &mut Event) {
    let Some(key) = event.keyboard().copied() else {
        return;
    };
    if key.key != Key::Tab || key.has_command_modifier() {
        return;
    }
    let Some(inner) = weak.upgrade() else {
        return;
    };
    let (dom, container) = {
        let inner = inner.borrow();
        match inner.entry {
            Some(entry) if inner.stack.entries.is_top(entry) => {}
            _ => return,
        }
        (inner.dom.clone(), inner.container)
    };

    let set = focusable_elements(&dom, container);
    event.prevent_default();
    let (Some(&first), Some(&last)) = (set.first(), set.last()) else {
        focus_container(&dom, container);
        return;
    };
    let backward = key.shift();
    let active = dom.active_element();
    let target = match active.filter(|&a| dom.contains(container, a)) {
        None => {
            if backward {
                last
            } else {
                first
            }
        }
        Some(a) => match set.iter().position(|&e| e == a) {
            Some(i) if backward => {
                if i == 0 {
                    last
                } else {
                    set[i - 1]
                }
            }
            Some(i) => set.get(i + 1).copied().unwrap_or(first),
            None if backward => last,
            None => first,
        },
    };
    dom.focus(target);
}
