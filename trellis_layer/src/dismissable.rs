// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dismissable layers: close on outside pointer presses or Escape.

use core::cell::RefCell;
use std::rc::{Rc, Weak};

use smallvec::SmallVec;
use trellis_dom::{
    Dom, ElementId, Event, EventType, Key, ListenerGroup, ListenerOptions, StackEntryId,
};

use crate::stack::LayerStack;

/// Why a layer asked to be dismissed.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum DismissReason {
    /// Escape was pressed while the layer was on top.
    Escape,
    /// A pointer was pressed outside the layer and every excluded element.
    PointerDownOutside,
}

/// Callback invoked when a layer should close.
pub type OnDismiss = Rc<dyn Fn(DismissReason)>;

/// Configuration for [`DismissableLayer`].
#[derive(Clone)]
pub struct DismissableLayerOptions {
    /// The layer's content element.
    pub container: ElementId,
    /// Elements that never count as "outside" (for example the trigger).
    pub exclude: Vec<ElementId>,
    /// Called when the layer should close. The layer does not close itself.
    pub on_dismiss: Option<OnDismiss>,
    /// React to Escape.
    pub close_on_escape: bool,
    /// React to pointer presses outside.
    pub close_on_outside_click: bool,
    /// Stack to register on; `None` uses [`LayerStack::global`].
    pub stack: Option<LayerStack>,
}

impl core::fmt::Debug for DismissableLayerOptions {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DismissableLayerOptions")
            .field("container", &self.container)
            .field("exclude", &self.exclude)
            .field("on_dismiss", &self.on_dismiss.is_some())
            .field("close_on_escape", &self.close_on_escape)
            .field("close_on_outside_click", &self.close_on_outside_click)
            .field("stack", &self.stack)
            .finish()
    }
}

impl DismissableLayerOptions {
    /// Options for a layer over `container` that closes on Escape and outside presses.
    pub fn new(container: ElementId) -> Self {
        Self {
            container,
            exclude: Vec::new(),
            on_dismiss: None,
            close_on_escape: true,
            close_on_outside_click: true,
            stack: None,
        }
    }
}

/// A dismissable layer handle.
///
/// [`activate`](Self::activate) pushes the layer onto its [`LayerStack`] and
/// installs document-level capture listeners for `pointerdown` and `keydown`.
/// Only the top layer reacts:
///
/// - A pointer press whose target is outside the container and every excluded
///   element calls `on_dismiss(PointerDownOutside)`.
/// - Escape calls `on_dismiss(Escape)` and stops propagation immediately, so
///   no layer below and no handler further down the path sees it.
///
/// [`deactivate`](Self::deactivate) removes both listeners and this layer's
/// stack entry. Dropping the last clone does the same.
///
/// ```rust
/// use std::cell::Cell;
/// use std::rc::Rc;
/// use kurbo::Size;
/// use trellis_dom::{Dom, Key};
/// use trellis_layer::{DismissReason, DismissableLayer, DismissableLayerOptions, LayerStack};
///
/// let dom = Dom::new(Size::new(800.0, 600.0));
/// let popover = dom.create_element("div").unwrap();
/// dom.append_child(dom.body().unwrap(), popover);
///
/// let dismissed = Rc::new(Cell::new(None));
/// let seen = dismissed.clone();
/// let stack = LayerStack::new();
/// let layer = DismissableLayer::new(
///     &dom,
///     DismissableLayerOptions {
///         on_dismiss: Some(Rc::new(move |reason| seen.set(Some(reason)))),
///         stack: Some(stack.clone()),
///         ..DismissableLayerOptions::new(popover)
///     },
/// );
/// layer.activate();
/// assert_eq!(stack.len(), 1);
///
/// dom.press(Key::Escape);
/// assert_eq!(dismissed.get(), Some(DismissReason::Escape));
///
/// layer.deactivate();
/// assert!(stack.is_empty());
/// ```
#[derive(Clone, Debug)]
pub struct DismissableLayer {
    inner: Rc<RefCell<LayerInner>>,
}

#[derive(Debug)]
struct LayerInner {
    dom: Dom,
    options: DismissableLayerOptions,
    stack: LayerStack,
    entry: Option<StackEntryId>,
    listeners: ListenerGroup,
}

impl Drop for LayerInner {
    fn drop(&mut self) {
        if let Some(entry) = self.entry.take() {
            self.stack.remove(entry);
        }
    }
}

impl DismissableLayer {
    /// Create an inactive layer.
    pub fn new(dom: &Dom, options: DismissableLayerOptions) -> Self {
        let stack = options.stack.clone().unwrap_or_else(LayerStack::global);
        Self {
            inner: Rc::new(RefCell::new(LayerInner {
                dom: dom.clone(),
                options,
                stack,
                entry: None,
                listeners: ListenerGroup::new(dom),
            })),
        }
    }

    /// Push onto the stack and start listening. Does nothing if already active
    /// or without a document.
    pub fn activate(&self) {
        let mut inner = self.inner.borrow_mut();
        if inner.entry.is_some() {
            return;
        }
        let Some(root) = inner.dom.root() else {
            tracing::debug!("dismissable layer activation skipped: no document");
            return;
        };
        let entry = inner.stack.push();
        inner.entry = Some(entry);

        let weak = Rc::downgrade(&self.inner);
        inner.listeners.listen(
            root,
            EventType::PointerDown,
            ListenerOptions::CAPTURE,
            move |event| handle_pointer_down(&weak, event),
        );
        let weak = Rc::downgrade(&self.inner);
        inner.listeners.listen(
            root,
            EventType::KeyDown,
            ListenerOptions::CAPTURE,
            move |event| handle_key(&weak, event),
        );
        tracing::debug!(
            container = ?inner.options.container,
            depth = inner.stack.len(),
            "dismissable layer activated"
        );
    }

    /// Stop listening and remove this layer's stack entry.
    pub fn deactivate(&self) {
        let mut inner = self.inner.borrow_mut();
        let Some(entry) = inner.entry.take() else {
            return;
        };
        inner.listeners.clear();
        inner.stack.remove(entry);
        tracing::debug!(
            container = ?inner.options.container,
            depth = inner.stack.len(),
            "dismissable layer deactivated"
        );
    }

    /// Returns true while activated.
    pub fn is_active(&self) -> bool {
        self.inner.borrow().entry.is_some()
    }

    /// Returns true if this layer is active and on top of its stack.
    pub fn is_top(&self) -> bool {
        let inner = self.inner.borrow();
        inner.entry.is_some_and(|e| inner.stack.is_top(e))
    }

    /// The stack this layer registers on.
    pub fn stack(&self) -> LayerStack {
        self.inner.borrow().stack.clone()
    }

    /// Replace the excluded elements.
    pub fn set_exclude(&self, exclude: Vec<ElementId>) {
        self.inner.borrow_mut().options.exclude = exclude;
    }
}

/// Borrow the layer, check it is on top, and hand back what the handler needs.
fn top_layer(weak: &Weak<RefCell<LayerInner>>) -> Option<(Dom, DismissableLayerOptions)> {
    let inner = weak.upgrade()?;
    let inner = inner.borrow();
    let entry = inner.entry?;
    inner
        .stack
        .is_top(entry)
        .then(|| (inner.dom.clone(), inner.options.clone()))
}

fn handle_pointer_down(weak: &Weak<RefCell<LayerInner>>, event: &mut Event) {
    let Some((dom, options)) = top_layer(weak) else {
        return;
    };
    if !options.close_on_outside_click {
        return;
    }
    let target = event.target();
    let inside: SmallVec<[ElementId; 4]> = core::iter::once(options.container)
        .chain(options.exclude.iter().copied())
        .collect();
    if inside.iter().any(|&el| dom.contains(el, target)) {
        return;
    }
    tracing::debug!(?target, "dismissable layer: pointer down outside");
    if let Some(cb) = options.on_dismiss {
        cb(DismissReason::PointerDownOutside);
    }
}

fn handle_key(weak: &Weak<RefCell<LayerInner>>, event: &mut Event) {
    if event.keyboard().map(|k| k.key) != Some(Key::Escape) {
        return;
    }
    let Some((_, options)) = top_layer(weak) else {
        return;
    };
    if !options.close_on_escape {
        return;
    }
    event.stop_immediate_propagation();
    tracing::debug!("dismissable layer: escape");
    if let Some(cb) = options.on_dismiss {
        cb(DismissReason::Escape);
    }
}
