// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dialog: a dismissable layer plus, when modal, a focus trap.

use core::cell::RefCell;
use core::fmt;
use std::rc::{Rc, Weak};

use trellis_dom::{Dom, ElementId, EventType, ListenerGroup, ListenerOptions};
use trellis_focus::{FocusTrap, FocusTrapOptions, TrapStack, focusable_elements};
use trellis_layer::{DismissReason, DismissableLayer, DismissableLayerOptions, LayerStack};
use trellis_presence::{BoundPresence, Presence, PresenceOptions, PresenceState};

use crate::props::{OnOpenChange, OnValueChange, Props, bool_attr, ensure_id};

/// Configuration for [`Dialog`].
#[derive(Clone)]
pub struct DialogConfig {
    /// Element that opens the dialog and receives focus when it closes.
    pub trigger: Option<ElementId>,
    /// The dialog content.
    pub content: ElementId,
    /// Open immediately (without reporting a change).
    pub default_open: bool,
    /// Trap focus inside the content while open.
    pub modal: bool,
    /// Close on Escape.
    pub close_on_escape: bool,
    /// Close on pointer presses outside the content.
    pub close_on_outside_click: bool,
    /// Element to focus on open instead of the first tabbable one.
    pub initial_focus: Option<ElementId>,
    /// Wait for an exit animation before unmounting.
    pub animated: bool,
    /// Layer stack; `None` uses [`LayerStack::global`].
    pub layer_stack: Option<LayerStack>,
    /// Trap stack; `None` uses [`TrapStack::global`].
    pub trap_stack: Option<TrapStack>,
    /// Called after the dialog opens or closes.
    pub on_open_change: Option<OnOpenChange>,
    /// Called after every presence transition of the content, including the
    /// unmount once an exit animation ends. `default_open` reports here too.
    pub on_presence_change: Option<OnValueChange<PresenceState>>,
}

impl DialogConfig {
    /// A modal dialog over `content` that closes on Escape and outside presses.
    pub fn new(content: ElementId) -> Self {
        Self {
            trigger: None,
            content,
            default_open: false,
            modal: true,
            close_on_escape: true,
            close_on_outside_click: true,
            initial_focus: None,
            animated: false,
            layer_stack: None,
            trap_stack: None,
            on_open_change: None,
            on_presence_change: None,
        }
    }
}

impl fmt::Debug for DialogConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DialogConfig")
            .field("trigger", &self.trigger)
            .field("content", &self.content)
            .field("default_open", &self.default_open)
            .field("modal", &self.modal)
            .field("close_on_escape", &self.close_on_escape)
            .field("close_on_outside_click", &self.close_on_outside_click)
            .field("initial_focus", &self.initial_focus)
            .field("animated", &self.animated)
            .field("layer_stack", &self.layer_stack)
            .field("trap_stack", &self.trap_stack)
            .field("on_open_change", &self.on_open_change.is_some())
            .field("on_presence_change", &self.on_presence_change.is_some())
            .finish()
    }
}

/// Snapshot of a [`Dialog`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DialogState {
    /// Logically open.
    pub open: bool,
    /// Content should be rendered (open, or still animating out).
    pub mounted: bool,
    /// Presence phase of the content.
    pub presence: PresenceState,
}

struct DialogInner {
    dom: Dom,
    trigger: Option<ElementId>,
    content: ElementId,
    content_id: String,
    modal: bool,
    initial_focus: Option<ElementId>,
    open: bool,
    destroyed: bool,
    layer: DismissableLayer,
    trap: Option<FocusTrap>,
    presence: BoundPresence,
    return_to: Option<ElementId>,
    on_open_change: Option<OnOpenChange>,
    listeners: Option<ListenerGroup>,
}

impl fmt::Debug for DialogInner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DialogInner")
            .field("trigger", &self.trigger)
            .field("content", &self.content)
            .field("modal", &self.modal)
            .field("open", &self.open)
            .field("destroyed", &self.destroyed)
            .field("layer", &self.layer)
            .field("trap", &self.trap)
            .field("presence", &self.presence)
            .finish_non_exhaustive()
    }
}

/// A dialog behavior.
///
/// [`open`](Self::open) mounts the content, activates its dismissable layer,
/// and (for modal dialogs) a focus trap that moves focus inside.
/// [`close`](Self::close) tears both down and returns focus to the trigger,
/// or to whatever was focused before opening when there is no trigger.
/// Escape and outside presses close the dialog through the layer.
///
/// ```rust
/// use kurbo::Size;
/// use trellis_dom::{Dom, Key};
/// use trellis_behaviors::{Dialog, DialogConfig};
/// use trellis_layer::LayerStack;
///
/// let dom = Dom::new(Size::new(800.0, 600.0));
/// let body = dom.body().unwrap();
/// let trigger = dom.create_element("button").unwrap();
/// let content = dom.create_element("div").unwrap();
/// let close = dom.create_element("button").unwrap();
/// dom.append_child(body, trigger);
/// dom.append_child(body, content);
/// dom.append_child(content, close);
///
/// let layers = LayerStack::new();
/// let dialog = Dialog::new(
///     &dom,
///     DialogConfig {
///         trigger: Some(trigger),
///         layer_stack: Some(layers.clone()),
///         ..DialogConfig::new(content)
///     },
/// );
/// dialog.open();
/// assert_eq!(dom.active_element(), Some(close));
///
/// dom.press(Key::Escape);
/// assert!(!dialog.is_open());
/// assert!(layers.is_empty());
/// assert_eq!(dom.active_element(), Some(trigger));
/// ```
#[derive(Clone, Debug)]
pub struct Dialog {
    inner: Rc<RefCell<DialogInner>>,
}

impl Dialog {
    /// Build the behavior; opens right away when `default_open` is set.
    pub fn new(dom: &Dom, config: DialogConfig) -> Self {
        let content = config.content;
        let content_id = ensure_id(dom, content, "dialog");
        let presence = Presence::from_document(
            dom,
            PresenceOptions {
                present: false,
                animated: config.animated,
                reduced_motion: false,
            },
        )
        .bind(dom, content, config.on_presence_change.clone());
        let trap = config.modal.then(|| {
            FocusTrap::new(
                dom,
                FocusTrapOptions {
                    initial_focus: config.initial_focus,
                    return_focus_on_deactivate: false,
                    stack: config.trap_stack.clone(),
                    ..FocusTrapOptions::new(content)
                },
            )
        });
        let inner = Rc::new_cyclic(|weak: &Weak<RefCell<DialogInner>>| {
            let weak = weak.clone();
            let layer = DismissableLayer::new(
                dom,
                DismissableLayerOptions {
                    exclude: config.trigger.into_iter().collect(),
                    on_dismiss: Some(Rc::new(move |reason: DismissReason| {
                        if let Some(inner) = weak.upgrade() {
                            tracing::debug!(?reason, "dialog dismissed");
                            Dialog { inner }.close();
                        }
                    })),
                    close_on_escape: config.close_on_escape,
                    close_on_outside_click: config.close_on_outside_click,
                    stack: config.layer_stack.clone(),
                    ..DismissableLayerOptions::new(content)
                },
            );
            RefCell::new(DialogInner {
                dom: dom.clone(),
                trigger: config.trigger,
                content,
                content_id,
                modal: config.modal,
                initial_focus: config.initial_focus,
                open: false,
                destroyed: false,
                layer,
                trap,
                presence,
                return_to: None,
                on_open_change: config.on_open_change,
                listeners: None,
            })
        });
        let this = Self { inner };
        if config.default_open {
            this.show();
        }
        this
    }

    /// Open and report the change. Does nothing if already open.
    pub fn open(&self) {
        if let Some(cb) = self.show() {
            cb(true);
        }
    }

    /// Close, return focus, and report the change. Does nothing if closed.
    pub fn close(&self) {
        if let Some(cb) = self.hide() {
            cb(false);
        }
    }

    /// Open if closed, close if open.
    pub fn toggle(&self) {
        if self.is_open() {
            self.close();
        } else {
            self.open();
        }
    }

    /// Returns true while logically open.
    pub fn is_open(&self) -> bool {
        self.inner.borrow().open
    }

    /// Current snapshot.
    pub fn state(&self) -> DialogState {
        let inner = self.inner.borrow();
        DialogState {
            open: inner.open,
            mounted: inner.presence.is_mounted(),
            presence: inner.presence.state(),
        }
    }

    /// Returns true while the focus trap is active.
    pub fn is_trapping(&self) -> bool {
        self.inner
            .borrow()
            .trap
            .as_ref()
            .is_some_and(FocusTrap::is_active)
    }

    /// Attributes for the trigger.
    pub fn trigger_props(&self) -> Props {
        let inner = self.inner.borrow();
        Props::new()
            .with("aria-haspopup", "dialog")
            .with("aria-expanded", bool_attr(inner.open))
            .with("aria-controls", inner.content_id.clone())
            .with("data-state", if inner.open { "open" } else { "closed" })
    }

    /// Attributes for the content.
    pub fn content_props(&self) -> Props {
        let inner = self.inner.borrow();
        Props::new()
            .with("role", "dialog")
            .with("id", inner.content_id.clone())
            .with("aria-modal", bool_attr(inner.modal))
            .with("tabindex", "-1")
            .with("data-state", inner.presence.data_state())
    }

    /// Toggle on pointer presses on the trigger.
    pub fn attach(&self) {
        let (dom, trigger) = {
            let inner = self.inner.borrow();
            (inner.dom.clone(), inner.trigger)
        };
        let Some(trigger) = trigger else {
            return;
        };
        let mut group = ListenerGroup::new(&dom);
        let weak = Rc::downgrade(&self.inner);
        group.listen(trigger, EventType::PointerDown, ListenerOptions::BUBBLE, move |event| {
            if let Some(inner) = weak.upgrade() {
                // Focus goes into the dialog, not to the trigger.
                event.prevent_default();
                Self { inner }.toggle();
            }
        });
        self.inner.borrow_mut().listeners = Some(group);
    }

    /// Tear everything down without reporting. Later calls to `open` do nothing.
    pub fn destroy(&self) {
        let (layer, trap, presence) = {
            let mut inner = self.inner.borrow_mut();
            inner.destroyed = true;
            inner.open = false;
            inner.listeners = None;
            (inner.layer.clone(), inner.trap.clone(), inner.presence.clone())
        };
        layer.deactivate();
        if let Some(trap) = trap {
            trap.destroy();
        }
        presence.unbind();
    }

    fn show(&self) -> Option<OnOpenChange> {
        let (dom, layer, trap, presence, content, initial) = {
            let mut inner = self.inner.borrow_mut();
            if inner.open || inner.destroyed {
                return None;
            }
            inner.open = true;
            inner.return_to = inner.dom.active_element();
            (
                inner.dom.clone(),
                inner.layer.clone(),
                inner.trap.clone(),
                inner.presence.clone(),
                inner.content,
                inner.initial_focus,
            )
        };
        presence.set_present(true);
        layer.activate();
        match trap {
            Some(trap) => trap.activate(),
            None => {
                if let Some(target) = initial.or_else(|| focusable_elements(&dom, content).first().copied()) {
                    dom.focus(target);
                }
            }
        }
        tracing::debug!(?content, "dialog opened");
        self.inner.borrow().on_open_change.clone()
    }

    fn hide(&self) -> Option<OnOpenChange> {
        let (dom, layer, trap, presence, return_to) = {
            let mut inner = self.inner.borrow_mut();
            if !inner.open {
                return None;
            }
            inner.open = false;
            let previous = inner.return_to.take();
            (
                inner.dom.clone(),
                inner.layer.clone(),
                inner.trap.clone(),
                inner.presence.clone(),
                inner.trigger.or(previous),
            )
        };
        layer.deactivate();
        if let Some(trap) = trap {
            trap.deactivate();
        }
        if let Some(el) = return_to
            && dom.is_alive(el)
        {
            dom.focus(el);
        }
        presence.set_present(false);
        tracing::debug!("dialog closed");
        self.inner.borrow().on_open_change.clone()
    }
}
