// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trellis Presence: enter/exit lifecycle tracking for animated content.
//!
//! An overlay that animates out must stay mounted until its exit animation
//! finishes. [`Presence`] is the state machine:
//!
//! ```text
//! Unmounted --show--> Entering --animation end--> Present
//!     ^                                              |
//!     +----animation end---- Exiting <----hide-------+
//! ```
//!
//! Without animation, or when reduced motion is requested, the transitional
//! states are skipped. [`Presence::bind`] ties the machine to an element so
//! that `AnimationEnd` events drive it and `data-state` stays in sync.
//!
//! ## Usage
//!
//! ```
//! use trellis_presence::{Presence, PresenceOptions, PresenceState};
//!
//! let mut presence = Presence::new(PresenceOptions { animated: true, ..Default::default() });
//! assert!(!presence.is_mounted());
//!
//! presence.set_present(true);
//! assert_eq!(presence.state(), PresenceState::Entering);
//! presence.animation_end();
//! assert_eq!(presence.state(), PresenceState::Present);
//!
//! presence.set_present(false);
//! // Still mounted while the exit animation runs.
//! assert!(presence.is_mounted());
//! assert_eq!(presence.data_state(), "closed");
//! presence.animation_end();
//! assert!(!presence.is_mounted());
//! ```

use core::cell::RefCell;
use std::rc::Rc;

use trellis_dom::{Dom, ElementId, EventType, ListenerGroup, ListenerOptions};

/// Lifecycle state of animated content.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum PresenceState {
    /// Not rendered.
    #[default]
    Unmounted,
    /// Rendered, enter animation running.
    Entering,
    /// Rendered and settled.
    Present,
    /// Still rendered, exit animation running.
    Exiting,
}

/// Configuration for [`Presence`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct PresenceOptions {
    /// Start present (settled, without an enter animation).
    pub present: bool,
    /// The content has enter/exit animations.
    pub animated: bool,
    /// Skip animations regardless of `animated`.
    pub reduced_motion: bool,
}

/// The presence state machine.
#[derive(Clone, Debug)]
pub struct Presence {
    state: PresenceState,
    animated: bool,
    reduced_motion: bool,
}

impl Presence {
    /// Create a state machine from options.
    pub fn new(options: PresenceOptions) -> Self {
        Self {
            state: if options.present {
                PresenceState::Present
            } else {
                PresenceState::Unmounted
            },
            animated: options.animated,
            reduced_motion: options.reduced_motion,
        }
    }

    /// Like [`Presence::new`], also honoring the document's reduced-motion preference.
    pub fn from_document(dom: &Dom, options: PresenceOptions) -> Self {
        Self::new(PresenceOptions {
            reduced_motion: options.reduced_motion || dom.prefers_reduced_motion(),
            ..options
        })
    }

    /// Current state.
    pub fn state(&self) -> PresenceState {
        self.state
    }

    /// Returns true while the content should be rendered.
    pub fn is_mounted(&self) -> bool {
        self.state != PresenceState::Unmounted
    }

    /// Returns true while the content is logically shown (entering or present).
    pub fn is_present(&self) -> bool {
        matches!(self.state, PresenceState::Entering | PresenceState::Present)
    }

    /// `"open"` while shown, `"closed"` while exiting or unmounted.
    pub fn data_state(&self) -> &'static str {
        if self.is_present() { "open" } else { "closed" }
    }

    /// Toggle reduced motion. A transition in flight is not interrupted.
    pub fn set_reduced_motion(&mut self, reduce: bool) {
        self.reduced_motion = reduce;
    }

    fn animates(&self) -> bool {
        self.animated && !self.reduced_motion
    }

    /// Show or hide. Returns true if the state changed.
    pub fn set_present(&mut self, present: bool) -> bool {
        let next = match (present, self.state) {
            (true, PresenceState::Unmounted | PresenceState::Exiting) => {
                if self.animates() {
                    PresenceState::Entering
                } else {
                    PresenceState::Present
                }
            }
            (false, PresenceState::Entering | PresenceState::Present) => {
                if self.animates() {
                    PresenceState::Exiting
                } else {
                    PresenceState::Unmounted
                }
            }
            _ => return false,
        };
        self.transition(next)
    }

    /// Report that the running animation finished. Returns true if the state changed.
    pub fn animation_end(&mut self) -> bool {
        match self.state {
            PresenceState::Entering => self.transition(PresenceState::Present),
            PresenceState::Exiting => self.transition(PresenceState::Unmounted),
            PresenceState::Unmounted | PresenceState::Present => false,
        }
    }

    fn transition(&mut self, next: PresenceState) -> bool {
        tracing::debug!(from = ?self.state, to = ?next, "presence transition");
        self.state = next;
        true
    }

    /// Drive this machine from `element`'s animation-end events.
    ///
    /// The returned handle writes `data-state` on every change and invokes
    /// `on_change` after the transition.
    pub fn bind(
        self,
        dom: &Dom,
        element: ElementId,
        on_change: Option<Rc<dyn Fn(PresenceState)>>,
    ) -> BoundPresence {
        let bound = BoundPresence {
            inner: Rc::new(RefCell::new(Bound {
                presence: self,
                dom: dom.clone(),
                element,
                on_change,
                listeners: ListenerGroup::new(dom),
            })),
        };
        {
            let mut inner = bound.inner.borrow_mut();
            let weak = Rc::downgrade(&bound.inner);
            inner.listeners.listen(
                element,
                EventType::AnimationEnd,
                ListenerOptions::BUBBLE,
                move |event| {
                    // Animations of descendants bubble here too; only ours count.
                    if event.target() != element {
                        return;
                    }
                    if let Some(inner) = weak.upgrade() {
                        BoundPresence { inner }.animation_end();
                    }
                },
            );
            dom.set_attribute(element, "data-state", inner.presence.data_state());
        }
        bound
    }
}

struct Bound {
    presence: Presence,
    dom: Dom,
    element: ElementId,
    on_change: Option<Rc<dyn Fn(PresenceState)>>,
    listeners: ListenerGroup,
}

impl core::fmt::Debug for Bound {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Bound")
            .field("presence", &self.presence)
            .field("element", &self.element)
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}

/// A [`Presence`] bound to an element. Clones share the same machine.
#[derive(Clone, Debug)]
pub struct BoundPresence {
    inner: Rc<RefCell<Bound>>,
}

impl BoundPresence {
    /// Current state.
    pub fn state(&self) -> PresenceState {
        self.inner.borrow().presence.state()
    }

    /// Returns true while the content should be rendered.
    pub fn is_mounted(&self) -> bool {
        self.inner.borrow().presence.is_mounted()
    }

    /// `"open"` or `"closed"`.
    pub fn data_state(&self) -> &'static str {
        self.inner.borrow().presence.data_state()
    }

    /// Show or hide.
    pub fn set_present(&self, present: bool) -> bool {
        self.apply(|p| p.set_present(present))
    }

    /// Report that the running animation finished.
    pub fn animation_end(&self) -> bool {
        self.apply(Presence::animation_end)
    }

    /// Stop listening for animation-end events.
    pub fn unbind(&self) {
        self.inner.borrow_mut().listeners.clear();
    }

    fn apply(&self, f: impl FnOnce(&mut Presence) -> bool) -> bool {
        let (state, callback) = {
            let mut inner = self.inner.borrow_mut();
            if !f(&mut inner.presence) {
                return false;
            }
            let data_state = inner.presence.data_state();
            inner.dom.set_attribute(inner.element, "data-state", data_state);
            (inner.presence.state(), inner.on_change.clone())
        };
        if let Some(cb) = callback {
            cb(state);
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Size;

    fn animated() -> Presence {
        Presence::new(PresenceOptions {
            animated: true,
            ..Default::default()
        })
    }

    #[test]
    fn full_animated_cycle() {
        let mut p = animated();
        assert!(p.set_present(true));
        assert!(!p.set_present(true));
        assert_eq!(p.state(), PresenceState::Entering);
        assert_eq!(p.data_state(), "open");
        assert!(p.animation_end());
        assert!(!p.animation_end());
        assert!(p.set_present(false));
        assert_eq!(p.state(), PresenceState::Exiting);
        assert!(p.animation_end());
        assert_eq!(p.state(), PresenceState::Unmounted);
    }

    #[test]
    fn reopening_during_exit_re_enters() {
        let mut p = animated();
        p.set_present(true);
        p.animation_end();
        p.set_present(false);
        assert!(p.set_present(true));
        assert_eq!(p.state(), PresenceState::Entering);
    }

    #[test]
    fn no_animation_or_reduced_motion_skips_transitions() {
        let mut plain = Presence::new(PresenceOptions::default());
        plain.set_present(true);
        assert_eq!(plain.state(), PresenceState::Present);
        plain.set_present(false);
        assert_eq!(plain.state(), PresenceState::Unmounted);

        let dom = Dom::new(Size::new(10.0, 10.0));
        dom.set_prefers_reduced_motion(true);
        let mut reduced = Presence::from_document(
            &dom,
            PresenceOptions {
                animated: true,
                present: true,
                ..Default::default()
            },
        );
        assert_eq!(reduced.state(), PresenceState::Present);
        reduced.set_present(false);
        assert!(!reduced.is_mounted());
    }

    #[test]
    fn bound_presence_follows_animation_events() {
        let dom = Dom::new(Size::new(100.0, 100.0));
        let el = dom.create_element("div").unwrap();
        dom.append_child(dom.body().unwrap(), el);
        let child = dom.create_element("span").unwrap();
        dom.append_child(el, child);

        let seen = Rc::new(RefCell::new(Vec::new()));
        let log = seen.clone();
        let bound = animated().bind(&dom, el, Some(Rc::new(move |s| log.borrow_mut().push(s))));
        assert_eq!(dom.attribute(el, "data-state").as_deref(), Some("closed"));

        bound.set_present(true);
        assert_eq!(dom.attribute(el, "data-state").as_deref(), Some("open"));
        dom.animation_end(child);
        assert_eq!(bound.state(), PresenceState::Entering, "descendant animations ignored");
        dom.animation_end(el);
        assert_eq!(bound.state(), PresenceState::Present);

        bound.set_present(false);
        dom.animation_end(el);
        assert!(!bound.is_mounted());
        assert_eq!(
            *seen.borrow(),
            vec![
                PresenceState::Entering,
                PresenceState::Present,
                PresenceState::Exiting,
                PresenceState::Unmounted
            ]
        );

        bound.unbind();
        assert_eq!(dom.listener_count(), 0);
    }
}
