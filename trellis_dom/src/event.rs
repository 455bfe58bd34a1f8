// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Event payloads and the mutable [`Event`] passed to listeners.

use kurbo::Point;

use crate::dispatch::Phase;
use crate::types::ElementId;

/// Logical key values the primitives react to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    /// `Tab`.
    Tab,
    /// `Enter`.
    Enter,
    /// `Escape`.
    Escape,
    /// The space bar.
    Space,
    /// `ArrowUp`.
    ArrowUp,
    /// `ArrowDown`.
    ArrowDown,
    /// `ArrowLeft`.
    ArrowLeft,
    /// `ArrowRight`.
    ArrowRight,
    /// `Home`.
    Home,
    /// `End`.
    End,
    /// `PageUp`.
    PageUp,
    /// `PageDown`.
    PageDown,
    /// `Backspace`.
    Backspace,
    /// `Delete`.
    Delete,
    /// A printable character.
    Character(char),
}

bitflags::bitflags! {
    /// Modifier keys held during a keyboard event.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        /// Shift.
        const SHIFT = 0b0001;
        /// Control.
        const CTRL  = 0b0010;
        /// Alt / Option.
        const ALT   = 0b0100;
        /// Meta / Command.
        const META  = 0b1000;
    }
}

/// A key press.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct KeyboardEvent {
    /// Logical key.
    pub key: Key,
    /// Held modifiers.
    pub modifiers: Modifiers,
    /// Event timestamp in milliseconds.
    pub timestamp: u64,
}

impl KeyboardEvent {
    /// A key press with no modifiers at time zero.
    pub fn new(key: Key) -> Self {
        Self {
            key,
            modifiers: Modifiers::empty(),
            timestamp: 0,
        }
    }

    /// A key press with Shift held.
    pub fn shifted(key: Key) -> Self {
        Self {
            modifiers: Modifiers::SHIFT,
            ..Self::new(key)
        }
    }

    /// Set the timestamp.
    pub fn at(mut self, timestamp: u64) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Returns true if Shift is held.
    pub fn shift(&self) -> bool {
        self.modifiers.contains(Modifiers::SHIFT)
    }

    /// Returns true if any of Ctrl, Alt, or Meta is held.
    pub fn has_command_modifier(&self) -> bool {
        self.modifiers
            .intersects(Modifiers::CTRL | Modifiers::ALT | Modifiers::META)
    }
}

/// Pointer event payload.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PointerEvent {
    /// Position in viewport coordinates.
    pub position: Point,
    /// Pointer identifier (mouse is typically 1).
    pub pointer_id: u64,
    /// Button index (0 is primary).
    pub button: u8,
}

impl PointerEvent {
    /// A primary-button event for pointer 1 at `position`.
    pub fn at(position: Point) -> Self {
        Self {
            position,
            pointer_id: 1,
            button: 0,
        }
    }
}

/// Listener key: which kind of event a listener wants.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum EventType {
    /// Key pressed.
    KeyDown,
    /// Pointer pressed.
    PointerDown,
    /// Pointer moved.
    PointerMove,
    /// Pointer released.
    PointerUp,
    /// An element (or descendant) gained focus.
    FocusIn,
    /// An element (or descendant) lost focus.
    FocusOut,
    /// A scroll container scrolled.
    Scroll,
    /// The viewport was resized.
    Resize,
    /// A CSS animation finished.
    AnimationEnd,
    /// Children were added to or removed from an element.
    ChildListChange,
}

impl EventType {
    /// Whether events of this type run a bubble phase.
    pub fn bubbles(self) -> bool {
        !matches!(self, Self::Scroll | Self::Resize)
    }
}

/// Event-specific payload.
#[derive(Clone, Debug, PartialEq)]
pub enum EventKind {
    /// Key pressed.
    KeyDown(KeyboardEvent),
    /// Pointer pressed.
    PointerDown(PointerEvent),
    /// Pointer moved.
    PointerMove(PointerEvent),
    /// Pointer released.
    PointerUp(PointerEvent),
    /// Focus gained; `related` lost it.
    FocusIn {
        /// The element losing focus.
        related: Option<ElementId>,
    },
    /// Focus lost; `related` gains it.
    FocusOut {
        /// The element gaining focus.
        related: Option<ElementId>,
    },
    /// A scroll container scrolled.
    Scroll,
    /// The viewport was resized.
    Resize,
    /// A CSS animation finished.
    AnimationEnd,
    /// Children were added to or removed from the target.
    ChildListChange,
}

impl EventKind {
    /// The listener key for this payload.
    pub fn event_type(&self) -> EventType {
        match self {
            Self::KeyDown(_) => EventType::KeyDown,
            Self::PointerDown(_) => EventType::PointerDown,
            Self::PointerMove(_) => EventType::PointerMove,
            Self::PointerUp(_) => EventType::PointerUp,
            Self::FocusIn { .. } => EventType::FocusIn,
            Self::FocusOut { .. } => EventType::FocusOut,
            Self::Scroll => EventType::Scroll,
            Self::Resize => EventType::Resize,
            Self::AnimationEnd => EventType::AnimationEnd,
            Self::ChildListChange => EventType::ChildListChange,
        }
    }
}

/// An event in flight.
///
/// Listeners receive `&mut Event` and may cancel the default action or stop
/// propagation. After dispatch the caller can inspect [`Event::default_prevented`].
#[derive(Clone, Debug)]
pub struct Event {
    kind: EventKind,
    target: ElementId,
    pub(crate) current_target: ElementId,
    pub(crate) phase: Phase,
    default_prevented: bool,
    pub(crate) propagation_stopped: bool,
    pub(crate) immediate_stopped: bool,
}

impl Event {
    /// A fresh event aimed at `target`.
    pub fn new(kind: EventKind, target: ElementId) -> Self {
        Self {
            kind,
            target,
            current_target: target,
            phase: Phase::Target,
            default_prevented: false,
            propagation_stopped: false,
            immediate_stopped: false,
        }
    }

    /// The payload.
    pub fn kind(&self) -> &EventKind {
        &self.kind
    }

    /// The listener key.
    pub fn event_type(&self) -> EventType {
        self.kind.event_type()
    }

    /// The element the event was dispatched at.
    pub fn target(&self) -> ElementId {
        self.target
    }

    /// The element whose listener is currently running.
    pub fn current_target(&self) -> ElementId {
        self.current_target
    }

    /// The propagation phase of the running listener.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Keyboard payload, if this is a key event.
    pub fn keyboard(&self) -> Option<&KeyboardEvent> {
        match &self.kind {
            EventKind::KeyDown(k) => Some(k),
            _ => None,
        }
    }

    /// Pointer payload, if this is a pointer event.
    pub fn pointer(&self) -> Option<&PointerEvent> {
        match &self.kind {
            EventKind::PointerDown(p) | EventKind::PointerMove(p) | EventKind::PointerUp(p) => {
                Some(p)
            }
            _ => None,
        }
    }

    /// Cancel the default action (for example Tab focus movement).
    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    /// Whether a listener cancelled the default action.
    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }

    /// Stop after the listeners on the current element finish.
    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    /// Stop immediately; later listeners on the current element do not run either.
    pub fn stop_immediate_propagation(&mut self) {
        self.propagation_stopped = true;
        self.immediate_stopped = true;
    }

    /// Whether propagation was stopped.
    pub fn propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }
}
