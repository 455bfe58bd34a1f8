// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Slider: map pointer positions and keys to a stepped value on a track.

use core::cell::RefCell;
use std::rc::Rc;

use kurbo::{Point, Rect};
use trellis_dom::{
    ConfigError, Dom, ElementId, EventType, Key, KeyboardEvent, ListenerGroup, ListenerOptions,
    Orientation, TextDirection,
};

use crate::decimal::NumericRange;
use crate::props::{OnValueChange, Props, bool_attr};

/// Configuration for [`Slider`].
#[derive(Clone)]
pub struct SliderConfig {
    /// Lower bound; must be finite.
    pub min: f64,
    /// Upper bound; must be finite.
    pub max: f64,
    /// Values snap to multiples of `step` counted from `min`.
    pub step: f64,
    /// Fractional digits kept; `None` uses the digits of `step`.
    pub precision: Option<u32>,
    /// Initial value; `None` starts at `min`.
    pub default_value: Option<f64>,
    /// Track axis. `Both` is treated as horizontal.
    pub orientation: Orientation,
    /// Horizontal tracks run right to left under RTL.
    pub direction: TextDirection,
    /// Mirror the track so `max` sits at the start.
    pub inverted: bool,
    /// Steps taken by PageUp and PageDown.
    pub page_steps: f64,
    /// Ignore input while set.
    pub disabled: bool,
    /// Called after every value change, including during drags.
    pub on_value_change: Option<OnValueChange<f64>>,
    /// Called when an interaction ends: pointer release, a key press, or [`Slider::commit`].
    pub on_value_commit: Option<OnValueChange<f64>>,
}

impl Default for SliderConfig {
    fn default() -> Self {
        Self {
            min: 0.0,
            max: 100.0,
            step: 1.0,
            precision: None,
            default_value: None,
            orientation: Orientation::Horizontal,
            direction: TextDirection::Ltr,
            inverted: false,
            page_steps: 10.0,
            disabled: false,
            on_value_change: None,
            on_value_commit: None,
        }
    }
}

impl core::fmt::Debug for SliderConfig {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SliderConfig")
            .field("min", &self.min)
            .field("max", &self.max)
            .field("step", &self.step)
            .field("precision", &self.precision)
            .field("default_value", &self.default_value)
            .field("orientation", &self.orientation)
            .field("direction", &self.direction)
            .field("inverted", &self.inverted)
            .field("page_steps", &self.page_steps)
            .field("disabled", &self.disabled)
            .field("on_value_change", &self.on_value_change.is_some())
            .field("on_value_commit", &self.on_value_commit.is_some())
            .finish()
    }
}

/// Snapshot of a [`Slider`].
#[derive(Clone, Debug, PartialEq)]
pub struct SliderState {
    /// Current value.
    pub value: f64,
    /// Text form of the value (or pending text from [`Slider::handle_input`]).
    pub input_value: String,
    /// Whether a pointer is dragging the thumb.
    pub dragging: bool,
    /// Whether input is ignored.
    pub disabled: bool,
}

struct Inner {
    range: NumericRange,
    vertical: bool,
    mirrored: bool,
    direction: TextDirection,
    inverted: bool,
    page_steps: f64,
    state: SliderState,
    dirty: bool,
    drag_pointer: Option<u64>,
    on_value_change: Option<OnValueChange<f64>>,
    on_value_commit: Option<OnValueChange<f64>>,
    listeners: Option<ListenerGroup>,
}

impl core::fmt::Debug for Inner {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Inner")
            .field("range", &self.range)
            .field("vertical", &self.vertical)
            .field("mirrored", &self.mirrored)
            .field("state", &self.state)
            .field("drag_pointer", &self.drag_pointer)
            .finish_non_exhaustive()
    }
}

impl Inner {
    fn text(&self, value: f64) -> String {
        format!("{value:.prec$}", prec = self.range.precision() as usize)
    }
}

/// A slider behavior.
///
/// Pointer positions map linearly onto `[min, max]` along the track rect:
/// left to right for horizontal tracks (mirrored under RTL), bottom to top for
/// vertical ones, with `inverted` flipping either. Values snap to the step
/// grid. One pointer drags at a time; moves from other pointers are ignored.
///
/// ```rust
/// use kurbo::{Point, Rect};
/// use trellis_behaviors::{Slider, SliderConfig};
///
/// let slider = Slider::new(SliderConfig { step: 5.0, ..Default::default() }).unwrap();
/// let track = Rect::new(0.0, 0.0, 200.0, 10.0);
///
/// slider.pointer_down(1, Point::new(49.0, 5.0), track);
/// assert_eq!(slider.value(), 25.0);
/// slider.pointer_move(1, Point::new(151.0, 5.0), track);
/// slider.pointer_up(1);
/// assert_eq!(slider.value(), 75.0);
/// ```
#[derive(Clone, Debug)]
pub struct Slider {
    inner: Rc<RefCell<Inner>>,
}

impl Slider {
    /// Validate the configuration and build the behavior.
    pub fn new(config: SliderConfig) -> Result<Self, ConfigError> {
        if !config.min.is_finite() || !config.max.is_finite() {
            return Err(ConfigError::InvalidRange {
                min: config.min,
                max: config.max,
            });
        }
        let range = NumericRange::new(config.min, config.max, config.step, config.precision)?;
        let value = range.snap(config.default_value.unwrap_or(config.min));
        let vertical = config.orientation == Orientation::Vertical;
        let mut inner = Inner {
            range,
            vertical,
            mirrored: false,
            direction: config.direction,
            inverted: config.inverted,
            page_steps: config.page_steps,
            state: SliderState {
                value,
                input_value: String::new(),
                dragging: false,
                disabled: config.disabled,
            },
            dirty: false,
            drag_pointer: None,
            on_value_change: config.on_value_change,
            on_value_commit: config.on_value_commit,
            listeners: None,
        };
        inner.mirrored = if vertical {
            config.inverted
        } else {
            (config.direction == TextDirection::Rtl) != config.inverted
        };
        inner.state.input_value = inner.text(value);
        Ok(Self {
            inner: Rc::new(RefCell::new(inner)),
        })
    }

    /// Current snapshot.
    pub fn state(&self) -> SliderState {
        self.inner.borrow().state.clone()
    }

    /// Current value.
    pub fn value(&self) -> f64 {
        self.inner.borrow().state.value
    }

    /// The value a pointer at `point` selects on `track`, snapped to the step grid.
    pub fn value_from_point(&self, track: Rect, point: Point) -> f64 {
        let inner = self.inner.borrow();
        let (offset, length) = if inner.vertical {
            (track.y1 - point.y, track.height())
        } else {
            (point.x - track.x0, track.width())
        };
        let mut ratio = if length > 0.0 {
            (offset / length).clamp(0.0, 1.0)
        } else {
            0.0
        };
        if inner.mirrored {
            ratio = 1.0 - ratio;
        }
        let range = inner.range;
        range.snap(range.min() + ratio * (range.max() - range.min()))
    }

    /// Fraction of the track the current value covers, from `min` at 0.0 to `max` at 1.0.
    pub fn percent(&self) -> f64 {
        let inner = self.inner.borrow();
        let span = inner.range.max() - inner.range.min();
        if span > 0.0 {
            (inner.state.value - inner.range.min()) / span
        } else {
            0.0
        }
    }

    /// Start a drag with `pointer_id` and jump to the pointer. Returns false if ignored.
    pub fn pointer_down(&self, pointer_id: u64, point: Point, track: Rect) -> bool {
        {
            let mut inner = self.inner.borrow_mut();
            if inner.state.disabled || inner.drag_pointer.is_some() {
                return false;
            }
            inner.drag_pointer = Some(pointer_id);
            inner.state.dragging = true;
        }
        tracing::trace!(pointer_id, "slider drag started");
        let value = self.value_from_point(track, point);
        self.apply(value);
        true
    }

    /// Follow the dragging pointer. Other pointers are ignored.
    pub fn pointer_move(&self, pointer_id: u64, point: Point, track: Rect) -> bool {
        if self.inner.borrow().drag_pointer != Some(pointer_id) {
            return false;
        }
        let value = self.value_from_point(track, point);
        self.apply(value);
        true
    }

    /// End the drag for `pointer_id` and report the committed value.
    pub fn pointer_up(&self, pointer_id: u64) -> bool {
        {
            let mut inner = self.inner.borrow_mut();
            if inner.drag_pointer != Some(pointer_id) {
                return false;
            }
            inner.drag_pointer = None;
            inner.state.dragging = false;
        }
        tracing::trace!(pointer_id, "slider drag ended");
        self.emit_commit();
        true
    }

    /// Step up once.
    pub fn increment(&self) {
        self.step(1.0);
    }

    /// Step down once.
    pub fn decrement(&self) {
        self.step(-1.0);
    }

    /// Move by `steps` steps from the current value.
    pub fn step(&self, steps: f64) {
        let next = {
            let inner = self.inner.borrow();
            if inner.state.disabled {
                return;
            }
            inner.range.step_by(inner.state.value, steps)
        };
        self.apply(next);
    }

    /// Set the value programmatically; it is snapped and clamped.
    pub fn set_value(&self, value: f64) {
        self.apply(value);
    }

    /// Store text from a linked field without applying it.
    pub fn handle_input(&self, raw: &str) {
        let mut inner = self.inner.borrow_mut();
        inner.state.input_value = raw.to_owned();
        inner.dirty = true;
    }

    /// Apply pending text (if it parses) and report the committed value.
    pub fn commit(&self) {
        let pending = {
            let mut inner = self.inner.borrow_mut();
            if !inner.dirty {
                None
            } else {
                inner.dirty = false;
                let parsed = inner
                    .state
                    .input_value
                    .trim()
                    .parse::<f64>()
                    .ok()
                    .filter(|v| v.is_finite());
                if parsed.is_none() {
                    inner.state.input_value = inner.text(inner.state.value);
                }
                parsed
            }
        };
        if let Some(value) = pending {
            self.apply(value);
        }
        self.emit_commit();
    }

    /// Handle a key press. Returns true if the key was consumed.
    ///
    /// ArrowRight/ArrowUp increase and ArrowLeft/ArrowDown decrease (horizontal
    /// arrows swap under RTL, all arrows swap when inverted); PageUp/PageDown
    /// take `page_steps` steps; Home/End jump to the bounds.
    pub fn handle_key(&self, key: &KeyboardEvent) -> bool {
        let (range, page, rtl, inverted) = {
            let inner = self.inner.borrow();
            if inner.state.disabled || key.has_command_modifier() {
                return false;
            }
            (
                inner.range,
                inner.page_steps,
                inner.direction == TextDirection::Rtl && !inner.vertical,
                inner.inverted,
            )
        };
        let flip = |up: bool| if inverted { !up } else { up };
        let delta = match key.key {
            Key::ArrowUp => Some(if flip(true) { 1.0 } else { -1.0 }),
            Key::ArrowDown => Some(if flip(false) { 1.0 } else { -1.0 }),
            Key::ArrowRight => Some(if flip(!rtl) { 1.0 } else { -1.0 }),
            Key::ArrowLeft => Some(if flip(rtl) { 1.0 } else { -1.0 }),
            Key::PageUp => Some(page),
            Key::PageDown => Some(-page),
            Key::Home => {
                self.apply(range.min());
                None
            }
            Key::End => {
                self.apply(range.max());
                None
            }
            _ => return false,
        };
        if let Some(steps) = delta {
            self.step(steps);
        }
        self.emit_commit();
        true
    }

    /// Enable or disable input. Disabling ends a drag in progress.
    pub fn set_disabled(&self, disabled: bool) {
        let mut inner = self.inner.borrow_mut();
        inner.state.disabled = disabled;
        if disabled {
            inner.drag_pointer = None;
            inner.state.dragging = false;
        }
    }

    /// Attributes for the thumb.
    pub fn thumb_props(&self) -> Props {
        let inner = self.inner.borrow();
        let orientation = if inner.vertical { "vertical" } else { "horizontal" };
        Props::new()
            .with("role", "slider")
            .with("tabindex", if inner.state.disabled { "-1" } else { "0" })
            .with("aria-valuemin", inner.range.min().to_string())
            .with("aria-valuemax", inner.range.max().to_string())
            .with("aria-valuenow", inner.state.value.to_string())
            .with("aria-valuetext", inner.text(inner.state.value))
            .with("aria-orientation", orientation)
            .with("aria-disabled", bool_attr(inner.state.disabled))
            .with("data-orientation", orientation)
            .with_opt("data-dragging", inner.state.dragging.then_some(""))
    }

    /// Drive this slider from the document.
    ///
    /// Pointer presses on `track` start a drag (the track's current box is the
    /// mapping rect); moves and releases anywhere in the document continue and
    /// end it; key presses on `thumb` go through [`handle_key`](Self::handle_key).
    /// Replaces an earlier attachment.
    pub fn attach(&self, dom: &Dom, track: ElementId, thumb: ElementId) {
        let Some(root) = dom.root() else {
            return;
        };
        let mut group = ListenerGroup::new(dom);
        let track_rect = {
            let dom = dom.downgrade();
            move || {
                dom.upgrade()
                    .and_then(|d| d.read(|doc| doc.rect(track)).flatten())
                    .unwrap_or_default()
            }
        };

        let weak = Rc::downgrade(&self.inner);
        let rect = track_rect.clone();
        group.listen(track, EventType::PointerDown, ListenerOptions::BUBBLE, move |event| {
            let (Some(inner), Some(p)) = (weak.upgrade(), event.pointer().copied()) else {
                return;
            };
            if p.button == 0 && (Self { inner }).pointer_down(p.pointer_id, p.position, rect()) {
                event.prevent_default();
            }
        });
        let weak = Rc::downgrade(&self.inner);
        group.listen(root, EventType::PointerMove, ListenerOptions::BUBBLE, move |event| {
            if let (Some(inner), Some(p)) = (weak.upgrade(), event.pointer().copied()) {
                Self { inner }.pointer_move(p.pointer_id, p.position, track_rect());
            }
        });
        let weak = Rc::downgrade(&self.inner);
        group.listen(root, EventType::PointerUp, ListenerOptions::BUBBLE, move |event| {
            if let (Some(inner), Some(p)) = (weak.upgrade(), event.pointer().copied()) {
                Self { inner }.pointer_up(p.pointer_id);
            }
        });
        let weak = Rc::downgrade(&self.inner);
        group.listen(thumb, EventType::KeyDown, ListenerOptions::BUBBLE, move |event| {
            let (Some(inner), Some(key)) = (weak.upgrade(), event.keyboard().copied()) else {
                return;
            };
            if (Self { inner }).handle_key(&key) {
                event.prevent_default();
            }
        });
        self.inner.borrow_mut().listeners = Some(group);
    }

    /// Remove the listeners installed by [`attach`](Self::attach).
    pub fn detach(&self) {
        self.inner.borrow_mut().listeners = None;
    }

    fn apply(&self, value: f64) {
        let (value, emit) = {
            let mut inner = self.inner.borrow_mut();
            let value = inner.range.snap(value);
            inner.state.input_value = inner.text(value);
            inner.dirty = false;
            if inner.state.value == value {
                return;
            }
            inner.state.value = value;
            (value, inner.on_value_change.clone())
        };
        if let Some(cb) = emit {
            cb(value);
        }
    }

    fn emit_commit(&self) {
        let (value, cb) = {
            let inner = self.inner.borrow();
            (inner.state.value, inner.on_value_commit.clone())
        };
        tracing::debug!(value, "slider committed");
        if let Some(cb) = cb {
            cb(value);
        }
    }
}
