// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Number input: a text field editing a clamped, stepped, formatted number.

use core::cell::RefCell;
use std::rc::Rc;

use trellis_dom::{
    ConfigError, Dom, ElementId, EventType, Key, KeyboardEvent, ListenerGroup, ListenerOptions,
};

use crate::decimal::NumericRange;
use crate::format::{Locale, NumberFormat};
use crate::props::{OnValueChange, Props, bool_attr};

/// Multiplier applied to `step` by PageUp and PageDown.
pub const PAGE_STEPS: f64 = 10.0;

/// Configuration for [`NumberInput`].
#[derive(Clone)]
pub struct NumberInputConfig {
    /// Lower bound; may be infinite.
    pub min: f64,
    /// Upper bound; may be infinite.
    pub max: f64,
    /// Increment for arrows and [`NumberInput::increment`].
    pub step: f64,
    /// Fractional digits kept; `None` uses the digits of `step`.
    pub precision: Option<u32>,
    /// Initial value.
    pub default_value: Option<f64>,
    /// How committed values are displayed.
    pub format: NumberFormat,
    /// Locale used for display and parsing.
    pub locale: Locale,
    /// Ignore edits while set.
    pub disabled: bool,
    /// Called after the committed value changes.
    pub on_value_change: Option<OnValueChange<Option<f64>>>,
}

impl Default for NumberInputConfig {
    fn default() -> Self {
        Self {
            min: f64::NEG_INFINITY,
            max: f64::INFINITY,
            step: 1.0,
            precision: None,
            default_value: None,
            format: NumberFormat::Decimal,
            locale: Locale::EnUs,
            disabled: false,
            on_value_change: None,
        }
    }
}

impl core::fmt::Debug for NumberInputConfig {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("NumberInputConfig")
            .field("min", &self.min)
            .field("max", &self.max)
            .field("step", &self.step)
            .field("precision", &self.precision)
            .field("default_value", &self.default_value)
            .field("format", &self.format)
            .field("locale", &self.locale)
            .field("disabled", &self.disabled)
            .field("on_value_change", &self.on_value_change.is_some())
            .finish()
    }
}

/// Snapshot of a [`NumberInput`].
#[derive(Clone, Debug, PartialEq)]
pub struct NumberInputState {
    /// The committed value; `None` when the field is empty.
    pub value: Option<f64>,
    /// The text shown in the field.
    pub input_value: String,
    /// Whether edits are ignored.
    pub disabled: bool,
}

struct Inner {
    range: NumericRange,
    format: NumberFormat,
    locale: Locale,
    state: NumberInputState,
    dirty: bool,
    on_value_change: Option<OnValueChange<Option<f64>>>,
    listeners: Option<ListenerGroup>,
}

impl core::fmt::Debug for Inner {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Inner")
            .field("range", &self.range)
            .field("format", &self.format)
            .field("state", &self.state)
            .field("dirty", &self.dirty)
            .finish_non_exhaustive()
    }
}

impl Inner {
    fn display(&self, value: Option<f64>) -> String {
        value.map_or_else(String::new, |v| {
            self.format.format(v, self.range.precision(), self.locale)
        })
    }

    /// The value stepping starts from: pending text if it parses, else the committed value.
    fn base(&self) -> Option<f64> {
        if self.dirty {
            self.format
                .parse(&self.state.input_value, self.locale)
                .or(self.state.value)
        } else {
            self.state.value
        }
    }
}

/// A number input behavior.
///
/// Typing goes through [`handle_input`](Self::handle_input), which only
/// stores the text. [`commit`](Self::commit) (Enter or blur) parses it,
/// rounds to the configured precision, clamps into the bounds, reformats the
/// field, and reports the value if it changed. Text that does not parse
/// restores the last committed value silently; an empty field clears it.
///
/// ```rust
/// use trellis_behaviors::{NumberFormat, NumberInput, NumberInputConfig};
///
/// let input = NumberInput::new(NumberInputConfig {
///     min: 0.0,
///     max: 1.0,
///     step: 0.01,
///     format: NumberFormat::Percent,
///     ..Default::default()
/// })
/// .unwrap();
///
/// input.handle_input("42");
/// assert_eq!(input.value(), None);
/// input.commit();
/// assert_eq!(input.value(), Some(0.42));
/// assert_eq!(input.state().input_value, "42%");
///
/// input.handle_input("250%");
/// input.commit();
/// assert_eq!(input.value(), Some(1.0));
/// ```
#[derive(Clone, Debug)]
pub struct NumberInput {
    inner: Rc<RefCell<Inner>>,
}

impl NumberInput {
    /// Validate the configuration and build the behavior.
    pub fn new(config: NumberInputConfig) -> Result<Self, ConfigError> {
        let range = NumericRange::new(config.min, config.max, config.step, config.precision)?;
        let value = config.default_value.map(|v| range.normalize(v));
        let mut inner = Inner {
            range,
            format: config.format,
            locale: config.locale,
            state: NumberInputState {
                value,
                input_value: String::new(),
                disabled: config.disabled,
            },
            dirty: false,
            on_value_change: config.on_value_change,
            listeners: None,
        };
        inner.state.input_value = inner.display(value);
        Ok(Self {
            inner: Rc::new(RefCell::new(inner)),
        })
    }

    /// Current snapshot.
    pub fn state(&self) -> NumberInputState {
        self.inner.borrow().state.clone()
    }

    /// The committed value.
    pub fn value(&self) -> Option<f64> {
        self.inner.borrow().state.value
    }

    /// The validated bounds, step and precision.
    pub fn range(&self) -> NumericRange {
        self.inner.borrow().range
    }

    /// Set the value programmatically. It is rounded and clamped like a commit.
    pub fn set_value(&self, value: Option<f64>) {
        self.apply(value);
    }

    /// Step up once.
    pub fn increment(&self) {
        self.step(1.0);
    }

    /// Step down once.
    pub fn decrement(&self) {
        self.step(-1.0);
    }

    /// Step by `steps` steps; negative moves down.
    ///
    /// An empty field starts from zero clamped into the bounds.
    pub fn step(&self, steps: f64) {
        let next = {
            let inner = self.inner.borrow();
            if inner.state.disabled {
                return;
            }
            match inner.base() {
                Some(v) => inner.range.step_by(v, steps),
                None => inner.range.clamp(0.0),
            }
        };
        self.apply(Some(next));
    }

    /// Jump to the lower bound if it is finite.
    pub fn to_min(&self) {
        self.jump(NumericRange::min);
    }

    /// Jump to the upper bound if it is finite.
    pub fn to_max(&self) {
        self.jump(NumericRange::max);
    }

    fn jump(&self, bound: fn(&NumericRange) -> f64) {
        let target = {
            let inner = self.inner.borrow();
            if inner.state.disabled {
                return;
            }
            bound(&inner.range)
        };
        if target.is_finite() {
            self.apply(Some(target));
        }
    }

    /// Store raw text while the user types. Nothing is parsed or reported.
    pub fn handle_input(&self, raw: &str) {
        let mut inner = self.inner.borrow_mut();
        if inner.state.disabled {
            return;
        }
        inner.state.input_value = raw.to_owned();
        inner.dirty = true;
    }

    /// Parse the field text and commit it.
    pub fn commit(&self) {
        let parsed = {
            let mut inner = self.inner.borrow_mut();
            let raw = inner.state.input_value.trim();
            if raw.is_empty() {
                Ok(None)
            } else {
                match inner.format.parse(raw, inner.locale) {
                    Some(v) => Ok(Some(v)),
                    None => {
                        tracing::debug!(raw, "number input: unparseable text restored");
                        inner.state.input_value = inner.display(inner.state.value);
                        inner.dirty = false;
                        Err(())
                    }
                }
            }
        };
        if let Ok(value) = parsed {
            self.apply(value);
        }
    }

    /// Handle a key press. Returns true if the key was consumed.
    ///
    /// ArrowUp/ArrowDown step, PageUp/PageDown step ten times, Home/End jump
    /// to finite bounds, and Enter commits.
    pub fn handle_key(&self, key: &KeyboardEvent) -> bool {
        if key.has_command_modifier() || self.inner.borrow().state.disabled {
            return false;
        }
        match key.key {
            Key::ArrowUp => self.step(1.0),
            Key::ArrowDown => self.step(-1.0),
            Key::PageUp => self.step(PAGE_STEPS),
            Key::PageDown => self.step(-PAGE_STEPS),
            Key::Home => self.to_min(),
            Key::End => self.to_max(),
            Key::Enter => self.commit(),
            _ => return false,
        }
        true
    }

    /// Replace the bounds. The current value is clamped into them.
    pub fn set_bounds(&self, min: f64, max: f64) -> Result<(), ConfigError> {
        let value = {
            let mut inner = self.inner.borrow_mut();
            inner.range = inner.range.with_bounds(min, max)?;
            inner.state.value
        };
        if value.is_some() {
            self.apply(value);
        }
        Ok(())
    }

    /// Enable or disable editing.
    pub fn set_disabled(&self, disabled: bool) {
        self.inner.borrow_mut().state.disabled = disabled;
    }

    /// Attributes for the text field.
    pub fn input_props(&self) -> Props {
        let inner = self.inner.borrow();
        let range = inner.range;
        let finite = |v: f64| v.is_finite().then(|| v.to_string());
        Props::new()
            .with("role", "spinbutton")
            .with("inputmode", if range.precision() == 0 { "numeric" } else { "decimal" })
            .with("autocomplete", "off")
            .with("value", inner.state.input_value.clone())
            .with_opt("aria-valuemin", finite(range.min()))
            .with_opt("aria-valuemax", finite(range.max()))
            .with_opt("aria-valuenow", inner.state.value.map(|v| v.to_string()))
            .with_opt(
                "aria-valuetext",
                inner.state.value.map(|_| inner.state.input_value.clone()),
            )
            .with("aria-disabled", bool_attr(inner.state.disabled))
    }

    /// Drive this behavior from `input`'s key presses and commit when it loses focus.
    ///
    /// Replaces an earlier attachment.
    pub fn attach(&self, dom: &Dom, input: ElementId) {
        let mut group = ListenerGroup::new(dom);
        let weak = Rc::downgrade(&self.inner);
        group.listen(input, EventType::KeyDown, ListenerOptions::BUBBLE, move |event| {
            let (Some(inner), Some(key)) = (weak.upgrade(), event.keyboard().copied()) else {
                return;
            };
            if (Self { inner }).handle_key(&key) {
                event.prevent_default();
            }
        });
        let weak = Rc::downgrade(&self.inner);
        group.listen(input, EventType::FocusOut, ListenerOptions::BUBBLE, move |_| {
            if let Some(inner) = weak.upgrade() {
                Self { inner }.commit();
            }
        });
        self.inner.borrow_mut().listeners = Some(group);
    }

    /// Remove the listeners installed by [`attach`](Self::attach).
    pub fn detach(&self) {
        self.inner.borrow_mut().listeners = None;
    }

    fn apply(&self, next: Option<f64>) {
        let (value, emit) = {
            let mut inner = self.inner.borrow_mut();
            let next = next.map(|v| inner.range.normalize(v));
            inner.state.input_value = inner.display(next);
            inner.dirty = false;
            if inner.state.value == next {
                return;
            }
            tracing::debug!(from = ?inner.state.value, to = ?next, "number input committed");
            inner.state.value = next;
            (next, inner.on_value_change.clone())
        };
        if let Some(cb) = emit {
            cb(value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::Cell;
    use kurbo::Size;
    use trellis_dom::Modifiers;

    fn counting(config: NumberInputConfig) -> (NumberInput, Rc<RefCell<Vec<Option<f64>>>>) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let log = seen.clone();
        let input = NumberInput::new(NumberInputConfig {
            on_value_change: Some(Rc::new(move |v| log.borrow_mut().push(v))),
            ..config
        })
        .unwrap();
        (input, seen)
    }

    #[test]
    fn ten_tenths_make_exactly_one() {
        let input = NumberInput::new(NumberInputConfig {
            step: 0.1,
            precision: Some(1),
            default_value: Some(0.0),
            ..Default::default()
        })
        .unwrap();
        for _ in 0..10 {
            input.increment();
        }
        assert_eq!(input.value(), Some(1.0));
        assert_eq!(input.state().input_value, "1.0");
    }

    #[test]
    fn stepping_past_max_lands_on_max() {
        let (input, seen) = counting(NumberInputConfig {
            min: 0.0,
            max: 10.0,
            step: 3.0,
            default_value: Some(9.0),
            ..Default::default()
        });
        input.increment();
        assert_eq!(input.value(), Some(10.0));
        input.increment();
        assert_eq!(*seen.borrow(), vec![Some(10.0)], "no event without a change");
        input.step(-PAGE_STEPS);
        assert_eq!(input.value(), Some(0.0));
    }

    #[test]
    fn typing_does_not_emit_until_commit() {
        let (input, seen) = counting(NumberInputConfig {
            min: 0.0,
            max: 100.0,
            ..Default::default()
        });
        input.handle_input("4");
        input.handle_input("42");
        assert!(seen.borrow().is_empty());
        assert_eq!(input.state().input_value, "42");
        input.commit();
        input.commit();
        assert_eq!(*seen.borrow(), vec![Some(42.0)]);

        input.handle_input("4oo");
        input.commit();
        assert_eq!(input.value(), Some(42.0));
        assert_eq!(input.state().input_value, "42");
        assert_eq!(seen.borrow().len(), 1);

        input.handle_input("  ");
        input.commit();
        assert_eq!(input.value(), None);
        assert_eq!(*seen.borrow(), vec![Some(42.0), None]);
    }

    #[test]
    fn commit_clamps_and_is_idempotent() {
        let input = NumberInput::new(NumberInputConfig {
            min: -5.0,
            max: 5.0,
            step: 0.5,
            ..Default::default()
        })
        .unwrap();
        input.handle_input("12.26");
        input.commit();
        let first = input.value();
        input.commit();
        assert_eq!(first, Some(5.0));
        assert_eq!(input.value(), first);
    }

    #[test]
    fn stepping_uses_pending_text() {
        let input = NumberInput::new(NumberInputConfig::default()).unwrap();
        input.increment();
        assert_eq!(input.value(), Some(0.0), "empty starts at zero");
        input.handle_input("7");
        input.increment();
        assert_eq!(input.value(), Some(8.0));
    }

    #[test]
    fn currency_display_follows_locale() {
        let input = NumberInput::new(NumberInputConfig {
            step: 0.01,
            format: NumberFormat::Currency("EUR".into()),
            locale: Locale::DeDe,
            ..Default::default()
        })
        .unwrap();
        input.handle_input("1234,5");
        input.commit();
        assert_eq!(input.value(), Some(1234.5));
        assert_eq!(input.state().input_value, "1.234,50\u{a0}€");
    }

    #[test]
    fn rejects_invalid_config_and_bounds() {
        assert_eq!(
            NumberInput::new(NumberInputConfig {
                min: 3.0,
                max: 1.0,
                ..Default::default()
            })
            .unwrap_err(),
            ConfigError::InvalidRange { min: 3.0, max: 1.0 }
        );
        let (input, seen) = counting(NumberInputConfig {
            default_value: Some(50.0),
            ..Default::default()
        });
        assert!(input.set_bounds(10.0, 0.0).is_err());
        input.set_bounds(0.0, 20.0).unwrap();
        assert_eq!(input.value(), Some(20.0));
        assert_eq!(*seen.borrow(), vec![Some(20.0)]);
    }

    #[test]
    fn keys_through_an_attached_field() {
        let dom = Dom::new(Size::new(100.0, 100.0));
        let field = dom.create_element("input").unwrap();
        dom.append_child(dom.body().unwrap(), field);
        let input = NumberInput::new(NumberInputConfig {
            min: 0.0,
            max: 50.0,
            default_value: Some(5.0),
            ..Default::default()
        })
        .unwrap();
        input.attach(&dom, field);
        dom.focus(field);

        assert!(dom.press(Key::ArrowUp).default_prevented());
        assert_eq!(input.value(), Some(6.0));
        dom.press(Key::PageUp);
        assert_eq!(input.value(), Some(16.0));
        dom.press(Key::End);
        assert_eq!(input.value(), Some(50.0));
        dom.press(Key::Home);
        assert_eq!(input.value(), Some(0.0));

        let ctrl = KeyboardEvent {
            modifiers: Modifiers::CTRL,
            ..KeyboardEvent::new(Key::ArrowUp)
        };
        assert!(!dom.key_down(ctrl).default_prevented());

        input.handle_input("33");
        dom.blur();
        assert_eq!(input.value(), Some(33.0), "blur commits");

        input.detach();
        assert_eq!(dom.listener_count(), 0);
    }

    #[test]
    fn disabled_ignores_edits_and_reports_in_props() {
        let calls = Rc::new(Cell::new(0));
        let counter = calls.clone();
        let input = NumberInput::new(NumberInputConfig {
            min: 0.0,
            max: 9.0,
            default_value: Some(1.0),
            disabled: true,
            on_value_change: Some(Rc::new(move |_| counter.set(counter.get() + 1))),
            ..Default::default()
        })
        .unwrap();
        input.increment();
        input.handle_input("5");
        assert!(!input.handle_key(&KeyboardEvent::new(Key::ArrowUp)));
        assert_eq!(input.value(), Some(1.0));
        assert_eq!(calls.get(), 0);

        let props = input.input_props();
        assert_eq!(props.get("role"), Some("spinbutton"));
        assert_eq!(props.get("aria-valuemin"), Some("0"));
        assert_eq!(props.get("aria-valuenow"), Some("1"));
        assert_eq!(props.get("aria-disabled"), Some("true"));
        assert_eq!(props.get("inputmode"), Some("numeric"));
    }
}
