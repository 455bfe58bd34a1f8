// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Time picker: a segmented hour/minute/second/period field.

use core::cell::RefCell;
use core::fmt;
use std::rc::Rc;

use chrono::{NaiveTime, Timelike};
use smallvec::SmallVec;
use trellis_dom::{
    Dom, ElementId, EventType, Key, KeyboardEvent, ListenerGroup, ListenerOptions,
};

use crate::props::{OnValueChange, Props, bool_attr};

/// A time of day, to the second.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimeValue(NaiveTime);

/// Accepted free-text shapes, matched after whitespace is removed.
const PARSE_FORMATS: [&str; 4] = ["%H:%M:%S", "%H:%M", "%I:%M:%S%p", "%I:%M%p"];

impl TimeValue {
    /// Returns `None` if any component is out of range.
    pub fn new(hour: u8, minute: u8, second: u8) -> Option<Self> {
        NaiveTime::from_hms_opt(hour.into(), minute.into(), second.into()).map(Self)
    }

    /// Parse `h:mm`, `h:mm:ss`, optionally followed by `AM` or `PM`.
    ///
    /// With a period the hour must be 1 to 12; without one it is read as 0 to 23.
    ///
    /// ```rust
    /// use trellis_behaviors::TimeValue;
    ///
    /// assert_eq!(TimeValue::parse("2:05 pm"), TimeValue::new(14, 5, 0));
    /// assert_eq!(TimeValue::parse("12:00:30AM"), TimeValue::new(0, 0, 30));
    /// assert_eq!(TimeValue::parse("23:59"), TimeValue::new(23, 59, 0));
    /// assert_eq!(TimeValue::parse("13:00 PM"), None);
    /// ```
    pub fn parse(text: &str) -> Option<Self> {
        let compact: String = text.split_whitespace().collect();
        PARSE_FORMATS
            .iter()
            .find_map(|fmt| NaiveTime::parse_from_str(&compact, fmt).ok())
            // Reject leap seconds.
            .filter(|t| t.nanosecond() == 0)
            .map(Self)
    }

    /// Hour, 0 to 23.
    pub fn hour(&self) -> u8 {
        component(self.0.hour())
    }

    /// Minute, 0 to 59.
    pub fn minute(&self) -> u8 {
        component(self.0.minute())
    }

    /// Second, 0 to 59.
    pub fn second(&self) -> u8 {
        component(self.0.second())
    }

    /// The underlying [`NaiveTime`].
    pub fn naive(&self) -> NaiveTime {
        self.0
    }
}

impl From<NaiveTime> for TimeValue {
    /// Sub-second precision is dropped.
    fn from(time: NaiveTime) -> Self {
        Self(time.with_nanosecond(0).unwrap_or(time))
    }
}

impl From<TimeValue> for NaiveTime {
    fn from(value: TimeValue) -> Self {
        value.0
    }
}

impl fmt::Display for TimeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%H:%M:%S"))
    }
}

fn component(v: u32) -> u8 {
    u8::try_from(v).unwrap_or_default()
}

fn to_24(hour12: u8, period: Period) -> u8 {
    hour12 % 12 + if period == Period::Pm { 12 } else { 0 }
}

/// Hour cycle of the hour segment.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum HourFormat {
    /// 1 to 12 with an AM/PM segment.
    #[default]
    H12,
    /// 0 to 23.
    H24,
}

/// Before or after noon.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Period {
    /// Before noon.
    Am,
    /// Noon and after.
    Pm,
}

/// One editable part of the field.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Segment {
    /// Hour.
    Hour,
    /// Minute.
    Minute,
    /// Second; only shown when configured.
    Second,
    /// AM/PM; only shown for [`HourFormat::H12`].
    Period,
}

impl Segment {
    fn label(self) -> &'static str {
        match self {
            Self::Hour => "hour",
            Self::Minute => "minute",
            Self::Second => "second",
            Self::Period => "AM/PM",
        }
    }
}

/// Segment contents as displayed. The hour is 1 to 12 under [`HourFormat::H12`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Segments {
    /// Displayed hour.
    pub hour: Option<u8>,
    /// Minute.
    pub minute: Option<u8>,
    /// Second.
    pub second: Option<u8>,
    /// AM/PM.
    pub period: Option<Period>,
}

/// Configuration for [`TimePicker`].
#[derive(Clone, Default)]
pub struct TimePickerConfig {
    /// Hour cycle.
    pub hour_format: HourFormat,
    /// Include a seconds segment.
    pub show_seconds: bool,
    /// Initial value.
    pub default_value: Option<TimeValue>,
    /// Ignore edits while set.
    pub disabled: bool,
    /// Called after the complete value changes (or becomes incomplete).
    pub on_value_change: Option<OnValueChange<Option<TimeValue>>>,
}

impl fmt::Debug for TimePickerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimePickerConfig")
            .field("hour_format", &self.hour_format)
            .field("show_seconds", &self.show_seconds)
            .field("default_value", &self.default_value)
            .field("disabled", &self.disabled)
            .field("on_value_change", &self.on_value_change.is_some())
            .finish()
    }
}

/// Snapshot of a [`TimePicker`].
#[derive(Clone, Debug, PartialEq)]
pub struct TimePickerState {
    /// The value, present once every shown segment is filled.
    pub value: Option<TimeValue>,
    /// Segment contents.
    pub segments: Segments,
    /// The segment receiving keys.
    pub focused: Segment,
    /// The field text.
    pub input_value: String,
    /// Whether edits are ignored.
    pub disabled: bool,
}

struct Inner {
    hour_format: HourFormat,
    show_seconds: bool,
    segments: Segments,
    focused: Segment,
    buffer: String,
    value: Option<TimeValue>,
    input_value: String,
    dirty: bool,
    disabled: bool,
    on_value_change: Option<OnValueChange<Option<TimeValue>>>,
    listeners: Option<ListenerGroup>,
}

impl fmt::Debug for Inner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Inner")
            .field("hour_format", &self.hour_format)
            .field("segments", &self.segments)
            .field("focused", &self.focused)
            .field("value", &self.value)
            .field("input_value", &self.input_value)
            .finish_non_exhaustive()
    }
}

impl Inner {
    fn visible(&self) -> SmallVec<[Segment; 4]> {
        let mut v = SmallVec::new();
        v.push(Segment::Hour);
        v.push(Segment::Minute);
        if self.show_seconds {
            v.push(Segment::Second);
        }
        if self.hour_format == HourFormat::H12 {
            v.push(Segment::Period);
        }
        v
    }

    fn bounds(&self, seg: Segment) -> (u8, u8) {
        match (seg, self.hour_format) {
            (Segment::Hour, HourFormat::H12) => (1, 12),
            (Segment::Hour, HourFormat::H24) => (0, 23),
            (Segment::Minute | Segment::Second, _) => (0, 59),
            (Segment::Period, _) => (0, 1),
        }
    }

    fn get(&self, seg: Segment) -> Option<u8> {
        match seg {
            Segment::Hour => self.segments.hour,
            Segment::Minute => self.segments.minute,
            Segment::Second => self.segments.second,
            Segment::Period => self.segments.period.map(|p| u8::from(p == Period::Pm)),
        }
    }

    fn set(&mut self, seg: Segment, value: Option<u8>) {
        match seg {
            Segment::Hour => self.segments.hour = value,
            Segment::Minute => self.segments.minute = value,
            Segment::Second => self.segments.second = value,
            Segment::Period => {
                self.segments.period = value.map(|v| if v == 0 { Period::Am } else { Period::Pm });
            }
        }
    }

    fn compose(&self) -> Option<TimeValue> {
        let s = &self.segments;
        let hour = match self.hour_format {
            HourFormat::H12 => to_24(s.hour?, s.period?),
            HourFormat::H24 => s.hour?,
        };
        let second = if self.show_seconds { s.second? } else { 0 };
        TimeValue::new(hour, s.minute?, second)
    }

    fn load(&mut self, value: Option<TimeValue>) {
        let Some(v) = value else {
            self.segments = Segments::default();
            return;
        };
        self.segments = match self.hour_format {
            HourFormat::H12 => {
                let (pm, hour12) = v.naive().hour12();
                Segments {
                    hour: Some(component(hour12)),
                    minute: Some(v.minute()),
                    second: Some(v.second()),
                    period: Some(if pm { Period::Pm } else { Period::Am }),
                }
            }
            HourFormat::H24 => Segments {
                hour: Some(v.hour()),
                minute: Some(v.minute()),
                second: Some(v.second()),
                period: None,
            },
        };
    }

    fn render(&self) -> String {
        if self.segments == Segments::default() {
            return String::new();
        }
        let pad = |v: Option<u8>| v.map_or_else(|| "--".to_owned(), |v| format!("{v:02}"));
        let hour = match self.hour_format {
            HourFormat::H12 => self
                .segments
                .hour
                .map_or_else(|| "--".to_owned(), |h| h.to_string()),
            HourFormat::H24 => pad(self.segments.hour),
        };
        let mut out = format!("{hour}:{}", pad(self.segments.minute));
        if self.show_seconds {
            out.push(':');
            out.push_str(&pad(self.segments.second));
        }
        if self.hour_format == HourFormat::H12 {
            out.push_str(match self.segments.period {
                Some(Period::Am) => " AM",
                Some(Period::Pm) => " PM",
                None => " --",
            });
        }
        out
    }
}

/// A time picker behavior.
///
/// Arrow keys change the focused segment and wrap inside that segment only:
/// minute 59 goes to 00 without touching the hour. Digits type into the
/// focused segment and advance once it cannot take another digit. The value
/// is reported whenever the complete time changes.
///
/// ```rust
/// use trellis_behaviors::{HourFormat, Segment, TimePicker, TimePickerConfig, TimeValue};
///
/// let picker = TimePicker::new(TimePickerConfig {
///     hour_format: HourFormat::H24,
///     default_value: TimeValue::new(9, 59, 0),
///     ..Default::default()
/// });
/// picker.focus_segment(Segment::Minute);
/// picker.increment();
/// assert_eq!(picker.value(), TimeValue::new(9, 0, 0));
/// assert_eq!(picker.state().input_value, "09:00");
/// ```
#[derive(Clone, Debug)]
pub struct TimePicker {
    inner: Rc<RefCell<Inner>>,
}

impl TimePicker {
    /// Build the behavior.
    pub fn new(config: TimePickerConfig) -> Self {
        let mut inner = Inner {
            hour_format: config.hour_format,
            show_seconds: config.show_seconds,
            segments: Segments::default(),
            focused: Segment::Hour,
            buffer: String::new(),
            value: None,
            input_value: String::new(),
            dirty: false,
            disabled: config.disabled,
            on_value_change: config.on_value_change,
            listeners: None,
        };
        inner.load(config.default_value);
        inner.value = inner.compose();
        inner.input_value = inner.render();
        Self {
            inner: Rc::new(RefCell::new(inner)),
        }
    }

    /// Current snapshot.
    pub fn state(&self) -> TimePickerState {
        let inner = self.inner.borrow();
        TimePickerState {
            value: inner.value,
            segments: inner.segments,
            focused: inner.focused,
            input_value: inner.input_value.clone(),
            disabled: inner.disabled,
        }
    }

    /// The complete value, if every shown segment is filled.
    pub fn value(&self) -> Option<TimeValue> {
        self.inner.borrow().value
    }

    /// Shown segments in order.
    pub fn segments(&self) -> Vec<Segment> {
        self.inner.borrow().visible().to_vec()
    }

    /// Set the value programmatically.
    pub fn set_value(&self, value: Option<TimeValue>) {
        self.inner.borrow_mut().load(value);
        self.sync();
    }

    /// Move key input to `segment`. Returns false if it is not shown.
    pub fn focus_segment(&self, segment: Segment) -> bool {
        let mut inner = self.inner.borrow_mut();
        if !inner.visible().contains(&segment) {
            return false;
        }
        inner.focused = segment;
        inner.buffer.clear();
        true
    }

    /// Move to the next segment; stays on the last one.
    pub fn focus_next(&self) -> bool {
        self.focus_relative(1)
    }

    /// Move to the previous segment; stays on the first one.
    pub fn focus_prev(&self) -> bool {
        self.focus_relative(-1)
    }

    fn focus_relative(&self, delta: isize) -> bool {
        let target = {
            let inner = self.inner.borrow();
            let visible = inner.visible();
            let idx = visible.iter().position(|&s| s == inner.focused).unwrap_or(0);
            idx.checked_add_signed(delta).and_then(|i| visible.get(i).copied())
        };
        target.is_some_and(|s| self.focus_segment(s))
    }

    /// Increment the focused segment, wrapping within its range.
    pub fn increment(&self) {
        self.step(1);
    }

    /// Decrement the focused segment, wrapping within its range.
    pub fn decrement(&self) {
        self.step(-1);
    }

    fn step(&self, delta: i16) {
        {
            let mut inner = self.inner.borrow_mut();
            if inner.disabled {
                return;
            }
            let seg = inner.focused;
            let (min, max) = inner.bounds(seg);
            let next = match inner.get(seg) {
                Some(v) => wrap(v, delta, min, max),
                None if delta > 0 => min,
                None => max,
            };
            inner.set(seg, Some(next));
            inner.buffer.clear();
        }
        self.sync();
    }

    /// Set the focused segment to its minimum or maximum.
    fn to_bound(&self, max: bool) {
        {
            let mut inner = self.inner.borrow_mut();
            if inner.disabled {
                return;
            }
            let seg = inner.focused;
            let (lo, hi) = inner.bounds(seg);
            inner.set(seg, Some(if max { hi } else { lo }));
            inner.buffer.clear();
        }
        self.sync();
    }

    /// Clear the focused segment.
    pub fn clear_segment(&self) {
        {
            let mut inner = self.inner.borrow_mut();
            if inner.disabled {
                return;
            }
            let seg = inner.focused;
            inner.set(seg, None);
            inner.buffer.clear();
        }
        self.sync();
    }

    /// Type a character into the focused segment. Returns true if it was accepted.
    ///
    /// `a`/`p` set the period. Digits accumulate up to two per segment; the
    /// focus advances once no further digit could keep the segment in range.
    pub fn type_char(&self, c: char) -> bool {
        let advance = {
            let mut inner = self.inner.borrow_mut();
            if inner.disabled {
                return false;
            }
            let seg = inner.focused;
            if seg == Segment::Period {
                let period = match c.to_ascii_lowercase() {
                    'a' => 0,
                    'p' => 1,
                    _ => return false,
                };
                inner.set(seg, Some(period));
                false
            } else {
                let Some(digit) = c.to_digit(10).and_then(|d| u8::try_from(d).ok()) else {
                    return false;
                };
                let (min, max) = inner.bounds(seg);
                let extended = inner
                    .buffer
                    .parse::<u8>()
                    .ok()
                    .map(|prev| prev * 10 + digit)
                    .filter(|&v| v <= max);
                match extended {
                    Some(v) => {
                        inner.set(seg, (v >= min).then_some(v));
                        inner.buffer.clear();
                        true
                    }
                    None => {
                        if digit >= min {
                            inner.set(seg, Some(digit));
                        }
                        if u16::from(digit) * 10 > u16::from(max) {
                            inner.buffer.clear();
                            true
                        } else {
                            inner.buffer = digit.to_string();
                            false
                        }
                    }
                }
            }
        };
        self.sync();
        if advance {
            self.focus_next();
        }
        true
    }

    /// Store free text typed over the whole field without parsing it.
    pub fn handle_input(&self, raw: &str) {
        let mut inner = self.inner.borrow_mut();
        if inner.disabled {
            return;
        }
        inner.input_value = raw.to_owned();
        inner.dirty = true;
    }

    /// Parse pending free text. Empty text clears the value; text that does
    /// not parse is replaced by the segments' rendering.
    pub fn commit(&self) {
        {
            let mut inner = self.inner.borrow_mut();
            if !inner.dirty {
                return;
            }
            let raw = inner.input_value.trim().to_owned();
            if raw.is_empty() {
                inner.load(None);
            } else if let Some(v) = TimeValue::parse(&raw) {
                inner.load(Some(v));
            } else {
                tracing::debug!(raw, "time picker: unparseable text restored");
            }
        }
        self.sync();
    }

    /// Handle a key press. Returns true if the key was consumed.
    pub fn handle_key(&self, key: &KeyboardEvent) -> bool {
        if key.has_command_modifier() || self.inner.borrow().disabled {
            return false;
        }
        match key.key {
            Key::ArrowUp => self.increment(),
            Key::ArrowDown => self.decrement(),
            Key::ArrowRight => {
                self.focus_next();
            }
            Key::ArrowLeft => {
                self.focus_prev();
            }
            Key::Home => self.to_bound(false),
            Key::End => self.to_bound(true),
            Key::Backspace | Key::Delete => self.clear_segment(),
            Key::Enter => self.commit(),
            Key::Character(c) => return self.type_char(c),
            _ => return false,
        }
        true
    }

    /// Enable or disable editing.
    pub fn set_disabled(&self, disabled: bool) {
        self.inner.borrow_mut().disabled = disabled;
    }

    /// Attributes for the field wrapper.
    pub fn field_props(&self) -> Props {
        let inner = self.inner.borrow();
        Props::new()
            .with("role", "group")
            .with("aria-disabled", bool_attr(inner.disabled))
            .with_opt("data-value", inner.value.map(|v| v.to_string()))
    }

    /// Attributes for one segment.
    pub fn segment_props(&self, segment: Segment) -> Props {
        let inner = self.inner.borrow();
        let (min, max) = inner.bounds(segment);
        let now = inner.get(segment);
        let text = match segment {
            Segment::Period => inner.segments.period.map(|p| match p {
                Period::Am => "AM".to_owned(),
                Period::Pm => "PM".to_owned(),
            }),
            _ => now.map(|v| format!("{v:02}")),
        };
        let focused = inner.focused == segment && !inner.disabled;
        Props::new()
            .with("role", "spinbutton")
            .with("aria-label", segment.label())
            .with("aria-valuemin", min.to_string())
            .with("aria-valuemax", max.to_string())
            .with_opt("aria-valuenow", now.map(|v| v.to_string()))
            .with_opt("aria-valuetext", text)
            .with("tabindex", if focused { "0" } else { "-1" })
            .with_opt("data-placeholder", now.is_none().then_some(""))
    }

    /// Drive this picker from `field`'s key presses; pending text commits on blur.
    pub fn attach(&self, dom: &Dom, field: ElementId) {
        let mut group = ListenerGroup::new(dom);
        let weak = Rc::downgrade(&self.inner);
        group.listen(field, EventType::KeyDown, ListenerOptions::BUBBLE, move |event| {
            let (Some(inner), Some(key)) = (weak.upgrade(), event.keyboard().copied()) else {
                return;
            };
            if (Self { inner }).handle_key(&key) {
                event.prevent_default();
            }
        });
        let weak = Rc::downgrade(&self.inner);
        group.listen(field, EventType::FocusOut, ListenerOptions::BUBBLE, move |_| {
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

    fn sync(&self) {
        let (value, emit) = {
            let mut inner = self.inner.borrow_mut();
            inner.input_value = inner.render();
            inner.dirty = false;
            let next = inner.compose();
            if next == inner.value {
                return;
            }
            tracing::debug!(from = ?inner.value, to = ?next, "time picker value changed");
            inner.value = next;
            (next, inner.on_value_change.clone())
        };
        if let Some(cb) = emit {
            cb(value);
        }
    }
}

fn wrap(value: u8, delta: i16, min: u8, max: u8) -> u8 {
    let span = i16::from(max) - i16::from(min) + 1;
    let offset = (i16::from(value) - i16::from(min) + delta).rem_euclid(span);
    u8::try_from(offset + i16::from(min)).unwrap_or(min)
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Size;

    fn picker(format: HourFormat, value: Option<TimeValue>) -> TimePicker {
        TimePicker::new(TimePickerConfig {
            hour_format: format,
            default_value: value,
            ..Default::default()
        })
    }

    #[test]
    fn segments_wrap_independently() {
        let p = picker(HourFormat::H12, TimeValue::new(23, 59, 0));
        assert_eq!(p.state().input_value, "11:59 PM");
        p.focus_segment(Segment::Minute);
        p.increment();
        assert_eq!(p.value(), TimeValue::new(23, 0, 0), "hour untouched");
        p.focus_segment(Segment::Hour);
        p.increment();
        assert_eq!(p.state().segments.hour, Some(12));
        assert_eq!(p.state().segments.period, Some(Period::Pm), "period untouched");
        p.increment();
        assert_eq!(p.state().segments.hour, Some(1));
        p.decrement();
        p.decrement();
        assert_eq!(p.state().segments.hour, Some(11));

        let h24 = picker(HourFormat::H24, TimeValue::new(0, 0, 0));
        h24.decrement();
        assert_eq!(h24.value(), TimeValue::new(23, 0, 0));
    }

    #[test]
    fn period_toggles_and_seconds_are_optional() {
        let p = TimePicker::new(TimePickerConfig {
            show_seconds: true,
            default_value: TimeValue::new(9, 5, 7),
            ..Default::default()
        });
        assert_eq!(
            p.segments(),
            vec![Segment::Hour, Segment::Minute, Segment::Second, Segment::Period]
        );
        assert_eq!(p.state().input_value, "9:05:07 AM");
        assert!(p.focus_segment(Segment::Period));
        p.increment();
        assert_eq!(p.value(), TimeValue::new(21, 5, 7));
        assert!(!picker(HourFormat::H24, None).focus_segment(Segment::Period));
    }

    #[test]
    fn typeahead_fills_and_advances() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let log = seen.clone();
        let p = TimePicker::new(TimePickerConfig {
            on_value_change: Some(Rc::new(move |v| log.borrow_mut().push(v))),
            ..Default::default()
        });
        assert!(p.type_char('1'));
        assert_eq!(p.state().focused, Segment::Hour, "1 may become 10-12");
        p.type_char('2');
        assert_eq!(p.state().segments.hour, Some(12));
        assert_eq!(p.state().focused, Segment::Minute);
        p.type_char('7');
        assert_eq!(p.state().segments.minute, Some(7));
        assert_eq!(p.state().focused, Segment::Period);
        assert!(!p.type_char('x'));
        assert!(seen.borrow().is_empty());
        p.type_char('a');
        assert_eq!(*seen.borrow(), vec![TimeValue::new(0, 7, 0)]);
        assert_eq!(p.state().input_value, "12:07 AM");

        p.focus_segment(Segment::Minute);
        p.type_char('3');
        p.type_char('9');
        assert_eq!(p.state().segments.minute, Some(39));
        p.focus_segment(Segment::Hour);
        p.type_char('0');
        assert_eq!(p.state().segments.hour, Some(12), "0 alone is not a 12-hour value");
        p.type_char('4');
        assert_eq!(p.state().segments.hour, Some(4));
    }

    #[test]
    fn backspace_clears_and_value_becomes_incomplete() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let log = seen.clone();
        let p = TimePicker::new(TimePickerConfig {
            hour_format: HourFormat::H24,
            default_value: TimeValue::new(8, 30, 0),
            on_value_change: Some(Rc::new(move |v| log.borrow_mut().push(v))),
            ..Default::default()
        });
        p.handle_key(&KeyboardEvent::new(Key::ArrowRight));
        p.handle_key(&KeyboardEvent::new(Key::Backspace));
        assert_eq!(p.state().input_value, "08:--");
        assert_eq!(p.value(), None);
        p.handle_key(&KeyboardEvent::new(Key::End));
        assert_eq!(*seen.borrow(), vec![None, TimeValue::new(8, 59, 0)]);
        assert_eq!(p.segment_props(Segment::Minute).get("tabindex"), Some("0"));
        assert_eq!(p.segment_props(Segment::Hour).get("tabindex"), Some("-1"));
    }

    #[test]
    fn free_text_commit() {
        let p = picker(HourFormat::H12, TimeValue::new(10, 0, 0));
        p.handle_input("4:45 pm");
        assert_eq!(p.value(), TimeValue::new(10, 0, 0));
        p.commit();
        assert_eq!(p.value(), TimeValue::new(16, 45, 0));
        assert_eq!(p.state().input_value, "4:45 PM");

        p.handle_input("quarter past");
        p.commit();
        assert_eq!(p.value(), TimeValue::new(16, 45, 0));
        assert_eq!(p.state().input_value, "4:45 PM");

        p.handle_input("");
        p.commit();
        assert_eq!(p.value(), None);
        assert_eq!(p.state().input_value, "");
    }

    #[test]
    fn parse_edge_cases() {
        assert_eq!(TimeValue::parse("7:5"), TimeValue::new(7, 5, 0));
        assert_eq!(TimeValue::parse("12:00 pm"), TimeValue::new(12, 0, 0));
        assert_eq!(TimeValue::parse("24:00"), None);
        assert_eq!(TimeValue::parse("0:00 AM"), None);
        assert_eq!(TimeValue::parse("1:2:3:4"), None);
        assert_eq!(TimeValue::parse("123:00"), None);
        assert_eq!(TimeValue::parse("10"), None);
        assert_eq!(TimeValue::parse("23:59:60"), None, "leap second");
        assert_eq!(TimeValue::new(7, 8, 9).unwrap().to_string(), "07:08:09");
    }

    #[test]
    fn converts_to_and_from_naive_time() {
        let naive = NaiveTime::from_hms_milli_opt(18, 30, 15, 250).unwrap();
        let v = TimeValue::from(naive);
        assert_eq!(v, TimeValue::new(18, 30, 15).unwrap());
        assert_eq!((v.hour(), v.minute(), v.second()), (18, 30, 15));
        assert_eq!(NaiveTime::from(v), NaiveTime::from_hms_opt(18, 30, 15).unwrap());

        let p = picker(HourFormat::H12, Some(v));
        assert_eq!(p.state().segments.hour, Some(6));
        assert_eq!(p.state().segments.period, Some(Period::Pm));
        let midnight = picker(HourFormat::H12, TimeValue::new(0, 0, 0));
        assert_eq!(midnight.state().input_value, "12:00 AM");
    }

    #[test]
    fn attached_field_routes_keys() {
        let dom = Dom::new(Size::new(100.0, 100.0));
        let field = dom.create_element("div").unwrap();
        dom.set_attribute(field, "tabindex", "0");
        dom.append_child(dom.body().unwrap(), field);
        let p = picker(HourFormat::H24, None);
        p.attach(&dom, field);
        dom.focus(field);
        for c in ['1', '7', '4', '5'] {
            assert!(dom.press(Key::Character(c)).default_prevented());
        }
        assert_eq!(p.value(), TimeValue::new(17, 45, 0));
        assert!(!dom.press(Key::Tab).default_prevented());
        p.detach();
        assert_eq!(dom.listener_count(), 0);
    }
}
