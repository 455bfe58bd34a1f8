// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Select: a single-choice listbox popup opened from a trigger.

use core::cell::RefCell;
use core::fmt;
use std::rc::{Rc, Weak};

use trellis_anchor::{Alignment, Placement, Side};
use trellis_dom::{
    ConfigError, Dom, ElementId, EventType, Key, KeyboardEvent, ListenerGroup, ListenerOptions,
};
use trellis_layer::LayerStack;

use crate::listbox::{OptionList, SelectOption, option_id, option_value_at};
use crate::popup::Popup;
use crate::props::{OnOpenChange, OnValueChange, Props, bool_attr, ensure_id};

/// Configuration for [`Select`].
#[derive(Clone)]
pub struct SelectConfig {
    /// Button that opens the listbox and keeps focus while it is open.
    pub trigger: ElementId,
    /// The listbox popup.
    pub listbox: ElementId,
    /// Choices, in display order.
    pub options: Vec<SelectOption>,
    /// Initially selected value; must name an enabled option.
    pub default_value: Option<String>,
    /// Where the listbox sits relative to the trigger.
    pub placement: Placement,
    /// Gap between trigger and listbox.
    pub offset: f64,
    /// Arrow keys wrap from the last option to the first and back.
    pub wrap: bool,
    /// Ignore interaction while set.
    pub disabled: bool,
    /// Layer stack; `None` uses [`LayerStack::global`].
    pub layer_stack: Option<LayerStack>,
    /// Called after the selected value changes.
    pub on_value_change: Option<OnValueChange<String>>,
    /// Called after the listbox opens or closes.
    pub on_open_change: Option<OnOpenChange>,
    /// Called after the highlighted option changes, including the reset to
    /// `None` on close.
    pub on_highlight_change: Option<OnValueChange<Option<String>>>,
}

impl SelectConfig {
    /// A select with no options whose listbox opens below the trigger, start-aligned.
    pub fn new(trigger: ElementId, listbox: ElementId) -> Self {
        Self {
            trigger,
            listbox,
            options: Vec::new(),
            default_value: None,
            placement: Placement::new(Side::Bottom, Alignment::Start),
            offset: 4.0,
            wrap: false,
            disabled: false,
            layer_stack: None,
            on_value_change: None,
            on_open_change: None,
            on_highlight_change: None,
        }
    }
}

impl fmt::Debug for SelectConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectConfig")
            .field("trigger", &self.trigger)
            .field("listbox", &self.listbox)
            .field("options", &self.options)
            .field("default_value", &self.default_value)
            .field("placement", &self.placement)
            .field("offset", &self.offset)
            .field("wrap", &self.wrap)
            .field("disabled", &self.disabled)
            .field("layer_stack", &self.layer_stack)
            .field("on_value_change", &self.on_value_change.is_some())
            .field("on_open_change", &self.on_open_change.is_some())
            .field("on_highlight_change", &self.on_highlight_change.is_some())
            .finish()
    }
}

/// Snapshot of a [`Select`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectState {
    /// Listbox shown.
    pub open: bool,
    /// The chosen value.
    pub value: Option<String>,
    /// The option keyboard navigation is on; only set while open.
    pub highlighted_value: Option<String>,
    /// Interaction ignored.
    pub disabled: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Start {
    SelectedOrFirst,
    SelectedOrLast,
    First,
    Last,
}

struct SelectInner {
    dom: Dom,
    trigger: ElementId,
    listbox: ElementId,
    listbox_id: String,
    list: OptionList,
    value: Option<String>,
    open: bool,
    wrap: bool,
    disabled: bool,
    popup: Popup,
    on_value_change: Option<OnValueChange<String>>,
    on_open_change: Option<OnOpenChange>,
    on_highlight_change: Option<OnValueChange<Option<String>>>,
    listeners: Option<ListenerGroup>,
}

impl fmt::Debug for SelectInner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectInner")
            .field("trigger", &self.trigger)
            .field("listbox", &self.listbox)
            .field("list", &self.list)
            .field("value", &self.value)
            .field("open", &self.open)
            .field("disabled", &self.disabled)
            .finish_non_exhaustive()
    }
}

/// A select behavior.
///
/// The selected `value` and the keyboard `highlighted_value` are tracked
/// separately: arrows move the highlight, and only Enter, Space, or a pointer
/// release on an option commits it. Focus stays on the trigger throughout;
/// the highlighted option is exposed through `aria-activedescendant`.
///
/// Opening activates a dismissable layer (the trigger does not count as
/// outside) and anchors the listbox to the trigger.
///
/// ```rust
/// use kurbo::Size;
/// use trellis_dom::{Dom, Key, KeyboardEvent};
/// use trellis_behaviors::{Select, SelectConfig, SelectOption};
///
/// let dom = Dom::new(Size::new(800.0, 600.0));
/// let trigger = dom.create_element("button").unwrap();
/// let listbox = dom.create_element("div").unwrap();
/// dom.append_child(dom.body().unwrap(), trigger);
/// dom.append_child(dom.body().unwrap(), listbox);
///
/// let select = Select::new(
///     &dom,
///     SelectConfig {
///         options: vec![
///             SelectOption::new("s", "Small"),
///             SelectOption::new("m", "Medium").disabled(),
///             SelectOption::new("l", "Large"),
///         ],
///         ..SelectConfig::new(trigger, listbox)
///     },
/// )
/// .unwrap();
///
/// select.handle_key(&KeyboardEvent::new(Key::ArrowDown));
/// assert_eq!(select.state().highlighted_value.as_deref(), Some("s"));
/// select.handle_key(&KeyboardEvent::new(Key::ArrowDown));
/// assert_eq!(select.state().highlighted_value.as_deref(), Some("l"));
/// select.handle_key(&KeyboardEvent::new(Key::Enter));
/// assert_eq!(select.value().as_deref(), Some("l"));
/// assert!(!select.is_open());
/// ```
#[derive(Clone, Debug)]
pub struct Select {
    inner: Rc<RefCell<SelectInner>>,
}

impl Select {
    /// Build the behavior. Fails if `default_value` names no enabled option.
    pub fn new(dom: &Dom, config: SelectConfig) -> Result<Self, ConfigError> {
        if let Some(v) = &config.default_value
            && !config.options.iter().any(|o| &o.value == v && !o.disabled)
        {
            return Err(ConfigError::UnknownOption(v.clone()));
        }
        let listbox_id = ensure_id(dom, config.listbox, "listbox");
        let inner = Rc::new_cyclic(|weak: &Weak<RefCell<SelectInner>>| {
            let weak = weak.clone();
            let popup = Popup::new(
                dom,
                config.trigger,
                config.listbox,
                config.placement,
                config.offset,
                config.layer_stack.clone(),
                Rc::new(move |_| {
                    if let Some(inner) = weak.upgrade() {
                        Select { inner }.close();
                    }
                }),
            );
            RefCell::new(SelectInner {
                dom: dom.clone(),
                trigger: config.trigger,
                listbox: config.listbox,
                listbox_id,
                list: OptionList::new(config.options),
                value: config.default_value,
                open: false,
                wrap: config.wrap,
                disabled: config.disabled,
                popup,
                on_value_change: config.on_value_change,
                on_open_change: config.on_open_change,
                on_highlight_change: config.on_highlight_change,
                listeners: None,
            })
        });
        Ok(Self { inner })
    }

    /// Current snapshot.
    pub fn state(&self) -> SelectState {
        let inner = self.inner.borrow();
        SelectState {
            open: inner.open,
            value: inner.value.clone(),
            highlighted_value: inner.list.highlighted_value().map(str::to_owned),
            disabled: inner.disabled,
        }
    }

    /// The chosen value.
    pub fn value(&self) -> Option<String> {
        self.inner.borrow().value.clone()
    }

    /// The chosen option's label.
    pub fn label(&self) -> Option<String> {
        let inner = self.inner.borrow();
        let value = inner.value.as_deref()?;
        inner.list.get(value).map(|o| o.label.clone())
    }

    /// Returns true while the listbox is shown.
    pub fn is_open(&self) -> bool {
        self.inner.borrow().open
    }

    /// Show the listbox, highlighting the selected option or the first enabled one.
    pub fn open(&self) {
        self.open_at(Start::SelectedOrFirst);
    }

    /// Hide the listbox. Focus returns to the trigger if it was inside the listbox.
    pub fn close(&self) {
        let (dom, popup, trigger, listbox, callback, highlight) = {
            let mut inner = self.inner.borrow_mut();
            if !inner.open {
                return;
            }
            inner.open = false;
            let before = inner.list.highlighted_owned();
            inner.list.clear_highlight();
            (
                inner.dom.clone(),
                inner.popup.clone(),
                inner.trigger,
                inner.listbox,
                inner.on_open_change.clone(),
                inner
                    .list
                    .highlight_change(&before, inner.on_highlight_change.as_ref()),
            )
        };
        popup.hide();
        if dom.active_element().is_none_or(|el| dom.contains(listbox, el)) {
            dom.focus(trigger);
        }
        tracing::debug!(?trigger, "select closed");
        if let Some(cb) = callback {
            cb(false);
        }
        if let Some(change) = highlight {
            change.emit();
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

    /// Highlight `value`. Returns false if it is unknown or disabled.
    pub fn highlight(&self, value: &str) -> bool {
        self.with_highlight(|inner| inner.list.highlight(value))
    }

    /// Highlight the next enabled option.
    pub fn highlight_next(&self) -> bool {
        self.with_highlight(|inner| {
            let wrap = inner.wrap;
            inner.list.move_highlight(true, wrap)
        })
    }

    /// Highlight the previous enabled option.
    pub fn highlight_prev(&self) -> bool {
        self.with_highlight(|inner| {
            let wrap = inner.wrap;
            inner.list.move_highlight(false, wrap)
        })
    }

    /// Highlight the first enabled option.
    pub fn highlight_first(&self) -> bool {
        self.with_highlight(|inner| inner.list.highlight_first())
    }

    /// Highlight the last enabled option.
    pub fn highlight_last(&self) -> bool {
        self.with_highlight(|inner| inner.list.highlight_last())
    }

    /// Choose `value`. Returns false if it is unknown or disabled; choosing the
    /// current value succeeds without reporting a change.
    pub fn select(&self, value: &str) -> bool {
        let callback = {
            let mut inner = self.inner.borrow_mut();
            if inner.disabled || !inner.list.get(value).is_some_and(|o| !o.disabled) {
                return false;
            }
            if inner.value.as_deref() == Some(value) {
                return true;
            }
            tracing::debug!(value, "select value changed");
            inner.value = Some(value.to_owned());
            inner.on_value_change.clone()
        };
        if let Some(cb) = callback {
            cb(value.to_owned());
        }
        true
    }

    /// Choose the highlighted option and close.
    pub fn select_highlighted(&self) -> bool {
        let highlighted = self.inner.borrow().list.highlighted_value().map(str::to_owned);
        let Some(value) = highlighted else {
            return false;
        };
        let chosen = self.select(&value);
        self.close();
        chosen
    }

    /// Replace the options. A selected value that no longer exists is dropped.
    pub fn set_options(&self, options: Vec<SelectOption>) {
        self.with_highlight(|inner| {
            inner.list.set_options(options);
            if let Some(v) = inner.value.clone()
                && inner.list.get(&v).is_none()
            {
                inner.value = None;
            }
        });
    }

    /// Enable or disable. Disabling closes the listbox.
    pub fn set_disabled(&self, disabled: bool) {
        self.inner.borrow_mut().disabled = disabled;
        if disabled {
            self.close();
        }
    }

    /// Handle a key pressed while the trigger has focus. Returns true if consumed.
    pub fn handle_key(&self, key: &KeyboardEvent) -> bool {
        let (open, disabled, typing) = {
            let inner = self.inner.borrow();
            (inner.open, inner.disabled, inner.list.is_typing(key.timestamp))
        };
        if disabled || key.has_command_modifier() {
            return false;
        }
        if !open {
            match key.key {
                Key::ArrowDown | Key::Enter | Key::Space => self.open_at(Start::SelectedOrFirst),
                Key::ArrowUp => self.open_at(Start::SelectedOrLast),
                Key::Home => self.open_at(Start::First),
                Key::End => self.open_at(Start::Last),
                Key::Character(c) if !c.is_whitespace() => self.typeahead_select(c, key.timestamp),
                _ => return false,
            }
            return true;
        }
        match key.key {
            Key::ArrowDown => {
                self.highlight_next();
            }
            Key::ArrowUp => {
                self.highlight_prev();
            }
            Key::Home => {
                self.highlight_first();
            }
            Key::End => {
                self.highlight_last();
            }
            Key::Enter => {
                self.select_highlighted();
            }
            Key::Space if !typing => {
                self.select_highlighted();
            }
            Key::Space => {
                self.with_highlight(|inner| inner.list.typeahead(' ', key.timestamp));
            }
            Key::Character(c) => {
                self.with_highlight(|inner| inner.list.typeahead(c, key.timestamp));
            }
            Key::Escape => self.close(),
            Key::Tab => {
                self.close();
                return false;
            }
            _ => return false,
        }
        true
    }

    /// Attributes for the trigger.
    pub fn trigger_props(&self) -> Props {
        let inner = self.inner.borrow();
        let active = inner
            .open
            .then(|| inner.list.highlighted_value())
            .flatten()
            .and_then(|v| inner.list.position(v))
            .map(|i| option_id(&inner.listbox_id, i));
        Props::new()
            .with("role", "combobox")
            .with("aria-haspopup", "listbox")
            .with("aria-expanded", bool_attr(inner.open))
            .with("aria-controls", inner.listbox_id.clone())
            .with_opt("aria-activedescendant", active)
            .with("aria-disabled", bool_attr(inner.disabled))
            .with("data-state", if inner.open { "open" } else { "closed" })
            .with_opt("data-placeholder", inner.value.is_none().then_some(""))
    }

    /// Attributes for the listbox.
    pub fn listbox_props(&self) -> Props {
        let inner = self.inner.borrow();
        Props::new()
            .with("role", "listbox")
            .with("id", inner.listbox_id.clone())
            .with("tabindex", "-1")
            .with("data-state", if inner.open { "open" } else { "closed" })
    }

    /// Attributes for the option with `value`; empty if there is none.
    pub fn option_props(&self, value: &str) -> Props {
        let inner = self.inner.borrow();
        let Some(index) = inner.list.position(value) else {
            return Props::new();
        };
        let option = &inner.list.options()[index];
        let highlighted = inner.open && inner.list.highlighted_value() == Some(value);
        Props::new()
            .with("role", "option")
            .with("id", option_id(&inner.listbox_id, index))
            .with("data-value", value)
            .with("aria-selected", bool_attr(inner.value.as_deref() == Some(value)))
            .with("aria-disabled", bool_attr(option.disabled))
            .with_opt("data-highlighted", highlighted.then_some(""))
    }

    /// Route trigger keys and presses, and pointer input over the options.
    ///
    /// Option elements are found through `role="option"` and `data-value`,
    /// as written by [`option_props`](Self::option_props).
    pub fn attach(&self) {
        let (dom, trigger, listbox) = {
            let inner = self.inner.borrow();
            (inner.dom.clone(), inner.trigger, inner.listbox)
        };
        let mut group = ListenerGroup::new(&dom);
        let weak = Rc::downgrade(&self.inner);
        group.listen(trigger, EventType::KeyDown, ListenerOptions::BUBBLE, move |event| {
            let (Some(inner), Some(key)) = (weak.upgrade(), event.keyboard().copied()) else {
                return;
            };
            if (Self { inner }).handle_key(&key) {
                event.prevent_default();
            }
        });
        let weak = Rc::downgrade(&self.inner);
        group.listen(trigger, EventType::PointerDown, ListenerOptions::BUBBLE, move |_| {
            if let Some(inner) = weak.upgrade() {
                Self { inner }.toggle();
            }
        });
        let weak = Rc::downgrade(&self.inner);
        let d = dom.downgrade();
        group.listen(listbox, EventType::PointerMove, ListenerOptions::BUBBLE, move |event| {
            let (Some(inner), Some(dom)) = (weak.upgrade(), d.upgrade()) else {
                return;
            };
            if let Some(value) = option_value_at(&dom, listbox, event.target()) {
                Self { inner }.highlight(&value);
            }
        });
        let weak = Rc::downgrade(&self.inner);
        let d = dom.downgrade();
        group.listen(listbox, EventType::PointerUp, ListenerOptions::BUBBLE, move |event| {
            let (Some(inner), Some(dom)) = (weak.upgrade(), d.upgrade()) else {
                return;
            };
            let select = Self { inner };
            if select.is_open()
                && let Some(value) = option_value_at(&dom, listbox, event.target())
                && select.select(&value)
            {
                select.close();
            }
        });
        self.inner.borrow_mut().listeners = Some(group);
    }

    /// Remove the listeners installed by [`attach`](Self::attach).
    pub fn detach(&self) {
        self.inner.borrow_mut().listeners = None;
    }

    fn open_at(&self, start: Start) {
        let (popup, trigger, callback, highlight) = {
            let mut inner = self.inner.borrow_mut();
            if inner.open || inner.disabled {
                return;
            }
            inner.open = true;
            let before = inner.list.highlighted_owned();
            let selected = inner.value.clone();
            let list = &mut inner.list;
            let on_selected = matches!(start, Start::SelectedOrFirst | Start::SelectedOrLast)
                && selected.is_some_and(|v| list.highlight(&v));
            if !on_selected {
                match start {
                    Start::SelectedOrFirst | Start::First => list.highlight_first(),
                    Start::SelectedOrLast | Start::Last => list.highlight_last(),
                };
            }
            (
                inner.popup.clone(),
                inner.trigger,
                inner.on_open_change.clone(),
                inner
                    .list
                    .highlight_change(&before, inner.on_highlight_change.as_ref()),
            )
        };
        popup.show();
        tracing::debug!(?trigger, placement = ?popup.placement(), "select opened");
        if let Some(cb) = callback {
            cb(true);
        }
        if let Some(change) = highlight {
            change.emit();
        }
    }

    /// Run `f` on the state and report the highlight if it moved.
    fn with_highlight<R>(&self, f: impl FnOnce(&mut SelectInner) -> R) -> R {
        let (result, change) = {
            let mut inner = self.inner.borrow_mut();
            let before = inner.list.highlighted_owned();
            let result = f(&mut inner);
            let change = inner
                .list
                .highlight_change(&before, inner.on_highlight_change.as_ref());
            (result, change)
        };
        if let Some(change) = change {
            change.emit();
        }
        result
    }

    fn typeahead_select(&self, c: char, timestamp: u64) {
        let found = {
            let mut inner = self.inner.borrow_mut();
            if let Some(v) = inner.value.clone() {
                inner.list.highlight(&v);
            }
            let found = inner
                .list
                .typeahead(c, timestamp)
                .map(|i| inner.list.options()[i].value.clone());
            // Closed: the search position is the value, not a highlight.
            inner.list.unset_highlight();
            found
        };
        if let Some(value) = found {
            self.select(&value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::{Point, Rect, Size};
    use trellis_dom::PointerEvent;

    struct Fixture {
        dom: Dom,
        trigger: ElementId,
        listbox: ElementId,
        outside: ElementId,
        stack: LayerStack,
    }

    fn fixture() -> Fixture {
        let dom = Dom::new(Size::new(800.0, 600.0));
        let body = dom.body().unwrap();
        let trigger = dom.create_element("button").unwrap();
        let listbox = dom.create_element("div").unwrap();
        let outside = dom.create_element("div").unwrap();
        for el in [trigger, listbox, outside] {
            dom.append_child(body, el);
        }
        dom.write(|d| {
            d.set_rect(trigger, Rect::new(10.0, 10.0, 110.0, 40.0));
            d.set_rect(listbox, Rect::new(0.0, 0.0, 100.0, 200.0));
        });
        Fixture {
            dom,
            trigger,
            listbox,
            outside,
            stack: LayerStack::new(),
        }
    }

    fn options() -> Vec<SelectOption> {
        vec![
            SelectOption::new("red", "Red"),
            SelectOption::new("green", "Green").disabled(),
            SelectOption::new("blue", "Blue"),
            SelectOption::new("black", "Black"),
        ]
    }

    fn select(f: &Fixture, configure: impl FnOnce(&mut SelectConfig)) -> Select {
        let mut config = SelectConfig {
            options: options(),
            layer_stack: Some(f.stack.clone()),
            ..SelectConfig::new(f.trigger, f.listbox)
        };
        configure(&mut config);
        Select::new(&f.dom, config).unwrap()
    }

    fn key(k: Key) -> KeyboardEvent {
        KeyboardEvent::new(k)
    }

    #[test]
    fn default_value_must_exist() {
        let f = fixture();
        let err = Select::new(
            &f.dom,
            SelectConfig {
                options: options(),
                default_value: Some("green".into()),
                ..SelectConfig::new(f.trigger, f.listbox)
            },
        )
        .unwrap_err();
        assert_eq!(err, ConfigError::UnknownOption("green".into()));
    }

    #[test]
    fn open_highlights_selection_and_anchors() {
        let f = fixture();
        let s = select(&f, |c| c.default_value = Some("blue".into()));
        s.open();
        assert_eq!(f.stack.len(), 1);
        assert_eq!(s.state().highlighted_value.as_deref(), Some("blue"));
        assert_eq!(
            f.dom.attribute(f.listbox, "data-placement").as_deref(),
            Some("bottom-start")
        );
        s.close();
        assert!(f.stack.is_empty());
        assert_eq!(s.state().highlighted_value, None);
    }

    #[test]
    fn highlight_is_separate_from_value() {
        let f = fixture();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let log = seen.clone();
        let s = select(&f, |c| c.on_value_change = Some(Rc::new(move |v| log.borrow_mut().push(v))));
        s.handle_key(&key(Key::ArrowDown));
        s.handle_key(&key(Key::ArrowDown));
        assert_eq!(s.state().highlighted_value.as_deref(), Some("blue"), "green skipped");
        assert_eq!(s.value(), None);
        s.handle_key(&key(Key::End));
        s.handle_key(&key(Key::ArrowDown));
        assert_eq!(s.state().highlighted_value.as_deref(), Some("black"), "no wrap");
        s.handle_key(&key(Key::Space));
        assert_eq!(s.value().as_deref(), Some("black"));
        assert_eq!(*seen.borrow(), vec!["black".to_owned()]);
        assert!(!s.is_open());

        s.handle_key(&key(Key::ArrowUp));
        assert_eq!(s.state().highlighted_value.as_deref(), Some("black"));
        s.handle_key(&key(Key::Escape));
        assert!(!s.is_open());
        assert_eq!(seen.borrow().len(), 1);
    }

    #[test]
    fn typeahead_while_open_and_closed() {
        let f = fixture();
        let s = select(&f, |_| {});
        s.handle_key(&key(Key::Character('b')).at(0));
        assert_eq!(s.value().as_deref(), Some("blue"), "closed type-ahead selects");
        assert!(!s.is_open());

        s.open();
        s.handle_key(&key(Key::Character('b')).at(1000));
        assert_eq!(s.state().highlighted_value.as_deref(), Some("black"));
        s.handle_key(&key(Key::Character('l')).at(1100));
        s.handle_key(&key(Key::Character('u')).at(1200));
        assert_eq!(s.state().highlighted_value.as_deref(), Some("blue"));
        // Space inside the window extends the search instead of selecting.
        s.handle_key(&key(Key::Space).at(1300));
        assert!(s.is_open());
        s.handle_key(&key(Key::Space).at(5000));
        assert!(!s.is_open());
        assert_eq!(s.value().as_deref(), Some("blue"));
    }

    #[test]
    fn props_expose_active_descendant() {
        let f = fixture();
        let s = select(&f, |_| {});
        assert_eq!(s.trigger_props().get("aria-activedescendant"), None);
        assert_eq!(s.trigger_props().get("data-placeholder"), Some(""));
        s.open();
        let listbox_id = s.listbox_props().get("id").unwrap().to_owned();
        let red = s.option_props("red");
        assert_eq!(red.get("id"), Some(format!("{listbox_id}-option-0").as_str()));
        assert_eq!(s.trigger_props().get("aria-activedescendant"), red.get("id"));
        assert_eq!(red.get("data-highlighted"), Some(""));
        assert_eq!(s.option_props("green").get("aria-disabled"), Some("true"));
        assert!(s.option_props("purple").is_empty());
    }

    #[test]
    fn attached_pointer_flow() {
        let f = fixture();
        let s = select(&f, |_| {});
        let items: Vec<_> = options()
            .iter()
            .map(|o| {
                let el = f.dom.create_element("div").unwrap();
                f.dom.append_child(f.listbox, el);
                s.option_props(&o.value).apply(&f.dom, el);
                el
            })
            .collect();
        s.attach();
        let at = PointerEvent::at(Point::ZERO);

        f.dom.pointer_down(f.trigger, at);
        assert!(s.is_open());
        f.dom.pointer_move(items[3], at);
        assert_eq!(s.state().highlighted_value.as_deref(), Some("black"));
        f.dom.pointer_up(items[1], at);
        assert!(s.is_open(), "disabled option ignored");
        f.dom.pointer_up(items[2], at);
        assert_eq!(s.value().as_deref(), Some("blue"));
        assert!(!s.is_open());

        f.dom.pointer_down(f.trigger, at);
        f.dom.pointer_down(f.trigger, at);
        assert!(!s.is_open(), "trigger toggles, not dismisses");
        f.dom.pointer_down(f.trigger, at);
        f.dom.pointer_down(f.outside, at);
        assert!(!s.is_open());
        assert!(f.stack.is_empty());

        s.detach();
        assert_eq!(f.dom.listener_count(), 0);
    }

    #[test]
    fn attached_keys_and_hover_report_highlight() {
        let f = fixture();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let log = seen.clone();
        let s = select(&f, |c| {
            c.on_highlight_change = Some(Rc::new(move |v| log.borrow_mut().push(v)));
        });
        let items: Vec<_> = options()
            .iter()
            .map(|o| {
                let el = f.dom.create_element("div").unwrap();
                f.dom.append_child(f.listbox, el);
                s.option_props(&o.value).apply(&f.dom, el);
                el
            })
            .collect();
        s.attach();
        f.dom.focus(f.trigger);

        f.dom.press(Key::ArrowDown);
        f.dom.press(Key::ArrowDown);
        assert_eq!(
            *seen.borrow(),
            vec![Some("red".to_string()), Some("blue".to_string())]
        );

        f.dom.pointer_move(items[3], PointerEvent::at(Point::ZERO));
        f.dom.pointer_move(items[3], PointerEvent::at(Point::ZERO));
        assert_eq!(seen.borrow().last(), Some(&Some("black".to_string())));
        assert_eq!(seen.borrow().len(), 3, "same option reported once");

        f.dom.press(Key::Escape);
        assert!(!s.is_open());
        assert_eq!(seen.borrow().last(), Some(&None));
        assert_eq!(seen.borrow().len(), 4);

        // Closed type-ahead moves the value, not the highlight.
        f.dom.press(Key::Character('b'));
        assert_eq!(s.value().as_deref(), Some("blue"));
        assert_eq!(s.state().highlighted_value, None);
        assert_eq!(seen.borrow().len(), 4);
    }
}
