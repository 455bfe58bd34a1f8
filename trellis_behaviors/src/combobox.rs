// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Combobox: a text input that filters a listbox popup.

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

/// Configuration for [`Combobox`].
#[derive(Clone)]
pub struct ComboboxConfig {
    /// The text input; keeps focus while the listbox is open.
    pub input: ElementId,
    /// The listbox popup.
    pub listbox: ElementId,
    /// Choices, in display order.
    pub options: Vec<SelectOption>,
    /// Initially selected value; must name an enabled option.
    pub default_value: Option<String>,
    /// Where the listbox sits relative to the input.
    pub placement: Placement,
    /// Gap between input and listbox.
    pub offset: f64,
    /// Arrow keys wrap from the last visible option to the first and back.
    pub wrap: bool,
    /// Ignore interaction while set.
    pub disabled: bool,
    /// Layer stack; `None` uses [`LayerStack::global`].
    pub layer_stack: Option<LayerStack>,
    /// Called after the selected value changes.
    pub on_value_change: Option<OnValueChange<String>>,
    /// Called after the listbox opens or closes.
    pub on_open_change: Option<OnOpenChange>,
    /// Called after the highlighted option changes. Filtering, hover and
    /// closing all report here.
    pub on_highlight_change: Option<OnValueChange<Option<String>>>,
}

impl ComboboxConfig {
    /// A combobox with no options whose listbox opens below the input.
    pub fn new(input: ElementId, listbox: ElementId) -> Self {
        Self {
            input,
            listbox,
            options: Vec::new(),
            default_value: None,
            placement: Placement::new(Side::Bottom, Alignment::Start),
            offset: 4.0,
            wrap: true,
            disabled: false,
            layer_stack: None,
            on_value_change: None,
            on_open_change: None,
            on_highlight_change: None,
        }
    }
}

impl fmt::Debug for ComboboxConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComboboxConfig")
            .field("input", &self.input)
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

/// Snapshot of a [`Combobox`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ComboboxState {
    /// Listbox shown.
    pub open: bool,
    /// The chosen value.
    pub value: Option<String>,
    /// The visible option keyboard navigation is on.
    pub highlighted_value: Option<String>,
    /// Text in the input.
    pub input_value: String,
    /// Interaction ignored.
    pub disabled: bool,
}

struct ComboboxInner {
    dom: Dom,
    input: ElementId,
    listbox: ElementId,
    listbox_id: String,
    list: OptionList,
    value: Option<String>,
    input_value: String,
    open: bool,
    wrap: bool,
    disabled: bool,
    popup: Popup,
    on_value_change: Option<OnValueChange<String>>,
    on_open_change: Option<OnOpenChange>,
    on_highlight_change: Option<OnValueChange<Option<String>>>,
    listeners: Option<ListenerGroup>,
}

impl fmt::Debug for ComboboxInner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComboboxInner")
            .field("input", &self.input)
            .field("list", &self.list)
            .field("value", &self.value)
            .field("input_value", &self.input_value)
            .field("open", &self.open)
            .finish_non_exhaustive()
    }
}

/// A combobox behavior.
///
/// Typing narrows the options to those whose label contains the text,
/// ignoring case, and moves the highlight to the first enabled match. When
/// nothing matches the highlight is cleared, and Enter selects nothing.
///
/// ```rust
/// use kurbo::Size;
/// use trellis_dom::{Dom, Key, KeyboardEvent};
/// use trellis_behaviors::{Combobox, ComboboxConfig, SelectOption};
///
/// let dom = Dom::new(Size::new(800.0, 600.0));
/// let input = dom.create_element("input").unwrap();
/// let listbox = dom.create_element("div").unwrap();
/// dom.append_child(dom.body().unwrap(), input);
/// dom.append_child(dom.body().unwrap(), listbox);
///
/// let combo = Combobox::new(
///     &dom,
///     ComboboxConfig {
///         options: vec![
///             SelectOption::new("nl", "Netherlands"),
///             SelectOption::new("nz", "New Zealand"),
///             SelectOption::new("no", "Norway"),
///         ],
///         ..ComboboxConfig::new(input, listbox)
///     },
/// )
/// .unwrap();
///
/// combo.handle_input("ze");
/// assert_eq!(combo.state().highlighted_value.as_deref(), Some("nz"));
/// combo.handle_input("zz");
/// assert_eq!(combo.state().highlighted_value, None);
/// assert!(!combo.handle_key(&KeyboardEvent::new(Key::Enter)));
/// assert_eq!(combo.value(), None);
/// ```
#[derive(Clone, Debug)]
pub struct Combobox {
    inner: Rc<RefCell<ComboboxInner>>,
}

impl Combobox {
    /// Build the behavior. Fails if `default_value` names no enabled option.
    ///
    /// The input starts out showing the default option's label.
    pub fn new(dom: &Dom, config: ComboboxConfig) -> Result<Self, ConfigError> {
        let list = OptionList::new(config.options);
        let input_value = match &config.default_value {
            Some(v) => match list.get(v).filter(|o| !o.disabled) {
                Some(o) => o.label.clone(),
                None => return Err(ConfigError::UnknownOption(v.clone())),
            },
            None => String::new(),
        };
        let listbox_id = ensure_id(dom, config.listbox, "listbox");
        let inner = Rc::new_cyclic(|weak: &Weak<RefCell<ComboboxInner>>| {
            let weak = weak.clone();
            let popup = Popup::new(
                dom,
                config.input,
                config.listbox,
                config.placement,
                config.offset,
                config.layer_stack.clone(),
                Rc::new(move |_| {
                    if let Some(inner) = weak.upgrade() {
                        Combobox { inner }.close();
                    }
                }),
            );
            RefCell::new(ComboboxInner {
                dom: dom.clone(),
                input: config.input,
                listbox: config.listbox,
                listbox_id,
                list,
                value: config.default_value,
                input_value,
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
    pub fn state(&self) -> ComboboxState {
        let inner = self.inner.borrow();
        ComboboxState {
            open: inner.open,
            value: inner.value.clone(),
            highlighted_value: inner.list.highlighted_value().map(str::to_owned),
            input_value: inner.input_value.clone(),
            disabled: inner.disabled,
        }
    }

    /// The chosen value.
    pub fn value(&self) -> Option<String> {
        self.inner.borrow().value.clone()
    }

    /// Options matching the current text, in display order.
    pub fn visible_options(&self) -> Vec<SelectOption> {
        self.inner.borrow().list.visible_options()
    }

    /// Returns true while the listbox is shown.
    pub fn is_open(&self) -> bool {
        self.inner.borrow().open
    }

    /// Show the listbox. Keeps a visible highlight, else highlights the
    /// selected option if visible, else the first visible enabled option.
    pub fn open(&self) {
        let before = self.inner.borrow().list.highlighted_owned();
        self.open_with(false, before);
    }

    /// Hide the listbox and show every option again.
    pub fn close(&self) {
        let (popup, input, callback, highlight) = {
            let mut inner = self.inner.borrow_mut();
            if !inner.open {
                return;
            }
            inner.open = false;
            let before = inner.list.highlighted_owned();
            inner.list.clear_highlight();
            inner.list.show_all();
            (
                inner.popup.clone(),
                inner.input,
                inner.on_open_change.clone(),
                inner
                    .list
                    .highlight_change(&before, inner.on_highlight_change.as_ref()),
            )
        };
        popup.hide();
        tracing::debug!(?input, "combobox closed");
        if let Some(cb) = callback {
            cb(false);
        }
        if let Some(change) = highlight {
            change.emit();
        }
    }

    /// Store typed text, filter the options, and open.
    pub fn handle_input(&self, text: &str) {
        let before = {
            let mut inner = self.inner.borrow_mut();
            if inner.disabled {
                return;
            }
            let before = inner.list.highlighted_owned();
            inner.input_value = text.to_owned();
            inner.list.filter(text);
            tracing::trace!(
                text,
                matches = inner.list.visible_options().len(),
                "combobox filtered"
            );
            before
        };
        self.open_with(false, before);
    }

    /// Highlight the next visible enabled option.
    pub fn highlight_next(&self) -> bool {
        self.with_highlight(|inner| {
            let wrap = inner.wrap;
            inner.list.move_highlight(true, wrap)
        })
    }

    /// Highlight the previous visible enabled option.
    pub fn highlight_prev(&self) -> bool {
        self.with_highlight(|inner| {
            let wrap = inner.wrap;
            inner.list.move_highlight(false, wrap)
        })
    }

    /// Highlight `value` if it is visible and enabled.
    pub fn highlight(&self, value: &str) -> bool {
        self.with_highlight(|inner| inner.list.highlight(value))
    }

    /// Choose `value`, put its label in the input, and close.
    ///
    /// Returns false if it is unknown, disabled, or filtered out.
    pub fn select(&self, value: &str) -> bool {
        let callback = {
            let mut inner = self.inner.borrow_mut();
            let Some(index) = inner.list.position(value).filter(|&i| inner.list.selectable(i)) else {
                return false;
            };
            if inner.disabled {
                return false;
            }
            inner.input_value = inner.list.options()[index].label.clone();
            if inner.value.as_deref() == Some(value) {
                None
            } else {
                tracing::debug!(value, "combobox value changed");
                inner.value = Some(value.to_owned());
                inner.on_value_change.clone()
            }
        };
        if let Some(cb) = callback {
            cb(value.to_owned());
        }
        self.close();
        true
    }

    /// Replace the options and refilter with the current text.
    pub fn set_options(&self, options: Vec<SelectOption>) {
        self.with_highlight(|inner| {
            inner.list.set_options(options);
            if inner.open {
                let text = inner.input_value.clone();
                inner.list.filter(&text);
            }
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

    /// Handle a key pressed in the input. Returns true if consumed.
    ///
    /// Home, End and character keys are left to the input's caret.
    pub fn handle_key(&self, key: &KeyboardEvent) -> bool {
        let (open, disabled, highlighted) = {
            let inner = self.inner.borrow();
            let highlighted = inner
                .list
                .highlighted_value()
                .filter(|v| inner.list.position(v).is_some_and(|i| inner.list.selectable(i)))
                .map(str::to_owned);
            (inner.open, inner.disabled, highlighted)
        };
        if disabled || key.has_command_modifier() {
            return false;
        }
        match (key.key, open) {
            (Key::ArrowDown, false) => self.open_with(false, highlighted),
            (Key::ArrowUp, false) => self.open_with(true, highlighted),
            (Key::ArrowDown, true) => {
                self.highlight_next();
            }
            (Key::ArrowUp, true) => {
                self.highlight_prev();
            }
            (Key::Enter, true) => {
                let Some(value) = highlighted else {
                    return false;
                };
                return self.select(&value);
            }
            (Key::Escape, true) => self.close(),
            (Key::Tab, true) => {
                self.close();
                return false;
            }
            _ => return false,
        }
        true
    }

    /// Attributes for the input.
    pub fn input_props(&self) -> Props {
        let inner = self.inner.borrow();
        let active = inner
            .open
            .then(|| inner.list.highlighted_value())
            .flatten()
            .and_then(|v| inner.list.position(v))
            .map(|i| option_id(&inner.listbox_id, i));
        Props::new()
            .with("role", "combobox")
            .with("aria-autocomplete", "list")
            .with("aria-expanded", bool_attr(inner.open))
            .with("aria-controls", inner.listbox_id.clone())
            .with_opt("aria-activedescendant", active)
            .with("aria-disabled", bool_attr(inner.disabled))
            .with("data-state", if inner.open { "open" } else { "closed" })
    }

    /// Attributes for the listbox.
    pub fn listbox_props(&self) -> Props {
        let inner = self.inner.borrow();
        Props::new()
            .with("role", "listbox")
            .with("id", inner.listbox_id.clone())
            .with("data-state", if inner.open { "open" } else { "closed" })
    }

    /// Attributes for the option with `value`; filtered-out options get `hidden`.
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
            .with_opt("hidden", (!inner.list.is_visible(index)).then_some(""))
    }

    /// Route input keys and pointer input over the options.
    pub fn attach(&self) {
        let (dom, input, listbox) = {
            let inner = self.inner.borrow();
            (inner.dom.clone(), inner.input, inner.listbox)
        };
        let mut group = ListenerGroup::new(&dom);
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
        group.listen(listbox, EventType::PointerDown, ListenerOptions::BUBBLE, move |event| {
            // Keep focus in the input.
            event.prevent_default();
            let (Some(inner), Some(dom)) = (weak.upgrade(), d.upgrade()) else {
                return;
            };
            if let Some(value) = option_value_at(&dom, listbox, event.target()) {
                Self { inner }.select(&value);
            }
        });
        self.inner.borrow_mut().listeners = Some(group);
    }

    /// Remove the listeners installed by [`attach`](Self::attach).
    pub fn detach(&self) {
        self.inner.borrow_mut().listeners = None;
    }

    /// Open if closed, then report the highlight if it differs from `before`.
    fn open_with(&self, from_end: bool, before: Option<String>) {
        let (opened, highlight) = {
            let mut inner = self.inner.borrow_mut();
            if inner.disabled {
                return;
            }
            let opened = (!inner.open).then(|| {
                inner.open = true;
                let keep = inner
                    .list
                    .highlighted_value()
                    .and_then(|v| inner.list.position(v))
                    .is_some_and(|i| inner.list.selectable(i));
                if !keep {
                    let selected = inner.value.clone();
                    let list = &mut inner.list;
                    if !selected.is_some_and(|v| list.highlight(&v)) {
                        if from_end {
                            list.highlight_last();
                        } else {
                            list.highlight_first();
                        }
                    }
                }
                (inner.popup.clone(), inner.input, inner.on_open_change.clone())
            });
            let highlight = inner
                .list
                .highlight_change(&before, inner.on_highlight_change.as_ref());
            (opened, highlight)
        };
        if let Some((popup, input, callback)) = opened {
            popup.show();
            tracing::debug!(?input, "combobox opened");
            if let Some(cb) = callback {
                cb(true);
            }
        }
        if let Some(change) = highlight {
            change.emit();
        }
    }

    fn with_highlight<R>(&self, f: impl FnOnce(&mut ComboboxInner) -> R) -> R {
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
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::{Point, Size};
    use trellis_dom::PointerEvent;

    fn setup() -> (Dom, ElementId, ElementId, Combobox) {
        let dom = Dom::new(Size::new(800.0, 600.0));
        let input = dom.create_element("input").unwrap();
        let listbox = dom.create_element("div").unwrap();
        dom.append_child(dom.body().unwrap(), input);
        dom.append_child(dom.body().unwrap(), listbox);
        let combo = Combobox::new(
            &dom,
            ComboboxConfig {
                options: vec![
                    SelectOption::new("ts", "TypeScript"),
                    SelectOption::new("js", "JavaScript"),
                    SelectOption::new("rs", "Rust"),
                    SelectOption::new("rb", "Ruby").disabled(),
                ],
                layer_stack: Some(LayerStack::new()),
                ..ComboboxConfig::new(input, listbox)
            },
        )
        .unwrap();
        (dom, input, listbox, combo)
    }

    #[test]
    fn typing_filters_and_resets_highlight() {
        let (_, _, _, c) = setup();
        c.handle_input("script");
        assert!(c.is_open());
        assert_eq!(c.visible_options().len(), 2);
        assert_eq!(c.state().highlighted_value.as_deref(), Some("ts"));
        c.handle_key(&KeyboardEvent::new(Key::ArrowDown));
        assert_eq!(c.state().highlighted_value.as_deref(), Some("js"));
        c.handle_input("ru");
        assert_eq!(c.state().highlighted_value.as_deref(), Some("rs"));
        assert_eq!(c.option_props("ts").get("hidden"), Some(""));
        assert_eq!(c.option_props("rs").get("hidden"), None);
        c.handle_input("rub");
        assert_eq!(c.state().highlighted_value, None, "only match is disabled");
        assert!(!c.handle_key(&KeyboardEvent::new(Key::Enter)));
        assert_eq!(c.value(), None);
    }

    #[test]
    fn enter_selects_and_fills_input() {
        let (_, _, _, c) = setup();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let log = seen.clone();
        c.inner.borrow_mut().on_value_change = Some(Rc::new(move |v| log.borrow_mut().push(v)));
        c.handle_input("JAVA");
        assert!(c.handle_key(&KeyboardEvent::new(Key::Enter)));
        assert_eq!(c.value().as_deref(), Some("js"));
        assert_eq!(c.state().input_value, "JavaScript");
        assert!(!c.is_open());
        assert_eq!(c.visible_options().len(), 4);
        assert_eq!(*seen.borrow(), vec!["js".to_owned()]);

        c.handle_key(&KeyboardEvent::new(Key::ArrowDown));
        assert_eq!(c.state().highlighted_value.as_deref(), Some("js"));
        c.handle_key(&KeyboardEvent::new(Key::Escape));
        assert!(!c.is_open());
    }

    #[test]
    fn unknown_default_is_rejected() {
        let dom = Dom::new(Size::new(100.0, 100.0));
        let input = dom.create_element("input").unwrap();
        let listbox = dom.create_element("div").unwrap();
        let err = Combobox::new(
            &dom,
            ComboboxConfig {
                default_value: Some("py".into()),
                ..ComboboxConfig::new(input, listbox)
            },
        )
        .unwrap_err();
        assert_eq!(err, ConfigError::UnknownOption("py".into()));
    }

    #[test]
    fn attached_pointer_selection_keeps_input_focus() {
        let (dom, input, listbox, c) = setup();
        let rust = dom.create_element("div").unwrap();
        dom.append_child(listbox, rust);
        c.option_props("rs").apply(&dom, rust);
        c.attach();
        dom.focus(input);
        dom.press(Key::ArrowDown);
        assert!(c.is_open());
        dom.pointer_down(rust, PointerEvent::at(Point::ZERO));
        assert_eq!(c.value().as_deref(), Some("rs"));
        assert_eq!(dom.active_element(), Some(input));
        c.detach();
        assert_eq!(dom.listener_count(), 0);
    }

    #[test]
    fn attached_highlight_changes_are_reported() {
        let (dom, input, listbox, c) = setup();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let log = seen.clone();
        c.inner.borrow_mut().on_highlight_change =
            Some(Rc::new(move |v| log.borrow_mut().push(v)));
        let rust = dom.create_element("div").unwrap();
        dom.append_child(listbox, rust);
        c.option_props("rs").apply(&dom, rust);
        c.attach();
        dom.focus(input);

        dom.press(Key::ArrowDown);
        dom.press(Key::ArrowDown);
        c.handle_input("ru");
        c.handle_input("rub");
        c.handle_input("");
        dom.pointer_move(rust, PointerEvent::at(Point::ZERO));
        dom.pointer_move(rust, PointerEvent::at(Point::ZERO));
        dom.press(Key::Escape);
        assert!(!c.is_open());

        let some = |v: &str| Some(v.to_owned());
        assert_eq!(
            *seen.borrow(),
            vec![some("ts"), some("js"), some("rs"), None, some("ts"), some("rs"), None]
        );
    }
}
