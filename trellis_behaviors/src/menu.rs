// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Menu: an anchored popup of actions with roving focus.

use core::cell::RefCell;
use core::fmt;
use std::rc::{Rc, Weak};

use trellis_anchor::{Alignment, Placement, Side};
use trellis_dom::{
    ConfigError, Dom, ElementId, EventType, Key, KeyboardEvent, ListenerGroup, ListenerOptions,
    Selector,
};
use trellis_focus::{RovingFocus, RovingFocusOptions};
use trellis_layer::LayerStack;

use crate::popup::Popup;
use crate::props::{OnOpenChange, Props, bool_attr, ensure_id};

/// Items a menu navigates when no selector is configured.
pub const MENU_ITEM_SELECTOR: &str = "[role=\"menuitem\"]";

/// Called with the chosen menu item.
pub type OnSelect = Rc<dyn Fn(ElementId)>;

/// Configuration for [`Menu`].
#[derive(Clone)]
pub struct MenuConfig {
    /// Button that opens the menu.
    pub trigger: ElementId,
    /// The menu popup.
    pub content: ElementId,
    /// Which descendants of the content are items; `None` uses [`MENU_ITEM_SELECTOR`].
    pub item_selector: Option<Selector>,
    /// Where the menu sits relative to the trigger.
    pub placement: Placement,
    /// Gap between trigger and menu.
    pub offset: f64,
    /// Arrow keys wrap from the last item to the first and back.
    pub wrap: bool,
    /// Layer stack; `None` uses [`LayerStack::global`].
    pub layer_stack: Option<LayerStack>,
    /// Called when an item is chosen, before the menu closes.
    pub on_select: Option<OnSelect>,
    /// Called after the menu opens or closes.
    pub on_open_change: Option<OnOpenChange>,
}

impl MenuConfig {
    /// A wrapping menu below the trigger, start-aligned.
    pub fn new(trigger: ElementId, content: ElementId) -> Self {
        Self {
            trigger,
            content,
            item_selector: None,
            placement: Placement::new(Side::Bottom, Alignment::Start),
            offset: 4.0,
            wrap: true,
            layer_stack: None,
            on_select: None,
            on_open_change: None,
        }
    }
}

impl fmt::Debug for MenuConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MenuConfig")
            .field("trigger", &self.trigger)
            .field("content", &self.content)
            .field("item_selector", &self.item_selector.as_ref().map(Selector::as_str))
            .field("placement", &self.placement)
            .field("offset", &self.offset)
            .field("wrap", &self.wrap)
            .field("layer_stack", &self.layer_stack)
            .field("on_select", &self.on_select.is_some())
            .field("on_open_change", &self.on_open_change.is_some())
            .finish()
    }
}

struct MenuInner {
    dom: Dom,
    trigger: ElementId,
    content: ElementId,
    content_id: String,
    selector: Selector,
    wrap: bool,
    open: bool,
    popup: Popup,
    roving: Option<RovingFocus>,
    on_select: Option<OnSelect>,
    on_open_change: Option<OnOpenChange>,
    listeners: Option<ListenerGroup>,
}

impl fmt::Debug for MenuInner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MenuInner")
            .field("trigger", &self.trigger)
            .field("content", &self.content)
            .field("selector", &self.selector.as_str())
            .field("open", &self.open)
            .field("roving", &self.roving)
            .finish_non_exhaustive()
    }
}

/// A menu behavior.
///
/// Opening activates a dismissable layer, anchors the content to the
/// trigger, and starts roving focus over the items, focusing the first one
/// (the last one when opened with ArrowUp). Choosing an item calls
/// `on_select` and closes; closing returns focus to the trigger.
///
/// ```rust
/// use std::cell::Cell;
/// use std::rc::Rc;
/// use kurbo::Size;
/// use trellis_dom::{Dom, Key};
/// use trellis_behaviors::{Menu, MenuConfig};
///
/// let dom = Dom::new(Size::new(800.0, 600.0));
/// let body = dom.body().unwrap();
/// let trigger = dom.create_element("button").unwrap();
/// let content = dom.create_element("div").unwrap();
/// dom.append_child(body, trigger);
/// dom.append_child(body, content);
/// let items: Vec<_> = (0..3)
///     .map(|_| {
///         let item = dom.create_element("div").unwrap();
///         dom.set_attribute(item, "role", "menuitem");
///         dom.append_child(content, item);
///         item
///     })
///     .collect();
///
/// let chosen = Rc::new(Cell::new(None));
/// let seen = chosen.clone();
/// let menu = Menu::new(
///     &dom,
///     MenuConfig {
///         on_select: Some(Rc::new(move |item| seen.set(Some(item)))),
///         ..MenuConfig::new(trigger, content)
///     },
/// )
/// .unwrap();
/// menu.attach();
///
/// dom.focus(trigger);
/// dom.press(Key::ArrowDown);
/// assert_eq!(dom.active_element(), Some(items[0]));
/// dom.press(Key::ArrowDown);
/// dom.press(Key::Enter);
/// assert_eq!(chosen.get(), Some(items[1]));
/// assert!(!menu.is_open());
/// assert_eq!(dom.active_element(), Some(trigger));
/// ```
#[derive(Clone, Debug)]
pub struct Menu {
    inner: Rc<RefCell<MenuInner>>,
}

impl Menu {
    /// Build the behavior. Fails only if the default item selector cannot be parsed.
    pub fn new(dom: &Dom, config: MenuConfig) -> Result<Self, ConfigError> {
        let selector = match config.item_selector {
            Some(s) => s,
            None => Selector::parse(MENU_ITEM_SELECTOR)?,
        };
        let content_id = ensure_id(dom, config.content, "menu");
        let inner = Rc::new_cyclic(|weak: &Weak<RefCell<MenuInner>>| {
            let weak = weak.clone();
            let popup = Popup::new(
                dom,
                config.trigger,
                config.content,
                config.placement,
                config.offset,
                config.layer_stack.clone(),
                Rc::new(move |_| {
                    if let Some(inner) = weak.upgrade() {
                        Menu { inner }.close();
                    }
                }),
            );
            RefCell::new(MenuInner {
                dom: dom.clone(),
                trigger: config.trigger,
                content: config.content,
                content_id,
                selector,
                wrap: config.wrap,
                open: false,
                popup,
                roving: None,
                on_select: config.on_select,
                on_open_change: config.on_open_change,
                listeners: None,
            })
        });
        Ok(Self { inner })
    }

    /// Returns true while the menu is shown.
    pub fn is_open(&self) -> bool {
        self.inner.borrow().open
    }

    /// The item currently holding the roving tabstop.
    pub fn active_item(&self) -> Option<ElementId> {
        self.inner.borrow().roving.as_ref().and_then(RovingFocus::active)
    }

    /// Open and focus the first enabled item.
    pub fn open(&self) {
        self.open_at(false);
    }

    /// Open and focus the last enabled item.
    pub fn open_at_end(&self) {
        self.open_at(true);
    }

    /// Close and return focus to the trigger.
    pub fn close(&self) {
        let (dom, popup, roving, trigger, callback) = {
            let mut inner = self.inner.borrow_mut();
            if !inner.open {
                return;
            }
            inner.open = false;
            (
                inner.dom.clone(),
                inner.popup.clone(),
                inner.roving.take(),
                inner.trigger,
                inner.on_open_change.clone(),
            )
        };
        if let Some(roving) = roving {
            roving.destroy();
        }
        popup.hide();
        dom.focus(trigger);
        tracing::debug!(?trigger, "menu closed");
        if let Some(cb) = callback {
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

    /// Choose `item`: report it and close. Returns false if it is not an
    /// enabled item of the open menu.
    pub fn select(&self, item: ElementId) -> bool {
        let callback = {
            let inner = self.inner.borrow();
            let Some(roving) = &inner.roving else {
                return false;
            };
            let disabled = inner.dom.read(|d| d.is_disabled(item)).unwrap_or(true);
            if disabled || !roving.items().contains(&item) {
                return false;
            }
            inner.on_select.clone()
        };
        tracing::debug!(?item, "menu item selected");
        if let Some(cb) = callback {
            cb(item);
        }
        self.close();
        true
    }

    /// Handle a key pressed on the trigger. Returns true if consumed.
    pub fn handle_trigger_key(&self, key: &KeyboardEvent) -> bool {
        if key.has_command_modifier() {
            return false;
        }
        match key.key {
            Key::Enter | Key::Space | Key::ArrowDown => self.open(),
            Key::ArrowUp => self.open_at_end(),
            _ => return false,
        }
        true
    }

    /// Handle a key pressed inside the menu. Arrow keys are left to roving focus.
    pub fn handle_content_key(&self, key: &KeyboardEvent, target: ElementId) -> bool {
        if !self.is_open() || key.has_command_modifier() {
            return false;
        }
        match key.key {
            Key::Enter | Key::Space => {
                let item = self.item_at(target).or_else(|| self.active_item());
                return item.is_some_and(|item| self.select(item));
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
        Props::new()
            .with("aria-haspopup", "menu")
            .with("aria-expanded", bool_attr(inner.open))
            .with("aria-controls", inner.content_id.clone())
            .with("data-state", if inner.open { "open" } else { "closed" })
    }

    /// Attributes for the menu content.
    pub fn content_props(&self) -> Props {
        let inner = self.inner.borrow();
        Props::new()
            .with("role", "menu")
            .with("id", inner.content_id.clone())
            .with("aria-orientation", "vertical")
            .with("tabindex", "-1")
            .with("data-state", if inner.open { "open" } else { "closed" })
    }

    /// Attributes for one item.
    pub fn item_props(&self, disabled: bool) -> Props {
        Props::new()
            .with("role", "menuitem")
            .with("aria-disabled", bool_attr(disabled))
            .with_opt("data-disabled", disabled.then_some(""))
    }

    /// Route trigger keys and presses, and key and pointer input inside the menu.
    pub fn attach(&self) {
        let (dom, trigger, content) = {
            let inner = self.inner.borrow();
            (inner.dom.clone(), inner.trigger, inner.content)
        };
        let mut group = ListenerGroup::new(&dom);
        let weak = Rc::downgrade(&self.inner);
        group.listen(trigger, EventType::KeyDown, ListenerOptions::BUBBLE, move |event| {
            let (Some(inner), Some(key)) = (weak.upgrade(), event.keyboard().copied()) else {
                return;
            };
            if (Self { inner }).handle_trigger_key(&key) {
                event.prevent_default();
            }
        });
        let weak = Rc::downgrade(&self.inner);
        group.listen(trigger, EventType::PointerDown, ListenerOptions::BUBBLE, move |event| {
            if let Some(inner) = weak.upgrade() {
                event.prevent_default();
                Self { inner }.toggle();
            }
        });
        let weak = Rc::downgrade(&self.inner);
        group.listen(content, EventType::KeyDown, ListenerOptions::BUBBLE, move |event| {
            let (Some(inner), Some(key)) = (weak.upgrade(), event.keyboard().copied()) else {
                return;
            };
            if (Self { inner }).handle_content_key(&key, event.target()) {
                event.prevent_default();
            }
        });
        let weak = Rc::downgrade(&self.inner);
        group.listen(content, EventType::PointerUp, ListenerOptions::BUBBLE, move |event| {
            let Some(inner) = weak.upgrade() else {
                return;
            };
            let menu = Self { inner };
            if let Some(item) = menu.item_at(event.target()) {
                menu.select(item);
            }
        });
        self.inner.borrow_mut().listeners = Some(group);
    }

    /// Remove the listeners installed by [`attach`](Self::attach).
    pub fn detach(&self) {
        self.inner.borrow_mut().listeners = None;
    }

    fn item_at(&self, target: ElementId) -> Option<ElementId> {
        let inner = self.inner.borrow();
        let items = inner.roving.as_ref()?.items();
        inner
            .dom
            .read(|d| {
                d.ancestors(target)
                    .take_while(|&el| el != inner.content)
                    .find(|el| items.contains(el))
            })
            .flatten()
    }

    fn open_at(&self, from_end: bool) {
        let (dom, popup, options, callback) = {
            let mut inner = self.inner.borrow_mut();
            if inner.open {
                return;
            }
            inner.open = true;
            let options = RovingFocusOptions {
                wrap: inner.wrap,
                ..RovingFocusOptions::new(inner.content, inner.selector.clone())
            };
            (
                inner.dom.clone(),
                inner.popup.clone(),
                options,
                inner.on_open_change.clone(),
            )
        };
        popup.show();
        let roving = RovingFocus::new(&dom, options);
        let mut items = roving.items();
        if from_end {
            items.reverse();
        }
        let focused = items.into_iter().find(|&item| roving.focus_item(item));
        tracing::debug!(?focused, "menu opened");
        self.inner.borrow_mut().roving = Some(roving);
        if let Some(cb) = callback {
            cb(true);
        }
    }
}
