// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Overlays stacked inside a modal dialog, driven only through DOM input.

use core::cell::RefCell;
use std::rc::Rc;

use kurbo::{Point, Size};
use trellis_behaviors::{
    Dialog, DialogConfig, Menu, MenuConfig, Select, SelectConfig, SelectOption,
};
use trellis_dom::{Dom, ElementId, Key, PointerEvent};
use trellis_focus::TrapStack;
use trellis_layer::LayerStack;

struct Page {
    dom: Dom,
    stack: LayerStack,
    open_dialog: ElementId,
    content: ElementId,
    note: ElementId,
    select_trigger: ElementId,
    listbox: ElementId,
    menu_trigger: ElementId,
    items: Vec<ElementId>,
    dialog: Dialog,
    select: Select,
    menu: Menu,
    chosen: Rc<RefCell<Vec<String>>>,
}

fn page() -> Page {
    let dom = Dom::new(Size::new(1024.0, 768.0));
    let body = dom.body().unwrap();
    let el = |tag: &str, parent: ElementId| {
        let e = dom.create_element(tag).unwrap();
        dom.append_child(parent, e);
        e
    };
    let open_dialog = el("button", body);
    let content = el("div", body);
    let note = el("p", content);
    let select_trigger = el("button", content);
    let listbox = el("div", content);
    let menu_trigger = el("button", content);
    let menu_content = el("div", content);

    let stack = LayerStack::new();
    let dialog = Dialog::new(
        &dom,
        DialogConfig {
            trigger: Some(open_dialog),
            layer_stack: Some(stack.clone()),
            trap_stack: Some(TrapStack::new()),
            ..DialogConfig::new(content)
        },
    );
    dialog.attach();

    let chosen = Rc::new(RefCell::new(Vec::new()));
    let log = chosen.clone();
    let select = Select::new(
        &dom,
        SelectConfig {
            options: vec![
                SelectOption::new("low", "Low"),
                SelectOption::new("mid", "Medium"),
                SelectOption::new("high", "High"),
            ],
            layer_stack: Some(stack.clone()),
            on_value_change: Some(Rc::new(move |v| log.borrow_mut().push(v))),
            ..SelectConfig::new(select_trigger, listbox)
        },
    )
    .unwrap();
    select.trigger_props().apply(&dom, select_trigger);
    select.listbox_props().apply(&dom, listbox);
    for value in ["low", "mid", "high"] {
        let option = el("div", listbox);
        select.option_props(value).apply(&dom, option);
    }
    select.attach();

    let menu = Menu::new(
        &dom,
        MenuConfig {
            layer_stack: Some(stack.clone()),
            ..MenuConfig::new(menu_trigger, menu_content)
        },
    )
    .unwrap();
    menu.content_props().apply(&dom, menu_content);
    let items = (0..3)
        .map(|_| {
            let item = el("div", menu_content);
            menu.item_props(false).apply(&dom, item);
            item
        })
        .collect();
    menu.attach();

    Page {
        dom,
        stack,
        open_dialog,
        content,
        note,
        select_trigger,
        listbox,
        menu_trigger,
        items,
        dialog,
        select,
        menu,
        chosen,
    }
}

#[test]
fn dialog_opens_on_press_and_escape_restores_focus() {
    let p = page();
    p.dom.focus(p.open_dialog);
    p.dom.pointer_down(p.open_dialog, PointerEvent::at(Point::ZERO));
    assert!(p.dialog.is_open());
    assert!(p.dialog.is_trapping());
    assert_eq!(p.stack.len(), 1);
    assert_eq!(p.dom.active_element(), Some(p.select_trigger));

    p.dom.press(Key::Escape);
    assert!(!p.dialog.is_open());
    assert!(!p.dialog.is_trapping());
    assert!(p.stack.is_empty());
    assert_eq!(p.dom.active_element(), Some(p.open_dialog));
}

#[test]
fn escape_closes_the_select_before_the_dialog() {
    let p = page();
    p.dialog.open();
    assert_eq!(p.dom.active_element(), Some(p.select_trigger));

    p.dom.press(Key::ArrowDown);
    assert!(p.select.is_open());
    assert_eq!(p.stack.len(), 2);
    assert_eq!(p.select.state().highlighted_value.as_deref(), Some("low"));

    p.dom.press(Key::Escape);
    assert!(!p.select.is_open(), "select is on top");
    assert!(p.dialog.is_open());
    assert_eq!(p.stack.len(), 1);
    assert_eq!(p.dom.active_element(), Some(p.select_trigger));
    assert!(p.chosen.borrow().is_empty());

    p.dom.press(Key::Escape);
    assert!(!p.dialog.is_open());
    assert!(p.stack.is_empty());
}

#[test]
fn select_chooses_inside_dialog_without_closing_it() {
    let p = page();
    p.dialog.open();
    p.dom.press(Key::ArrowDown);
    p.dom.press(Key::ArrowDown);
    p.dom.press(Key::Enter);
    assert!(!p.select.is_open());
    assert!(p.dialog.is_open());
    assert_eq!(*p.chosen.borrow(), vec!["mid".to_string()]);
    assert_eq!(p.select.label().as_deref(), Some("Medium"));
    assert_eq!(
        p.dom.attribute(p.listbox, "role").as_deref(),
        Some("listbox")
    );
}

#[test]
fn outside_press_dismisses_only_the_menu() {
    let p = page();
    p.dialog.open();
    p.dom.focus(p.menu_trigger);
    p.dom.press(Key::Enter);
    assert!(p.menu.is_open());
    assert_eq!(p.stack.len(), 2);
    assert_eq!(p.dom.active_element(), Some(p.items[0]));

    p.dom.press(Key::ArrowDown);
    assert_eq!(p.dom.active_element(), Some(p.items[1]));

    // Inside the dialog but outside the menu.
    p.dom.pointer_down(p.note, PointerEvent::at(Point::ZERO));
    assert!(!p.menu.is_open());
    assert!(p.dialog.is_open());
    assert_eq!(p.stack.len(), 1);
    assert!(p.dom.contains(p.content, p.note));
}
