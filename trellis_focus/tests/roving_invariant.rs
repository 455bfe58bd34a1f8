// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Property tests for the roving tabindex invariant.

use kurbo::Size;
use proptest::prelude::*;
use trellis_dom::{Dom, ElementId, Key, Selector};
use trellis_focus::{RovingFocus, RovingFocusOptions};

fn key_strategy() -> impl Strategy<Value = Key> {
    prop_oneof![
        Just(Key::ArrowDown),
        Just(Key::ArrowUp),
        Just(Key::Home),
        Just(Key::End),
        Just(Key::ArrowLeft),
    ]
}

fn build(disabled: &[bool]) -> (Dom, ElementId, Vec<ElementId>) {
    let dom = Dom::new(Size::new(800.0, 600.0));
    let container = dom.create_element("div").unwrap();
    dom.append_child(dom.body().unwrap(), container);
    let items = disabled
        .iter()
        .map(|&d| {
            let el = dom.create_element("div").unwrap();
            dom.set_attribute(el, "role", "option");
            if d {
                dom.set_attribute(el, "aria-disabled", "true");
            }
            dom.append_child(container, el);
            el
        })
        .collect();
    (dom, container, items)
}

proptest! {
    #[test]
    fn exactly_one_tabstop_and_it_is_focused(
        disabled in proptest::collection::vec(any::<bool>(), 1..8),
        keys in proptest::collection::vec(key_strategy(), 0..24),
        wrap in any::<bool>(),
    ) {
        prop_assume!(disabled.iter().any(|d| !d));
        let (dom, container, items) = build(&disabled);
        let roving = RovingFocus::new(
            &dom,
            RovingFocusOptions {
                wrap,
                ..RovingFocusOptions::new(container, Selector::parse("[role=\"option\"]").unwrap())
            },
        );
        let start = roving.active().unwrap();
        dom.focus(start);

        for key in keys {
            dom.press(key);
            let tabstops: Vec<ElementId> = items
                .iter()
                .copied()
                .filter(|&i| dom.attribute(i, "tabindex").as_deref() == Some("0"))
                .collect();
            prop_assert_eq!(tabstops.len(), 1);
            let active = tabstops[0];
            prop_assert_eq!(Some(active), roving.active());
            prop_assert_eq!(Some(active), dom.active_element());
            let idx = items.iter().position(|&i| i == active).unwrap();
            prop_assert!(!disabled[idx]);
        }
    }
}
