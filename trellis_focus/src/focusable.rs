// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Focusable-element queries.

use trellis_dom::{Dom, ElementId, Selector};

thread_local! {
    static FOCUSABLE: Selector = Selector::focusable();
}

/// Tabbable elements inside `container`, in document order.
///
/// Matches [`trellis_dom::FOCUSABLE_SELECTOR`] and then drops anything hidden,
/// disabled, or with a negative `tabindex`. The result is a fresh snapshot;
/// callers recompute it whenever they need it instead of caching it across
/// DOM mutations. Empty for a server [`Dom`] or a stale container.
pub fn focusable_elements(dom: &Dom, container: ElementId) -> Vec<ElementId> {
    FOCUSABLE.with(|selector| {
        dom.read(|doc| {
            doc.query_all(container, selector)
                .into_iter()
                .filter(|&id| doc.is_tabbable(id))
                .collect()
        })
        .unwrap_or_default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Size;
    use trellis_dom::ElementFlags;

    #[test]
    fn filters_disabled_hidden_and_negative_tabindex() {
        let dom = Dom::new(Size::new(100.0, 100.0));
        let body = dom.body().unwrap();
        let panel = dom.create_element("div").unwrap();
        dom.append_child(body, panel);

        let mut expected = Vec::new();
        for (tag, attrs) in [
            ("button", &[][..]),
            ("button", &[("disabled", "")][..]),
            ("a", &[("href", "#x")][..]),
            ("a", &[][..]),
            ("input", &[("type", "hidden")][..]),
            ("input", &[("type", "text")][..]),
            ("div", &[("tabindex", "0")][..]),
            ("div", &[("tabindex", "-1")][..]),
            ("button", &[("tabindex", "-1")][..]),
            ("div", &[("contenteditable", "true")][..]),
        ] {
            let el = dom.create_element(tag).unwrap();
            for (k, v) in attrs {
                dom.set_attribute(el, k, v);
            }
            dom.append_child(panel, el);
            expected.push(el);
        }
        let hidden_wrapper = dom.create_element("div").unwrap();
        dom.append_child(panel, hidden_wrapper);
        let inside_hidden = dom.create_element("button").unwrap();
        dom.append_child(hidden_wrapper, inside_hidden);
        dom.toggle_flags(hidden_wrapper, ElementFlags::HIDDEN, true);

        let found = focusable_elements(&dom, panel);
        assert_eq!(
            found,
            vec![expected[0], expected[2], expected[5], expected[6], expected[9]]
        );
    }

    #[test]
    fn server_dom_yields_nothing() {
        assert!(focusable_elements(&Dom::server(), ElementId::INERT).is_empty());
    }
}
