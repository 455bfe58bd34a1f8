// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Option lists shared by Select and Combobox: highlight movement, filtering,
//! and label type-ahead.

use trellis_dom::{Dom, ElementId};

use crate::props::OnValueChange;

/// One choice in a Select or Combobox.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectOption {
    /// Value reported when chosen.
    pub value: String,
    /// Text shown to the user, matched by type-ahead and filtering.
    pub label: String,
    /// Skipped by keyboard navigation and never selectable.
    pub disabled: bool,
}

impl SelectOption {
    /// An enabled option.
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
            disabled: false,
        }
    }

    /// Mark the option disabled.
    #[must_use]
    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }
}

/// A moved highlight, reported once the owner has released its borrow.
pub(crate) struct HighlightChange {
    callback: OnValueChange<Option<String>>,
    value: Option<String>,
}

impl HighlightChange {
    pub(crate) fn emit(self) {
        (self.callback)(self.value);
    }
}

/// Milliseconds after which type-ahead starts a new search.
pub const TYPEAHEAD_TIMEOUT_MS: u64 = 500;

#[derive(Clone, Debug, Default)]
pub(crate) struct OptionList {
    options: Vec<SelectOption>,
    visible: Vec<bool>,
    highlighted: Option<usize>,
    typeahead: String,
    last_typed: Option<u64>,
}

impl OptionList {
    pub(crate) fn new(options: Vec<SelectOption>) -> Self {
        let visible = vec![true; options.len()];
        Self {
            options,
            visible,
            ..Self::default()
        }
    }

    pub(crate) fn options(&self) -> &[SelectOption] {
        &self.options
    }

    /// Replace the options, keeping the highlight if its value survives.
    pub(crate) fn set_options(&mut self, options: Vec<SelectOption>) {
        let kept = self.highlighted_value().map(str::to_owned);
        self.visible = vec![true; options.len()];
        self.options = options;
        self.highlighted = kept.and_then(|v| self.position(&v)).filter(|&i| self.selectable(i));
    }

    pub(crate) fn position(&self, value: &str) -> Option<usize> {
        self.options.iter().position(|o| o.value == value)
    }

    pub(crate) fn get(&self, value: &str) -> Option<&SelectOption> {
        self.position(value).map(|i| &self.options[i])
    }

    pub(crate) fn is_visible(&self, index: usize) -> bool {
        self.visible.get(index).copied().unwrap_or(false)
    }

    pub(crate) fn selectable(&self, index: usize) -> bool {
        self.is_visible(index) && self.options.get(index).is_some_and(|o| !o.disabled)
    }

    pub(crate) fn visible_options(&self) -> Vec<SelectOption> {
        self.options
            .iter()
            .zip(&self.visible)
            .filter_map(|(o, &v)| v.then(|| o.clone()))
            .collect()
    }

    pub(crate) fn highlighted_value(&self) -> Option<&str> {
        self.highlighted.map(|i| self.options[i].value.as_str())
    }

    pub(crate) fn highlighted_owned(&self) -> Option<String> {
        self.highlighted_value().map(str::to_owned)
    }

    /// The pending report if the highlight differs from `before`.
    pub(crate) fn highlight_change(
        &self,
        before: &Option<String>,
        callback: Option<&OnValueChange<Option<String>>>,
    ) -> Option<HighlightChange> {
        let value = self.highlighted_owned();
        if value == *before {
            return None;
        }
        tracing::trace!(from = ?before, to = ?value, "highlight moved");
        callback.map(|cb| HighlightChange {
            callback: cb.clone(),
            value,
        })
    }

    /// Highlight `value` if it is visible and enabled.
    pub(crate) fn highlight(&mut self, value: &str) -> bool {
        match self.position(value).filter(|&i| self.selectable(i)) {
            Some(i) => {
                self.highlighted = Some(i);
                true
            }
            None => false,
        }
    }

    pub(crate) fn clear_highlight(&mut self) {
        self.highlighted = None;
        self.typeahead.clear();
        self.last_typed = None;
    }

    /// Drop the highlight but keep the type-ahead buffer.
    pub(crate) fn unset_highlight(&mut self) {
        self.highlighted = None;
    }

    pub(crate) fn highlight_first(&mut self) -> bool {
        self.highlighted = (0..self.options.len()).find(|&i| self.selectable(i));
        self.highlighted.is_some()
    }

    pub(crate) fn highlight_last(&mut self) -> bool {
        self.highlighted = (0..self.options.len()).rev().find(|&i| self.selectable(i));
        self.highlighted.is_some()
    }

    /// Move the highlight to the next (`forward`) or previous selectable option.
    ///
    /// With nothing highlighted this lands on the first or last one. At the
    /// ends the highlight wraps when `wrap` is set and stays put otherwise.
    pub(crate) fn move_highlight(&mut self, forward: bool, wrap: bool) -> bool {
        let Some(current) = self.highlighted else {
            return if forward {
                self.highlight_first()
            } else {
                self.highlight_last()
            };
        };
        let len = self.options.len();
        let next = if forward {
            (current + 1..len).find(|&i| self.selectable(i))
        } else {
            (0..current).rev().find(|&i| self.selectable(i))
        };
        let next = next.or_else(|| {
            if !wrap {
                return None;
            }
            if forward {
                (0..current).find(|&i| self.selectable(i))
            } else {
                (current + 1..len).rev().find(|&i| self.selectable(i))
            }
        });
        match next {
            Some(i) => {
                self.highlighted = Some(i);
                true
            }
            None => false,
        }
    }

    /// Show only options whose label contains `query`, ignoring case, and
    /// highlight the first selectable match (or nothing).
    pub(crate) fn filter(&mut self, query: &str) {
        let query = query.trim().to_lowercase();
        for (visible, option) in self.visible.iter_mut().zip(&self.options) {
            *visible = query.is_empty() || option.label.to_lowercase().contains(&query);
        }
        self.highlight_first();
        if self.highlighted.is_none() {
            tracing::trace!(query, "option filter left nothing selectable");
        }
    }

    pub(crate) fn show_all(&mut self) {
        self.visible.iter_mut().for_each(|v| *v = true);
    }

    /// Feed one typed character and return the option it lands on.
    ///
    /// Characters typed within [`TYPEAHEAD_TIMEOUT_MS`] of each other extend
    /// the search string. Repeating a single character cycles through the
    /// labels starting with it.
    pub(crate) fn typeahead(&mut self, c: char, timestamp: u64) -> Option<usize> {
        if self
            .last_typed
            .is_none_or(|last| timestamp.saturating_sub(last) > TYPEAHEAD_TIMEOUT_MS)
        {
            self.typeahead.clear();
        }
        self.last_typed = Some(timestamp);
        self.typeahead.extend(c.to_lowercase());

        let mut chars = self.typeahead.chars();
        let first = chars.next()?;
        let repeated = chars.all(|x| x == first);
        let needle = if repeated {
            first.to_string()
        } else {
            self.typeahead.clone()
        };
        let len = self.options.len();
        let start = match self.highlighted {
            // A new or repeated search moves past the current option.
            Some(i) if repeated => i + 1,
            Some(i) => i,
            None => 0,
        };
        let found = (0..len)
            .map(|k| (start + k) % len)
            .find(|&i| self.selectable(i) && self.options[i].label.to_lowercase().starts_with(&needle))?;
        self.highlighted = Some(found);
        Some(found)
    }

    /// Returns true while a type-ahead search is in progress at `timestamp`.
    pub(crate) fn is_typing(&self, timestamp: u64) -> bool {
        !self.typeahead.is_empty()
            && self
                .last_typed
                .is_some_and(|last| timestamp.saturating_sub(last) <= TYPEAHEAD_TIMEOUT_MS)
    }
}

/// The `data-value` of the option element containing `target`, if any.
pub(crate) fn option_value_at(dom: &Dom, listbox: ElementId, target: ElementId) -> Option<String> {
    dom.read(|d| {
        d.ancestors(target)
            .take_while(|&el| el != listbox)
            .find(|&el| d.attribute(el, "role") == Some("option"))
            .and_then(|el| d.attribute(el, "data-value").map(str::to_owned))
    })
    .flatten()
}

/// The `id` given to the option at `index`.
pub(crate) fn option_id(listbox_id: &str, index: usize) -> String {
    format!("{listbox_id}-option-{index}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fruits() -> OptionList {
        OptionList::new(vec![
            SelectOption::new("apple", "Apple"),
            SelectOption::new("apricot", "Apricot").disabled(),
            SelectOption::new("banana", "Banana"),
            SelectOption::new("blueberry", "Blueberry"),
            SelectOption::new("cherry", "Cherry"),
        ])
    }

    #[test]
    fn movement_skips_disabled_and_respects_wrap() {
        let mut list = fruits();
        assert!(list.move_highlight(true, false));
        assert_eq!(list.highlighted_value(), Some("apple"));
        list.move_highlight(true, false);
        assert_eq!(list.highlighted_value(), Some("banana"));
        list.highlight_last();
        assert!(!list.move_highlight(true, false));
        assert_eq!(list.highlighted_value(), Some("cherry"));
        assert!(list.move_highlight(true, true));
        assert_eq!(list.highlighted_value(), Some("apple"));
        list.move_highlight(false, true);
        assert_eq!(list.highlighted_value(), Some("cherry"));
        assert!(!list.highlight("apricot"));
    }

    #[test]
    fn typeahead_extends_and_cycles() {
        let mut list = fruits();
        assert_eq!(list.typeahead('b', 0), Some(2));
        assert_eq!(list.typeahead('l', 100), Some(3));
        // After the window closes a repeated letter cycles.
        assert_eq!(list.typeahead('b', 1000), Some(2));
        assert_eq!(list.typeahead('b', 1100), Some(3));
        assert_eq!(list.typeahead('b', 1200), Some(2));
        assert_eq!(list.typeahead('a', 5000), Some(0));
        assert_eq!(list.typeahead('a', 5100), Some(0), "disabled apricot is skipped");
        assert_eq!(list.typeahead('z', 9000), None);
        assert!(list.is_typing(9100));
        assert!(!list.is_typing(9600));
    }

    #[test]
    fn filter_hides_and_rehighlights() {
        let mut list = fruits();
        list.highlight("cherry");
        list.filter("AN");
        assert_eq!(list.highlighted_value(), Some("banana"));
        assert_eq!(list.visible_options().len(), 1);
        list.filter("ap");
        assert_eq!(list.highlighted_value(), Some("apple"));
        list.filter("apri");
        assert_eq!(list.highlighted_value(), None, "only match is disabled");
        assert!(!list.highlight("apple"));
        list.show_all();
        assert!(list.highlight("apple"));
    }

    #[test]
    fn set_options_keeps_surviving_highlight() {
        let mut list = fruits();
        list.highlight("banana");
        list.set_options(vec![SelectOption::new("banana", "Banana"), SelectOption::new("kiwi", "Kiwi")]);
        assert_eq!(list.highlighted_value(), Some("banana"));
        list.set_options(vec![SelectOption::new("kiwi", "Kiwi")]);
        assert_eq!(list.highlighted_value(), None);
    }

    #[test]
    fn highlight_change_only_when_moved() {
        use core::cell::RefCell;
        use std::rc::Rc;

        let seen = Rc::new(RefCell::new(Vec::new()));
        let log = seen.clone();
        let callback: OnValueChange<Option<String>> = Rc::new(move |v| log.borrow_mut().push(v));
        let mut list = fruits();

        let before = list.highlighted_owned();
        list.highlight_first();
        if let Some(change) = list.highlight_change(&before, Some(&callback)) {
            change.emit();
        }
        let before = list.highlighted_owned();
        list.highlight("apple");
        assert!(list.highlight_change(&before, Some(&callback)).is_none());
        list.unset_highlight();
        assert!(list.highlight_change(&before, None).is_none(), "no callback, no report");
        if let Some(change) = list.highlight_change(&before, Some(&callback)) {
            change.emit();
        }
        assert_eq!(*seen.borrow(), vec![Some("apple".to_owned()), None]);
    }
}
