// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Attribute sets handed to wrappers, plus callback aliases shared by behaviors.

use core::cell::Cell;
use std::rc::Rc;

use smallvec::SmallVec;
use trellis_dom::{Dom, ElementId};

/// Called with the new open state after a behavior opens or closes.
pub type OnOpenChange = Rc<dyn Fn(bool)>;

/// Called with the new value after it changes.
pub type OnValueChange<T> = Rc<dyn Fn(T)>;

/// Attributes a wrapper should render on one element.
///
/// Entries are either set to a value or marked for removal, so that
/// [`Props::apply`] can also clear attributes that no longer apply (for
/// example `aria-activedescendant` once nothing is highlighted).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Props {
    attrs: SmallVec<[(&'static str, Option<String>); 8]>,
}

impl Props {
    /// An empty attribute set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `name` to `value`, replacing an earlier entry.
    pub fn set(&mut self, name: &'static str, value: impl Into<String>) -> &mut Self {
        self.put(name, Some(value.into()));
        self
    }

    /// Mark `name` for removal.
    pub fn unset(&mut self, name: &'static str) -> &mut Self {
        self.put(name, None);
        self
    }

    /// Builder form of [`Props::set`].
    pub fn with(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.set(name, value);
        self
    }

    /// Set `name` when `value` is `Some`, otherwise mark it for removal.
    pub fn with_opt(mut self, name: &'static str, value: Option<impl Into<String>>) -> Self {
        self.put(name, value.map(Into::into));
        self
    }

    fn put(&mut self, name: &'static str, value: Option<String>) {
        match self.attrs.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.attrs.push((name, value)),
        }
    }

    /// The value `name` is set to, if any.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(n, _)| *n == name)
            .and_then(|(_, v)| v.as_deref())
    }

    /// Attributes with a value, in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> + '_ {
        self.attrs
            .iter()
            .filter_map(|(n, v)| v.as_deref().map(|v| (*n, v)))
    }

    /// Number of entries, including removals.
    pub fn len(&self) -> usize {
        self.attrs.len()
    }

    /// Returns true if there are no entries.
    pub fn is_empty(&self) -> bool {
        self.attrs.is_empty()
    }

    /// Write the attributes onto `el`, removing the ones marked for removal.
    pub fn apply(&self, dom: &Dom, el: ElementId) {
        for (name, value) in &self.attrs {
            match value {
                Some(v) => dom.set_attribute(el, name, v),
                None => dom.remove_attribute(el, name),
            }
        }
    }
}

thread_local! {
    static NEXT_ID: Cell<u64> = const { Cell::new(1) };
}

/// The element's `id`, assigning a fresh `trellis-{prefix}-{n}` one if it has none.
pub(crate) fn ensure_id(dom: &Dom, el: ElementId, prefix: &str) -> String {
    if let Some(id) = dom.attribute(el, "id") {
        return id;
    }
    let n = NEXT_ID.with(|c| {
        let n = c.get();
        c.set(n + 1);
        n
    });
    let id = format!("trellis-{prefix}-{n}");
    dom.set_attribute(el, "id", &id);
    id
}

pub(crate) fn bool_attr(value: bool) -> &'static str {
    if value { "true" } else { "false" }
}
