// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A shared LIFO stack of activation entries.
//!
//! Focus traps and dismissable layers both need "only the topmost active
//! instance reacts". [`ActivationStack`] tracks insertion order by identity:
//! entries may be removed from any position, and the remaining order is kept.
//!
//! ```
//! use trellis_dom::ActivationStack;
//!
//! let stack = ActivationStack::new();
//! let outer = stack.push();
//! let inner = stack.push();
//! assert_eq!(stack.top(), Some(inner));
//!
//! // Removing from the middle keeps the order of the rest.
//! stack.remove(outer);
//! assert_eq!(stack.top(), Some(inner));
//! assert_eq!(stack.len(), 1);
//! ```

use core::cell::RefCell;
use std::rc::Rc;

/// Identity of an entry on an [`ActivationStack`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StackEntryId(u64);

#[derive(Debug, Default)]
struct StackInner {
    next_id: u64,
    entries: Vec<StackEntryId>,
}

/// A clonable handle to a shared LIFO stack.
#[derive(Clone, Debug, Default)]
pub struct ActivationStack {
    inner: Rc<RefCell<StackInner>>,
}

impl ActivationStack {
    /// An empty stack.
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a new entry and return its identity.
    pub fn push(&self) -> StackEntryId {
        let mut inner = self.inner.borrow_mut();
        inner.next_id += 1;
        let id = StackEntryId(inner.next_id);
        inner.entries.push(id);
        id
    }

    /// Remove an entry wherever it sits. Returns false if it was not present.
    pub fn remove(&self, id: StackEntryId) -> bool {
        let mut inner = self.inner.borrow_mut();
        match inner.entries.iter().position(|e| *e == id) {
            Some(idx) => {
                inner.entries.remove(idx);
                true
            }
            None => false,
        }
    }

    /// The most recently pushed entry still present.
    pub fn top(&self) -> Option<StackEntryId> {
        self.inner.borrow().entries.last().copied()
    }

    /// Returns true if `id` is the topmost entry.
    pub fn is_top(&self, id: StackEntryId) -> bool {
        self.top() == Some(id)
    }

    /// The entry directly below `id`, if any.
    pub fn below(&self, id: StackEntryId) -> Option<StackEntryId> {
        let inner = self.inner.borrow();
        let idx = inner.entries.iter().position(|e| *e == id)?;
        idx.checked_sub(1).map(|i| inner.entries[i])
    }

    /// Returns true if `id` is on the stack.
    pub fn contains(&self, id: StackEntryId) -> bool {
        self.inner.borrow().entries.contains(&id)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.inner.borrow().entries.len()
    }

    /// Returns true if the stack is empty.
    pub fn is_empty(&self) -> bool {
        self.inner.borrow().entries.is_empty()
    }

    /// Returns true if both handles share the same stack.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lifo_order_and_removal_by_identity() {
        let stack = ActivationStack::new();
        let a = stack.push();
        let b = stack.push();
        let c = stack.push();
        assert_eq!(stack.top(), Some(c));
        assert_eq!(stack.below(c), Some(b));
        assert!(stack.remove(b));
        assert!(!stack.remove(b));
        assert_eq!(stack.below(c), Some(a));
        assert!(stack.remove(c));
        assert!(stack.is_top(a));
        assert!(stack.remove(a));
        assert!(stack.is_empty());
        assert_eq!(stack.top(), None);
    }

    #[test]
    fn clones_share_entries() {
        let stack = ActivationStack::new();
        let other = stack.clone();
        let id = other.push();
        assert!(stack.contains(id));
        assert!(stack.ptr_eq(&other));
        assert!(!stack.ptr_eq(&ActivationStack::new()));
    }
}
