// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The dismissable-layer stack.

use trellis_dom::{ActivationStack, StackEntryId};

/// Ordered stack of active dismissable layers, most recently activated last.
///
/// Only the top layer reacts to outside pointer presses and Escape. Layers
/// push themselves on activation and remove their own entry (by identity) on
/// deactivation, so out-of-order teardown is safe.
///
/// Clones share the same stack. [`LayerStack::global`] is the per-thread
/// default; tests construct a fresh stack with [`LayerStack::new`].
#[derive(Clone, Debug, Default)]
pub struct LayerStack {
    entries: ActivationStack,
}

thread_local! {
    static GLOBAL_LAYERS: LayerStack = LayerStack::new();
}

impl LayerStack {
    /// A fresh, empty stack.
    pub fn new() -> Self {
        Self::default()
    }

    /// The per-thread default stack.
    pub fn global() -> Self {
        GLOBAL_LAYERS.with(Clone::clone)
    }

    /// Number of active layers.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no layer is active.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns true if both handles share the same stack.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        self.entries.ptr_eq(&other.entries)
    }

    pub(crate) fn push(&self) -> StackEntryId {
        self.entries.push()
    }

    pub(crate) fn remove(&self, id: StackEntryId) -> bool {
        self.entries.remove(id)
    }

    pub(crate) fn is_top(&self, id: StackEntryId) -> bool {
        self.entries.is_top(id)
    }
}
