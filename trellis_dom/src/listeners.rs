// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scoped listener registration.

use smallvec::SmallVec;

use crate::dom::{Dom, ListenerId, ListenerOptions, WeakDom};
use crate::event::{Event, EventType};
use crate::types::ElementId;

/// A set of listeners removed together.
///
/// Primitives register everything they install through a group and clear it on
/// deactivate or destroy, so no listener outlives its owner. Dropping the group
/// clears it as well. The group only holds a weak reference to the document.
#[derive(Debug)]
pub struct ListenerGroup {
    dom: WeakDom,
    ids: SmallVec<[ListenerId; 4]>,
}

impl ListenerGroup {
    /// An empty group bound to `dom`.
    pub fn new(dom: &Dom) -> Self {
        Self {
            dom: dom.downgrade(),
            ids: SmallVec::new(),
        }
    }

    /// Register a listener in this group. Returns false if nothing was registered.
    pub fn listen(
        &mut self,
        target: ElementId,
        ty: EventType,
        options: ListenerOptions,
        handler: impl Fn(&mut Event) + 'static,
    ) -> bool {
        let Some(dom) = self.dom.upgrade() else {
            return false;
        };
        match dom.add_listener(target, ty, options, handler) {
            Some(id) => {
                self.ids.push(id);
                true
            }
            None => false,
        }
    }

    /// Remove every listener in the group.
    pub fn clear(&mut self) {
        if self.ids.is_empty() {
            return;
        }
        if let Some(dom) = self.dom.upgrade() {
            for id in self.ids.drain(..) {
                dom.remove_listener(id);
            }
        } else {
            self.ids.clear();
        }
    }

    /// Number of listeners currently registered through the group.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Returns true if the group holds no listeners.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl Drop for ListenerGroup {
    fn drop(&mut self) {
        self.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Size;

    #[test]
    fn clear_and_drop_remove_listeners() {
        let dom = Dom::new(Size::new(10.0, 10.0));
        let body = dom.body().unwrap();
        let mut group = ListenerGroup::new(&dom);
        assert!(group.listen(body, EventType::KeyDown, ListenerOptions::BUBBLE, |_| {}));
        assert!(group.listen(body, EventType::FocusIn, ListenerOptions::CAPTURE, |_| {}));
        assert_eq!(dom.listener_count(), 2);
        group.clear();
        assert!(group.is_empty());
        assert_eq!(dom.listener_count(), 0);

        group.listen(body, EventType::KeyDown, ListenerOptions::BUBBLE, |_| {});
        drop(group);
        assert_eq!(dom.listener_count(), 0);
    }

    #[test]
    fn server_group_registers_nothing() {
        let dom = Dom::server();
        let mut group = ListenerGroup::new(&dom);
        assert!(!group.listen(ElementId::INERT, EventType::KeyDown, ListenerOptions::BUBBLE, |_| {}));
        assert!(group.is_empty());
    }
}
