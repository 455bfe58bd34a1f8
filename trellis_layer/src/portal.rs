// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Portals: move elements into a container outside normal layout flow.

use core::cell::RefCell;
use std::rc::Rc;

use trellis_dom::{Dom, ElementId};

#[derive(Copy, Clone, Debug)]
struct Origin {
    parent: Option<ElementId>,
    next_sibling: Option<ElementId>,
}

#[derive(Debug)]
struct PortalInner {
    dom: Dom,
    container: Option<ElementId>,
    mounted: Vec<(ElementId, Origin)>,
}

/// A portal bound to one container (by default the body).
///
/// [`mount`](Self::mount) moves an element to the end of the container and
/// remembers where it came from; [`unmount`](Self::unmount) puts it back
/// before its original next sibling, or detaches it if its original parent
/// is gone. Both are idempotent. [`teardown`](Self::teardown) unmounts
/// everything. On a server [`Dom`] every operation is a no-op.
///
/// ```rust
/// use kurbo::Size;
/// use trellis_dom::Dom;
/// use trellis_layer::Portal;
///
/// let dom = Dom::new(Size::new(800.0, 600.0));
/// let body = dom.body().unwrap();
/// let card = dom.create_element("section").unwrap();
/// dom.append_child(body, card);
/// let tooltip = dom.create_element("div").unwrap();
/// dom.append_child(card, tooltip);
///
/// let portal = Portal::new(&dom);
/// portal.mount(tooltip);
/// assert_eq!(dom.read(|d| d.parent_of(tooltip)).flatten(), Some(body));
///
/// portal.unmount(tooltip);
/// assert_eq!(dom.read(|d| d.parent_of(tooltip)).flatten(), Some(card));
/// ```
#[derive(Clone, Debug)]
pub struct Portal {
    inner: Rc<RefCell<PortalInner>>,
}

impl Portal {
    /// A portal into the document body.
    pub fn new(dom: &Dom) -> Self {
        Self::with_container_opt(dom, dom.body())
    }

    /// A portal into `container`.
    pub fn with_container(dom: &Dom, container: ElementId) -> Self {
        Self::with_container_opt(dom, dom.is_available().then_some(container))
    }

    fn with_container_opt(dom: &Dom, container: Option<ElementId>) -> Self {
        Self {
            inner: Rc::new(RefCell::new(PortalInner {
                dom: dom.clone(),
                container,
                mounted: Vec::new(),
            })),
        }
    }

    /// The container elements are mounted into; `None` on a server `Dom`.
    pub fn container(&self) -> Option<ElementId> {
        self.inner.borrow().container
    }

    /// Move `el` into the container. Returns true if `el` is (now) mounted.
    pub fn mount(&self, el: ElementId) -> bool {
        let (dom, container) = {
            let inner = self.inner.borrow();
            if inner.mounted.iter().any(|(m, _)| *m == el) {
                return true;
            }
            let Some(container) = inner.container else {
                return false;
            };
            (inner.dom.clone(), container)
        };
        let Some(origin) = dom.read(|d| {
            if !d.is_alive(el) || !d.is_alive(container) || d.contains(el, container) {
                return None;
            }
            let parent = d.parent_of(el);
            let next_sibling = parent.and_then(|p| {
                let siblings = d.children_of(p);
                let idx = siblings.iter().position(|&s| s == el)?;
                siblings.get(idx + 1).copied()
            });
            Some(Origin {
                parent,
                next_sibling,
            })
        })
        .flatten() else {
            return false;
        };
        self.inner.borrow_mut().mounted.push((el, origin));
        dom.append_child(container, el);
        tracing::debug!(?el, ?container, "portal mounted element");
        true
    }

    /// Return `el` to where it was mounted from. Returns false if it was not mounted.
    pub fn unmount(&self, el: ElementId) -> bool {
        let (dom, origin) = {
            let mut inner = self.inner.borrow_mut();
            let Some(idx) = inner.mounted.iter().position(|(m, _)| *m == el) else {
                return false;
            };
            let (_, origin) = inner.mounted.remove(idx);
            (inner.dom.clone(), origin)
        };
        if !dom.is_alive(el) {
            return true;
        }
        match origin.parent.filter(|&p| dom.is_alive(p)) {
            Some(parent) => {
                let reference = origin
                    .next_sibling
                    .filter(|&s| dom.read(|d| d.parent_of(s)).flatten() == Some(parent));
                dom.insert_before(parent, el, reference);
            }
            None => dom.detach(el),
        }
        tracing::debug!(?el, "portal unmounted element");
        true
    }

    /// Returns true if `el` is currently mounted through this portal.
    pub fn is_mounted(&self, el: ElementId) -> bool {
        self.inner.borrow().mounted.iter().any(|(m, _)| *m == el)
    }

    /// Mounted elements, in mount order.
    pub fn mounted(&self) -> Vec<ElementId> {
        self.inner.borrow().mounted.iter().map(|(m, _)| *m).collect()
    }

    /// Unmount every element, most recent first.
    pub fn teardown(&self) {
        let all = self.mounted();
        for el in all.into_iter().rev() {
            self.unmount(el);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Size;

    fn parent(dom: &Dom, el: ElementId) -> Option<ElementId> {
        dom.read(|d| d.parent_of(el)).flatten()
    }

    #[test]
    fn mount_is_idempotent_and_restores_sibling_order() {
        let dom = Dom::new(Size::new(800.0, 600.0));
        let body = dom.body().unwrap();
        let list = dom.create_element("ul").unwrap();
        dom.append_child(body, list);
        let [a, b, c] = ["li", "li", "li"].map(|t| {
            let el = dom.create_element(t).unwrap();
            dom.append_child(list, el);
            el
        });

        let portal = Portal::new(&dom);
        assert!(portal.mount(b));
        assert!(portal.mount(b));
        assert_eq!(portal.mounted(), vec![b]);
        assert_eq!(parent(&dom, b), Some(body));
        assert_eq!(dom.read(|d| d.children_of(list).to_vec()), Some(vec![a, c]));

        assert!(portal.unmount(b));
        assert!(!portal.unmount(b));
        assert_eq!(dom.read(|d| d.children_of(list).to_vec()), Some(vec![a, b, c]));
    }

    #[test]
    fn unmount_detaches_when_origin_is_gone() {
        let dom = Dom::new(Size::new(800.0, 600.0));
        let host = dom.create_element("div").unwrap();
        dom.append_child(dom.body().unwrap(), host);
        let el = dom.create_element("div").unwrap();
        dom.append_child(host, el);

        let portal = Portal::new(&dom);
        portal.mount(el);
        dom.remove(host);
        portal.unmount(el);
        assert!(dom.is_alive(el));
        assert_eq!(parent(&dom, el), None);
    }

    #[test]
    fn custom_container_and_teardown() {
        let dom = Dom::new(Size::new(800.0, 600.0));
        let body = dom.body().unwrap();
        let layer_root = dom.create_element("div").unwrap();
        dom.append_child(body, layer_root);
        let x = dom.create_element("div").unwrap();
        let y = dom.create_element("div").unwrap();

        let portal = Portal::with_container(&dom, layer_root);
        portal.mount(x);
        portal.mount(y);
        assert_eq!(dom.read(|d| d.children_of(layer_root).to_vec()), Some(vec![x, y]));
        portal.teardown();
        assert!(portal.mounted().is_empty());
        assert_eq!(parent(&dom, x), None, "detached elements go back to being detached");
        assert_eq!(parent(&dom, y), None);
    }

    #[test]
    fn refuses_to_mount_an_ancestor_of_the_container() {
        let dom = Dom::new(Size::new(800.0, 600.0));
        let outer = dom.create_element("div").unwrap();
        dom.append_child(dom.body().unwrap(), outer);
        let target = dom.create_element("div").unwrap();
        dom.append_child(outer, target);
        let portal = Portal::with_container(&dom, target);
        assert!(!portal.mount(outer));
        assert!(!portal.is_mounted(outer));
    }

    #[test]
    fn server_portal_is_inert() {
        let portal = Portal::new(&Dom::server());
        assert_eq!(portal.container(), None);
        assert!(!portal.mount(ElementId::INERT));
        assert!(portal.mounted().is_empty());
        portal.teardown();
    }
}
