// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Live anchored positioning bound to a document.

use core::cell::RefCell;
use std::rc::{Rc, Weak};

use kurbo::Rect;
use trellis_dom::{Dom, ElementId, EventType, ListenerGroup, ListenerOptions};

use crate::compute::{Collision, PositionUpdate, compute_position};
use crate::placement::Placement;

/// Callback receiving every recomputed position.
pub type OnPositionChange = Rc<dyn Fn(PositionUpdate)>;

/// Configuration for [`AnchorPosition`].
#[derive(Clone)]
pub struct AnchorPositionOptions {
    /// Reference element.
    pub anchor: ElementId,
    /// Positioned element; its current box supplies the size.
    pub floating: ElementId,
    /// Requested placement.
    pub placement: Placement,
    /// Gap between anchor and floating element.
    pub offset: f64,
    /// Flip on overflow.
    pub flip: bool,
    /// Clamp into the viewport along the cross axis.
    pub shift: bool,
    /// Called after every recomputation.
    pub on_position_change: Option<OnPositionChange>,
}

impl core::fmt::Debug for AnchorPositionOptions {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AnchorPositionOptions")
            .field("anchor", &self.anchor)
            .field("floating", &self.floating)
            .field("placement", &self.placement)
            .field("offset", &self.offset)
            .field("flip", &self.flip)
            .field("shift", &self.shift)
            .field("on_position_change", &self.on_position_change.is_some())
            .finish()
    }
}

impl AnchorPositionOptions {
    /// `bottom` placement with flip, no offset, and no shift.
    pub fn new(anchor: ElementId, floating: ElementId) -> Self {
        Self {
            anchor,
            floating,
            placement: Placement::default(),
            offset: 0.0,
            flip: true,
            shift: false,
            on_position_change: None,
        }
    }
}

/// Keeps a floating element positioned against its anchor.
///
/// Construction computes a first position and subscribes to `scroll` on every
/// scrollable ancestor of the anchor (including the document root) and to
/// viewport `resize`. Each event recomputes and reports through
/// `on_position_change`. Call [`destroy`](Self::destroy) when the overlay
/// closes; dropping the last clone releases the subscriptions as well.
///
/// The handle does not move the floating element itself; callers apply the
/// reported position, for example with [`apply_position`].
#[derive(Clone, Debug)]
pub struct AnchorPosition {
    inner: Rc<RefCell<AnchorInner>>,
}

#[derive(Debug)]
struct AnchorInner {
    dom: Dom,
    options: AnchorPositionOptions,
    last: Option<PositionUpdate>,
    listeners: ListenerGroup,
    destroyed: bool,
}

impl AnchorPosition {
    /// Subscribe and compute the initial position.
    pub fn new(dom: &Dom, options: AnchorPositionOptions) -> Self {
        let anchor = options.anchor;
        let this = Self {
            inner: Rc::new(RefCell::new(AnchorInner {
                dom: dom.clone(),
                options,
                last: None,
                listeners: ListenerGroup::new(dom),
                destroyed: false,
            })),
        };
        let targets = dom
            .read(|d| {
                let mut t = d.scroll_ancestors(anchor);
                if !t.contains(&d.root()) {
                    t.push(d.root());
                }
                t
            })
            .unwrap_or_default();
        {
            let mut inner = this.inner.borrow_mut();
            for &target in &targets {
                let weak = Rc::downgrade(&this.inner);
                inner.listeners.listen(
                    target,
                    EventType::Scroll,
                    ListenerOptions::BUBBLE,
                    move |_| refresh(&weak),
                );
            }
            if let Some(&root) = targets.last() {
                let weak = Rc::downgrade(&this.inner);
                inner.listeners.listen(
                    root,
                    EventType::Resize,
                    ListenerOptions::BUBBLE,
                    move |_| refresh(&weak),
                );
            }
        }
        tracing::debug!(?anchor, scroll_targets = targets.len(), "anchor position created");
        this.update();
        this
    }

    /// Recompute now and report the result.
    ///
    /// Returns `None` without a document, after `destroy`, or if either element is gone.
    pub fn update(&self) -> Option<PositionUpdate> {
        let (update, callback) = {
            let mut inner = self.inner.borrow_mut();
            if inner.destroyed {
                return None;
            }
            let o = &inner.options;
            let update = inner.dom.read(|d| {
                let anchor = d.rect(o.anchor)?;
                let floating = d.rect(o.floating)?.size();
                Some(compute_position(
                    anchor,
                    floating,
                    o.placement,
                    d.viewport(),
                    Collision {
                        offset: o.offset,
                        flip: o.flip,
                        shift: o.shift,
                    },
                ))
            })??;
            inner.last = Some(update);
            (update, inner.options.on_position_change.clone())
        };
        if let Some(cb) = callback {
            cb(update);
        }
        Some(update)
    }

    /// The most recently computed position.
    pub fn last_position(&self) -> Option<PositionUpdate> {
        self.inner.borrow().last
    }

    /// Change the requested placement and recompute.
    pub fn set_placement(&self, placement: Placement) -> Option<PositionUpdate> {
        self.inner.borrow_mut().options.placement = placement;
        self.update()
    }

    /// Release every scroll and resize subscription. Later updates do nothing.
    pub fn destroy(&self) {
        let mut inner = self.inner.borrow_mut();
        inner.listeners.clear();
        inner.destroyed = true;
        tracing::debug!(anchor = ?inner.options.anchor, "anchor position destroyed");
    }
}

fn refresh(weak: &Weak<RefCell<AnchorInner>>) {
    if let Some(inner) = weak.upgrade() {
        AnchorPosition { inner }.update();
    }
}

/// Write `update` onto `floating`: inline `style`, `data-placement`, and its box.
pub fn apply_position(dom: &Dom, floating: ElementId, update: PositionUpdate) {
    let PositionUpdate {
        top,
        left,
        placement,
    } = update;
    dom.set_attribute(
        floating,
        "style",
        &format!("position: fixed; top: {top}px; left: {left}px"),
    );
    dom.set_attribute(floating, "data-placement", &placement.to_string());
    dom.write(|d| {
        if let Some(r) = d.rect(floating) {
            d.set_rect(floating, Rect::from_origin_size((left, top), r.size()));
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::{Size, Vec2};
    use trellis_dom::ElementFlags;

    struct Fixture {
        dom: Dom,
        scroller: ElementId,
        anchor: ElementId,
        floating: ElementId,
    }

    fn fixture() -> Fixture {
        let dom = Dom::new(Size::new(800.0, 600.0));
        let body = dom.body().unwrap();
        let scroller = dom.create_element("div").unwrap();
        dom.append_child(body, scroller);
        dom.toggle_flags(scroller, ElementFlags::SCROLLABLE, true);
        let anchor = dom.create_element("button").unwrap();
        dom.append_child(scroller, anchor);
        let floating = dom.create_element("div").unwrap();
        dom.append_child(body, floating);
        dom.write(|d| {
            d.set_rect(scroller, Rect::new(0.0, 0.0, 800.0, 600.0));
            d.set_rect(anchor, Rect::new(100.0, 100.0, 200.0, 130.0));
            d.set_rect(floating, Rect::new(0.0, 0.0, 120.0, 80.0));
        });
        Fixture {
            dom,
            scroller,
            anchor,
            floating,
        }
    }

    #[test]
    fn recomputes_on_scroll_and_resize_until_destroyed() {
        let f = fixture();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let log = seen.clone();
        let anchor = AnchorPosition::new(
            &f.dom,
            AnchorPositionOptions {
                placement: "bottom-start".parse().unwrap(),
                offset: 4.0,
                on_position_change: Some(Rc::new(move |u| log.borrow_mut().push(u))),
                ..AnchorPositionOptions::new(f.anchor, f.floating)
            },
        );
        let first = anchor.last_position().unwrap();
        assert_eq!((first.left, first.top), (100.0, 134.0));

        // Scrolling the anchor near the bottom edge flips the placement.
        f.dom.scroll_by(f.scroller, Vec2::new(0.0, -420.0));
        let flipped = anchor.last_position().unwrap();
        assert_eq!(flipped.placement.to_string(), "top-start");
        assert_eq!(flipped.top, 520.0 - 4.0 - 80.0);

        f.dom.resize(Size::new(800.0, 1000.0));
        assert_eq!(anchor.last_position().unwrap().placement.to_string(), "bottom-start");
        assert_eq!(seen.borrow().len(), 3);

        anchor.destroy();
        assert_eq!(f.dom.listener_count(), 0);
        f.dom.resize(Size::new(800.0, 600.0));
        assert_eq!(seen.borrow().len(), 3);
        assert_eq!(anchor.update(), None);
    }

    #[test]
    fn apply_writes_style_and_placement() {
        let f = fixture();
        let anchor = AnchorPosition::new(&f.dom, AnchorPositionOptions::new(f.anchor, f.floating));
        let update = anchor.last_position().unwrap();
        apply_position(&f.dom, f.floating, update);
        assert_eq!(f.dom.attribute(f.floating, "data-placement").as_deref(), Some("bottom"));
        assert_eq!(
            f.dom.attribute(f.floating, "style").as_deref(),
            Some("position: fixed; top: 130px; left: 90px")
        );
        assert_eq!(
            f.dom.read(|d| d.rect(f.floating)).flatten(),
            Some(Rect::new(90.0, 130.0, 210.0, 210.0))
        );
    }

    #[test]
    fn removed_elements_and_server_dom_yield_nothing() {
        let f = fixture();
        let anchor = AnchorPosition::new(&f.dom, AnchorPositionOptions::new(f.anchor, f.floating));
        f.dom.remove(f.floating);
        assert_eq!(anchor.update(), None);

        let ssr = AnchorPosition::new(
            &Dom::server(),
            AnchorPositionOptions::new(ElementId::INERT, ElementId::INERT),
        );
        assert_eq!(ssr.last_position(), None);
    }

    #[test]
    fn dropping_releases_subscriptions() {
        let f = fixture();
        let anchor = AnchorPosition::new(&f.dom, AnchorPositionOptions::new(f.anchor, f.floating));
        assert_eq!(f.dom.listener_count(), 3);
        drop(anchor);
        assert_eq!(f.dom.listener_count(), 0);
    }
}
