// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A floating element anchored to its opener and dismissed from outside.

use core::cell::RefCell;
use std::rc::Rc;

use trellis_anchor::{AnchorPosition, AnchorPositionOptions, Placement, apply_position};
use trellis_dom::{Dom, ElementId};
use trellis_layer::{DismissableLayer, DismissableLayerOptions, LayerStack, OnDismiss};

#[derive(Clone, Debug)]
pub(crate) struct Popup {
    dom: Dom,
    anchor: ElementId,
    floating: ElementId,
    placement: Placement,
    offset: f64,
    layer: DismissableLayer,
    position: Rc<RefCell<Option<AnchorPosition>>>,
}

impl Popup {
    /// `anchor` is excluded from outside presses so it can toggle the popup itself.
    pub(crate) fn new(
        dom: &Dom,
        anchor: ElementId,
        floating: ElementId,
        placement: Placement,
        offset: f64,
        stack: Option<LayerStack>,
        on_dismiss: OnDismiss,
    ) -> Self {
        let layer = DismissableLayer::new(
            dom,
            DismissableLayerOptions {
                exclude: vec![anchor],
                on_dismiss: Some(on_dismiss),
                stack,
                ..DismissableLayerOptions::new(floating)
            },
        );
        Self {
            dom: dom.clone(),
            anchor,
            floating,
            placement,
            offset,
            layer,
            position: Rc::new(RefCell::new(None)),
        }
    }

    pub(crate) fn show(&self) {
        self.layer.activate();
        let dom = self.dom.downgrade();
        let floating = self.floating;
        let position = AnchorPosition::new(
            &self.dom,
            AnchorPositionOptions {
                placement: self.placement,
                offset: self.offset,
                on_position_change: Some(Rc::new(move |update| {
                    if let Some(dom) = dom.upgrade() {
                        apply_position(&dom, floating, update);
                    }
                })),
                ..AnchorPositionOptions::new(self.anchor, self.floating)
            },
        );
        if let Some(old) = self.position.replace(Some(position)) {
            old.destroy();
        }
    }

    pub(crate) fn hide(&self) {
        if let Some(position) = self.position.take() {
            position.destroy();
        }
        self.layer.deactivate();
    }

    pub(crate) fn placement(&self) -> Option<Placement> {
        self.position
            .borrow()
            .as_ref()
            .and_then(AnchorPosition::last_position)
            .map(|p| p.placement)
    }
}
