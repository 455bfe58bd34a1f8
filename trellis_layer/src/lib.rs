// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trellis Layer: overlay plumbing.
//!
//! - [`DismissableLayer`]: closes on outside pointer presses or Escape, aware of
//!   other open overlays through a [`LayerStack`] so only the topmost reacts.
//! - [`Portal`]: moves overlay content into a container (by default the body)
//!   and puts it back where it came from.
//!
//! ## Nested layers
//!
//! ```rust
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use kurbo::Size;
//! use trellis_dom::{Dom, Key};
//! use trellis_layer::{DismissableLayer, DismissableLayerOptions, LayerStack};
//!
//! let dom = Dom::new(Size::new(800.0, 600.0));
//! let body = dom.body().unwrap();
//! let stack = LayerStack::new();
//! let closed = Rc::new(RefCell::new(Vec::new()));
//!
//! let make = |name: &'static str| {
//!     let content = dom.create_element("div").unwrap();
//!     dom.append_child(body, content);
//!     let log = closed.clone();
//!     DismissableLayer::new(
//!         &dom,
//!         DismissableLayerOptions {
//!             on_dismiss: Some(Rc::new(move |_| log.borrow_mut().push(name))),
//!             stack: Some(stack.clone()),
//!             ..DismissableLayerOptions::new(content)
//!         },
//!     )
//! };
//! let dialog = make("dialog");
//! let popover = make("popover");
//! dialog.activate();
//! popover.activate();
//!
//! // Escape closes only the popover.
//! dom.press(Key::Escape);
//! assert_eq!(*closed.borrow(), ["popover"]);
//! popover.deactivate();
//!
//! dom.press(Key::Escape);
//! assert_eq!(*closed.borrow(), ["popover", "dialog"]);
//! ```

mod dismissable;
mod portal;
mod stack;

pub use dismissable::{DismissReason, DismissableLayer, DismissableLayerOptions, OnDismiss};
pub use portal::Portal;
pub use stack::LayerStack;
