// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trellis Anchor: position floating elements (menus, listboxes, tooltips) against an anchor.
//!
//! - [`Placement`] names a side plus optional `start`/`end` alignment and parses from
//!   tokens such as `"bottom-start"`.
//! - [`compute_position`] is the pure geometry: anchor rect + floating size +
//!   placement + viewport → [`PositionUpdate`], with flip and shift collision handling.
//! - [`AnchorPosition`] binds one anchor/floating pair to a document and recomputes
//!   on scroll of any scrollable ancestor and on viewport resize.
//!
//! ## Example
//!
//! ```rust
//! use kurbo::{Rect, Size};
//! use trellis_anchor::{AnchorPosition, AnchorPositionOptions, apply_position};
//! use trellis_dom::Dom;
//!
//! let dom = Dom::new(Size::new(800.0, 600.0));
//! let body = dom.body().unwrap();
//! let trigger = dom.create_element("button").unwrap();
//! let menu = dom.create_element("div").unwrap();
//! dom.append_child(body, trigger);
//! dom.append_child(body, menu);
//! dom.write(|d| {
//!     d.set_rect(trigger, Rect::new(20.0, 20.0, 120.0, 50.0));
//!     d.set_rect(menu, Rect::new(0.0, 0.0, 160.0, 200.0));
//! });
//!
//! let position = AnchorPosition::new(
//!     &dom,
//!     AnchorPositionOptions {
//!         placement: "bottom-start".parse().unwrap(),
//!         offset: 4.0,
//!         ..AnchorPositionOptions::new(trigger, menu)
//!     },
//! );
//! let update = position.last_position().unwrap();
//! assert_eq!((update.left, update.top), (20.0, 54.0));
//!
//! apply_position(&dom, menu, update);
//! assert_eq!(dom.attribute(menu, "data-placement").as_deref(), Some("bottom-start"));
//! position.destroy();
//! ```

mod anchor;
mod compute;
mod placement;

pub use anchor::{AnchorPosition, AnchorPositionOptions, OnPositionChange, apply_position};
pub use compute::{Collision, PositionUpdate, compute_position};
pub use placement::{Alignment, Placement, Side};
