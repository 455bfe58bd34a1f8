// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trellis Focus: focus management primitives.
//!
//! This crate models focus management as a combination of:
//! - **Navigation intents** ([`Navigation`]) such as [`Navigation::Next`] or arrow
//!   directions, resolved over a read-only [`FocusSpace`] by a [`FocusPolicy`].
//! - **Focusable-element sets** ([`focusable_elements`]), recomputed from the
//!   document every time they are needed.
//! - **Focus traps** ([`FocusTrap`]) that confine Tab cycling to a container and
//!   nest through a [`TrapStack`].
//! - **Roving tabindex** ([`RovingFocus`]) for composite widgets such as toolbars,
//!   listboxes, and menus.
//!
//! ## Minimal example
//!
//! A dialog-like container traps Tab:
//!
//! ```rust
//! use kurbo::Size;
//! use trellis_dom::{Dom, Key, KeyboardEvent};
//! use trellis_focus::{FocusTrap, FocusTrapOptions, TrapStack};
//!
//! let dom = Dom::new(Size::new(800.0, 600.0));
//! let dialog = dom.create_element("div").unwrap();
//! dom.append_child(dom.body().unwrap(), dialog);
//! let ok = dom.create_element("button").unwrap();
//! let cancel = dom.create_element("button").unwrap();
//! dom.append_child(dialog, ok);
//! dom.append_child(dialog, cancel);
//!
//! let trap = FocusTrap::new(
//!     &dom,
//!     FocusTrapOptions { stack: Some(TrapStack::new()), ..FocusTrapOptions::new(dialog) },
//! );
//! trap.activate();
//! assert_eq!(dom.active_element(), Some(ok));
//!
//! // Shift+Tab from the first element wraps to the last.
//! dom.key_down(KeyboardEvent::shifted(Key::Tab));
//! assert_eq!(dom.active_element(), Some(cancel));
//! ```
//!
//! The navigation policy can also be used on its own:
//!
//! ```rust
//! use kurbo::Rect;
//! use trellis_focus::{DefaultPolicy, FocusEntry, FocusPolicy, FocusSpace, Navigation};
//!
//! let entries = [
//!     FocusEntry { id: 1_u32, rect: Rect::new(0.0, 0.0, 10.0, 10.0), enabled: true },
//!     FocusEntry { id: 2_u32, rect: Rect::new(20.0, 0.0, 30.0, 10.0), enabled: true },
//! ];
//! let space = FocusSpace { nodes: &entries };
//! let policy = DefaultPolicy::default();
//! assert_eq!(policy.next(Some(1), Navigation::Right, &space), Some(2));
//! assert_eq!(policy.next(Some(2), Navigation::Next, &space), Some(1));
//! ```

mod focusable;
mod policy;
mod roving;
mod trap;

pub use focusable::focusable_elements;
pub use policy::{DefaultPolicy, FocusEntry, FocusPolicy, FocusSpace, Navigation, WrapMode};
pub use roving::{OnFocus, RovingFocus, RovingFocusOptions};
pub use trap::{FocusTrap, FocusTrapOptions, TrapStack};
