// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trellis DOM: the headless document environment every Trellis primitive runs against.
//!
//! This crate provides:
//! - A [`Document`]: an element tree with generational [`ElementId`]s, attributes,
//!   layout boxes, scroll offsets, and the focused element.
//! - [`Selector`]: compound selector queries scoped to a container, including the
//!   shared [`FOCUSABLE_SELECTOR`].
//! - [`Dom`]: a clonable handle bundling the document with a listener registry and
//!   capture → target → bubble dispatch ([`dispatch`]), plus the default actions of
//!   Tab and pointer presses.
//! - [`ListenerGroup`] for scoped listener cleanup and [`ActivationStack`] for
//!   "topmost instance wins" coordination.
//!
//! A [`Dom::server`] handle has no document. Everything built on it is inert,
//! which is how primitives behave during server-side rendering.
//!
//! ## Minimal example
//!
//! ```rust
//! use kurbo::{Rect, Size};
//! use trellis_dom::{Dom, Key, Selector};
//!
//! let dom = Dom::new(Size::new(800.0, 600.0));
//! let body = dom.body().unwrap();
//!
//! let toolbar = dom.create_element("div").unwrap();
//! dom.append_child(body, toolbar);
//! let bold = dom.create_element("button").unwrap();
//! let italic = dom.create_element("button").unwrap();
//! dom.append_child(toolbar, bold);
//! dom.append_child(toolbar, italic);
//! dom.write(|d| d.set_rect(bold, Rect::new(0.0, 0.0, 40.0, 24.0)));
//!
//! assert_eq!(dom.query_all(toolbar, &Selector::focusable()), vec![bold, italic]);
//!
//! // Tab walks tabbable elements in document order.
//! dom.focus(bold);
//! dom.press(Key::Tab);
//! assert_eq!(dom.active_element(), Some(italic));
//! ```
//!
//! ## Reentrancy
//!
//! Listeners run without any borrow of the document or registry held, so they
//! may mutate the tree, move focus, dispatch further events, or remove
//! listeners. Components built on top follow the same rule for their own
//! callbacks.

mod document;
mod dom;
mod error;
mod event;
mod listeners;
mod selector;
mod stack;
mod types;

pub mod dispatch;

pub use document::{Descendants, Document};
pub use dom::{Dom, Handler, ListenerId, ListenerOptions, WeakDom};
pub use error::ConfigError;
pub use event::{Event, EventKind, EventType, Key, KeyboardEvent, Modifiers, PointerEvent};
pub use listeners::ListenerGroup;
pub use selector::{FOCUSABLE_SELECTOR, Selector};
pub use stack::{ActivationStack, StackEntryId};
pub use types::{ElementFlags, ElementId, Orientation, TextDirection};
