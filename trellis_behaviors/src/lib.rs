// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trellis Behaviors: headless state machines for composite widgets.
//!
//! Each behavior is a clonable handle built from a plain config struct. It
//! owns the widget's state, exposes the ARIA and `data-*` attributes a
//! wrapper should render through [`Props`], and reports changes through
//! callbacks. Overlay behaviors compose the lower crates:
//!
//! - [`Dialog`]: dismissable layer, focus trap (when modal), presence.
//! - [`Select`] and [`Combobox`]: dismissable layer plus an anchored listbox,
//!   with a highlighted option tracked apart from the chosen value.
//! - [`Menu`]: dismissable layer, anchored content, roving focus over items.
//!
//! Value editors share decimal-safe arithmetic ([`NumericRange`]) and
//! locale-aware formatting ([`NumberFormat`], [`Locale`]):
//!
//! - [`NumberInput`]: clamp, step, format, and lenient parsing on commit.
//! - [`Slider`]: pointer position to value along a track, plus keyboard.
//! - [`TimePicker`]: segmented hour/minute/second/period editing.
//!
//! Every behavior can be driven directly (`handle_key`, `open`, `select`, …)
//! or attached to a [`Dom`](trellis_dom::Dom) so that its listeners do the
//! driving; `detach` or dropping the handle removes them.
//!
//! ## Example
//!
//! ```rust
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use trellis_behaviors::{NumberInput, NumberInputConfig};
//! use trellis_dom::{Key, KeyboardEvent};
//!
//! let reported = Rc::new(RefCell::new(Vec::new()));
//! let log = reported.clone();
//! let qty = NumberInput::new(NumberInputConfig {
//!     min: 0.0,
//!     max: 1.0,
//!     step: 0.1,
//!     default_value: Some(0.9),
//!     on_value_change: Some(Rc::new(move |v| log.borrow_mut().push(v))),
//!     ..Default::default()
//! })
//! .unwrap();
//!
//! qty.handle_key(&KeyboardEvent::new(Key::ArrowUp));
//! qty.handle_key(&KeyboardEvent::new(Key::ArrowUp));
//! assert_eq!(qty.value(), Some(1.0));
//! assert_eq!(*reported.borrow(), vec![Some(1.0)]);
//!
//! qty.handle_input("abc");
//! qty.commit();
//! assert_eq!(qty.state().input_value, "1.0");
//! ```

mod combobox;
mod decimal;
mod dialog;
mod format;
mod listbox;
mod menu;
mod number_input;
mod popup;
mod props;
mod select;
mod slider;
mod time_picker;

pub use combobox::{Combobox, ComboboxConfig, ComboboxState};
pub use decimal::{MAX_PRECISION, NumericRange};
pub use dialog::{Dialog, DialogConfig, DialogState};
pub use format::{Locale, NumberFormat};
pub use listbox::{SelectOption, TYPEAHEAD_TIMEOUT_MS};
pub use menu::{MENU_ITEM_SELECTOR, Menu, MenuConfig, OnSelect};
pub use number_input::{NumberInput, NumberInputConfig, NumberInputState, PAGE_STEPS};
pub use props::{OnOpenChange, OnValueChange, Props};
pub use select::{Select, SelectConfig, SelectState};
pub use slider::{Slider, SliderConfig, SliderState};
pub use time_picker::{
    HourFormat, Period, Segment, Segments, TimePicker, TimePickerConfig, TimePickerState,
    TimeValue,
};
