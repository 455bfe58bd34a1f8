// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the document: element identifiers, flags, and shared enums.

use kurbo::Rect;

/// Identifier for an element in a [`Document`](crate::Document) (generational).
///
/// An `ElementId` stays valid until the element is removed. After removal the
/// slot may be reused, but the generation changes, so stale ids never alias a
/// newer element. Every document operation treats a stale id as absent.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub(crate) u32, pub(crate) u32);

impl ElementId {
    /// An id that never refers to a live element.
    pub const INERT: Self = Self(u32::MAX, 0);

    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

bitflags::bitflags! {
    /// Element state flags that the host keeps in sync with the rendered tree.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct ElementFlags: u8 {
        /// Element is disabled (equivalent to the `disabled` attribute).
        const DISABLED   = 0b0000_0001;
        /// Element is not rendered (`display: none`, `hidden`, or an unrendered template).
        const HIDDEN     = 0b0000_0010;
        /// Element is a scroll container.
        const SCROLLABLE = 0b0000_0100;
    }
}

/// Axis along which a composite widget lays out its items.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Orientation {
    /// Items flow left to right (or right to left under RTL).
    Horizontal,
    /// Items flow top to bottom.
    #[default]
    Vertical,
    /// Items form a two-dimensional arrangement (for example a grid or toolbar that wraps).
    Both,
}

/// Inline text direction of a widget.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum TextDirection {
    /// Left to right.
    #[default]
    Ltr,
    /// Right to left; horizontal arrow keys are mirrored.
    Rtl,
}

#[derive(Clone, Debug)]
pub(crate) struct ElementData {
    pub(crate) tag: String,
    pub(crate) attributes: hashbrown::HashMap<String, String>,
    pub(crate) flags: ElementFlags,
    /// Border box in viewport coordinates.
    pub(crate) rect: Rect,
}

impl ElementData {
    pub(crate) fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            attributes: hashbrown::HashMap::new(),
            flags: ElementFlags::empty(),
            rect: Rect::ZERO,
        }
    }
}
