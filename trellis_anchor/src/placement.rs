// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Placement tokens: a side plus an optional alignment.

use core::fmt;
use core::str::FromStr;

use trellis_dom::ConfigError;

/// Side of the anchor the floating element is placed on.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    /// Above the anchor.
    Top,
    /// Right of the anchor.
    Right,
    /// Below the anchor.
    Bottom,
    /// Left of the anchor.
    Left,
}

impl Side {
    /// The opposite side.
    pub fn opposite(self) -> Self {
        match self {
            Self::Top => Self::Bottom,
            Self::Bottom => Self::Top,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Returns true for `Top` and `Bottom`, whose main axis is vertical.
    pub fn is_vertical(self) -> bool {
        matches!(self, Self::Top | Self::Bottom)
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Right => "right",
            Self::Bottom => "bottom",
            Self::Left => "left",
        }
    }
}

/// Alignment of the floating element along the anchor's edge.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Alignment {
    /// Align with the anchor's start edge (left or top).
    Start,
    /// Center on the anchor.
    #[default]
    Center,
    /// Align with the anchor's end edge (right or bottom).
    End,
}

impl Alignment {
    /// `Start` and `End` swapped; `Center` unchanged.
    pub fn flipped(self) -> Self {
        match self {
            Self::Start => Self::End,
            Self::End => Self::Start,
            Self::Center => Self::Center,
        }
    }
}

/// Where to put a floating element relative to its anchor.
///
/// Parses from and prints as the usual tokens: `top`, `right`, `bottom`,
/// `left`, each optionally suffixed with `-start` or `-end`.
///
/// ```rust
/// use trellis_anchor::{Alignment, Placement, Side};
///
/// let p: Placement = "bottom-start".parse().unwrap();
/// assert_eq!(p, Placement::new(Side::Bottom, Alignment::Start));
/// assert_eq!(p.to_string(), "bottom-start");
/// assert!("middle".parse::<Placement>().is_err());
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Placement {
    /// Side of the anchor.
    pub side: Side,
    /// Alignment along that side.
    pub alignment: Alignment,
}

impl Placement {
    /// A placement from its parts.
    pub const fn new(side: Side, alignment: Alignment) -> Self {
        Self { side, alignment }
    }

    /// Same alignment, opposite side.
    pub fn flip_side(self) -> Self {
        Self::new(self.side.opposite(), self.alignment)
    }

    /// Same side, start and end swapped.
    pub fn flip_alignment(self) -> Self {
        Self::new(self.side, self.alignment.flipped())
    }
}

impl Default for Placement {
    fn default() -> Self {
        Self::new(Side::Bottom, Alignment::Center)
    }
}

impl FromStr for Placement {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unknown = || ConfigError::UnknownPlacement(s.to_owned());
        let (side, alignment) = match s.split_once('-') {
            Some((side, "start")) => (side, Alignment::Start),
            Some((side, "end")) => (side, Alignment::End),
            Some(_) => return Err(unknown()),
            None => (s, Alignment::Center),
        };
        let side = match side {
            "top" => Side::Top,
            "right" => Side::Right,
            "bottom" => Side::Bottom,
            "left" => Side::Left,
            _ => return Err(unknown()),
        };
        Ok(Self::new(side, alignment))
    }
}

impl fmt::Display for Placement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.side.as_str())?;
        match self.alignment {
            Alignment::Start => f.write_str("-start"),
            Alignment::End => f.write_str("-end"),
            Alignment::Center => Ok(()),
        }
    }
}
