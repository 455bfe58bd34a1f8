// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pure position computation.

use kurbo::{Point, Rect, Size};

use crate::placement::{Alignment, Placement, Side};

/// Result of a position computation, in viewport coordinates.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PositionUpdate {
    /// Distance from the viewport top to the floating element's top edge.
    pub top: f64,
    /// Distance from the viewport left to the floating element's left edge.
    pub left: f64,
    /// The placement actually used, after any flip.
    pub placement: Placement,
}

/// Collision handling options for [`compute_position`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Collision {
    /// Gap between anchor and floating element along the side's axis.
    pub offset: f64,
    /// Flip to the opposite side (or swap start/end) when that fits better.
    pub flip: bool,
    /// Clamp the cross-axis coordinate into the viewport.
    pub shift: bool,
}

impl Default for Collision {
    fn default() -> Self {
        Self {
            offset: 0.0,
            flip: true,
            shift: false,
        }
    }
}

/// Compute where to put a `floating` box next to `anchor` inside `viewport`.
///
/// The requested placement is tried first. With `flip`, if the box overflows
/// the viewport along the side's axis and the opposite side overflows less,
/// the side flips; then, for `start`/`end` alignments, if the box overflows
/// along the cross axis and the swapped alignment overflows less, the
/// alignment swaps. With `shift`, the cross-axis coordinate is finally
/// clamped into the viewport.
///
/// ```rust
/// use kurbo::{Rect, Size};
/// use trellis_anchor::{compute_position, Collision, Placement};
///
/// let viewport = Rect::new(0.0, 0.0, 800.0, 600.0);
/// // An anchor hugging the bottom of the viewport.
/// let anchor = Rect::new(100.0, 560.0, 200.0, 590.0);
/// let menu = Size::new(150.0, 200.0);
///
/// let placement: Placement = "bottom-start".parse().unwrap();
/// let pos = compute_position(anchor, menu, placement, viewport, Collision::default());
/// assert_eq!(pos.placement.to_string(), "top-start");
/// assert_eq!((pos.left, pos.top), (100.0, 360.0));
/// ```
pub fn compute_position(
    anchor: Rect,
    floating: Size,
    placement: Placement,
    viewport: Rect,
    collision: Collision,
) -> PositionUpdate {
    let place = |p: Placement| {
        Rect::from_origin_size(origin_for(anchor, floating, p, collision.offset), floating)
    };

    let mut chosen = placement;
    if collision.flip {
        let main = |p: Placement| main_overflow(place(p), p.side, viewport);
        let current = main(chosen);
        if current > 0.0 {
            let flipped = chosen.flip_side();
            if main(flipped) < current {
                chosen = flipped;
            }
        }
        if chosen.alignment != Alignment::Center {
            let cross = |p: Placement| cross_overflow(place(p), p.side, viewport);
            let current = cross(chosen);
            if current > 0.0 {
                let swapped = chosen.flip_alignment();
                if cross(swapped) < current {
                    chosen = swapped;
                }
            }
        }
        if chosen != placement {
            tracing::debug!(from = %placement, to = %chosen, "anchor placement flipped");
        }
    }

    let mut origin = origin_for(anchor, floating, chosen, collision.offset);
    if collision.shift {
        if chosen.side.is_vertical() {
            origin.x = clamp_span(origin.x, floating.width, viewport.x0, viewport.x1);
        } else {
            origin.y = clamp_span(origin.y, floating.height, viewport.y0, viewport.y1);
        }
    }
    PositionUpdate {
        top: origin.y,
        left: origin.x,
        placement: chosen,
    }
}

fn origin_for(anchor: Rect, floating: Size, placement: Placement, offset: f64) -> Point {
    let align = |start: f64, end: f64, len: f64| match placement.alignment {
        Alignment::Start => start,
        Alignment::Center => (start + end - len) / 2.0,
        Alignment::End => end - len,
    };
    match placement.side {
        Side::Bottom => Point::new(
            align(anchor.x0, anchor.x1, floating.width),
            anchor.y1 + offset,
        ),
        Side::Top => Point::new(
            align(anchor.x0, anchor.x1, floating.width),
            anchor.y0 - offset - floating.height,
        ),
        Side::Right => Point::new(
            anchor.x1 + offset,
            align(anchor.y0, anchor.y1, floating.height),
        ),
        Side::Left => Point::new(
            anchor.x0 - offset - floating.width,
            align(anchor.y0, anchor.y1, floating.height),
        ),
    }
}

fn span_overflow(lo: f64, hi: f64, min: f64, max: f64) -> f64 {
    (min - lo).max(0.0) + (hi - max).max(0.0)
}

fn main_overflow(rect: Rect, side: Side, viewport: Rect) -> f64 {
    if side.is_vertical() {
        span_overflow(rect.y0, rect.y1, viewport.y0, viewport.y1)
    } else {
        span_overflow(rect.x0, rect.x1, viewport.x0, viewport.x1)
    }
}

fn cross_overflow(rect: Rect, side: Side, viewport: Rect) -> f64 {
    if side.is_vertical() {
        span_overflow(rect.x0, rect.x1, viewport.x0, viewport.x1)
    } else {
        span_overflow(rect.y0, rect.y1, viewport.y0, viewport.y1)
    }
}

/// Clamp `start` so that `[start, start + len]` lies in `[min, max]`; pins to `min` if it cannot fit.
fn clamp_span(start: f64, len: f64, min: f64, max: f64) -> f64 {
    start.min(max - len).max(min)
}
