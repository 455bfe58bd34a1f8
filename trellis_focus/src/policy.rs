// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Navigation intents and the policy that resolves them over a set of candidates.

use kurbo::Rect;
use trellis_dom::TextDirection;

/// Direction of focus navigation.
///
/// These values represent high-level navigation intents. Composite widgets map
/// their arrow keys onto them according to orientation and text direction;
/// the policy interprets them over a [`FocusSpace`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Navigation {
    /// Move to the next candidate in document order.
    Next,
    /// Move to the previous candidate in document order.
    Prev,
    /// Move to the first enabled candidate.
    First,
    /// Move to the last enabled candidate.
    Last,
    /// Move up relative to the current focus.
    Up,
    /// Move down relative to the current focus.
    Down,
    /// Move left relative to the current focus.
    Left,
    /// Move right relative to the current focus.
    Right,
}

/// A single focusable candidate within a [`FocusSpace`].
#[derive(Clone, Debug)]
pub struct FocusEntry<K> {
    /// Identifier for this candidate.
    pub id: K,
    /// Border box in viewport coordinates.
    ///
    /// All entries of one [`FocusSpace`] must share a coordinate space so that
    /// directional navigation can compare positions.
    pub rect: Rect,
    /// Whether this candidate can receive focus.
    pub enabled: bool,
}

/// A read-only view of candidates, in document order.
#[derive(Clone, Debug)]
pub struct FocusSpace<'a, K> {
    /// Candidates in document order.
    pub nodes: &'a [FocusEntry<K>],
}

/// Edge behavior for linear traversal.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum WrapMode {
    /// Stop at the ends; moving past the last candidate yields nothing.
    Clamp,
    /// Wrap from the last candidate to the first and back.
    #[default]
    Loop,
}

/// Trait for focus traversal policies.
///
/// A policy receives a navigation intent, the current origin (if any), and a
/// read-only view of candidates, and returns the next candidate if any.
pub trait FocusPolicy<K>
where
    K: Copy + Eq,
{
    /// Compute the next focus target given an origin, navigation intent, and focus space.
    fn next(&self, origin: Option<K>, direction: Navigation, space: &FocusSpace<'_, K>)
    -> Option<K>;
}

/// The traversal policy used by roving focus.
///
/// - `Next`/`Prev` walk enabled candidates in document order, honoring [`WrapMode`].
/// - `First`/`Last` jump to the ends.
/// - Arrow intents pick the nearest enabled candidate in that direction by box
///   centers, falling back to linear traversal when nothing lies that way.
///   Under [`TextDirection::Rtl`] the fallback for `Left`/`Right` is mirrored.
#[derive(Copy, Clone, Debug, Default)]
pub struct DefaultPolicy {
    /// Wrap behavior when traversing linearly.
    pub wrap: WrapMode,
    /// Inline direction, used to order the horizontal fallback.
    pub direction: TextDirection,
}

impl<K> FocusPolicy<K> for DefaultPolicy
where
    K: Copy + Eq,
{
    fn next(
        &self,
        origin: Option<K>,
        direction: Navigation,
        space: &FocusSpace<'_, K>,
    ) -> Option<K> {
        match direction {
            Navigation::Next => next_linear(origin, space, self.wrap, Step::Forward),
            Navigation::Prev => next_linear(origin, space, self.wrap, Step::Backward),
            Navigation::First => space.nodes.iter().find(|e| e.enabled).map(|e| e.id),
            Navigation::Last => space.nodes.iter().rev().find(|e| e.enabled).map(|e| e.id),
            Navigation::Up | Navigation::Down | Navigation::Left | Navigation::Right => origin
                .and_then(|o| next_directional(o, direction, space))
                .or_else(|| {
                    let rtl = self.direction == TextDirection::Rtl;
                    let step = match direction {
                        Navigation::Up => Step::Backward,
                        Navigation::Down => Step::Forward,
                        Navigation::Left if rtl => Step::Forward,
                        Navigation::Right if rtl => Step::Backward,
                        Navigation::Left => Step::Backward,
                        _ => Step::Forward,
                    };
                    next_linear(origin, space, self.wrap, step)
                }),
        }
    }
}

#[derive(Copy, Clone)]
enum Step {
    Forward,
    Backward,
}

fn next_linear<K>(
    origin: Option<K>,
    space: &FocusSpace<'_, K>,
    wrap: WrapMode,
    step: Step,
) -> Option<K>
where
    K: Copy + Eq,
{
    let nodes = space.nodes;
    let enabled: Vec<usize> = nodes
        .iter()
        .enumerate()
        .filter_map(|(i, e)| e.enabled.then_some(i))
        .collect();
    let (&first, &last) = (enabled.first()?, enabled.last()?);

    // The origin may itself be disabled; locate it in the full list so that
    // movement continues from its position.
    let Some(pos) = origin.and_then(|o| nodes.iter().position(|e| e.id == o)) else {
        return Some(match step {
            Step::Forward => nodes[first].id,
            Step::Backward => nodes[last].id,
        });
    };

    let found = match step {
        Step::Forward => enabled.iter().find(|&&i| i > pos),
        Step::Backward => enabled.iter().rev().find(|&&i| i < pos),
    };
    match (found, wrap) {
        (Some(&i), _) => Some(nodes[i].id),
        (None, WrapMode::Loop) => Some(match step {
            Step::Forward => nodes[first].id,
            Step::Backward => nodes[last].id,
        }),
        (None, WrapMode::Clamp) => None,
    }
}

fn next_directional<K>(origin: K, direction: Navigation, space: &FocusSpace<'_, K>) -> Option<K>
where
    K: Copy + Eq,
{
    let nodes = space.nodes;
    let origin_entry = nodes.iter().find(|e| e.id == origin)?;
    let oc = origin_entry.rect.center();

    let mut best: Option<(f64, K)> = None;
    for candidate in nodes {
        if !candidate.enabled || candidate.id == origin {
            continue;
        }
        let cc = candidate.rect.center();
        let dx = cc.x - oc.x;
        let dy = cc.y - oc.y;

        let (primary, secondary, forward_sign) = match direction {
            Navigation::Right => (dx, dy, 1.0),
            Navigation::Left => (dx, dy, -1.0),
            Navigation::Down => (dy, dx, 1.0),
            Navigation::Up => (dy, dx, -1.0),
            _ => return None,
        };

        // Restrict to the forward half-plane.
        if forward_sign * primary <= 0.0 {
            continue;
        }

        // Favor closer candidates and penalize off-axis motion.
        let score = primary.abs() + 4.0 * secondary.abs();
        if !score.is_finite() {
            continue;
        }
        if best.is_none_or(|(s, _)| score < s) {
            best = Some((score, candidate.id));
        }
    }
    best.map(|(_, id)| id)
}
