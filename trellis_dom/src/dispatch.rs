// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Propagation routing: turn a root→target path into capture → target → bubble steps,
//! then walk those steps and honor stop outcomes.
//!
//! ## Semantics
//!
//! - [`route`] emits capture entries root→parent, one target entry, and (for
//!   bubbling events) bubble entries parent→root.
//! - [`run`] processes entries in order; [`Outcome::Stop`] aborts propagation
//!   immediately (no target/bubble if raised in capture).
//! - Higher-level semantics such as "default prevented" live on the event
//!   payload passed to [`run`], not in [`Outcome`].
//!
//! ```
//! use trellis_dom::dispatch::{route, run, Outcome, Phase};
//!
//! let seq = route(&[1_u32, 2, 3], true);
//! let mut seen = Vec::new();
//! let stopped = run(&seq, &mut seen, |d, seen| {
//!     seen.push((d.phase, d.node));
//!     Outcome::Continue
//! });
//! assert!(stopped.is_none());
//! assert_eq!(seen, vec![
//!     (Phase::Capture, 1), (Phase::Capture, 2),
//!     (Phase::Target, 3),
//!     (Phase::Bubble, 2), (Phase::Bubble, 1),
//! ]);
//! ```

/// Propagation phase of a dispatch entry.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Root toward the target, excluding the target.
    Capture,
    /// At the target.
    Target,
    /// Target's parent toward the root.
    Bubble,
}

/// One step of a propagation sequence.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Dispatch<K> {
    /// Phase of this step.
    pub phase: Phase,
    /// Node whose listeners run in this step.
    pub node: K,
}

impl<K> Dispatch<K> {
    /// A capture-phase step.
    pub fn capture(node: K) -> Self {
        Self {
            phase: Phase::Capture,
            node,
        }
    }

    /// A target-phase step.
    pub fn target(node: K) -> Self {
        Self {
            phase: Phase::Target,
            node,
        }
    }

    /// A bubble-phase step.
    pub fn bubble(node: K) -> Self {
        Self {
            phase: Phase::Bubble,
            node,
        }
    }
}

/// Propagation control returned by handlers.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Keep going.
    Continue,
    /// Abort propagation after this step.
    Stop,
}

/// Emit the propagation sequence for a root→target `path`.
///
/// An empty path produces an empty sequence.
pub fn route<K: Copy>(path: &[K], bubbles: bool) -> Vec<Dispatch<K>> {
    let mut out = Vec::with_capacity(path.len() * 2);
    // Split into ancestors and target. If path is empty, nothing to emit.
    let Some((target, ancestors)) = path.split_last() else {
        return out;
    };

    // Capture: root→(excluding target)
    out.extend(ancestors.iter().map(|&n| Dispatch::capture(n)));

    // Target: only the target element
    out.push(Dispatch::target(*target));

    // Bubble: parent→root (excluding target)
    if bubbles {
        out.extend(ancestors.iter().rev().map(|&n| Dispatch::bubble(n)));
    }
    out
}

/// Run a handler over a dispatch sequence and honor stop outcomes.
///
/// Returns `None` if the full sequence was visited, or the entry at which a
/// handler returned [`Outcome::Stop`].
pub fn run<'a, K, E>(
    seq: &'a [Dispatch<K>],
    event: &mut E,
    mut handler: impl FnMut(&Dispatch<K>, &mut E) -> Outcome,
) -> Option<&'a Dispatch<K>> {
    for d in seq {
        match handler(d, event) {
            Outcome::Continue => {}
            Outcome::Stop => return Some(d),
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mk_seq() -> Vec<Dispatch<u32>> {
        route(&[1, 2], true)
    }

    #[test]
    fn non_bubbling_route_skips_bubble() {
        let seq = route(&[1_u32, 2, 3], false);
        let phases: Vec<(Phase, u32)> = seq.iter().map(|d| (d.phase, d.node)).collect();
        assert_eq!(
            phases,
            vec![(Phase::Capture, 1), (Phase::Capture, 2), (Phase::Target, 3)]
        );
    }

    #[test]
    fn empty_path_emits_nothing() {
        assert!(route::<u32>(&[], true).is_empty());
    }

    #[test]
    fn default_prevention_pattern_sets_flag_at_target() {
        #[derive(Default)]
        struct Ev {
            default_prevented: bool,
            seen: Vec<(Phase, u32)>,
        }

        let seq = mk_seq();
        let mut ev = Ev::default();
        let stopped = run(&seq, &mut ev, |d, e| {
            e.seen.push((d.phase, d.node));
            if matches!(d.phase, Phase::Target) {
                e.default_prevented = true;
            }
            Outcome::Continue
        });

        assert!(stopped.is_none());
        assert!(ev.default_prevented);
        assert_eq!(
            ev.seen,
            vec![(Phase::Capture, 1), (Phase::Target, 2), (Phase::Bubble, 1)]
        );
    }

    #[test]
    fn stop_in_capture_aborts_propagation() {
        let seq = mk_seq();
        let mut seen: Vec<(Phase, u32)> = Vec::new();
        let stopped = run(&seq, &mut (), |d, _| {
            seen.push((d.phase, d.node));
            if d.phase == Phase::Capture && d.node == 1 {
                Outcome::Stop
            } else {
                Outcome::Continue
            }
        });
        let stopped = stopped.unwrap();
        assert!(matches!(stopped.phase, Phase::Capture));
        assert_eq!(seen, vec![(Phase::Capture, 1)]);
    }

    #[test]
    fn stop_in_target_skips_bubble_phase() {
        let seq = mk_seq();
        let mut seen: Vec<(Phase, u32)> = Vec::new();
        let stopped = run(&seq, &mut (), |d, _| {
            seen.push((d.phase, d.node));
            if matches!(d.phase, Phase::Target) {
                Outcome::Stop
            } else {
                Outcome::Continue
            }
        });
        assert_eq!(stopped.map(|d| d.node), Some(2));
        assert_eq!(seen, vec![(Phase::Capture, 1), (Phase::Target, 2)]);
    }
}
