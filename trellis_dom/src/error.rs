// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Configuration errors shared by every Trellis crate.

/// A programming error in the configuration passed to a primitive or behavior.
///
/// These are returned from constructors and explicit setters. Runtime
/// conditions (a missing document, unparseable user input, removed elements)
/// are never reported through this type; they degrade to no-ops instead.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// `min` is greater than `max`.
    #[error("invalid range: min ({min}) is greater than max ({max})")]
    InvalidRange {
        /// Configured lower bound.
        min: f64,
        /// Configured upper bound.
        max: f64,
    },
    /// `step` is zero, negative, or not finite.
    #[error("step must be a positive finite number, got {0}")]
    InvalidStep(f64),
    /// More decimal digits were requested than can be represented exactly.
    #[error("precision {0} exceeds the supported maximum of 12 digits")]
    InvalidPrecision(u32),
    /// A placement token that is not `side` or `side-start`/`side-end`.
    #[error("unknown placement `{0}`")]
    UnknownPlacement(String),
    /// A selector string that could not be parsed.
    #[error("invalid selector `{selector}`: {reason}")]
    InvalidSelector {
        /// The offending selector text.
        selector: String,
        /// What went wrong.
        reason: &'static str,
    },
    /// A default or initial value that does not name a known option.
    #[error("`{0}` is not one of the configured options")]
    UnknownOption(String),
}
