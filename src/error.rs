// SPDX-License-Identifier: AGPL-3.0-only

//! Typed errors for lithography configuration and simulation.
//!
//! Replaces `Result<_, String>` in public APIs with a proper enum so callers
//! can pattern-match on failure modes (bad pupil, bad resist chemistry,
//! bad photon budget) rather than parsing opaque strings.
//!
//! Only *configuration* failures live here — they fail fast before any
//! simulation runs. Degenerate geometry during a trial (missing edges,
//! severed features) is reported through `Option` values and per-cell
//! counters so a sweep keeps aggregating its healthy cells.

use std::fmt;

/// Errors arising from invalid optical, resist, or sampling configuration.
#[derive(Debug)]
pub enum LithoError {
    /// Pupil specification violates a grid invariant (radius vs. grid size,
    /// non-finite defocus, zero-sized grid).
    InvalidPupil(String),

    /// The pupil indicator contains no open pixels; the PSF would be the
    /// all-zero field and peak normalization would divide by zero.
    EmptyPupil,

    /// A Dill/Mack parameter is non-positive or non-finite.
    InvalidResistParams(String),

    /// Photon budget for shot-noise sampling must be positive and finite.
    InvalidPhotonBudget(f64),

    /// A field that must carry signal is identically zero (e.g. an all-zero
    /// mask under peak normalization).
    DegenerateField(String),

    /// Sweep configuration is unusable (empty axis, zero trials per cell).
    InvalidSweep(String),
}

impl fmt::Display for LithoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidPupil(msg) => write!(f, "Invalid pupil specification: {msg}"),
            Self::EmptyPupil => write!(f, "Empty pupil: no open pixels inside cutoff radius"),
            Self::InvalidResistParams(msg) => write!(f, "Invalid resist parameters: {msg}"),
            Self::InvalidPhotonBudget(p) => {
                write!(f, "Photon budget must be positive and finite, got {p}")
            }
            Self::DegenerateField(msg) => write!(f, "Degenerate field: {msg}"),
            Self::InvalidSweep(msg) => write!(f, "Invalid sweep configuration: {msg}"),
        }
    }
}

impl std::error::Error for LithoError {}
