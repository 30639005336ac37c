// SPDX-License-Identifier: AGPL-3.0-only

//! lithosim — stochastic optical lithography simulation core.
//!
//! Simulates the imaging chain from pupil to printed resist: a circular
//! pupil and optional defocus blur define the point spread function, the
//! PSF convolves the mask into an aerial image, Dill exposure and Mack
//! development turn intensity into printed geometry, and Poisson photon
//! sampling makes each exposure a stochastic trial. Metrology extracts
//! CD, EPE, LER/LWR, spectra, and open/short failures; the sweep engine
//! maps those statistics over dose/focus grids with per-trial seeding so
//! parallel runs replay exactly.
//!
//! ## Modules
//!   - `optics` — pupil specification, PSF construction, defocus blur
//!   - `aerial` — mask × PSF convolution, normalization policies
//!   - `resist` — Dill exposure, Mack development, print threshold
//!   - `stochastic` — photon shot-noise sampling, trial seed derivation
//!   - `metrology` — edges/CD/EPE, connectivity, roughness, EPE maps
//!   - `sweep` — 1-D/2-D process-window sweeps under rayon
//!   - `patterns` — shared mask fixtures for tests and validation
//!   - `fourier` — FFT plumbing shared by optics and roughness spectra
//!   - `tolerances` — documented numerical tolerance constants
//!   - `validation` — check/harness infrastructure for validation binaries
//!
//! ## Validation binaries
//!   - `validate_litho` — end-to-end checks: PSF normalization, CD
//!     regression on the two-line study geometry, Poisson statistics,
//!     open/short classification, LER recovery

pub mod aerial;
pub mod error;
pub mod fourier;
pub mod metrology;
pub mod optics;
pub mod patterns;
pub mod resist;
pub mod stochastic;
pub mod sweep;
pub mod tolerances;
pub mod validation;

pub use error::LithoError;
