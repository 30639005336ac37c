// SPDX-License-Identifier: AGPL-3.0-only

//! Printed-geometry metrology: edges, dimensions, failures, roughness.
//!
//! All functions are pure transforms over profiles, printed fields, or
//! Monte-Carlo edge ensembles. Degenerate geometry (no threshold crossing,
//! a severed or merged feature) is reported as a missing value or a
//! failure class — never a panic — so sweep cells stay independent.
//!
//!   - [`edges`] — sub-pixel threshold crossings, CD, EPE
//!   - [`connectivity`] — 8-connected component labeling, open/short
//!   - [`roughness`] — LER/LWR, power spectral density, autocorrelation
//!   - [`epe_map`] — distance-transform EPE fields and hole metrics

pub mod connectivity;
pub mod edges;
pub mod epe_map;
pub mod roughness;

pub use connectivity::{classify_connectivity, label_components, Printability};
pub use edges::{compute_cd, compute_epe, find_subpixel_edges};
pub use epe_map::{distance_to_nearest, epe_map, hole_metrics, worst_abs_epe, HoleMetrics};
pub use roughness::{
    compute_psd, compute_roughness, extract_line_edges, mean_autocorrelation, RoughnessStats,
};
