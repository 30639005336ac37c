// SPDX-License-Identifier: AGPL-3.0-only

//! Mask pattern fixtures for tests and validation runs.
//!
//! Pattern generation proper is a caller concern — the core accepts any
//! `{0,1}` field — but the canonical study geometries (line pairs, a single
//! long line, a contact hole, an L-corner) are rasterized here once so the
//! validation binary and integration tests share exact fixtures instead of
//! re-deriving them.
//!
//! All masks are row-major `nx×nx` with 1.0 = transmitting.

/// Two vertical lines of `width` px whose left/right positions are
/// `spacing` apart, centered on the grid.
#[must_use]
pub fn two_lines_mask(nx: usize, width: usize, spacing: usize) -> Vec<f64> {
    let mut mask = vec![0.0; nx * nx];
    let c = nx / 2;
    let left = c.saturating_sub(spacing / 2);
    let right = c + spacing / 2;
    for y in 0..nx {
        for line in [left, right] {
            for x in line.saturating_sub(width / 2)..(line + width / 2).min(nx) {
                mask[y * nx + x] = 1.0;
            }
        }
    }
    mask
}

/// One vertical line of `width` px through the grid center.
#[must_use]
pub fn single_line_mask(nx: usize, width: usize) -> Vec<f64> {
    let mut mask = vec![0.0; nx * nx];
    let c = nx / 2;
    for y in 0..nx {
        for x in c.saturating_sub(width / 2)..(c + width / 2).min(nx) {
            mask[y * nx + x] = 1.0;
        }
    }
    mask
}

/// Circular contact hole of `radius` px at the grid center.
#[must_use]
pub fn contact_hole_mask(nx: usize, radius: f64) -> Vec<f64> {
    let mut mask = vec![0.0; nx * nx];
    let c = (nx / 2) as f64;
    let r2 = radius * radius;
    for y in 0..nx {
        let dy = y as f64 - c;
        for x in 0..nx {
            let dx = x as f64 - c;
            if dx * dx + dy * dy <= r2 {
                mask[y * nx + x] = 1.0;
            }
        }
    }
    mask
}

/// L-shaped corner: a vertical arm and a horizontal arm of `width` px
/// meeting at the grid center, each `arm` px long.
#[must_use]
pub fn corner_mask(nx: usize, width: usize, arm: usize) -> Vec<f64> {
    let mut mask = vec![0.0; nx * nx];
    let c = nx / 2;
    let half_w = width / 2;
    // Vertical arm going up from the center.
    for y in c.saturating_sub(arm)..=c.min(nx - 1) {
        for x in c.saturating_sub(half_w)..(c + half_w).min(nx) {
            mask[y * nx + x] = 1.0;
        }
    }
    // Horizontal arm going right from the center.
    for y in c.saturating_sub(half_w)..(c + half_w).min(nx) {
        for x in c..(c + arm).min(nx) {
            mask[y * nx + x] = 1.0;
        }
    }
    mask
}

/// Column spans `[start, end)` of the two lines drawn by
/// [`two_lines_mask`], for connectivity classification.
///
/// Clamped to the grid with the same arithmetic as the rasterizer, so
/// oversized widths or spacings yield truncated spans rather than wrap.
#[must_use]
pub fn two_lines_spans(nx: usize, width: usize, spacing: usize) -> [(usize, usize); 2] {
    let c = nx / 2;
    let left = c.saturating_sub(spacing / 2);
    let right = c + spacing / 2;
    let clamp = |line: usize| {
        (
            line.saturating_sub(width / 2).min(nx),
            (line + width / 2).min(nx),
        )
    };
    [clamp(left), clamp(right)]
}
