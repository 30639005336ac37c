// SPDX-License-Identifier: AGPL-3.0-only

//! Distance-transform EPE fields and contact-hole metrics.
//!
//! Scalar EPE compares one edge against one target position; 2-D layouts
//! with corners and holes need the whole-field view. The signed EPE map
//! at each pixel is the distance to the nearest printed pixel minus the
//! distance to the nearest target pixel: zero on faithful contours,
//! positive where the print pulled back, negative where it bled out.
//!
//! The transform is the exact separable lower-envelope algorithm, not a
//! chamfer approximation, so map values are true Euclidean distances.

use serde::Serialize;

const INF: f64 = 1e20;

/// 1-D squared distance transform by lower envelope of parabolas.
fn dt_1d(f: &[f64], out: &mut [f64], v: &mut [usize], z: &mut [f64]) {
    let n = f.len();
    v[0] = 0;
    z[0] = -INF;
    z[1] = INF;
    let mut k = 0usize;
    for q in 1..n {
        let mut s;
        loop {
            let p = v[k];
            s = ((f[q] + (q * q) as f64) - (f[p] + (p * p) as f64)) / (2.0 * (q - p) as f64);
            if s <= z[k] {
                if k == 0 {
                    break;
                }
                k -= 1;
            } else {
                break;
            }
        }
        k += 1;
        v[k] = q;
        z[k] = s;
        z[k + 1] = INF;
    }
    k = 0;
    for q in 0..n {
        while z[k + 1] < q as f64 {
            k += 1;
        }
        let p = v[k];
        let d = q as f64 - p as f64;
        out[q] = d * d + f[p];
    }
}

/// Euclidean distance from every pixel to the nearest `true` pixel.
///
/// A field with no `true` pixel maps everything to a large sentinel
/// distance; callers treating that as "infinitely far" get sane signs.
#[must_use]
pub fn distance_to_nearest(field: &[bool], nx: usize) -> Vec<f64> {
    debug_assert_eq!(field.len(), nx * nx);
    let mut sq: Vec<f64> = field.iter().map(|&p| if p { 0.0 } else { INF }).collect();

    let mut scratch_f = vec![0.0; nx];
    let mut scratch_out = vec![0.0; nx];
    let mut v = vec![0usize; nx];
    let mut z = vec![0.0; nx + 1];

    // Columns first, then rows; squared distances compose separably.
    for x in 0..nx {
        for y in 0..nx {
            scratch_f[y] = sq[y * nx + x];
        }
        dt_1d(&scratch_f, &mut scratch_out, &mut v, &mut z);
        for y in 0..nx {
            sq[y * nx + x] = scratch_out[y];
        }
    }
    for y in 0..nx {
        scratch_f.copy_from_slice(&sq[y * nx..(y + 1) * nx]);
        dt_1d(&scratch_f, &mut scratch_out, &mut v, &mut z);
        sq[y * nx..(y + 1) * nx].copy_from_slice(&scratch_out);
    }

    sq.iter().map(|&d| d.min(INF).sqrt()).collect()
}

/// Signed EPE map: distance-to-printed minus distance-to-target.
#[must_use]
pub fn epe_map(printed: &[bool], target: &[bool], nx: usize) -> Vec<f64> {
    let to_printed = distance_to_nearest(printed, nx);
    let to_target = distance_to_nearest(target, nx);
    to_printed
        .iter()
        .zip(&to_target)
        .map(|(&p, &t)| p - t)
        .collect()
}

/// Worst absolute EPE inside a rectangular region of interest
/// (`(y0, y1, x0, x1)`, half-open).
#[must_use]
pub fn worst_abs_epe(map: &[f64], nx: usize, roi: (usize, usize, usize, usize)) -> f64 {
    let (y0, y1, x0, x1) = roi;
    let mut worst = 0.0f64;
    for y in y0..y1.min(nx) {
        for x in x0..x1.min(nx) {
            worst = worst.max(map[y * nx + x].abs());
        }
    }
    worst
}

/// Printed contact-hole summary.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct HoleMetrics {
    /// Printed pixel count.
    pub area: f64,
    /// Radius of the circle with the same area.
    pub equivalent_radius: f64,
    /// Whether anything printed at all.
    pub open: bool,
}

/// Measure a printed contact hole: area, equivalent radius, openness.
#[must_use]
pub fn hole_metrics(printed: &[bool], nx: usize) -> HoleMetrics {
    debug_assert_eq!(printed.len(), nx * nx);
    let area = printed.iter().filter(|&&p| p).count() as f64;
    HoleMetrics {
        area,
        equivalent_radius: (area / std::f64::consts::PI).sqrt(),
        open: area > 0.0,
    }
}
