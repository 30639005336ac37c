// SPDX-License-Identifier: AGPL-3.0-only

//! Two-stage resist response: Dill exposure → Mack development.
//!
//! Exposure maps aerial intensity to remaining photoactive compound (PAC),
//! `M = exp(-C·I·dose)` ∈ (0,1]. Development maps PAC to a dissolution
//! rate, `R = Rmax / (1 + (M/M0)^n)`, monotone decreasing in `M` and
//! saturating at `Rmax` for fully exposed resist. Clear depth is `R·t_dev`
//! and a cell prints iff `clear_depth > resist_thickness` — strictly:
//! a cell exactly at threshold is unprinted.
//!
//! The composition is monotone: more intensity → less PAC → faster
//! development → deeper clear. All parameter validation happens in the
//! `ResistParams` constructor, so the transform itself is infallible and
//! cannot emit NaN for valid inputs.

use serde::Serialize;

use crate::error::LithoError;

/// Dill/Mack chemistry parameters, validated at construction.
#[derive(Clone, Debug, Serialize)]
pub struct ResistParams {
    /// Dill exposure-rate constant (1/intensity·dose units).
    pub c: f64,
    /// Maximum development rate (depth per unit time).
    pub r_max: f64,
    /// Mack inflection PAC concentration.
    pub m0: f64,
    /// Mack rate-law exponent (development selectivity).
    pub n: f64,
    /// Development time.
    pub develop_time: f64,
    /// Print threshold on clear depth.
    pub resist_thickness: f64,
}

impl ResistParams {
    /// Validate and construct resist parameters.
    ///
    /// All six values must be strictly positive and finite; anything else
    /// is a configuration error caught before simulation, never a NaN
    /// propagated through a sweep.
    pub fn new(
        c: f64,
        r_max: f64,
        m0: f64,
        n: f64,
        develop_time: f64,
        resist_thickness: f64,
    ) -> Result<Self, LithoError> {
        let fields = [
            ("C", c),
            ("Rmax", r_max),
            ("M0", m0),
            ("n", n),
            ("develop_time", develop_time),
            ("resist_thickness", resist_thickness),
        ];
        for (name, v) in fields {
            if !v.is_finite() || v <= 0.0 {
                return Err(LithoError::InvalidResistParams(format!(
                    "{name} must be positive and finite, got {v}"
                )));
            }
        }
        Ok(Self {
            c,
            r_max,
            m0,
            n,
            develop_time,
            resist_thickness,
        })
    }

    /// The reference chemistry used across the stochastic studies
    /// (C=1.2, Rmax=1, M0=0.5, n=3, t_dev=1, thickness=0.55).
    pub fn reference() -> Self {
        // Values are valid by construction.
        Self {
            c: 1.2,
            r_max: 1.0,
            m0: 0.5,
            n: 3.0,
            develop_time: 1.0,
            resist_thickness: 0.55,
        }
    }
}

/// One trial's chemical and physical fields.
#[derive(Clone, Debug)]
pub struct ResistResponse {
    /// Remaining PAC concentration `M` ∈ (0,1].
    pub pac: Vec<f64>,
    /// Mack development rate `R` ∈ (0, Rmax).
    pub rate: Vec<f64>,
    /// Developed clear depth `R·t_dev`.
    pub clear_depth: Vec<f64>,
    /// Printed outcome: `clear_depth > resist_thickness`, strict.
    pub printed: Vec<bool>,
}

/// Apply Dill exposure and Mack development to an aerial intensity field.
#[must_use]
pub fn expose_and_develop(intensity: &[f64], params: &ResistParams, dose: f64) -> ResistResponse {
    let mut pac = Vec::with_capacity(intensity.len());
    let mut rate = Vec::with_capacity(intensity.len());
    let mut clear_depth = Vec::with_capacity(intensity.len());
    let mut printed = Vec::with_capacity(intensity.len());

    for &i in intensity {
        let m = (-params.c * i * dose).exp();
        let r = params.r_max / (1.0 + (m / params.m0).powf(params.n));
        let depth = r * params.develop_time;
        pac.push(m);
        rate.push(r);
        clear_depth.push(depth);
        printed.push(depth > params.resist_thickness);
    }

    ResistResponse {
        pac,
        rate,
        clear_depth,
        printed,
    }
}
