// ─────────────────────────────────────────────────────────────────────
// RandMeth Kernel — Gaussian Covariance Model
// ─────────────────────────────────────────────────────────────────────
//! C(r) = var · exp(-(r/ℓ)²)
//!
//! The spectral density is Gaussian too, so every wavevector component
//! is N(0, 2/ℓ²) and |k| follows a scaled chi distribution with `dim`
//! degrees of freedom. With t = kℓ/2:
//!
//!   dim 1: pdf = (ℓ/√π)·e^{-t²},          cdf = erf(t)
//!   dim 2: pdf = (kℓ²/2)·e^{-t²},         cdf = 1 - e^{-t²}
//!   dim 3: pdf = (k²ℓ³/(2√π))·e^{-t²},    cdf = erf(t) - (2t/√π)·e^{-t²}

use std::f64::consts::PI;
use std::fmt;

use serde::{Deserialize, Serialize};
use statrs::function::erf::{erf, erf_inv};

use randmeth_types::FieldResult;

use crate::model::{validate_params, CovarianceModel, ModelParams};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Gaussian {
    params: ModelParams,
}

impl Gaussian {
    pub fn new(params: ModelParams) -> FieldResult<Self> {
        validate_params(&params)?;
        Ok(Self { params })
    }
}

impl fmt::Display for Gaussian {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Gaussian({})", self.params)
    }
}

impl CovarianceModel for Gaussian {
    fn name(&self) -> &'static str {
        "Gaussian"
    }

    fn params(&self) -> &ModelParams {
        &self.params
    }

    fn correlation(&self, r: f64) -> f64 {
        let h = r / self.params.len_scale;
        (-h * h).exp()
    }

    fn has_closed_form(&self) -> bool {
        true
    }

    fn spectral_rad_pdf(&self, k: f64) -> f64 {
        if k < 0.0 {
            return 0.0;
        }
        let l = self.params.len_scale;
        let t = 0.5 * k * l;
        let g = (-t * t).exp();
        match self.params.dim {
            1 => l / PI.sqrt() * g,
            2 => 0.5 * k * l * l * g,
            _ => k * k * l.powi(3) / (2.0 * PI.sqrt()) * g,
        }
    }

    fn spectral_rad_cdf(&self, k: f64) -> f64 {
        if k <= 0.0 {
            return 0.0;
        }
        let t = 0.5 * k * self.params.len_scale;
        match self.params.dim {
            1 => erf(t),
            2 => 1.0 - (-t * t).exp(),
            _ => erf(t) - 2.0 * t / PI.sqrt() * (-t * t).exp(),
        }
    }

    fn spectral_rad_ppf(&self, u: f64) -> Option<f64> {
        let l = self.params.len_scale;
        match self.params.dim {
            1 => Some(2.0 * erf_inv(u) / l),
            2 => Some(2.0 * (-(1.0 - u).ln()).sqrt() / l),
            // No closed-form quantile; the sampler inverts the CDF.
            _ => None,
        }
    }
}
