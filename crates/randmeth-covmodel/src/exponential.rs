// ─────────────────────────────────────────────────────────────────────
// RandMeth Kernel — Exponential Covariance Model
// ─────────────────────────────────────────────────────────────────────
//! C(r) = var · exp(-r/ℓ)
//!
//! Radial spectral density with t = kℓ:
//!
//!   dim 1: pdf = 2ℓ / (π(1+t²)),          cdf = (2/π)·atan(t)
//!   dim 2: pdf = kℓ² / (1+t²)^{3/2},      cdf = 1 - 1/√(1+t²)
//!   dim 3: pdf = (4/π)·k²ℓ³ / (1+t²)²
//!
//! In 3-d there is no closed-form quantile, so modes are drawn from the
//! log-density instead.

use std::f64::consts::{FRAC_2_PI, FRAC_PI_2, PI};
use std::fmt;

use serde::{Deserialize, Serialize};

use randmeth_types::FieldResult;

use crate::model::{validate_params, CovarianceModel, ModelParams};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Exponential {
    params: ModelParams,
}

impl Exponential {
    pub fn new(params: ModelParams) -> FieldResult<Self> {
        validate_params(&params)?;
        Ok(Self { params })
    }
}

impl fmt::Display for Exponential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Exponential({})", self.params)
    }
}

impl CovarianceModel for Exponential {
    fn name(&self) -> &'static str {
        "Exponential"
    }

    fn params(&self) -> &ModelParams {
        &self.params
    }

    fn correlation(&self, r: f64) -> f64 {
        (-r.abs() / self.params.len_scale).exp()
    }

    fn has_closed_form(&self) -> bool {
        self.params.dim <= 2
    }

    fn spectral_rad_pdf(&self, k: f64) -> f64 {
        if k < 0.0 {
            return 0.0;
        }
        let l = self.params.len_scale;
        let t = k * l;
        let q = 1.0 + t * t;
        match self.params.dim {
            1 => 2.0 * l / (PI * q),
            2 => k * l * l / q.powf(1.5),
            _ => 4.0 / PI * k * k * l.powi(3) / (q * q),
        }
    }

    fn spectral_rad_cdf(&self, k: f64) -> f64 {
        if k <= 0.0 {
            return 0.0;
        }
        let t = k * self.params.len_scale;
        match self.params.dim {
            1 => FRAC_2_PI * t.atan(),
            2 => 1.0 - 1.0 / (1.0 + t * t).sqrt(),
            _ => FRAC_2_PI * (t.atan() - t / (1.0 + t * t)),
        }
    }

    fn spectral_rad_ppf(&self, u: f64) -> Option<f64> {
        let l = self.params.len_scale;
        match self.params.dim {
            1 => Some((FRAC_PI_2 * u).tan() / l),
            2 => {
                let s = 1.0 - u;
                Some((1.0 / (s * s) - 1.0).max(0.0).sqrt() / l)
            }
            _ => None,
        }
    }

    fn ln_spectral_rad_pdf(&self, k: f64) -> f64 {
        if k <= 0.0 {
            return f64::NEG_INFINITY;
        }
        let l = self.params.len_scale;
        let t = k * l;
        let ln_q = (t * t).ln_1p();
        match self.params.dim {
            1 => (2.0 * l / PI).ln() - ln_q,
            2 => k.ln() + 2.0 * l.ln() - 1.5 * ln_q,
            _ => (4.0 / PI).ln() + 2.0 * k.ln() + 3.0 * l.ln() - 2.0 * ln_q,
        }
    }
}
