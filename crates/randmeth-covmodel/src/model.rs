// ─────────────────────────────────────────────────────────────────────
// RandMeth Kernel — Covariance-Model Contract
// ─────────────────────────────────────────────────────────────────────
//! The capability contract a covariance model must satisfy so the
//! generator can sample Fourier modes from it.
//!
//! Radial spectral density: for an isotropic model with spectral density
//! S(k) in `dim` dimensions, the radial density of |k| is
//! `surface(dim) · k^(dim-1) · S(k)`, normalised to 1 on [0, ∞).

use std::fmt;

use serde::{Deserialize, Serialize};

use randmeth_random::InverseCdf;
use randmeth_types::{FieldError, FieldResult};

/// Parameters shared by every isotropic covariance model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModelParams {
    /// Spatial dimension (1, 2 or 3).
    pub dim: usize,
    /// Variance of the spectral part of the field.
    pub var: f64,
    /// Length scale of the correlation.
    pub len_scale: f64,
    /// Independent per-point variance added on top of the spectral sum.
    #[serde(default)]
    pub nugget: f64,
}

impl ModelParams {
    pub fn new(dim: usize, var: f64, len_scale: f64) -> Self {
        Self {
            dim,
            var,
            len_scale,
            nugget: 0.0,
        }
    }

    pub fn with_nugget(mut self, nugget: f64) -> Self {
        self.nugget = nugget;
        self
    }
}

impl fmt::Display for ModelParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "dim={}, var={}, len_scale={}, nugget={}",
            self.dim, self.var, self.len_scale, self.nugget
        )
    }
}

/// Check the parameter contract: dim ∈ {1, 2, 3}, var ≥ 0, nugget ≥ 0,
/// len_scale > 0, all finite.
pub fn validate_params(p: &ModelParams) -> FieldResult<()> {
    if !(1..=3).contains(&p.dim) {
        return Err(FieldError::InvalidModel(format!(
            "dim must be 1, 2 or 3, got {}",
            p.dim
        )));
    }
    if !(p.var.is_finite() && p.var >= 0.0) {
        return Err(FieldError::InvalidModel(format!(
            "var must be finite and >= 0, got {}",
            p.var
        )));
    }
    if !(p.nugget.is_finite() && p.nugget >= 0.0) {
        return Err(FieldError::InvalidModel(format!(
            "nugget must be finite and >= 0, got {}",
            p.nugget
        )));
    }
    if !(p.len_scale.is_finite() && p.len_scale > 0.0) {
        return Err(FieldError::InvalidModel(format!(
            "len_scale must be finite and > 0, got {}",
            p.len_scale
        )));
    }
    Ok(())
}

/// Contract between a covariance model and the generator.
///
/// Snapshots are taken with `Clone` and compared with `PartialEq`, so
/// two models with equal parameters count as the same model.
pub trait CovarianceModel: Clone + PartialEq + fmt::Debug + fmt::Display {
    /// Short model name, e.g. `"Gaussian"`.
    fn name(&self) -> &'static str;

    fn params(&self) -> &ModelParams;

    fn dim(&self) -> usize {
        self.params().dim
    }

    fn var(&self) -> f64 {
        self.params().var
    }

    fn nugget(&self) -> f64 {
        self.params().nugget
    }

    fn len_scale(&self) -> f64 {
        self.params().len_scale
    }

    /// Normalised correlation at distance `r` (1 at r = 0).
    fn correlation(&self, r: f64) -> f64;

    /// Covariance of the spectral part at distance `r`.
    fn covariance(&self, r: f64) -> f64 {
        self.var() * self.correlation(r)
    }

    /// Whether the radial spectral distribution is available as a
    /// CDF (with optional closed-form inverse).
    fn has_closed_form(&self) -> bool;

    /// Radial spectral density of |k|.
    fn spectral_rad_pdf(&self, k: f64) -> f64;

    /// CDF of the radial spectral density. Only consulted when
    /// `has_closed_form` is true.
    fn spectral_rad_cdf(&self, _k: f64) -> f64 {
        f64::NAN
    }

    /// Closed-form inverse of `spectral_rad_cdf`, if any.
    fn spectral_rad_ppf(&self, _u: f64) -> Option<f64> {
        None
    }

    fn ln_spectral_rad_pdf(&self, k: f64) -> f64 {
        let p = self.spectral_rad_pdf(k);
        if p > 0.0 {
            p.ln()
        } else {
            f64::NEG_INFINITY
        }
    }

    fn validate(&self) -> FieldResult<()> {
        validate_params(self.params())
    }

    /// The radial distribution as an inverse-CDF sampling target, when
    /// the model has one in closed form.
    fn radial_distribution(&self) -> Option<SpectralRadial<'_, Self>> {
        self.has_closed_form().then_some(SpectralRadial(self))
    }
}

/// Radial spectral distribution of a model, viewed as an [`InverseCdf`].
#[derive(Debug, Clone, Copy)]
pub struct SpectralRadial<'a, M: ?Sized>(pub &'a M);

impl<M: CovarianceModel> InverseCdf for SpectralRadial<'_, M> {
    fn cdf(&self, x: f64) -> f64 {
        self.0.spectral_rad_cdf(x)
    }

    fn ppf(&self, u: f64) -> Option<f64> {
        self.0.spectral_rad_ppf(u)
    }
}

#[cfg(test)]
pub(crate) mod test_util {
    use super::CovarianceModel;

    /// Trapezoid integral of the radial pdf on [0, k].
    pub fn integrate_pdf<M: CovarianceModel>(model: &M, k: f64, steps: usize) -> f64 {
        let h = k / steps as f64;
        let mut sum = 0.5 * (model.spectral_rad_pdf(0.0) + model.spectral_rad_pdf(k));
        for i in 1..steps {
            sum += model.spectral_rad_pdf(i as f64 * h);
        }
        sum * h
    }
}
