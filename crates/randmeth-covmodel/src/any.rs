// ─────────────────────────────────────────────────────────────────────
// RandMeth Kernel — Model Selection
// ─────────────────────────────────────────────────────────────────────
//! Runtime-selected covariance model, loadable from JSON:
//!
//! ```json
//! { "model": "gaussian", "dim": 2, "var": 1.0, "len_scale": 10.0, "nugget": 0.1 }
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use randmeth_types::{FieldError, FieldResult};

use crate::exponential::Exponential;
use crate::gaussian::Gaussian;
use crate::model::{CovarianceModel, ModelParams};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "model", rename_all = "snake_case")]
pub enum AnyModel {
    Gaussian(Gaussian),
    Exponential(Exponential),
}

/// Dispatch a call to the wrapped model.
macro_rules! forward {
    ($self:ident, $m:ident => $call:expr) => {
        match $self {
            AnyModel::Gaussian($m) => $call,
            AnyModel::Exponential($m) => $call,
        }
    };
}

impl AnyModel {
    /// Load and validate a tagged model description.
    pub fn from_json(json: &str) -> FieldResult<Self> {
        let model: Self = serde_json::from_str(json)
            .map_err(|e| FieldError::InvalidModel(format!("JSON parse error: {e}")))?;
        model.validate()?;
        Ok(model)
    }
}

impl From<Gaussian> for AnyModel {
    fn from(m: Gaussian) -> Self {
        AnyModel::Gaussian(m)
    }
}

impl From<Exponential> for AnyModel {
    fn from(m: Exponential) -> Self {
        AnyModel::Exponential(m)
    }
}

impl fmt::Display for AnyModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        forward!(self, m => fmt::Display::fmt(m, f))
    }
}

impl CovarianceModel for AnyModel {
    fn name(&self) -> &'static str {
        forward!(self, m => m.name())
    }

    fn params(&self) -> &ModelParams {
        forward!(self, m => m.params())
    }

    fn correlation(&self, r: f64) -> f64 {
        forward!(self, m => m.correlation(r))
    }

    fn has_closed_form(&self) -> bool {
        forward!(self, m => m.has_closed_form())
    }

    fn spectral_rad_pdf(&self, k: f64) -> f64 {
        forward!(self, m => m.spectral_rad_pdf(k))
    }

    fn spectral_rad_cdf(&self, k: f64) -> f64 {
        forward!(self, m => m.spectral_rad_cdf(k))
    }

    fn spectral_rad_ppf(&self, u: f64) -> Option<f64> {
        forward!(self, m => m.spectral_rad_ppf(u))
    }

    fn ln_spectral_rad_pdf(&self, k: f64) -> f64 {
        forward!(self, m => m.ln_spectral_rad_pdf(k))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_json_gaussian() {
        let m = AnyModel::from_json(
            r#"{"model": "gaussian", "dim": 2, "var": 1.5, "len_scale": 10.0, "nugget": 0.1}"#,
        )
        .unwrap();
        assert_eq!(m.name(), "Gaussian");
        assert_eq!(m.dim(), 2);
        assert_eq!(m.var(), 1.5);
        assert_eq!(m.len_scale(), 10.0);
        assert_eq!(m.nugget(), 0.1);
    }

    #[test]
    fn test_from_json_default_nugget() {
        let m = AnyModel::from_json(r#"{"model": "exponential", "dim": 3, "var": 1.0, "len_scale": 2.0}"#)
            .unwrap();
        assert_eq!(m.nugget(), 0.0);
        assert!(!m.has_closed_form());
    }

    #[test]
    fn test_from_json_rejects_invalid() {
        assert!(AnyModel::from_json(r#"{"model": "gaussian", "dim": 5, "var": 1.0, "len_scale": 1.0}"#).is_err());
        assert!(AnyModel::from_json(r#"{"model": "matern", "dim": 1, "var": 1.0, "len_scale": 1.0}"#).is_err());
    }

    #[test]
    fn test_forwarding_matches_inner() {
        let g = Gaussian::new(ModelParams::new(1, 1.0, 2.0)).unwrap();
        let any = AnyModel::from(g);
        for k in [0.1, 1.0, 3.0] {
            assert_eq!(any.spectral_rad_pdf(k), g.spectral_rad_pdf(k));
            assert_eq!(any.spectral_rad_cdf(k), g.spectral_rad_cdf(k));
        }
        assert_eq!(any.spectral_rad_ppf(0.5), g.spectral_rad_ppf(0.5));
        assert_eq!(any.to_string(), g.to_string());
    }

    #[test]
    fn test_json_roundtrip_preserves_equality() {
        let e = AnyModel::from(Exponential::new(ModelParams::new(2, 1.0, 3.0).with_nugget(0.2)).unwrap());
        let json = serde_json::to_string(&e).unwrap();
        assert_eq!(AnyModel::from_json(&json).unwrap(), e);
    }
}
