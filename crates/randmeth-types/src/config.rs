// ─────────────────────────────────────────────────────────────────────
// RandMeth Kernel — Generator Configuration
// ─────────────────────────────────────────────────────────────────────

use serde::{Deserialize, Serialize};

use crate::error::{FieldError, FieldResult};

/// Upper bound on `SamplerConfig::burn_in`.
pub const MAX_BURN_IN: usize = 10_000_000;

/// Upper bound on `SamplerConfig::thin`.
pub const MAX_THIN: usize = 100_000;

/// Tuning for the log-density sampler and numeric CDF inversion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplerConfig {
    /// Metropolis steps discarded before the first kept sample.
    /// Default: 1000.
    pub burn_in: usize,

    /// Metropolis steps between two kept samples.
    /// Default: 10.
    pub thin: usize,

    /// Standard deviation of the log-space random-walk proposal.
    /// Default: 1.0.
    pub step_scale: f64,

    /// Iteration cap for bracketing and bisecting a CDF without closed-form
    /// inverse.
    /// Default: 200.
    pub max_cdf_bisect: usize,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            burn_in: 1000,
            thin: 10,
            step_scale: 1.0,
            max_cdf_bisect: 200,
        }
    }
}

impl SamplerConfig {
    pub fn validate(&self) -> FieldResult<()> {
        if self.burn_in > MAX_BURN_IN {
            return Err(FieldError::Config(format!(
                "sampler.burn_in must be <= {MAX_BURN_IN}, got {}",
                self.burn_in
            )));
        }
        if !(1..=MAX_THIN).contains(&self.thin) {
            return Err(FieldError::Config(format!(
                "sampler.thin must be in [1, {MAX_THIN}], got {}",
                self.thin
            )));
        }
        if !(self.step_scale.is_finite() && self.step_scale > 0.0) {
            return Err(FieldError::Config(format!(
                "sampler.step_scale must be finite and > 0, got {}",
                self.step_scale
            )));
        }
        if self.max_cdf_bisect < 1 {
            return Err(FieldError::Config(format!(
                "sampler.max_cdf_bisect must be >= 1, got {}",
                self.max_cdf_bisect
            )));
        }
        Ok(())
    }
}

/// Runtime configuration for the randomization-method generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Number of Fourier modes N.
    /// Default: 1000.
    pub mode_count: usize,

    /// Soft cap on (points × modes) scalars held at once during evaluation.
    /// Default: 1e7.
    pub chunk_tmp_size: f64,

    /// Report chunk plan and per-chunk progress at info level.
    /// Default: false.
    pub verbose: bool,

    /// How many times evaluation may double its chunk count after a
    /// failed scratch allocation before giving up.
    /// Default: 16.
    pub max_chunk_retries: u32,

    /// Radial sampler tuning.
    pub sampler: SamplerConfig,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            mode_count: 1000,
            chunk_tmp_size: 1e7,
            verbose: false,
            max_chunk_retries: 16,
            sampler: SamplerConfig::default(),
        }
    }
}

impl GeneratorConfig {
    /// Validate configuration parameters.
    pub fn validate(&self) -> FieldResult<()> {
        if self.mode_count < 1 {
            return Err(FieldError::Config(format!(
                "mode_count must be >= 1, got {}",
                self.mode_count
            )));
        }
        if !(self.chunk_tmp_size.is_finite() && self.chunk_tmp_size >= 1.0) {
            return Err(FieldError::Config(format!(
                "chunk_tmp_size must be finite and >= 1, got {}",
                self.chunk_tmp_size
            )));
        }
        if self.max_chunk_retries > 63 {
            return Err(FieldError::Config(format!(
                "max_chunk_retries must be <= 63, got {}",
                self.max_chunk_retries
            )));
        }
        self.sampler.validate()
    }

    /// Load from JSON string. Missing fields take their defaults.
    pub fn from_json(json: &str) -> FieldResult<Self> {
        let cfg: Self = serde_json::from_str(json)
            .map_err(|e| FieldError::Config(format!("JSON parse error: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(GeneratorConfig::default().validate().is_ok());
    }

    #[test]
    fn test_zero_modes_rejected() {
        let cfg = GeneratorConfig {
            mode_count: 0,
            ..Default::default()
        };
        assert!(matches!(cfg.validate(), Err(FieldError::Config(_))));
    }

    #[test]
    fn test_bad_chunk_size_rejected() {
        for bad in [0.0, 0.5, f64::NAN, f64::INFINITY] {
            let cfg = GeneratorConfig {
                chunk_tmp_size: bad,
                ..Default::default()
            };
            assert!(cfg.validate().is_err(), "chunk_tmp_size {bad} accepted");
        }
    }

    #[test]
    fn test_bad_sampler_rejected() {
        let cfg = GeneratorConfig {
            sampler: SamplerConfig {
                thin: 0,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_sampler_bounds() {
        let huge_burn_in = SamplerConfig {
            burn_in: MAX_BURN_IN + 1,
            ..Default::default()
        };
        assert!(matches!(huge_burn_in.validate(), Err(FieldError::Config(_))));
        let huge_thin = SamplerConfig {
            thin: MAX_THIN + 1,
            ..Default::default()
        };
        assert!(matches!(huge_thin.validate(), Err(FieldError::Config(_))));
        let at_limit = SamplerConfig {
            burn_in: MAX_BURN_IN,
            thin: MAX_THIN,
            ..Default::default()
        };
        assert!(at_limit.validate().is_ok());
    }

    #[test]
    fn test_from_json_rejects_huge_burn_in() {
        let err = GeneratorConfig::from_json(
            r#"{"mode_count": 10, "sampler": {"burn_in": 18446744073709551615}}"#,
        )
        .unwrap_err();
        assert!(matches!(err, FieldError::Config(_)));
    }

    #[test]
    fn test_from_json_partial() {
        let cfg = GeneratorConfig::from_json(r#"{"mode_count": 500, "verbose": true}"#).unwrap();
        assert_eq!(cfg.mode_count, 500);
        assert!(cfg.verbose);
        assert_eq!(cfg.chunk_tmp_size, 1e7);
        assert_eq!(cfg.sampler, SamplerConfig::default());
    }

    #[test]
    fn test_from_json_invalid() {
        assert!(GeneratorConfig::from_json("{not json").is_err());
        assert!(GeneratorConfig::from_json(r#"{"mode_count": 0}"#).is_err());
    }
}
