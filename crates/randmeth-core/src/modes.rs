// ─────────────────────────────────────────────────────────────────────
// RandMeth Kernel — Fourier Mode Set
// ─────────────────────────────────────────────────────────────────────
//! Amplitudes and wavevectors of the truncated Fourier sum.
//!
//! Draw order from the seeded stream (fixed, so a seed reproduces the
//! set bit-for-bit):
//!   1. N normals → cosine amplitudes
//!   2. N normals → sine amplitudes
//!   3. N unit directions on the `dim`-sphere
//!   4. N radii from the radial spectral density

use std::ops::Range;

use randmeth_covmodel::CovarianceModel;
use randmeth_random::FieldRng;
use randmeth_types::{FieldError, FieldResult};

#[derive(Debug, Clone, PartialEq)]
pub struct ModeSet {
    amplitude_cos: Vec<f64>,
    amplitude_sin: Vec<f64>,
    /// `dim` rows of length N, row-major: `wavevectors[d][i]`.
    wavevectors: Vec<Vec<f64>>,
}

impl ModeSet {
    /// Sample `mode_count` modes for `model` from `rng`.
    pub fn sample<M: CovarianceModel>(
        model: &M,
        mode_count: usize,
        rng: &mut FieldRng,
    ) -> FieldResult<Self> {
        let amplitude_cos = rng.normal(mode_count);
        let amplitude_sin = rng.normal(mode_count);
        let directions = rng.sample_sphere(model.dim(), mode_count)?;

        let radii = match model.radial_distribution() {
            Some(dist) => rng.sample_dist(mode_count, &dist, 0.0)?,
            None => rng.sample_ln_pdf(
                mode_count,
                |k| model.ln_spectral_rad_pdf(k),
                1.0 / model.len_scale(),
            )?,
        };

        if radii.len() != mode_count {
            return Err(FieldError::Sampling(format!(
                "radial sampler returned {} radii, expected {mode_count}",
                radii.len()
            )));
        }

        let wavevectors = directions
            .into_iter()
            .map(|row| row.iter().zip(&radii).map(|(u, r)| u * r).collect())
            .collect();

        Ok(Self {
            amplitude_cos,
            amplitude_sin,
            wavevectors,
        })
    }

    /// Number of modes N.
    pub fn len(&self) -> usize {
        self.amplitude_cos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.amplitude_cos.is_empty()
    }

    pub fn dim(&self) -> usize {
        self.wavevectors.len()
    }

    pub fn amplitude_cos(&self) -> &[f64] {
        &self.amplitude_cos
    }

    pub fn amplitude_sin(&self) -> &[f64] {
        &self.amplitude_sin
    }

    pub fn wavevectors(&self) -> &[Vec<f64>] {
        &self.wavevectors
    }

    /// |kᵢ| for every mode.
    pub fn radii(&self) -> Vec<f64> {
        (0..self.len())
            .map(|i| {
                self.wavevectors
                    .iter()
                    .map(|row| row[i] * row[i])
                    .sum::<f64>()
                    .sqrt()
            })
            .collect()
    }

    /// Σᵢ [a_cos·cos φᵢ + a_sin·sin φᵢ] over `modes`, where `phases[j]`
    /// holds φ for mode `modes.start + j`.
    #[inline]
    pub(crate) fn sum_range(&self, modes: Range<usize>, phases: &[f64]) -> f64 {
        let z1 = &self.amplitude_cos[modes.clone()];
        let z2 = &self.amplitude_sin[modes];
        z1.iter()
            .zip(z2)
            .zip(phases)
            .map(|((a, b), phi)| {
                let (s, c) = phi.sin_cos();
                a * c + b * s
            })
            .sum()
    }
}
