// ─────────────────────────────────────────────────────────────────────
// RandMeth Kernel — Field RNG
// ─────────────────────────────────────────────────────────────────────
//! `FieldRng` wraps a seeded ChaCha20 stream and provides the batch
//! draws the mode sampler needs.

use std::f64::consts::TAU;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use rand_distr::{Distribution, Normal, StandardNormal, Uniform};

use randmeth_types::{FieldError, FieldResult, SamplerConfig};

/// A one-dimensional distribution that can be sampled by inverse CDF.
///
/// `ppf` is the closed-form inverse when one exists. Without it the
/// sampler inverts `cdf` numerically.
pub trait InverseCdf {
    fn cdf(&self, x: f64) -> f64;

    fn ppf(&self, _u: f64) -> Option<f64> {
        None
    }
}

/// Seeded random source for mode sampling and nugget noise.
#[derive(Debug, Clone)]
pub struct FieldRng {
    inner: ChaCha20Rng,
    sampler: SamplerConfig,
}

impl FieldRng {
    /// Stream seeded from `seed` with default sampler tuning.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            inner: ChaCha20Rng::seed_from_u64(seed),
            sampler: SamplerConfig::default(),
        }
    }

    pub fn with_sampler(mut self, sampler: SamplerConfig) -> Self {
        self.sampler = sampler;
        self
    }

    /// Uniform in [0, 1).
    #[inline]
    pub fn next_uniform(&mut self) -> f64 {
        self.inner.gen()
    }

    #[inline]
    pub fn next_normal(&mut self) -> f64 {
        StandardNormal.sample(&mut self.inner)
    }

    /// `size` independent standard normal samples.
    pub fn normal(&mut self, size: usize) -> Vec<f64> {
        (0..size).map(|_| self.next_normal()).collect()
    }

    /// Fill `out` with standard normal samples.
    pub fn fill_normal(&mut self, out: &mut [f64]) {
        for v in out.iter_mut() {
            *v = StandardNormal.sample(&mut self.inner);
        }
    }

    /// `size` directions uniform on the unit sphere in `dim` dimensions.
    ///
    /// Returned as `dim` rows of length `size`: `rows[d][i]` is component
    /// `d` of direction `i`.
    pub fn sample_sphere(&mut self, dim: usize, size: usize) -> FieldResult<Vec<Vec<f64>>> {
        let mut rows = vec![vec![0.0; size]; dim];
        match dim {
            0 => {
                return Err(FieldError::Sampling(
                    "cannot sample directions in 0 dimensions".to_string(),
                ))
            }
            1 => {
                for i in 0..size {
                    rows[0][i] = if self.inner.gen_bool(0.5) { 1.0 } else { -1.0 };
                }
            }
            2 => {
                let angle = Uniform::new(0.0, TAU);
                for i in 0..size {
                    let phi = angle.sample(&mut self.inner);
                    rows[0][i] = phi.cos();
                    rows[1][i] = phi.sin();
                }
            }
            3 => {
                let angle = Uniform::new(0.0, TAU);
                let height = Uniform::new_inclusive(-1.0, 1.0);
                for i in 0..size {
                    let phi = angle.sample(&mut self.inner);
                    let cos_theta: f64 = height.sample(&mut self.inner);
                    let sin_theta = (1.0 - cos_theta * cos_theta).max(0.0).sqrt();
                    rows[0][i] = phi.cos() * sin_theta;
                    rows[1][i] = phi.sin() * sin_theta;
                    rows[2][i] = cos_theta;
                }
            }
            _ => {
                // Normalised Gaussian vectors are isotropic in any dimension.
                let mut v = vec![0.0; dim];
                for i in 0..size {
                    let norm = loop {
                        self.fill_normal(&mut v);
                        let n = v.iter().map(|c| c * c).sum::<f64>().sqrt();
                        if n > 1e-300 {
                            break n;
                        }
                    };
                    for (d, row) in rows.iter_mut().enumerate() {
                        row[i] = v[d] / norm;
                    }
                }
            }
        }
        Ok(rows)
    }

    /// `size` samples from `dist` restricted to `[lower, ∞)`, by inverse CDF.
    pub fn sample_dist<D: InverseCdf + ?Sized>(
        &mut self,
        size: usize,
        dist: &D,
        lower: f64,
    ) -> FieldResult<Vec<f64>> {
        let mut out = Vec::with_capacity(size);
        for _ in 0..size {
            let u = self.next_uniform();
            let x = match dist.ppf(u) {
                Some(x) => x,
                None => self.invert_cdf(dist, u, lower)?,
            };
            if !x.is_finite() {
                return Err(FieldError::Sampling(format!(
                    "inverse CDF returned non-finite value {x} for u = {u}"
                )));
            }
            out.push(x.max(lower));
        }
        Ok(out)
    }

    /// Solve `cdf(x) = u` for `x >= lower` by bracketing then bisection.
    fn invert_cdf<D: InverseCdf + ?Sized>(&self, dist: &D, u: f64, lower: f64) -> FieldResult<f64> {
        let max_iter = self.sampler.max_cdf_bisect;
        let eval = |x: f64| -> FieldResult<f64> {
            let c = dist.cdf(x);
            if c.is_finite() {
                Ok(c)
            } else {
                Err(FieldError::Sampling(format!("CDF is not finite at x = {x}")))
            }
        };

        let mut lo = lower;
        let mut width = 1.0;
        let mut hi = lower + width;
        let mut bracketed = false;
        for _ in 0..max_iter {
            if eval(hi)? >= u {
                bracketed = true;
                break;
            }
            lo = hi;
            width *= 2.0;
            hi = lower + width;
        }
        if !bracketed {
            return Err(FieldError::Sampling(format!(
                "could not bracket CDF quantile {u} within {max_iter} doublings"
            )));
        }

        for _ in 0..max_iter {
            let mid = 0.5 * (lo + hi);
            if eval(mid)? < u {
                lo = mid;
            } else {
                hi = mid;
            }
            if hi - lo <= 1e-12 * hi.abs().max(1.0) {
                break;
            }
        }
        Ok(0.5 * (lo + hi))
    }

    /// `size` positive samples from an unnormalised log-density.
    ///
    /// Random-walk Metropolis in log space starting at `sample_around`,
    /// with burn-in and thinning taken from the sampler config.
    pub fn sample_ln_pdf<F>(
        &mut self,
        size: usize,
        ln_pdf: F,
        sample_around: f64,
    ) -> FieldResult<Vec<f64>>
    where
        F: Fn(f64) -> f64,
    {
        if size == 0 {
            return Ok(Vec::new());
        }
        if !(sample_around.is_finite() && sample_around > 0.0) {
            return Err(FieldError::Sampling(format!(
                "start point must be finite and > 0, got {sample_around}"
            )));
        }
        let step = Normal::new(0.0, self.sampler.step_scale)
            .map_err(|e| FieldError::Sampling(format!("bad proposal scale: {e}")))?;

        // Target in log space: ln p(x) + ln x (Jacobian of x = e^s).
        let target = |x: f64| ln_pdf(x) + x.ln();

        let mut x = sample_around;
        let mut lp = target(x);
        if !lp.is_finite() {
            return Err(FieldError::Sampling(format!(
                "log-density is not finite at start point {sample_around}"
            )));
        }

        let burn_in = self.sampler.burn_in;
        let thin = self.sampler.thin.max(1);
        let total = size
            .checked_mul(thin)
            .and_then(|kept| kept.checked_add(burn_in))
            .ok_or_else(|| {
                FieldError::Sampling(format!(
                    "chain length overflows: {size} samples, thin {thin}, burn-in {burn_in}"
                ))
            })?;
        let mut out = Vec::with_capacity(size);
        let mut accepted = 0usize;

        for k in 1..=total {
            let y = x * step.sample(&mut self.inner).exp();
            let lq = target(y);
            if lq.is_finite() {
                let log_u = self.next_uniform().ln();
                if lq >= lp || log_u < lq - lp {
                    x = y;
                    lp = lq;
                    accepted += 1;
                }
            }
            if k > burn_in && (k - burn_in) % thin == 0 {
                out.push(x);
            }
        }

        log::debug!(
            "ln-pdf sampler: {size} samples, acceptance {:.3}",
            accepted as f64 / total as f64
        );
        Ok(out)
    }
}
