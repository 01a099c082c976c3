// ─────────────────────────────────────────────────────────────────────
// RandMeth Kernel — Randomization-Method Generator
// ─────────────────────────────────────────────────────────────────────
//! `RandMeth` owns a covariance-model snapshot, the seed, and the mode
//! set drawn from them, and evaluates field values at query points.
//!
//! Any change of model, seed or mode count is an explicit `&mut self`
//! call that redraws the whole mode set; evaluation only reads it.

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use rand::Rng;

use randmeth_covmodel::CovarianceModel;
use randmeth_random::FieldRng;
use randmeth_types::{FieldError, FieldResult, GeneratorConfig, SamplerConfig, SeedArg};

use crate::chunking::{ChunkPlan, HeapScratch, ScratchSource};
use crate::modes::ModeSet;

/// A chunk's scratch buffer could not be obtained.
struct ScratchExhausted;

/// Randomization-method generator for one covariance model.
#[derive(Debug)]
pub struct RandMeth<M: CovarianceModel> {
    model: M,
    config: GeneratorConfig,
    seed: u64,
    modes: Arc<ModeSet>,
    generation: u64,
    /// Continuation of the mode stream, used for nugget noise.
    nugget_rng: Mutex<FieldRng>,
}

impl<M: CovarianceModel> RandMeth<M> {
    /// Create a generator and draw its first mode set.
    ///
    /// `seed = None` picks a random seed; `seed()` reports the value chosen.
    pub fn new(model: M, config: GeneratorConfig, seed: Option<u64>) -> FieldResult<Self> {
        config.validate()?;
        model.validate()?;
        let seed = seed.unwrap_or_else(random_seed);
        let (modes, rng) = draw_modes(&model, config.mode_count, &config.sampler, seed)?;
        log::debug!(
            "RandMeth: drew {} modes for {} (seed {seed})",
            modes.len(),
            model.name()
        );
        Ok(Self {
            model,
            config,
            seed,
            modes: Arc::new(modes),
            generation: 0,
            nugget_rng: Mutex::new(rng),
        })
    }

    pub fn with_defaults(model: M, seed: Option<u64>) -> FieldResult<Self> {
        Self::new(model, GeneratorConfig::default(), seed)
    }

    /// Install `model` and redraw the modes.
    ///
    /// Does nothing when `model` equals the current snapshot and `seed` is
    /// `KeepCurrent`. `Some(seed)` and `None` convert to `Explicit` and
    /// `RequestRandom`. Returns whether the modes were redrawn.
    pub fn update(&mut self, model: M, seed: impl Into<SeedArg>) -> FieldResult<bool> {
        let seed = seed.into();
        if seed.is_keep_current() && model == self.model {
            return Ok(false);
        }
        model.validate()?;
        let seed = seed.resolve(Some(self.seed)).unwrap_or_else(random_seed);
        self.resample(model, seed, self.config.mode_count)?;
        Ok(true)
    }

    /// Redraw the modes unconditionally, with `seed` or a random one.
    pub fn reset_seed(&mut self, seed: Option<u64>) -> FieldResult<()> {
        let seed = seed.unwrap_or_else(random_seed);
        self.resample(self.model.clone(), seed, self.config.mode_count)
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Redraw the modes if `seed` differs from the current one.
    /// `None` always redraws with a random seed.
    pub fn set_seed(&mut self, seed: Option<u64>) -> FieldResult<bool> {
        if seed == Some(self.seed) {
            return Ok(false);
        }
        self.reset_seed(seed)?;
        Ok(true)
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    /// Same as `update(model, SeedArg::KeepCurrent)`.
    pub fn set_model(&mut self, model: M) -> FieldResult<bool> {
        self.update(model, SeedArg::KeepCurrent)
    }

    pub fn mode_count(&self) -> usize {
        self.config.mode_count
    }

    /// Redraw all modes with the current seed and a new mode count.
    pub fn set_mode_count(&mut self, mode_count: usize) -> FieldResult<()> {
        if mode_count < 1 {
            return Err(FieldError::Config(format!(
                "mode_count must be >= 1, got {mode_count}"
            )));
        }
        self.resample(self.model.clone(), self.seed, mode_count)
    }

    pub fn chunk_tmp_size(&self) -> f64 {
        self.config.chunk_tmp_size
    }

    pub fn set_chunk_tmp_size(&mut self, chunk_tmp_size: f64) -> FieldResult<()> {
        let cfg = GeneratorConfig {
            chunk_tmp_size,
            ..self.config.clone()
        };
        cfg.validate()?;
        self.config = cfg;
        Ok(())
    }

    pub fn verbose(&self) -> bool {
        self.config.verbose
    }

    pub fn set_verbose(&mut self, verbose: bool) {
        self.config.verbose = verbose;
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Spatial dimension of the model.
    pub fn dim(&self) -> usize {
        self.model.dim()
    }

    /// Current mode set. The `Arc` is replaced on every redraw.
    pub fn modes(&self) -> &Arc<ModeSet> {
        &self.modes
    }

    /// Number of redraws since construction.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    fn resample(&mut self, model: M, seed: u64, mode_count: usize) -> FieldResult<()> {
        let (modes, rng) = draw_modes(&model, mode_count, &self.config.sampler, seed)?;
        self.model = model;
        self.seed = seed;
        self.config.mode_count = mode_count;
        self.modes = Arc::new(modes);
        self.nugget_rng = Mutex::new(rng);
        self.generation += 1;
        log::debug!(
            "RandMeth: redrew {mode_count} modes for {} (seed {seed}, generation {})",
            self.model.name(),
            self.generation
        );
        Ok(())
    }

    /// Field values at the points given by `coords` = [x, y, z].
    ///
    /// At least `dim` coordinate arrays are required; extra ones are
    /// ignored. Each array has the common length n or length 1 (broadcast
    /// scalar). Returns n values.
    pub fn evaluate(&self, coords: &[&[f64]]) -> FieldResult<Vec<f64>> {
        self.evaluate_with(coords, &mut HeapScratch)
    }

    /// `evaluate` with a caller-supplied scratch source.
    pub fn evaluate_with<S: ScratchSource>(
        &self,
        coords: &[&[f64]],
        scratch: &mut S,
    ) -> FieldResult<Vec<f64>> {
        let coords = self.take_dims(coords)?;
        let points = Points::Scattered {
            coords,
            len: broadcast_len(coords)?,
        };
        self.field_at(&points, scratch)
    }

    fn field_at<S: ScratchSource>(
        &self,
        points: &Points<'_>,
        scratch: &mut S,
    ) -> FieldResult<Vec<f64>> {
        let mut field = self.summed_modes(points, scratch)?;
        let scale = (self.model.var() / self.modes.len() as f64).sqrt();
        for v in field.iter_mut() {
            *v *= scale;
        }
        self.add_nugget(&mut field);
        Ok(field)
    }

    /// Field value at a single position.
    pub fn evaluate_point(&self, pos: &[f64]) -> FieldResult<f64> {
        let coords: Vec<&[f64]> = pos.iter().map(std::slice::from_ref).collect();
        self.evaluate(&coords)?
            .first()
            .copied()
            .ok_or_else(|| FieldError::Shape("empty position".to_string()))
    }

    /// Field values on the grid spanned by per-axis coordinates.
    ///
    /// Output is row-major with the last axis varying fastest, length
    /// `len(x)·len(y)·len(z)`. Grid coordinates are derived per point, so
    /// only the output itself scales with the grid size.
    pub fn evaluate_structured(&self, axes: &[&[f64]]) -> FieldResult<Vec<f64>> {
        self.evaluate_structured_with(axes, &mut HeapScratch)
    }

    /// `evaluate_structured` with a caller-supplied scratch source.
    pub fn evaluate_structured_with<S: ScratchSource>(
        &self,
        axes: &[&[f64]],
        scratch: &mut S,
    ) -> FieldResult<Vec<f64>> {
        let axes = self.take_dims(axes)?;
        let len = axes
            .iter()
            .try_fold(1usize, |acc, a| acc.checked_mul(a.len()))
            .ok_or_else(|| FieldError::Shape("structured grid size overflows usize".to_string()))?;

        if len == 0 {
            return Ok(Vec::new());
        }

        let mut strides = vec![1usize; axes.len()];
        for d in (0..axes.len().saturating_sub(1)).rev() {
            strides[d] = strides[d + 1] * axes[d + 1].len();
        }
        let points = Points::Grid { axes, strides, len };
        self.field_at(&points, scratch)
    }

    fn take_dims<'a, 'b>(&self, coords: &'a [&'b [f64]]) -> FieldResult<&'a [&'b [f64]]> {
        let dim = self.dim();
        if coords.len() < dim {
            return Err(FieldError::MissingCoordinate {
                dim,
                given: coords.len(),
            });
        }
        Ok(&coords[..dim])
    }

    /// Unscaled Fourier sum at every point, retrying with finer chunking
    /// when scratch allocation fails.
    fn summed_modes<S: ScratchSource>(
        &self,
        points: &Points<'_>,
        scratch: &mut S,
    ) -> FieldResult<Vec<f64>> {
        let n_modes = self.modes.len();
        let mut plan = ChunkPlan::initial(points.len(), n_modes, self.config.chunk_tmp_size);

        let mut summed: Vec<f64> = Vec::new();
        if summed.try_reserve_exact(points.len()).is_err() {
            log::warn!(
                "RandMeth: cannot allocate output for {} points",
                points.len()
            );
            return Err(FieldError::ResourceExhausted {
                attempts: 1,
                chunk_count: plan.count,
            });
        }
        summed.resize(points.len(), 0.0);
        let mut attempts = 0u32;

        loop {
            attempts += 1;
            if self.accumulate(points, &plan, scratch, &mut summed).is_ok() {
                return Ok(summed);
            }
            let finer = if attempts <= self.config.max_chunk_retries {
                plan.finer(n_modes)
            } else {
                None
            };
            match finer {
                Some(next) => {
                    log::warn!(
                        "RandMeth: not enough memory, dividing Fourier modes into {} chunks",
                        next.count
                    );
                    plan = next;
                    summed.fill(0.0);
                }
                None => {
                    return Err(FieldError::ResourceExhausted {
                        attempts,
                        chunk_count: plan.count,
                    })
                }
            }
        }
    }

    /// One pass over all chunks of `plan`, adding into `summed`.
    fn accumulate<S: ScratchSource>(
        &self,
        points: &Points<'_>,
        plan: &ChunkPlan,
        scratch: &mut S,
        summed: &mut [f64],
    ) -> Result<(), ScratchExhausted> {
        let n_points = summed.len();
        let n_modes = self.modes.len();
        if self.config.verbose {
            log::info!(
                "RandMeth: generating field with {} chunks (chunk length {})",
                plan.count,
                plan.len
            );
        } else {
            log::debug!(
                "RandMeth: {n_points} points, {} chunks of {} modes",
                plan.count,
                plan.len
            );
        }
        if n_points == 0 {
            return Ok(());
        }

        let wavevectors = self.modes.wavevectors();
        for (c, range) in plan.ranges(n_modes).enumerate() {
            if self.config.verbose {
                log::info!("RandMeth: chunk {} of {}", c + 1, plan.count);
            }
            let width = range.len();
            let len = n_points.checked_mul(width).ok_or(ScratchExhausted)?;
            let mut buf = scratch.scratch(len).ok_or(ScratchExhausted)?;
            if buf.len() < len {
                return Err(ScratchExhausted);
            }
            let phases = &mut buf[..len];

            // phases[p·width + j] = ⟨k_{start+j}, x_p⟩
            for (p, row) in phases.chunks_exact_mut(width).enumerate() {
                row.fill(0.0);
                for (d, k_row) in wavevectors.iter().enumerate() {
                    let x = points.coord(d, p);
                    for (phi, k) in row.iter_mut().zip(&k_row[range.clone()]) {
                        *phi += k * x;
                    }
                }
            }
            for (s, row) in summed.iter_mut().zip(phases.chunks_exact(width)) {
                *s += self.modes.sum_range(range.clone(), row);
            }
        }
        Ok(())
    }

    fn add_nugget(&self, field: &mut [f64]) {
        let nugget = self.model.nugget();
        if nugget <= 0.0 {
            return;
        }
        let sd = nugget.sqrt();
        let mut rng = self.nugget_rng.lock();
        for v in field.iter_mut() {
            *v += sd * rng.next_normal();
        }
    }
}

impl<M: CovarianceModel> fmt::Display for RandMeth<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "RandMeth(model={}, mode_count={}, seed={})",
            self.model, self.config.mode_count, self.seed
        )
    }
}

fn random_seed() -> u64 {
    rand::thread_rng().gen()
}

/// Query points, either explicit coordinate arrays or a tensor grid.
enum Points<'a> {
    /// Per-axis arrays of the common length `len`, or of length 1.
    Scattered { coords: &'a [&'a [f64]], len: usize },
    /// Row-major grid; `strides[d]` is the flat-index step of axis `d`.
    Grid {
        axes: &'a [&'a [f64]],
        strides: Vec<usize>,
        len: usize,
    },
}

impl Points<'_> {
    fn len(&self) -> usize {
        match self {
            Points::Scattered { len, .. } | Points::Grid { len, .. } => *len,
        }
    }

    /// Coordinate `d` of point `p`.
    #[inline]
    fn coord(&self, d: usize, p: usize) -> f64 {
        match self {
            Points::Scattered { coords, .. } => {
                let axis = coords[d];
                axis[if axis.len() == 1 { 0 } else { p }]
            }
            Points::Grid { axes, strides, .. } => {
                let axis = axes[d];
                axis[(p / strides[d]) % axis.len()]
            }
        }
    }
}

/// Draw a mode set; the returned stream continues after the mode draws.
fn draw_modes<M: CovarianceModel>(
    model: &M,
    mode_count: usize,
    sampler: &SamplerConfig,
    seed: u64,
) -> FieldResult<(ModeSet, FieldRng)> {
    let mut rng = FieldRng::from_seed(seed).with_sampler(sampler.clone());
    let modes = ModeSet::sample(model, mode_count, &mut rng)?;
    Ok((modes, rng))
}

/// Common length of coordinate arrays, treating length-1 arrays as scalars.
fn broadcast_len(coords: &[&[f64]]) -> FieldResult<usize> {
    let mut n: Option<usize> = None;
    for c in coords.iter().filter(|c| c.len() != 1) {
        match n {
            None => n = Some(c.len()),
            Some(m) if m == c.len() => {}
            Some(m) => {
                return Err(FieldError::Shape(format!(
                    "cannot broadcast coordinate arrays of length {m} and {}",
                    c.len()
                )))
            }
        }
    }
    Ok(n.unwrap_or(1))
}
