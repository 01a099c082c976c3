// ─────────────────────────────────────────────────────────────────────
// RandMeth Kernel — Covariance Models
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! Covariance-model contract consumed by the generator, plus built-in
//! isotropic models.
//!
//! A model supplies its parameters (dim, var, nugget, len_scale) and the
//! radial distribution of its spectral density. Models with a closed-form
//! radial distribution are sampled by inverse CDF; the rest through their
//! log-density.

pub mod any;
pub mod exponential;
pub mod gaussian;
pub mod model;

pub use any::AnyModel;
pub use exponential::Exponential;
pub use gaussian::Gaussian;
pub use model::{validate_params, CovarianceModel, ModelParams, SpectralRadial};
