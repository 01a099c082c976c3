// ─────────────────────────────────────────────────────────────────────
// RandMeth Kernel — Core Generator
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! Randomization method for isotropic Gaussian random fields:
//!
//!   u(x) = √(σ²/N) · Σᵢ [ Z₁ᵢ·cos⟨kᵢ, x⟩ + Z₂ᵢ·sin⟨kᵢ, x⟩ ] + nugget
//!
//! with Z₁, Z₂ standard normal and kᵢ drawn from the covariance
//! model's spectral density.
//!
//! Architecture:
//!   - ModeSet: amplitudes + wavevectors, sampled together from one seed
//!   - ChunkPlan: splits the mode axis to bound scratch memory
//!   - RandMeth: owns model snapshot, seed and modes; evaluates fields
//!
//! # Invariants
//!
//! 1. **Modes are replaced, never edited**: every resample builds a new
//!    `ModeSet` behind a fresh `Arc`. A failed resample leaves the
//!    previous model, seed and modes in place.
//!
//! 2. **Seeds are reproducible**: the stored seed is always the concrete
//!    value the mode stream was created from, even when a random seed
//!    was requested.
//!
//! 3. **Chunking does not change results**: the mode axis is summed in
//!    the same order for every chunk count, so results agree up to
//!    floating-point reassociation of the per-chunk partial sums.

pub mod chunking;
pub mod generator;
pub mod modes;

pub use chunking::{ChunkPlan, HeapScratch, ScratchSource};
pub use generator::RandMeth;
pub use modes::ModeSet;

pub use randmeth_covmodel::{AnyModel, CovarianceModel, Exponential, Gaussian, ModelParams};
pub use randmeth_types::{FieldError, FieldResult, GeneratorConfig, SamplerConfig, SeedArg};
