// ─────────────────────────────────────────────────────────────────────
// RandMeth Kernel — Random Source
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! Seeded random source used to draw Fourier modes.
//!
//! Every draw comes from one ChaCha20 stream, so a seed reproduces the
//! same sequence on every platform:
//!   - standard normal amplitudes
//!   - uniform directions on the unit sphere
//!   - radii by inverse CDF (closed-form or bisection)
//!   - radii from a log-density via log-space Metropolis

pub mod rng;

pub use rng::{FieldRng, InverseCdf};
