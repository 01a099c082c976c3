// ─────────────────────────────────────────────────────────────────────
// RandMeth Kernel — Types
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! Type definitions, configuration, and error hierarchy for the
//! RandMeth kernel — the spectral random-field generator.

pub mod config;
pub mod error;
pub mod seed;

pub use config::{GeneratorConfig, SamplerConfig, MAX_BURN_IN, MAX_THIN};
pub use error::{FieldError, FieldResult};
pub use seed::SeedArg;
