// ─────────────────────────────────────────────────────────────────────
// RandMeth Kernel — Error Hierarchy
// ─────────────────────────────────────────────────────────────────────

use thiserror::Error;

/// Root error type for all RandMeth kernel failures.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FieldError {
    /// The covariance model violates its parameter contract.
    #[error("invalid covariance model: {0}")]
    InvalidModel(String),

    /// Configuration error (generator, sampler, or JSON input).
    #[error("config error: {0}")]
    Config(String),

    /// Fewer coordinate arrays were supplied than the model dimension needs.
    #[error("missing coordinate: model has dim {dim}, got {given} coordinate array(s)")]
    MissingCoordinate { dim: usize, given: usize },

    /// Coordinate arrays cannot be broadcast against each other.
    #[error("shape error: {0}")]
    Shape(String),

    /// The random source failed to produce samples.
    #[error("sampling error: {0}")]
    Sampling(String),

    /// Scratch allocation kept failing even after finer chunking.
    #[error(
        "resource exhausted: scratch allocation failed after {attempts} attempt(s) \
         (last chunk count {chunk_count})"
    )]
    ResourceExhausted { attempts: u32, chunk_count: u64 },
}

pub type FieldResult<T> = Result<T, FieldError>;
