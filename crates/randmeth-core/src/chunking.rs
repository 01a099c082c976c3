// ─────────────────────────────────────────────────────────────────────
// RandMeth Kernel — Chunk Planning
// ─────────────────────────────────────────────────────────────────────
//! Splits the mode axis so that at most about `chunk_tmp_size`
//! (points × modes) phase values are alive at once.
//!
//!   chunk_count = 2^k,  k = max(0, ⌈log₂(points·N / chunk_tmp_size)⌉)
//!   chunk_len   = ⌈N / chunk_count⌉
//!
//! Chunk c covers modes [c·chunk_len, (c+1)·chunk_len) clipped to N;
//! chunks starting at or past N are empty and skipped.

use std::ops::Range;

/// Largest usable chunk exponent (2^63 chunks).
const MAX_EXPONENT: u32 = 63;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkPlan {
    /// k in chunk_count = 2^k.
    pub exponent: u32,
    pub count: u64,
    /// Modes per chunk (the last non-empty chunk may hold fewer).
    pub len: usize,
}

impl ChunkPlan {
    /// Smallest power-of-two chunking that keeps `points × modes / count`
    /// at or below `chunk_tmp_size`.
    pub fn initial(points: usize, modes: usize, chunk_tmp_size: f64) -> Self {
        let ratio = points as f64 * modes as f64 / chunk_tmp_size;
        let exponent = if ratio > 1.0 {
            (ratio.log2().ceil() as u32).min(MAX_EXPONENT)
        } else {
            0
        };
        Self::with_exponent(modes, exponent)
    }

    pub fn with_exponent(modes: usize, exponent: u32) -> Self {
        let exponent = exponent.min(MAX_EXPONENT);
        let count = 1u64 << exponent;
        let modes = modes as u64;
        let len = if count >= modes {
            1
        } else {
            modes.div_ceil(count)
        };
        Self {
            exponent,
            count,
            len: len as usize,
        }
    }

    /// Twice as many chunks, or `None` when chunks already hold a
    /// single mode and cannot shrink further.
    pub fn finer(&self, modes: usize) -> Option<Self> {
        if self.len <= 1 || self.exponent >= MAX_EXPONENT {
            return None;
        }
        Some(Self::with_exponent(modes, self.exponent + 1))
    }

    /// Non-empty mode ranges in chunk order.
    pub fn ranges(&self, modes: usize) -> impl Iterator<Item = Range<usize>> {
        let len = self.len;
        (0..self.count)
            .map(move |c| {
                let start = (c as usize).saturating_mul(len);
                start..start.saturating_add(len).min(modes)
            })
            .take_while(move |r| r.start < modes)
    }
}

/// Source of per-chunk scratch buffers.
///
/// Returning `None` signals an allocation failure; the evaluator then
/// retries the whole evaluation with finer chunking.
pub trait ScratchSource {
    fn scratch(&mut self, len: usize) -> Option<Vec<f64>>;
}

/// Heap scratch that reports allocation failure instead of aborting.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeapScratch;

impl ScratchSource for HeapScratch {
    fn scratch(&mut self, len: usize) -> Option<Vec<f64>> {
        let mut buf = Vec::new();
        buf.try_reserve_exact(len).ok()?;
        buf.resize(len, 0.0);
        Some(buf)
    }
}
