// ─────────────────────────────────────────────────────────────────────
// RandMeth Kernel — Seed Arguments
// ─────────────────────────────────────────────────────────────────────
//! Seed selection passed to generator updates.
//!
//! A stored seed is always a concrete `u64`. `SeedArg` only describes
//! how the next seed is chosen and is never stored itself.

use serde::{Deserialize, Serialize};

/// How an update picks the seed for the next mode set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeedArg {
    /// Use exactly this seed.
    Explicit(u64),
    /// Keep whatever seed the generator already holds.
    #[default]
    KeepCurrent,
    /// Draw a fresh random seed.
    RequestRandom,
}

impl SeedArg {
    pub fn is_keep_current(&self) -> bool {
        matches!(self, SeedArg::KeepCurrent)
    }

    /// Resolve against the currently held seed.
    ///
    /// Returns `None` when a fresh random seed has to be drawn, either
    /// because it was requested or because there is no current seed to keep.
    pub fn resolve(self, current: Option<u64>) -> Option<u64> {
        match self {
            SeedArg::Explicit(seed) => Some(seed),
            SeedArg::KeepCurrent => current,
            SeedArg::RequestRandom => None,
        }
    }
}

/// `Some(seed)` is explicit, `None` asks for a random seed.
impl From<Option<u64>> for SeedArg {
    fn from(seed: Option<u64>) -> Self {
        match seed {
            Some(s) => SeedArg::Explicit(s),
            None => SeedArg::RequestRandom,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_explicit_ignores_current() {
        assert_eq!(SeedArg::Explicit(7).resolve(Some(3)), Some(7));
        assert_eq!(SeedArg::Explicit(7).resolve(None), Some(7));
    }

    #[test]
    fn test_resolve_keep_current() {
        assert_eq!(SeedArg::KeepCurrent.resolve(Some(3)), Some(3));
        assert_eq!(SeedArg::KeepCurrent.resolve(None), None);
    }

    #[test]
    fn test_resolve_request_random() {
        assert_eq!(SeedArg::RequestRandom.resolve(Some(3)), None);
    }

    #[test]
    fn test_from_option() {
        assert_eq!(SeedArg::from(Some(42)), SeedArg::Explicit(42));
        assert_eq!(SeedArg::from(None), SeedArg::RequestRandom);
        assert!(SeedArg::default().is_keep_current());
    }
}
