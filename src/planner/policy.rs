//! Worker cap policies.

use std::fmt;
use std::num::NonZeroUsize;

use tracing::warn;

/// Upper bound applied to the computed worker count.
///
/// A tripped cap yields `fallback`, which may sit below `threshold`: a
/// deployment tier over budget under-provisions instead of saturating at the
/// boundary.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CapPolicy {
    /// Use the computed worker count as is.
    #[default]
    Uncapped,
    /// Replace any count above `threshold` with `fallback`.
    ///
    /// Build through [`CapPolicy::capped`]; a fallback above the threshold
    /// is clamped to it either way.
    Capped {
        threshold: NonZeroUsize,
        fallback: NonZeroUsize,
    },
}

impl CapPolicy {
    /// Profile for small deployment tiers: more than 4 workers becomes 3.
    pub const CONSTRAINED: CapPolicy = CapPolicy::Capped {
        threshold: match NonZeroUsize::new(4) {
            Some(n) => n,
            None => unreachable!(),
        },
        fallback: match NonZeroUsize::new(3) {
            Some(n) => n,
            None => unreachable!(),
        },
    };

    /// Cap at `threshold`, dropping to `fallback` when tripped.
    ///
    /// A fallback above the threshold would raise the count instead of
    /// lowering it, so it is clamped to the threshold.
    pub fn capped(threshold: NonZeroUsize, fallback: NonZeroUsize) -> Self {
        if fallback > threshold {
            warn!(
                threshold = threshold.get(),
                fallback = fallback.get(),
                "worker cap fallback above threshold, using threshold"
            );
        }
        Self::Capped {
            threshold,
            fallback: fallback.min(threshold),
        }
    }

    /// Look up a named deployment profile.
    pub fn from_profile(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "standard" | "uncapped" | "none" => Some(Self::Uncapped),
            "constrained" | "small" => Some(Self::CONSTRAINED),
            _ => None,
        }
    }

    /// Apply the policy to a raw worker count.
    #[inline]
    pub fn apply(&self, raw: NonZeroUsize) -> NonZeroUsize {
        match *self {
            Self::Uncapped => raw,
            Self::Capped {
                threshold,
                fallback,
            } if raw > threshold => fallback.min(threshold),
            Self::Capped { .. } => raw,
        }
    }
}

impl fmt::Display for CapPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uncapped => write!(f, "uncapped"),
            Self::Capped {
                threshold,
                fallback,
            } => write!(f, "above {} use {}", threshold, fallback),
        }
    }
}
