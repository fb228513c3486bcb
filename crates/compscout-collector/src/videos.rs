//! Relative-evaluation selection over a scored video pool.

use compscout_core::{CandidateVideo, CollectorSettings};

/// Absorbs binary rounding so that e.g. `90 * 0.7` floors to 63, not 62.
const RATIO_EPSILON: f64 = 1e-9;

/// Keeps a pool-size-dependent share of the highest-priority videos.
///
/// - pools of at least `ratio_min_pool` keep `floor(keep_ratio * N)`;
/// - pools of at least `absolute_cap` keep exactly `absolute_cap`;
/// - smaller pools are kept whole.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoSelector {
    keep_ratio: f64,
    ratio_min_pool: usize,
    absolute_cap: usize,
}

impl Default for VideoSelector {
    fn default() -> Self {
        Self::from_settings(&CollectorSettings::default())
    }
}

impl VideoSelector {
    #[must_use]
    pub fn new(keep_ratio: f64, ratio_min_pool: usize, absolute_cap: usize) -> Self {
        Self {
            keep_ratio,
            ratio_min_pool,
            absolute_cap,
        }
    }

    #[must_use]
    pub fn from_settings(settings: &CollectorSettings) -> Self {
        Self::new(
            settings.video_keep_ratio,
            settings.video_ratio_min_pool,
            settings.video_absolute_cap,
        )
    }

    /// Number of videos kept from a pool of `pool_size`.
    #[must_use]
    pub fn keep_count(&self, pool_size: usize) -> usize {
        if pool_size >= self.ratio_min_pool {
            #[allow(
                clippy::cast_precision_loss,
                clippy::cast_possible_truncation,
                clippy::cast_sign_loss
            )]
            let kept = (pool_size as f64 * self.keep_ratio + RATIO_EPSILON).floor() as usize;
            kept.min(pool_size)
        } else if pool_size >= self.absolute_cap {
            self.absolute_cap
        } else {
            pool_size
        }
    }

    /// Select the top of `candidates` by priority.
    ///
    /// Candidates are stable-sorted by descending priority first, so equal
    /// scores keep provider order.
    #[must_use]
    pub fn select(&self, mut candidates: Vec<CandidateVideo>) -> Vec<CandidateVideo> {
        candidates.sort_by(|a, b| b.priority.total_cmp(&a.priority));
        let keep = self.keep_count(candidates.len());
        candidates.truncate(keep);
        candidates
    }
}
