//! Resolving reasoning-service picks back to source candidates.
//!
//! A returned item is matched against the original pool with each
//! [`MatchStrategy`] in [`MatchStrategy::ORDER`]; the first strategy that
//! produces a candidate wins.

use compscout_core::{CandidateBlog, CandidateVideo};

/// A pool entry the adviser can select.
pub trait Candidate {
    fn title(&self) -> &str;

    /// Identity of the source item; `None` when it cannot be fetched.
    fn source_url(&self) -> Option<String>;
}

impl Candidate for CandidateBlog {
    fn title(&self) -> &str {
        &self.title
    }

    fn source_url(&self) -> Option<String> {
        let url = self.url.trim();
        (!url.is_empty()).then(|| url.to_string())
    }
}

impl Candidate for CandidateVideo {
    fn title(&self) -> &str {
        &self.title
    }

    fn source_url(&self) -> Option<String> {
        self.url()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchStrategy {
    /// Candidate title equals the returned title (surrounding whitespace ignored).
    ExactTitle,
    /// One title contains the other.
    TitleContainment,
    /// The candidate at the same index as the returned item.
    Position,
}

impl MatchStrategy {
    pub const ORDER: [MatchStrategy; 3] = [
        MatchStrategy::ExactTitle,
        MatchStrategy::TitleContainment,
        MatchStrategy::Position,
    ];

    /// Try this strategy for the item returned at `position` with `title`.
    pub fn find<'a, T: Candidate>(
        self,
        title: &str,
        position: usize,
        pool: &'a [T],
    ) -> Option<&'a T> {
        let title = title.trim();
        match self {
            MatchStrategy::ExactTitle => {
                if title.is_empty() {
                    return None;
                }
                pool.iter().find(|c| c.title().trim() == title)
            }
            MatchStrategy::TitleContainment => {
                if title.is_empty() {
                    return None;
                }
                pool.iter().find(|c| {
                    let candidate = c.title().trim();
                    !candidate.is_empty()
                        && (candidate.contains(title) || title.contains(candidate))
                })
            }
            MatchStrategy::Position => pool.get(position),
        }
    }
}

/// Resolve a returned item to its source candidate, trying strategies in order.
pub fn resolve<'a, T: Candidate>(
    title: &str,
    position: usize,
    pool: &'a [T],
) -> Option<(&'a T, MatchStrategy)> {
    MatchStrategy::ORDER
        .iter()
        .find_map(|strategy| strategy.find(title, position, pool).map(|c| (c, *strategy)))
}
