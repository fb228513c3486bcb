//! Relevance selection across the blog and video pools.

mod matching;
mod prompt;

use std::collections::HashSet;
use std::sync::Arc;

use compscout_core::{
    CandidateBlog, CandidateVideo, CollectionRequest, Selected, SelectedBlog, SelectedVideo,
    TextGenerator, MAX_SELECTED_LIMIT,
};
use serde::{Deserialize, Serialize};

pub use matching::{resolve, Candidate, MatchStrategy};

use crate::error::ParseError;
use crate::json::decode_embedded;

/// Reason attached to every item picked by the fallback ranking.
pub const FALLBACK_REASON: &str =
    "Automated relevance ranking unavailable; kept in original search order";

const DEFAULT_REASON: &str = "Selected by relevance ranking";

/// How a [`Selection`] was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionMethod {
    Automated,
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    pub selected_blogs: Vec<SelectedBlog>,
    pub selected_videos: Vec<SelectedVideo>,
    pub method: SelectionMethod,
}

#[derive(Debug, Deserialize)]
struct AdviceResponse {
    #[serde(default, alias = "selectedBlogs")]
    selected_blogs: Option<Vec<AdvisedItem>>,
    #[serde(default, alias = "selectedVideos")]
    selected_videos: Option<Vec<AdvisedItem>>,
}

#[derive(Debug, Deserialize)]
struct AdvisedItem {
    #[serde(default)]
    title: String,
    #[serde(default, alias = "relevanceReason", alias = "reason")]
    relevance_reason: String,
}

/// Picks the most relevant candidates with the reasoning service.
pub struct SelectionAdviser {
    generator: Arc<dyn TextGenerator>,
    max_selected: usize,
}

impl SelectionAdviser {
    /// `max_selected` is capped at [`MAX_SELECTED_LIMIT`].
    #[must_use]
    pub fn new(generator: Arc<dyn TextGenerator>, max_selected: usize) -> Self {
        Self {
            generator,
            max_selected: max_selected.min(MAX_SELECTED_LIMIT),
        }
    }

    /// Select up to `max_selected` blogs and videos relevant to `target_title`.
    ///
    /// Never fails: a service error or an unparseable response yields the
    /// fallback ranking (the first `max_selected` of each pool, in order).
    pub async fn advise(
        &self,
        target_title: &str,
        request: &CollectionRequest,
        blogs: &[CandidateBlog],
        videos: Option<&[CandidateVideo]>,
    ) -> Selection {
        let video_pool = videos.unwrap_or_default();
        let messages =
            prompt::build_messages(target_title, request, blogs, videos, self.max_selected);

        let response = match self.generator.generate_text(&messages).await {
            Ok(generation) => generation.content,
            Err(e) => {
                tracing::warn!(error = %e, "relevance selection request failed; using fallback ranking");
                return self.fallback(blogs, video_pool);
            }
        };

        match self.parse(&response, blogs, video_pool) {
            Ok(selection) => {
                tracing::debug!(
                    blogs = selection.selected_blogs.len(),
                    videos = selection.selected_videos.len(),
                    "relevance selection parsed"
                );
                selection
            }
            Err(e) => {
                tracing::warn!(error = %e, "relevance selection response unusable; using fallback ranking");
                self.fallback(blogs, video_pool)
            }
        }
    }

    fn parse(
        &self,
        response: &str,
        blogs: &[CandidateBlog],
        videos: &[CandidateVideo],
    ) -> Result<Selection, ParseError> {
        let advice: AdviceResponse = decode_embedded(response)?;
        if advice.selected_blogs.is_none() && advice.selected_videos.is_none() {
            return Err(ParseError::MissingKeys("selected_blogs or selected_videos"));
        }
        Ok(Selection {
            selected_blogs: self.resolve_all(&advice.selected_blogs.unwrap_or_default(), blogs),
            selected_videos: self.resolve_all(&advice.selected_videos.unwrap_or_default(), videos),
            method: SelectionMethod::Automated,
        })
    }

    fn resolve_all<T: Candidate + Clone>(
        &self,
        items: &[AdvisedItem],
        pool: &[T],
    ) -> Vec<Selected<T>> {
        let mut seen = HashSet::new();
        items
            .iter()
            .enumerate()
            .filter_map(|(position, advised)| {
                let Some((candidate, strategy)) = resolve(&advised.title, position, pool) else {
                    tracing::debug!(title = %advised.title, "selected item matches no candidate");
                    return None;
                };
                let url = candidate.source_url()?;
                if !seen.insert(url) {
                    return None;
                }
                if strategy != MatchStrategy::ExactTitle {
                    tracing::debug!(
                        returned = %advised.title,
                        matched = %candidate.title(),
                        ?strategy,
                        "selected item matched loosely"
                    );
                }
                let reason = advised.relevance_reason.trim();
                Some(Selected {
                    item: candidate.clone(),
                    relevance_reason: if reason.is_empty() {
                        DEFAULT_REASON.to_string()
                    } else {
                        reason.to_string()
                    },
                })
            })
            .take(self.max_selected)
            .collect()
    }

    /// The deterministic ranking used when automated selection is unavailable.
    #[must_use]
    pub fn fallback(&self, blogs: &[CandidateBlog], videos: &[CandidateVideo]) -> Selection {
        Selection {
            selected_blogs: first_n(blogs, self.max_selected),
            selected_videos: first_n(videos, self.max_selected),
            method: SelectionMethod::Fallback,
        }
    }
}

fn first_n<T: Clone>(pool: &[T], n: usize) -> Vec<Selected<T>> {
    pool.iter()
        .take(n)
        .map(|item| Selected {
            item: item.clone(),
            relevance_reason: FALLBACK_REASON.to_string(),
        })
        .collect()
}

#[cfg(test)]
#[path = "adviser_test.rs"]
mod tests;
