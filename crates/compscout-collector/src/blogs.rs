//! Blog candidate acquisition with main-keyword fallback.

use std::collections::HashSet;
use std::sync::Arc;

use compscout_core::{BlogSearch, CandidateBlog};

/// Gathers blog candidates from the blog-search provider.
pub struct BlogAcquirer {
    search: Arc<dyn BlogSearch>,
}

impl BlogAcquirer {
    #[must_use]
    pub fn new(search: Arc<dyn BlogSearch>) -> Self {
        Self { search }
    }

    /// Collect up to `target_count` blog candidates.
    ///
    /// Searches with `search_keyword` first. When that comes up short and
    /// `main_keyword` is a different query, the deficit is requested with
    /// `main_keyword`; identical keywords never trigger a second call.
    /// Listings already seen in the first batch are dropped from the second.
    ///
    /// Ranks in the result are `1..=n`, contiguous, in acquisition order.
    /// A failed provider call counts as zero results for that call, so the
    /// result may be shorter than the target or empty.
    pub async fn acquire(
        &self,
        search_keyword: &str,
        main_keyword: &str,
        target_count: usize,
        content_type: Option<&str>,
    ) -> Vec<CandidateBlog> {
        if target_count == 0 {
            return Vec::new();
        }

        let mut blogs = self
            .search_once(search_keyword, target_count, 1, content_type)
            .await;
        blogs.truncate(target_count);

        let search_keyword = search_keyword.trim();
        let main_keyword = main_keyword.trim();

        if blogs.len() < target_count && main_keyword != search_keyword {
            let deficit = target_count - blogs.len();
            tracing::debug!(
                keyword = main_keyword,
                deficit,
                "blog search came up short; retrying with main keyword"
            );

            let mut seen_urls: HashSet<String> = blogs.iter().map(|b| b.url.clone()).collect();
            let extra = self
                .search_once(main_keyword, deficit, rank_at(blogs.len()), content_type)
                .await;
            blogs.extend(
                extra
                    .into_iter()
                    .filter(|b| seen_urls.insert(b.url.clone()))
                    .take(deficit),
            );
        } else if blogs.len() < target_count {
            tracing::debug!(
                keyword = search_keyword,
                found = blogs.len(),
                target_count,
                "main keyword equals search keyword; skipping fallback search"
            );
        }

        for (i, blog) in blogs.iter_mut().enumerate() {
            blog.rank = rank_at(i);
        }

        blogs
    }

    async fn search_once(
        &self,
        keyword: &str,
        count: usize,
        start_rank: u32,
        content_type: Option<&str>,
    ) -> Vec<CandidateBlog> {
        match self
            .search
            .search_blogs(keyword, count, start_rank, content_type)
            .await
        {
            Ok(blogs) => {
                tracing::debug!(keyword, count = blogs.len(), "collected blog candidates");
                blogs
            }
            Err(e) => {
                tracing::warn!(keyword, error = %e, "blog search failed; treating as no results");
                Vec::new()
            }
        }
    }
}

/// 1-based rank for the item at `index`.
fn rank_at(index: usize) -> u32 {
    u32::try_from(index + 1).unwrap_or(u32::MAX)
}

#[cfg(test)]
#[path = "blogs_test.rs"]
mod tests;
