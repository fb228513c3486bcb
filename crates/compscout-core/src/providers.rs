//! Contracts for the external services the collector depends on.
//!
//! Implementations are injected into the collector at construction time.
//! HTTP-backed implementations live in `compscout-providers`.

use async_trait::async_trait;

use crate::error::ProviderError;
use crate::types::{
    CandidateBlog, CandidateVideo, ChatMessage, CrawledDocument, Generation, SelectedBlog,
    SubtitleTrack,
};

/// Crawl progress callback: `(finished, total)`.
pub type CrawlProgress<'a> = &'a (dyn Fn(usize, usize) + Send + Sync);

#[async_trait]
pub trait BlogSearch: Send + Sync {
    /// Search blog listings for `query`, returning at most `count` items
    /// ranked from `start_rank` upward.
    async fn search_blogs(
        &self,
        query: &str,
        count: usize,
        start_rank: u32,
        content_type: Option<&str>,
    ) -> Result<Vec<CandidateBlog>, ProviderError>;
}

#[async_trait]
pub trait VideoSearch: Send + Sync {
    /// Search videos for `keyword`, already scored and sorted by priority.
    async fn search_prioritized_videos(
        &self,
        keyword: &str,
        count: usize,
    ) -> Result<Vec<CandidateVideo>, ProviderError>;
}

#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate_text(&self, messages: &[ChatMessage]) -> Result<Generation, ProviderError>;
}

#[async_trait]
pub trait Crawler: Send + Sync {
    /// Fetch full text for up to `limit` of `items`, in order.
    async fn crawl_selected(
        &self,
        items: &[SelectedBlog],
        limit: usize,
        on_progress: CrawlProgress<'_>,
    ) -> Result<Vec<CrawledDocument>, ProviderError>;
}

#[async_trait]
pub trait SubtitleSource: Send + Sync {
    /// Subtitle tracks for a video. An empty list means the video has none.
    async fn extract_subtitles(&self, video_id: &str) -> Result<Vec<SubtitleTrack>, ProviderError>;
}
