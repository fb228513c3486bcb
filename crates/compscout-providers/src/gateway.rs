//! HTTP client for the content gateway.
//!
//! The gateway fronts blog search, scored video search, page crawling and
//! subtitle extraction behind one base URL:
//!
//! - `GET {base}/blogs/search?query=&count=&start=&content_type=`
//! - `GET {base}/videos/search?keyword=&count=`
//! - `GET {base}/crawl?url=`
//! - `GET {base}/videos/{video_id}/subtitles`

use async_trait::async_trait;
use compscout_core::{
    AppConfig, BlogSearch, CandidateBlog, CandidateVideo, CrawlProgress, CrawledDocument, Crawler,
    ProviderError, SelectedBlog, SubtitleSource, SubtitleTrack, VideoSearch,
};
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::error::ClientError;
use crate::http::{build_client, check_status, normalise_base_url, read_json};

/// Characters escaped in a single path segment.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

#[derive(Debug, Deserialize)]
struct BlogSearchResponse {
    #[serde(default)]
    items: Vec<BlogItem>,
}

#[derive(Debug, Deserialize)]
struct BlogItem {
    title: String,
    #[serde(alias = "link")]
    url: String,
    #[serde(default)]
    platform: String,
}

#[derive(Debug, Deserialize)]
struct VideoSearchResponse {
    #[serde(default)]
    videos: Vec<VideoItem>,
}

#[derive(Debug, Deserialize)]
struct VideoItem {
    #[serde(alias = "videoId")]
    video_id: String,
    title: String,
    #[serde(default, alias = "channelName")]
    channel_name: String,
    #[serde(default, alias = "viewCount")]
    view_count: u64,
    #[serde(default)]
    duration: String,
    #[serde(default, alias = "subscriberCount")]
    subscriber_count: u64,
    #[serde(default, alias = "publishedAt")]
    published_at: String,
    #[serde(default)]
    priority: f64,
}

impl From<VideoItem> for CandidateVideo {
    fn from(item: VideoItem) -> Self {
        Self {
            video_id: item.video_id,
            title: item.title,
            channel_name: item.channel_name,
            view_count: item.view_count,
            duration: item.duration,
            subscriber_count: item.subscriber_count,
            published_at: item.published_at,
            priority: item.priority,
        }
    }
}

#[derive(Debug, Deserialize)]
struct CrawlResponse {
    #[serde(default)]
    title: String,
    #[serde(default, alias = "textContent", alias = "text")]
    text_content: String,
}

/// Client for the content gateway. Implements every search, crawl and
/// subtitle contract the collector consumes.
pub struct GatewayClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl GatewayClient {
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidBaseUrl`] if `base_url` is not an
    /// http(s) URL, or [`ClientError::Http`] if the `reqwest::Client` cannot
    /// be constructed.
    pub fn new(
        base_url: &str,
        api_key: Option<&str>,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, ClientError> {
        Ok(Self {
            client: build_client(timeout_secs, user_agent)?,
            base_url: normalise_base_url(base_url)?,
            api_key: api_key.map(str::to_owned),
        })
    }

    /// # Errors
    ///
    /// See [`GatewayClient::new`].
    pub fn from_config(config: &AppConfig) -> Result<Self, ClientError> {
        Self::new(
            &config.gateway_url,
            config.gateway_api_key.as_deref(),
            config.request_timeout_secs,
            &config.user_agent,
        )
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
        context: impl FnOnce() -> String,
    ) -> Result<T, ClientError> {
        let mut request = self
            .client
            .get(format!("{}{path}", self.base_url))
            .query(query);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }
        let response = check_status(request.send().await?)?;
        read_json(response, context).await
    }

    /// Fetches one page; failures are reported per item by the caller.
    async fn crawl_one(&self, url: &str) -> Result<CrawlResponse, ClientError> {
        self.get_json("/crawl", &[("url", url)], || format!("crawl of {url}"))
            .await
    }
}

#[async_trait]
impl BlogSearch for GatewayClient {
    async fn search_blogs(
        &self,
        query: &str,
        count: usize,
        start_rank: u32,
        content_type: Option<&str>,
    ) -> Result<Vec<CandidateBlog>, ProviderError> {
        let count_param = count.to_string();
        let start_param = start_rank.to_string();
        let mut params = vec![
            ("query", query),
            ("count", count_param.as_str()),
            ("start", start_param.as_str()),
        ];
        if let Some(content_type) = content_type {
            params.push(("content_type", content_type));
        }

        let response: BlogSearchResponse = self
            .get_json("/blogs/search", &params, || format!("blog search for {query}"))
            .await?;

        Ok(response
            .items
            .into_iter()
            .take(count)
            .zip(start_rank..)
            .map(|(item, rank)| CandidateBlog {
                rank,
                title: item.title,
                url: item.url,
                platform: item.platform,
            })
            .collect())
    }
}

#[async_trait]
impl VideoSearch for GatewayClient {
    async fn search_prioritized_videos(
        &self,
        keyword: &str,
        count: usize,
    ) -> Result<Vec<CandidateVideo>, ProviderError> {
        let count_param = count.to_string();
        let response: VideoSearchResponse = self
            .get_json(
                "/videos/search",
                &[("keyword", keyword), ("count", count_param.as_str())],
                || format!("video search for {keyword}"),
            )
            .await?;

        Ok(response
            .videos
            .into_iter()
            .take(count)
            .map(CandidateVideo::from)
            .collect())
    }
}

#[async_trait]
impl Crawler for GatewayClient {
    /// Crawls pages one at a time. A page that fails is returned with
    /// `success = false`; only refused credentials abort the batch.
    async fn crawl_selected(
        &self,
        items: &[SelectedBlog],
        limit: usize,
        on_progress: CrawlProgress<'_>,
    ) -> Result<Vec<CrawledDocument>, ProviderError> {
        let total = items.len().min(limit);
        let mut documents = Vec::with_capacity(total);

        for (i, selected) in items.iter().take(limit).enumerate() {
            let blog = &selected.item;
            let document = match self.crawl_one(&blog.url).await {
                Ok(page) => {
                    let text_content = page.text_content.trim().to_string();
                    CrawledDocument {
                        title: if page.title.trim().is_empty() {
                            blog.title.clone()
                        } else {
                            page.title
                        },
                        url: blog.url.clone(),
                        success: !text_content.is_empty(),
                        text_content,
                    }
                }
                Err(e @ ClientError::Unauthorized { .. }) => return Err(e.into()),
                Err(e) => {
                    tracing::warn!(url = %blog.url, error = %e, "crawl failed");
                    CrawledDocument::failed(blog)
                }
            };
            documents.push(document);
            on_progress(i + 1, total);
        }

        Ok(documents)
    }
}

#[async_trait]
impl SubtitleSource for GatewayClient {
    async fn extract_subtitles(&self, video_id: &str) -> Result<Vec<SubtitleTrack>, ProviderError> {
        let path = format!(
            "/videos/{}/subtitles",
            utf8_percent_encode(video_id, PATH_SEGMENT)
        );
        let tracks: Vec<SubtitleTrack> = self
            .get_json(&path, &[], || format!("subtitles for {video_id}"))
            .await?;
        Ok(tracks)
    }
}
