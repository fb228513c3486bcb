#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Tunables for the collection engine.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectorSettings {
    /// Blog candidates to gather across both keyword attempts.
    pub blog_target_count: usize,
    /// Video candidates to request from the video provider.
    pub video_search_count: usize,
    /// Fraction of a large video pool to keep.
    pub video_keep_ratio: f64,
    /// Pool size at which the proportional cut starts to apply.
    pub video_ratio_min_pool: usize,
    /// Number of videos kept from a mid-sized pool.
    pub video_absolute_cap: usize,
    /// Upper bound on each list returned by relevance selection. Never
    /// above [`MAX_SELECTED_LIMIT`].
    pub max_selected: usize,
    /// Stop subtitle extraction once this many usable transcripts exist.
    pub transcript_target: usize,
    /// Selected blogs handed to the crawler.
    pub crawl_limit: usize,
    /// Transcripts shorter than this get a placeholder instead.
    pub min_transcript_chars: usize,
    /// Per-document excerpt length embedded in analysis requests.
    pub max_document_chars: usize,
}

/// Hard ceiling on the items relevance selection returns per list.
pub const MAX_SELECTED_LIMIT: usize = 10;

impl Default for CollectorSettings {
    fn default() -> Self {
        Self {
            blog_target_count: 50,
            video_search_count: 30,
            video_keep_ratio: 0.7,
            video_ratio_min_pool: 15,
            video_absolute_cap: 10,
            max_selected: MAX_SELECTED_LIMIT,
            transcript_target: 3,
            crawl_limit: 5,
            min_transcript_chars: 50,
            max_document_chars: 4000,
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    pub gateway_url: String,
    pub gateway_api_key: Option<String>,
    pub llm_base_url: String,
    pub llm_api_key: String,
    pub llm_model: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub collector: CollectorSettings,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("log_level", &self.log_level)
            .field("gateway_url", &self.gateway_url)
            .field(
                "gateway_api_key",
                &self.gateway_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("llm_base_url", &self.llm_base_url)
            .field("llm_api_key", &"[redacted]")
            .field("llm_model", &self.llm_model)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("collector", &self.collector)
            .finish()
    }
}
