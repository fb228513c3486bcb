//! Shared types, configuration and provider contracts for compscout.

pub mod app_config;
pub mod config;
pub mod error;
pub mod progress;
pub mod providers;
pub mod request;
pub mod types;

pub use app_config::{AppConfig, CollectorSettings, Environment, MAX_SELECTED_LIMIT};
pub use config::{load_app_config, load_app_config_from_env};
pub use error::{ConfigError, ProviderError, RequestError};
pub use progress::{Stage, StageProgress, StageStatus};
pub use providers::{BlogSearch, CrawlProgress, Crawler, SubtitleSource, TextGenerator, VideoSearch};
pub use request::{load_request, CollectionRequest};
pub use types::{
    CandidateBlog, CandidateVideo, ChatMessage, ChatRole, CrawledDocument, Generation, Selected,
    SelectedBlog, SelectedVideo, SubtitleTrack,
};
