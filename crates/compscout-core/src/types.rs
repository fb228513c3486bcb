use serde::{Deserialize, Serialize};

/// A blog listing returned by the blog-search provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateBlog {
    /// 1-based acquisition position, contiguous within one request.
    pub rank: u32,
    pub title: String,
    pub url: String,
    pub platform: String,
}

/// A video candidate, already scored by the video-search provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateVideo {
    pub video_id: String,
    pub title: String,
    pub channel_name: String,
    pub view_count: u64,
    pub duration: String,
    pub subscriber_count: u64,
    pub published_at: String,
    /// Provider-computed ranking score. Higher is better.
    pub priority: f64,
}

impl CandidateVideo {
    /// Watch URL for this video, or `None` when the provider gave no id.
    #[must_use]
    pub fn url(&self) -> Option<String> {
        let id = self.video_id.trim();
        if id.is_empty() {
            None
        } else {
            Some(format!("https://www.youtube.com/watch?v={id}"))
        }
    }
}

/// A candidate picked by relevance selection, with the reason it was kept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Selected<T> {
    #[serde(flatten)]
    pub item: T,
    pub relevance_reason: String,
}

pub type SelectedBlog = Selected<CandidateBlog>;
pub type SelectedVideo = Selected<CandidateVideo>;

/// Full-text content fetched for one selected blog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrawledDocument {
    pub title: String,
    pub url: String,
    pub text_content: String,
    pub success: bool,
}

impl CrawledDocument {
    /// Placeholder for a blog whose content could not be fetched.
    #[must_use]
    pub fn failed(blog: &CandidateBlog) -> Self {
        Self {
            title: blog.title.clone(),
            url: blog.url.clone(),
            text_content: String::new(),
            success: false,
        }
    }
}

/// One subtitle track as returned by the subtitle provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubtitleTrack {
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }
}

/// Free-text output of a reasoning-service call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generation {
    pub content: String,
}
