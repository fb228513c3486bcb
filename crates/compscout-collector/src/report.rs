//! The aggregate produced by one collection run.

use chrono::{DateTime, Utc};
use compscout_core::{
    CandidateBlog, CandidateVideo, CollectionRequest, CrawledDocument, SelectedVideo,
    StageProgress,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::adviser::{Selection, SelectionMethod};
use crate::analyzer::{AnalysisArtifact, BlogAnalysis, VideoAnalysis};

/// Words that mark a recommendation as describing a failure or an absence.
const ABSENCE_WORDS: &[&str] = &["no", "none", "unavailable", "failed", "missing", "skipped"];

/// Subtitle text extracted for one selected video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoTranscript {
    pub video: SelectedVideo,
    pub text: String,
    /// `false` when the text is a placeholder for a too-short transcript.
    pub usable: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataQuality {
    High,
    Medium,
    Low,
}

impl DataQuality {
    /// Tier derived from how many documents were fetched successfully.
    #[must_use]
    pub fn from_documents(docs: &[CrawledDocument]) -> Self {
        match docs.iter().filter(|d| d.success).count() {
            0 => DataQuality::Low,
            1 => DataQuality::Medium,
            _ => DataQuality::High,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionReport {
    pub run_id: Uuid,
    pub collected_at: DateTime<Utc>,
    pub request: CollectionRequest,
    /// Every blog candidate acquired, in rank order.
    pub blogs: Vec<CandidateBlog>,
    /// Size of the video pool before relative evaluation.
    pub video_pool_size: usize,
    /// Videos kept by relative evaluation.
    pub videos: Vec<CandidateVideo>,
    pub selection: Selection,
    pub transcripts: Vec<VideoTranscript>,
    pub crawled_documents: Vec<CrawledDocument>,
    pub blog_analysis: AnalysisArtifact<BlogAnalysis>,
    pub video_analysis: AnalysisArtifact<VideoAnalysis>,
    /// Final state of all seven stages.
    pub stages: Vec<StageProgress>,
    pub data_quality: DataQuality,
    pub recommendations: Vec<String>,
}

/// Writer-facing suggestions, minus any that only report a shortfall.
pub(crate) fn build_recommendations(
    selection: &Selection,
    crawled: &[CrawledDocument],
    transcripts: &[VideoTranscript],
    blog_analysis: &AnalysisArtifact<BlogAnalysis>,
    video_analysis: &AnalysisArtifact<VideoAnalysis>,
) -> Vec<String> {
    let fetched = crawled.iter().filter(|d| d.success).count();
    let usable_transcripts = transcripts.iter().filter(|t| t.usable).count();

    let candidates = [
        match selection.method {
            SelectionMethod::Automated => {
                "Sources were ranked for relevance to the target title".to_string()
            }
            SelectionMethod::Fallback => {
                "Relevance ranking failed; sources are in search order".to_string()
            }
        },
        if fetched > 0 {
            format!(
                "Reference the {} for structure and coverage",
                count_of(fetched, "fetched competitor post", "fetched competitor posts")
            )
        } else {
            "No competitor blog content was fetched".to_string()
        },
        match blog_analysis.structured() {
            Some(_) => "Cover the recurring themes found across top-ranking posts".to_string(),
            None => "Blog analysis unavailable".to_string(),
        },
        match blog_analysis.structured() {
            Some(a) if !a.content_gaps.is_empty() => format!(
                "Differentiate by addressing the {} competing posts leave open",
                count_of(a.content_gaps.len(), "gap", "gaps")
            ),
            _ => "No content gaps identified".to_string(),
        },
        if usable_transcripts > 0 {
            format!(
                "Work in first-hand detail from {}",
                count_of(usable_transcripts, "video transcript", "video transcripts")
            )
        } else {
            "No video transcripts available".to_string()
        },
        match video_analysis.structured() {
            Some(_) => "Use video-only angles and quotable moments to stand apart".to_string(),
            None => "Video analysis unavailable".to_string(),
        },
    ];

    candidates
        .into_iter()
        .filter(|text| !denotes_absence(text))
        .collect()
}

/// `n` followed by the noun form that agrees with it.
fn count_of(n: usize, singular: &str, plural: &str) -> String {
    format!("{n} {}", if n == 1 { singular } else { plural })
}

/// Whether `text` reports a failure or a missing input.
#[must_use]
pub fn denotes_absence(text: &str) -> bool {
    text.split(|c: char| !c.is_alphanumeric())
        .map(str::to_lowercase)
        .any(|word| ABSENCE_WORDS.contains(&word.as_str()))
}
