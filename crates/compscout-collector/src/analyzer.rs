//! Structured analysis of fetched blog content and video transcripts.

use std::fmt::Write as _;
use std::sync::Arc;

use compscout_core::{ChatMessage, CrawledDocument, TextGenerator};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::json::decode_embedded;
use crate::report::VideoTranscript;

pub const SERVICE_UNAVAILABLE: &str = "Analysis unavailable: the reasoning service request failed.";
pub const NO_BLOG_CONTENT: &str = "Analysis skipped: no blog content was fetched.";
pub const NO_TRANSCRIPTS: &str = "Analysis skipped: no usable video transcripts.";

const SYSTEM_PROMPT: &str = "You analyse competitor content for a writer. Answer with a single \
JSON object only, no commentary.";

/// What the top-ranking blog posts have in common.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlogAnalysis {
    #[serde(alias = "commonThemes")]
    pub common_themes: Vec<String>,
    #[serde(alias = "keyPoints")]
    pub key_points: Vec<String>,
    #[serde(default, alias = "contentStructure")]
    pub content_structure: String,
    #[serde(default, alias = "toneAndStyle")]
    pub tone_and_style: String,
    #[serde(default, alias = "contentGaps")]
    pub content_gaps: Vec<String>,
}

/// What viewers get from the top videos that blogs do not cover.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoAnalysis {
    #[serde(alias = "keyInsights")]
    pub key_insights: Vec<String>,
    #[serde(default, alias = "viewerInterests")]
    pub viewer_interests: Vec<String>,
    #[serde(default, alias = "uniqueAngles")]
    pub unique_angles: Vec<String>,
    #[serde(default, alias = "quotableMoments")]
    pub quotable_moments: Vec<String>,
}

/// An analysis result: either a decoded shape or only the raw text.
///
/// The raw text is always available, whichever variant is produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AnalysisArtifact<T> {
    Structured { analysis: T, raw_text: String },
    Raw { raw_text: String },
}

impl<T> AnalysisArtifact<T> {
    #[must_use]
    pub fn raw_text(&self) -> &str {
        match self {
            AnalysisArtifact::Structured { raw_text, .. } | AnalysisArtifact::Raw { raw_text } => {
                raw_text
            }
        }
    }

    #[must_use]
    pub fn structured(&self) -> Option<&T> {
        match self {
            AnalysisArtifact::Structured { analysis, .. } => Some(analysis),
            AnalysisArtifact::Raw { .. } => None,
        }
    }

    fn raw(text: &str) -> Self {
        AnalysisArtifact::Raw {
            raw_text: text.to_string(),
        }
    }
}

/// Runs the blog and video analysis requests.
pub struct ContentAnalyzer {
    generator: Arc<dyn TextGenerator>,
    max_document_chars: usize,
}

impl ContentAnalyzer {
    #[must_use]
    pub fn new(generator: Arc<dyn TextGenerator>, max_document_chars: usize) -> Self {
        Self {
            generator,
            max_document_chars,
        }
    }

    /// Analyse the successfully fetched blog documents.
    ///
    /// Skips the service call entirely when no document has content.
    pub async fn analyze_blogs(
        &self,
        target_title: &str,
        docs: &[CrawledDocument],
    ) -> AnalysisArtifact<BlogAnalysis> {
        let usable: Vec<&CrawledDocument> = docs
            .iter()
            .filter(|d| d.success && !d.text_content.trim().is_empty())
            .collect();
        if usable.is_empty() {
            return AnalysisArtifact::raw(NO_BLOG_CONTENT);
        }

        let mut prompt = format!("Target article title: {target_title}\n\nBlog posts:\n");
        for (i, doc) in usable.iter().enumerate() {
            let _ = write!(
                prompt,
                "\n### Post {} - {}\nURL: {}\n{}\n",
                i + 1,
                doc.title,
                doc.url,
                excerpt(&doc.text_content, self.max_document_chars)
            );
        }
        prompt.push_str(
            "\nDescribe what these posts share. Respond with a JSON object with keys \
             common_themes (string array), key_points (string array), content_structure \
             (string), tone_and_style (string), content_gaps (string array).",
        );

        self.run("blog", prompt).await
    }

    /// Analyse the usable video transcripts.
    pub async fn analyze_videos(
        &self,
        target_title: &str,
        transcripts: &[VideoTranscript],
    ) -> AnalysisArtifact<VideoAnalysis> {
        let usable: Vec<&VideoTranscript> = transcripts.iter().filter(|t| t.usable).collect();
        if usable.is_empty() {
            return AnalysisArtifact::raw(NO_TRANSCRIPTS);
        }

        let mut prompt = format!("Target article title: {target_title}\n\nVideo transcripts:\n");
        for (i, transcript) in usable.iter().enumerate() {
            let _ = write!(
                prompt,
                "\n### Video {} - {} ({})\n{}\n",
                i + 1,
                transcript.video.item.title,
                transcript.video.item.channel_name,
                excerpt(&transcript.text, self.max_document_chars)
            );
        }
        prompt.push_str(
            "\nDescribe what these videos offer a writer. Respond with a JSON object with keys \
             key_insights (string array), viewer_interests (string array), unique_angles \
             (string array), quotable_moments (string array).",
        );

        self.run("video", prompt).await
    }

    async fn run<T: DeserializeOwned>(
        &self,
        kind: &'static str,
        prompt: String,
    ) -> AnalysisArtifact<T> {
        let messages = [ChatMessage::system(SYSTEM_PROMPT), ChatMessage::user(prompt)];
        let response = match self.generator.generate_text(&messages).await {
            Ok(generation) => generation.content,
            Err(e) => {
                tracing::warn!(kind, error = %e, "analysis request failed");
                return AnalysisArtifact::raw(SERVICE_UNAVAILABLE);
            }
        };

        match decode_embedded::<T>(&response) {
            Ok(analysis) => AnalysisArtifact::Structured {
                analysis,
                raw_text: response,
            },
            Err(e) => {
                tracing::warn!(kind, error = %e, "analysis response is not structured; keeping raw text");
                AnalysisArtifact::Raw { raw_text: response }
            }
        }
    }
}

fn excerpt(text: &str, max_chars: usize) -> String {
    let text = text.trim();
    match text.char_indices().nth(max_chars) {
        Some((end, _)) => format!("{}…", &text[..end]),
        None => text.to_string(),
    }
}

#[cfg(test)]
#[path = "analyzer_test.rs"]
mod tests;
