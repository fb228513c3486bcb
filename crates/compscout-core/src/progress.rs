//! Stage progress records shared with progress subscribers.

use serde::{Deserialize, Serialize};

/// The seven collection stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    BlogAcquisition,
    VideoAcquisition,
    RelevanceSelection,
    SubtitleExtraction,
    ContentFetch,
    BlogAnalysis,
    VideoAnalysis,
}

impl Stage {
    pub const ALL: [Stage; 7] = [
        Stage::BlogAcquisition,
        Stage::VideoAcquisition,
        Stage::RelevanceSelection,
        Stage::SubtitleExtraction,
        Stage::ContentFetch,
        Stage::BlogAnalysis,
        Stage::VideoAnalysis,
    ];

    /// Zero-based position of the stage in [`Stage::ALL`].
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            Stage::BlogAcquisition => 0,
            Stage::VideoAcquisition => 1,
            Stage::RelevanceSelection => 2,
            Stage::SubtitleExtraction => 3,
            Stage::ContentFetch => 4,
            Stage::BlogAnalysis => 5,
            Stage::VideoAnalysis => 6,
        }
    }

    #[must_use]
    pub fn step_name(self) -> &'static str {
        match self {
            Stage::BlogAcquisition => "Blog search",
            Stage::VideoAcquisition => "Video search",
            Stage::RelevanceSelection => "Relevance selection",
            Stage::SubtitleExtraction => "Subtitle extraction",
            Stage::ContentFetch => "Blog content fetch",
            Stage::BlogAnalysis => "Blog content analysis",
            Stage::VideoAnalysis => "Video transcript analysis",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.step_name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StageStatus {
    Pending,
    Running,
    Completed,
    Error,
}

impl StageStatus {
    /// Progress percentage reported alongside the status.
    ///
    /// A stage that ended in `Error` is finished, so it reports 100.
    #[must_use]
    pub fn progress(self) -> u8 {
        match self {
            StageStatus::Pending => 0,
            StageStatus::Running => 50,
            StageStatus::Completed | StageStatus::Error => 100,
        }
    }

    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, StageStatus::Completed | StageStatus::Error)
    }

    /// Whether moving from `self` to `next` goes forward through
    /// `pending -> running -> {completed, error}`.
    #[must_use]
    pub fn can_advance_to(self, next: StageStatus) -> bool {
        matches!(
            (self, next),
            (StageStatus::Pending, StageStatus::Running)
                | (
                    StageStatus::Running,
                    StageStatus::Completed | StageStatus::Error
                )
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageProgress {
    pub step_name: String,
    pub progress: u8,
    pub status: StageStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl StageProgress {
    #[must_use]
    pub fn pending(stage: Stage) -> Self {
        Self {
            step_name: stage.step_name().to_string(),
            progress: StageStatus::Pending.progress(),
            status: StageStatus::Pending,
            data: None,
            message: None,
        }
    }
}
