//! Competitive-signal collection engine.
//!
//! Gathers blog listings and scored videos for a topic, narrows both pools
//! to a small relevant subset, fetches their content and asks the reasoning
//! service for structured analysis. Every stage degrades to an empty default
//! on known provider failures, so a run normally ends in a complete report.

pub mod adviser;
pub mod analyzer;
pub mod blogs;
pub mod error;
pub mod json;
pub mod pipeline;
pub mod report;
pub mod subtitles;
pub mod videos;

mod progress;

pub use adviser::{Selection, SelectionAdviser, SelectionMethod, FALLBACK_REASON};
pub use analyzer::{AnalysisArtifact, BlogAnalysis, ContentAnalyzer, VideoAnalysis};
pub use blogs::BlogAcquirer;
pub use error::{CollectorError, ParseError};
pub use pipeline::{Collector, Providers, SHORT_TRANSCRIPT_PLACEHOLDER};
pub use progress::ProgressSender;
pub use report::{CollectionReport, DataQuality, VideoTranscript};
pub use subtitles::reconstruct;
pub use videos::VideoSelector;
