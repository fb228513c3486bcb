//! The seven-stage collection run.

use std::future::Future;
use std::sync::Arc;

use chrono::Utc;
use compscout_core::{
    BlogSearch, CandidateBlog, CandidateVideo, CollectionRequest, CollectorSettings,
    CrawledDocument, Crawler, SelectedBlog, SelectedVideo, Stage, StageProgress, SubtitleSource,
    TextGenerator, VideoSearch,
};
use serde_json::json;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver};
use uuid::Uuid;

use crate::adviser::{Selection, SelectionAdviser};
use crate::analyzer::{AnalysisArtifact, BlogAnalysis, ContentAnalyzer, VideoAnalysis};
use crate::blogs::BlogAcquirer;
use crate::error::CollectorError;
use crate::progress::{ProgressSender, ProgressTracker};
use crate::report::{build_recommendations, CollectionReport, DataQuality, VideoTranscript};
use crate::subtitles::reconstruct;
use crate::videos::VideoSelector;

/// Stands in for a transcript too short to be worth analysing.
pub const SHORT_TRANSCRIPT_PLACEHOLDER: &str = "(transcript too short to analyze)";

/// The external services a [`Collector`] composes.
#[derive(Clone)]
pub struct Providers {
    pub blogs: Arc<dyn BlogSearch>,
    pub videos: Arc<dyn VideoSearch>,
    pub generator: Arc<dyn TextGenerator>,
    pub crawler: Arc<dyn Crawler>,
    pub subtitles: Arc<dyn SubtitleSource>,
}

/// How a stage ended when it did not end the run.
enum StageResult<T> {
    Completed(T),
    /// A known failure was absorbed; `value` is the default to continue with.
    Degraded { value: T, message: String },
}

/// Runs collection requests through the seven stages.
pub struct Collector {
    providers: Providers,
    settings: CollectorSettings,
    acquirer: BlogAcquirer,
    selector: VideoSelector,
    adviser: SelectionAdviser,
    analyzer: ContentAnalyzer,
    subscribers: Vec<ProgressSender>,
}

impl Collector {
    #[must_use]
    pub fn new(providers: Providers, settings: CollectorSettings) -> Self {
        Self {
            acquirer: BlogAcquirer::new(Arc::clone(&providers.blogs)),
            selector: VideoSelector::from_settings(&settings),
            adviser: SelectionAdviser::new(Arc::clone(&providers.generator), settings.max_selected),
            analyzer: ContentAnalyzer::new(
                Arc::clone(&providers.generator),
                settings.max_document_chars,
            ),
            providers,
            settings,
            subscribers: Vec::new(),
        }
    }

    /// Register for progress snapshots.
    ///
    /// The receiver gets a copy of all seven stage entries after every
    /// status change of every subsequent run, in stage order.
    pub fn subscribe(&mut self) -> UnboundedReceiver<Vec<StageProgress>> {
        let (tx, rx) = unbounded_channel();
        self.subscribers.push(tx);
        rx
    }

    /// Run all seven stages for `request` and assemble the report.
    ///
    /// Provider and parse failures degrade the affected stage and the run
    /// continues with an empty default. If the run unwinds or its future is
    /// dropped mid-stage, the running stage is marked `error` in the last
    /// snapshot subscribers receive.
    ///
    /// # Errors
    ///
    /// Returns [`CollectorError::InvalidRequest`] before any stage runs when
    /// the request fails validation.
    pub async fn collect_and_analyze(
        &self,
        request: &CollectionRequest,
    ) -> Result<CollectionReport, CollectorError> {
        request.validate()?;

        let run_id = Uuid::new_v4();
        let mut tracker = ProgressTracker::new(self.subscribers.clone());
        tracing::info!(%run_id, keyword = %request.search_keyword, "collection run started");

        Ok(self.run_stages(run_id, request, &mut tracker).await)
    }

    async fn run_stages(
        &self,
        run_id: Uuid,
        request: &CollectionRequest,
        tracker: &mut ProgressTracker,
    ) -> CollectionReport {
        let title = request.selected_title.as_str();

        let blogs = run_stage(
            tracker,
            Stage::BlogAcquisition,
            |b: &Vec<CandidateBlog>| json!({ "count": b.len() }),
            async {
                let blogs = self
                    .acquirer
                    .acquire(
                        &request.search_keyword,
                        request.main_keyword(),
                        self.settings.blog_target_count,
                        Some(request.content_type.as_str()),
                    )
                    .await;
                StageResult::Completed(blogs)
            },
        )
        .await;

        let (video_pool_size, videos) = run_stage(
            tracker,
            Stage::VideoAcquisition,
            |(pool, kept): &(usize, Vec<CandidateVideo>)| {
                json!({ "pool_size": pool, "count": kept.len() })
            },
            self.acquire_videos(&request.search_keyword),
        )
        .await;

        let selection = run_stage(
            tracker,
            Stage::RelevanceSelection,
            |s: &Selection| {
                json!({
                    "blogs": s.selected_blogs.len(),
                    "videos": s.selected_videos.len(),
                    "method": s.method,
                })
            },
            async {
                let video_pool = (!videos.is_empty()).then_some(videos.as_slice());
                let selection = self.adviser.advise(title, request, &blogs, video_pool).await;
                StageResult::Completed(selection)
            },
        )
        .await;

        let transcripts = run_stage(
            tracker,
            Stage::SubtitleExtraction,
            |t: &Vec<VideoTranscript>| {
                json!({ "count": t.len(), "usable": t.iter().filter(|t| t.usable).count() })
            },
            self.extract_transcripts(&selection.selected_videos),
        )
        .await;

        let crawled_documents = run_stage(
            tracker,
            Stage::ContentFetch,
            |d: &Vec<CrawledDocument>| {
                json!({ "count": d.len(), "succeeded": d.iter().filter(|d| d.success).count() })
            },
            self.fetch_content(&selection.selected_blogs),
        )
        .await;

        let blog_analysis = run_stage(
            tracker,
            Stage::BlogAnalysis,
            |a: &AnalysisArtifact<BlogAnalysis>| json!({ "structured": a.structured().is_some() }),
            async {
                let analysis = self.analyzer.analyze_blogs(title, &crawled_documents).await;
                StageResult::Completed(analysis)
            },
        )
        .await;

        let has_usable_transcripts = transcripts.iter().any(|t| t.usable);
        if !has_usable_transcripts {
            tracing::info!("no usable transcripts; video analysis skipped");
        }
        let video_analysis = run_stage(
            tracker,
            Stage::VideoAnalysis,
            move |a: &AnalysisArtifact<VideoAnalysis>| {
                json!({
                    "structured": a.structured().is_some(),
                    "skipped": !has_usable_transcripts,
                })
            },
            async {
                let analysis = self.analyzer.analyze_videos(title, &transcripts).await;
                StageResult::Completed(analysis)
            },
        )
        .await;

        let data_quality = DataQuality::from_documents(&crawled_documents);
        let recommendations = build_recommendations(
            &selection,
            &crawled_documents,
            &transcripts,
            &blog_analysis,
            &video_analysis,
        );
        tracing::info!(%run_id, ?data_quality, "collection run finished");

        CollectionReport {
            run_id,
            collected_at: Utc::now(),
            request: request.clone(),
            blogs,
            video_pool_size,
            videos,
            selection,
            transcripts,
            crawled_documents,
            blog_analysis,
            video_analysis,
            stages: tracker.snapshot(),
            data_quality,
            recommendations,
        }
    }

    async fn acquire_videos(
        &self,
        keyword: &str,
    ) -> StageResult<(usize, Vec<CandidateVideo>)> {
        match self
            .providers
            .videos
            .search_prioritized_videos(keyword, self.settings.video_search_count)
            .await
        {
            Ok(pool) => {
                let pool_size = pool.len();
                let kept = self.selector.select(pool);
                tracing::debug!(pool_size, kept = kept.len(), "video pool narrowed");
                StageResult::Completed((pool_size, kept))
            }
            Err(e) => {
                tracing::warn!(keyword, error = %e, "video search failed; continuing without videos");
                StageResult::Degraded {
                    value: (0, Vec::new()),
                    message: e.to_string(),
                }
            }
        }
    }

    /// Walk the selected videos in order until enough usable transcripts exist.
    async fn extract_transcripts(
        &self,
        videos: &[SelectedVideo],
    ) -> StageResult<Vec<VideoTranscript>> {
        let mut transcripts = Vec::new();
        let mut usable = 0;

        for video in videos {
            if usable >= self.settings.transcript_target {
                break;
            }
            let video_id = video.item.video_id.as_str();

            let tracks = match self.providers.subtitles.extract_subtitles(video_id).await {
                Ok(tracks) => tracks,
                Err(e) => {
                    tracing::warn!(video_id, error = %e, "subtitle extraction failed; trying next video");
                    continue;
                }
            };

            let Some(track) = tracks.into_iter().next().filter(|t| !t.text.trim().is_empty())
            else {
                tracing::debug!(video_id, "video has no subtitles");
                continue;
            };

            let text = reconstruct(&track.text);
            if text.chars().count() < self.settings.min_transcript_chars {
                tracing::debug!(video_id, chars = text.chars().count(), "transcript too short");
                transcripts.push(VideoTranscript {
                    video: video.clone(),
                    text: SHORT_TRANSCRIPT_PLACEHOLDER.to_string(),
                    usable: false,
                });
                continue;
            }

            usable += 1;
            transcripts.push(VideoTranscript {
                video: video.clone(),
                text,
                usable: true,
            });
        }

        StageResult::Completed(transcripts)
    }

    async fn fetch_content(
        &self,
        blogs: &[SelectedBlog],
    ) -> StageResult<Vec<CrawledDocument>> {
        if blogs.is_empty() {
            return StageResult::Completed(Vec::new());
        }

        let on_progress = |done: usize, total: usize| {
            tracing::debug!(done, total, "content fetch progress");
        };
        match self
            .providers
            .crawler
            .crawl_selected(blogs, self.settings.crawl_limit, &on_progress)
            .await
        {
            Ok(docs) => StageResult::Completed(docs),
            Err(e) => {
                tracing::warn!(error = %e, "content fetch failed; continuing without blog content");
                StageResult::Degraded {
                    value: blogs
                        .iter()
                        .take(self.settings.crawl_limit)
                        .map(|selected| CrawledDocument::failed(&selected.item))
                        .collect(),
                    message: e.to_string(),
                }
            }
        }
    }
}

/// Mark `stage` running, await `work`, then record how it ended.
async fn run_stage<T, S, F>(
    tracker: &mut ProgressTracker,
    stage: Stage,
    summarize: S,
    work: F,
) -> T
where
    S: FnOnce(&T) -> serde_json::Value,
    F: Future<Output = StageResult<T>>,
{
    tracker.start(stage);
    match work.await {
        StageResult::Completed(value) => {
            tracker.complete(stage, Some(summarize(&value)), None);
            value
        }
        StageResult::Degraded { value, message } => {
            tracker.fail(stage, message);
            value
        }
    }
}
