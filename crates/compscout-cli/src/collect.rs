//! The `collect` command: wire the HTTP providers into a collector, run it,
//! and write the report.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Args;
use compscout_collector::{Collector, Providers};
use compscout_core::{AppConfig, CollectionRequest, StageProgress, StageStatus};
use compscout_providers::{ChatClient, GatewayClient};
use tokio::sync::mpsc::UnboundedReceiver;

#[derive(Debug, Args)]
pub(crate) struct CollectArgs {
    /// Keyword sent to blog and video search
    #[arg(long, required_unless_present = "request", conflicts_with = "request")]
    pub(crate) keyword: Option<String>,

    /// Fallback keyword for blog search; defaults to --keyword
    #[arg(long, conflicts_with = "request")]
    pub(crate) main_keyword: Option<String>,

    /// Title of the article being written
    #[arg(long, required_unless_present = "request", conflicts_with = "request")]
    pub(crate) title: Option<String>,

    #[arg(long, default_value = "review", conflicts_with = "request")]
    pub(crate) content_type: String,

    #[arg(long, conflicts_with = "request")]
    pub(crate) review_type: Option<String>,

    /// May be repeated
    #[arg(long = "sub-keyword", conflicts_with = "request")]
    pub(crate) sub_keywords: Vec<String>,

    /// Load the request from a YAML file instead of flags
    #[arg(long)]
    pub(crate) request: Option<PathBuf>,

    /// Write the report here instead of stdout
    #[arg(long, short)]
    pub(crate) output: Option<PathBuf>,
}

/// Build the collection request from a YAML file or from flags.
pub(crate) fn build_request(args: &CollectArgs) -> anyhow::Result<CollectionRequest> {
    if let Some(path) = &args.request {
        return compscout_core::load_request(path)
            .with_context(|| format!("failed to load request from {}", path.display()));
    }

    let request = CollectionRequest {
        search_keyword: args.keyword.clone().unwrap_or_default(),
        main_keyword: args.main_keyword.clone(),
        selected_title: args.title.clone().unwrap_or_default(),
        content_type: args.content_type.clone(),
        review_type: args.review_type.clone(),
        sub_keywords: args.sub_keywords.clone(),
    };
    request.validate()?;
    Ok(request)
}

/// Run one collection and write the pretty-printed JSON report.
///
/// # Errors
///
/// Returns an error if the request is invalid, a provider client cannot be
/// built, the run aborts, or the report cannot be written.
pub(crate) async fn run_collect(config: &AppConfig, args: &CollectArgs) -> anyhow::Result<()> {
    let request = build_request(args)?;

    let gateway = Arc::new(
        GatewayClient::from_config(config).context("failed to build content gateway client")?,
    );
    let chat = Arc::new(ChatClient::from_config(config).context("failed to build chat client")?);
    let providers = Providers {
        blogs: gateway.clone(),
        videos: gateway.clone(),
        generator: chat,
        crawler: gateway.clone(),
        subtitles: gateway,
    };

    let mut collector = Collector::new(providers, config.collector.clone());
    let progress = tokio::spawn(log_progress(collector.subscribe()));

    let result = collector.collect_and_analyze(&request).await;
    // Closes the subscription so the progress task can finish.
    drop(collector);
    if let Err(e) = progress.await {
        tracing::warn!(error = %e, "progress logger ended abnormally");
    }
    let report = result?;

    tracing::info!(
        run_id = %report.run_id,
        blogs = report.blogs.len(),
        videos = report.videos.len(),
        documents = report.crawled_documents.len(),
        data_quality = ?report.data_quality,
        "collection finished"
    );

    let json = serde_json::to_string_pretty(&report)?;
    match &args.output {
        Some(path) => {
            std::fs::write(path, json)
                .with_context(|| format!("failed to write report to {}", path.display()))?;
            println!("report written to {}", path.display());
        }
        None => println!("{json}"),
    }

    Ok(())
}

/// Logs each stage whose status changed between consecutive snapshots.
async fn log_progress(mut rx: UnboundedReceiver<Vec<StageProgress>>) {
    let mut previous: Vec<StageProgress> = Vec::new();
    while let Some(snapshot) = rx.recv().await {
        for (i, stage) in snapshot.iter().enumerate() {
            let before = previous.get(i).map_or(StageStatus::Pending, |p| p.status);
            if before == stage.status {
                continue;
            }
            tracing::info!(
                step = i + 1,
                stage = %stage.step_name,
                status = ?stage.status,
                progress = stage.progress,
                message = stage.message.as_deref().unwrap_or(""),
                "progress"
            );
        }
        previous = snapshot;
    }
}
