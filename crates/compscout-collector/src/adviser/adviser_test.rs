use async_trait::async_trait;
use compscout_core::{ChatMessage, Generation, ProviderError};

use super::*;

/// Reasoning service that answers every request with a fixed result.
struct Canned(Result<String, fn() -> ProviderError>);

#[async_trait]
impl TextGenerator for Canned {
    async fn generate_text(&self, _messages: &[ChatMessage]) -> Result<Generation, ProviderError> {
        match &self.0 {
            Ok(content) => Ok(Generation {
                content: content.clone(),
            }),
            Err(err) => Err(err()),
        }
    }
}

fn adviser(response: &str) -> SelectionAdviser {
    SelectionAdviser::new(Arc::new(Canned(Ok(response.to_string()))), 10)
}

fn blogs(n: usize) -> Vec<CandidateBlog> {
    (1..=n)
        .map(|i| CandidateBlog {
            rank: u32::try_from(i).unwrap(),
            title: format!("Blog post {i}"),
            url: format!("https://blog.example/{i}"),
            platform: "naver".to_string(),
        })
        .collect()
}

fn videos(n: usize) -> Vec<CandidateVideo> {
    (1..=n)
        .map(|i| CandidateVideo {
            video_id: format!("vid{i}"),
            title: format!("Video {i}"),
            channel_name: "Gear Lab".to_string(),
            view_count: 1000,
            duration: "PT6M".to_string(),
            subscriber_count: 10,
            published_at: "2026-07-01".to_string(),
            priority: 1.0,
        })
        .collect()
}

fn request() -> CollectionRequest {
    CollectionRequest::new("camping chair", "Best camping chairs", "review")
}

#[tokio::test]
async fn fenced_response_is_resolved_against_pools() {
    let response = r#"Here is my pick:
```json
{"selected_blogs": [
  {"title": "Blog post 3", "relevance_reason": "hands-on comparison"},
  {"title": "Blog post 12", "relevance_reason": "covers weight"}
 ],
 "selected_videos": [{"title": "Video 2", "relevance_reason": "field test"}]}
```"#;
    let pool = blogs(20);
    let video_pool = videos(5);
    let selection = adviser(response)
        .advise("Best camping chairs", &request(), &pool, Some(&video_pool))
        .await;

    assert_eq!(selection.method, SelectionMethod::Automated);
    let ranks: Vec<u32> = selection.selected_blogs.iter().map(|b| b.item.rank).collect();
    assert_eq!(ranks, vec![3, 12]);
    assert_eq!(selection.selected_blogs[0].relevance_reason, "hands-on comparison");
    assert_eq!(selection.selected_videos.len(), 1);
    assert_eq!(selection.selected_videos[0].item.video_id, "vid2");
}

#[tokio::test]
async fn bare_json_with_camel_case_keys_is_accepted() {
    let response = r#"{"selectedBlogs": [{"title": "Blog post 1", "relevanceReason": "intro"}]}"#;
    let selection = adviser(response)
        .advise("t", &request(), &blogs(3), None)
        .await;
    assert_eq!(selection.method, SelectionMethod::Automated);
    assert_eq!(selection.selected_blogs.len(), 1);
    assert_eq!(selection.selected_blogs[0].relevance_reason, "intro");
    assert!(selection.selected_videos.is_empty());
}

#[tokio::test]
async fn unmatched_titles_fall_back_to_position() {
    let response = r#"{"selected_blogs": [{"title": "zzz"}, {"title": "yyy"}]}"#;
    let selection = adviser(response)
        .advise("t", &request(), &blogs(5), None)
        .await;
    let ranks: Vec<u32> = selection.selected_blogs.iter().map(|b| b.item.rank).collect();
    assert_eq!(ranks, vec![1, 2]);
    assert_eq!(selection.selected_blogs[0].relevance_reason, DEFAULT_REASON);
}

#[tokio::test]
async fn items_without_source_url_are_discarded() {
    let mut pool = blogs(3);
    pool[1].url = String::new();
    let response = r#"{"selected_blogs": [{"title": "Blog post 2"}, {"title": "Blog post 3"}]}"#;
    let selection = adviser(response).advise("t", &request(), &pool, None).await;
    let ranks: Vec<u32> = selection.selected_blogs.iter().map(|b| b.item.rank).collect();
    assert_eq!(ranks, vec![3]);
}

#[tokio::test]
async fn duplicate_picks_are_kept_once() {
    let response = r#"{"selected_blogs": [{"title": "Blog post 2"}, {"title": "Blog post 2"}]}"#;
    let selection = adviser(response)
        .advise("t", &request(), &blogs(3), None)
        .await;
    assert_eq!(selection.selected_blogs.len(), 1);
}

#[tokio::test]
async fn automated_selection_is_capped() {
    let items: Vec<String> = (1..=15)
        .map(|i| format!("{{\"title\": \"Blog post {i}\"}}"))
        .collect();
    let response = format!("{{\"selected_blogs\": [{}]}}", items.join(","));
    let selection = adviser(&response)
        .advise("t", &request(), &blogs(20), None)
        .await;
    assert_eq!(selection.selected_blogs.len(), 10);
}

#[tokio::test]
async fn plain_text_response_uses_fallback_ranking() {
    let pool = blogs(25);
    let video_pool = videos(4);
    let selection = adviser("I think posts 1 and 2 are great.")
        .advise("t", &request(), &pool, Some(&video_pool))
        .await;

    assert_eq!(selection.method, SelectionMethod::Fallback);
    assert_eq!(selection.selected_blogs.len(), 10);
    assert_eq!(selection.selected_videos.len(), 4);
    let ranks: Vec<u32> = selection.selected_blogs.iter().map(|b| b.item.rank).collect();
    assert_eq!(ranks, (1..=10).collect::<Vec<u32>>());
    assert!(selection
        .selected_blogs
        .iter()
        .all(|b| b.relevance_reason == FALLBACK_REASON));
}

#[tokio::test]
async fn service_failure_uses_fallback_ranking() {
    let adviser = SelectionAdviser::new(
        Arc::new(Canned(Err(|| ProviderError::Unauthorized {
            url: "http://llm".to_string(),
        }))),
        10,
    );
    let selection = adviser.advise("t", &request(), &blogs(3), None).await;
    assert_eq!(selection.method, SelectionMethod::Fallback);
    assert_eq!(selection.selected_blogs.len(), 3);
    assert!(selection.selected_videos.is_empty());
}

#[test]
fn fallback_returns_min_of_ten_and_pool_size() {
    let adviser = adviser("");
    for n in [0, 1, 9, 10, 11, 50] {
        let selection = adviser.fallback(&blogs(n), &videos(n));
        assert_eq!(selection.selected_blogs.len(), n.min(10), "blogs for pool {n}");
        assert_eq!(selection.selected_videos.len(), n.min(10), "videos for pool {n}");
        assert!(selection
            .selected_blogs
            .iter()
            .all(|b| !b.relevance_reason.is_empty()));
    }
}

#[tokio::test]
async fn reply_listing_only_videos_is_still_automated() {
    let video_pool = videos(5);
    let selection = adviser(r#"{"selected_videos": [{"title": "Video 4", "reason": "teardown"}]}"#)
        .advise("t", &request(), &blogs(5), Some(&video_pool))
        .await;

    assert_eq!(selection.method, SelectionMethod::Automated);
    assert!(selection.selected_blogs.is_empty());
    assert_eq!(selection.selected_videos.len(), 1);
    assert_eq!(selection.selected_videos[0].item.video_id, "vid4");
    assert_eq!(selection.selected_videos[0].relevance_reason, "teardown");
}

#[tokio::test]
async fn json_without_selection_keys_uses_fallback_ranking() {
    let selection = adviser(r#"{"picks": ["Blog post 1"]}"#)
        .advise("t", &request(), &blogs(4), None)
        .await;
    assert_eq!(selection.method, SelectionMethod::Fallback);
    assert_eq!(selection.selected_blogs.len(), 4);
}

#[test]
fn oversized_limit_is_capped_at_ten() {
    let adviser = SelectionAdviser::new(Arc::new(Canned(Ok(String::new()))), 20);
    let selection = adviser.fallback(&blogs(30), &videos(30));
    assert_eq!(selection.selected_blogs.len(), 10);
    assert_eq!(selection.selected_videos.len(), 10);
}
