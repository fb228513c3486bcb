use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use compscout_core::ProviderError;

use super::*;

#[derive(Debug, Clone, PartialEq)]
struct Call {
    query: String,
    count: usize,
    start_rank: u32,
}

/// Scripted blog search: each keyword maps to a fixed number of results,
/// or to an error when listed in `failing`.
#[derive(Default)]
struct ScriptedSearch {
    available: HashMap<String, usize>,
    failing: HashMap<String, fn() -> ProviderError>,
    calls: Mutex<Vec<Call>>,
}

impl ScriptedSearch {
    fn with(mut self, keyword: &str, available: usize) -> Self {
        self.available.insert(keyword.to_string(), available);
        self
    }

    fn failing(mut self, keyword: &str, err: fn() -> ProviderError) -> Self {
        self.failing.insert(keyword.to_string(), err);
        self
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl BlogSearch for ScriptedSearch {
    async fn search_blogs(
        &self,
        query: &str,
        count: usize,
        start_rank: u32,
        _content_type: Option<&str>,
    ) -> Result<Vec<CandidateBlog>, ProviderError> {
        self.calls.lock().unwrap().push(Call {
            query: query.to_string(),
            count,
            start_rank,
        });
        if let Some(err) = self.failing.get(query) {
            return Err(err());
        }
        let available = self.available.get(query).copied().unwrap_or(0);
        Ok((0..available.min(count))
            .map(|i| CandidateBlog {
                rank: start_rank + u32::try_from(i).unwrap(),
                title: format!("{query} post {i}"),
                url: format!("https://blog.example/{}/{i}", query.replace(' ', "-")),
                platform: "naver".to_string(),
            })
            .collect())
    }
}

fn acquirer(search: &Arc<ScriptedSearch>) -> BlogAcquirer {
    BlogAcquirer::new(Arc::clone(search) as Arc<dyn BlogSearch>)
}

fn assert_contiguous(blogs: &[CandidateBlog]) {
    for (i, blog) in blogs.iter().enumerate() {
        assert_eq!(blog.rank as usize, i + 1, "rank gap at index {i}");
    }
}

#[tokio::test]
async fn same_keyword_with_full_first_batch_makes_one_call() {
    let search = Arc::new(ScriptedSearch::default().with("hemp soda", 50));
    let blogs = acquirer(&search)
        .acquire("hemp soda", "hemp soda", 50, None)
        .await;

    assert_eq!(blogs.len(), 50);
    assert_eq!(blogs.first().unwrap().rank, 1);
    assert_eq!(blogs.last().unwrap().rank, 50);
    assert_contiguous(&blogs);
    assert_eq!(search.calls().len(), 1);
}

#[tokio::test]
async fn same_keyword_short_batch_skips_second_call() {
    let search = Arc::new(ScriptedSearch::default().with("hemp soda", 12));
    let blogs = acquirer(&search)
        .acquire("hemp soda", " hemp soda ", 50, None)
        .await;

    assert_eq!(blogs.len(), 12);
    assert_eq!(search.calls().len(), 1);
}

#[tokio::test]
async fn short_batch_requests_deficit_with_main_keyword() {
    let search = Arc::new(
        ScriptedSearch::default()
            .with("hemp soda review", 20)
            .with("hemp soda", 100),
    );
    let blogs = acquirer(&search)
        .acquire("hemp soda review", "hemp soda", 50, None)
        .await;

    assert_eq!(blogs.len(), 50);
    assert_contiguous(&blogs);
    assert_eq!(
        search.calls(),
        vec![
            Call {
                query: "hemp soda review".to_string(),
                count: 50,
                start_rank: 1
            },
            Call {
                query: "hemp soda".to_string(),
                count: 30,
                start_rank: 21
            },
        ]
    );
}

#[tokio::test]
async fn full_first_batch_never_falls_back() {
    let search = Arc::new(
        ScriptedSearch::default()
            .with("hemp soda review", 50)
            .with("hemp soda", 50),
    );
    let blogs = acquirer(&search)
        .acquire("hemp soda review", "hemp soda", 50, None)
        .await;

    assert_eq!(blogs.len(), 50);
    assert_eq!(search.calls().len(), 1);
}

#[tokio::test]
async fn failure_on_first_call_still_tries_main_keyword() {
    let search = Arc::new(
        ScriptedSearch::default()
            .failing("hemp soda review", || {
                ProviderError::Transport("connection reset".to_string())
            })
            .with("hemp soda", 8),
    );
    let blogs = acquirer(&search)
        .acquire("hemp soda review", "hemp soda", 50, None)
        .await;

    assert_eq!(blogs.len(), 8);
    assert_contiguous(&blogs);
}

#[tokio::test]
async fn failure_on_both_calls_yields_empty_list() {
    let search = Arc::new(
        ScriptedSearch::default()
            .failing("a", || ProviderError::Other("down".to_string()))
            .failing("b", || ProviderError::Other("down".to_string())),
    );
    let blogs = acquirer(&search).acquire("a", "b", 50, None).await;
    assert!(blogs.is_empty());
}

#[tokio::test]
async fn rejected_credentials_count_as_no_results() {
    let search = Arc::new(
        ScriptedSearch::default()
            .failing("a", || ProviderError::Unauthorized {
                url: "http://gateway/blogs/search".to_string(),
            })
            .with("b", 4),
    );
    let blogs = acquirer(&search).acquire("a", "b", 50, None).await;

    assert_eq!(blogs.len(), 4);
    assert_contiguous(&blogs);
    assert_eq!(search.calls().len(), 2);
}

#[tokio::test]
async fn provider_overshoot_is_truncated_to_target() {
    struct Overshoot;

    #[async_trait]
    impl BlogSearch for Overshoot {
        async fn search_blogs(
            &self,
            _query: &str,
            _count: usize,
            _start_rank: u32,
            _content_type: Option<&str>,
        ) -> Result<Vec<CandidateBlog>, ProviderError> {
            Ok((0..15)
                .map(|i| CandidateBlog {
                    rank: 99,
                    title: format!("post {i}"),
                    url: format!("https://blog.example/{i}"),
                    platform: "tistory".to_string(),
                })
                .collect())
        }
    }

    let blogs = BlogAcquirer::new(Arc::new(Overshoot))
        .acquire("x", "x", 10, None)
        .await;
    assert_eq!(blogs.len(), 10);
    assert_contiguous(&blogs);
}

#[tokio::test]
async fn duplicate_urls_from_fallback_are_dropped() {
    struct SameResults;

    #[async_trait]
    impl BlogSearch for SameResults {
        async fn search_blogs(
            &self,
            _query: &str,
            _count: usize,
            _start_rank: u32,
            _content_type: Option<&str>,
        ) -> Result<Vec<CandidateBlog>, ProviderError> {
            Ok((0..3)
                .map(|i| CandidateBlog {
                    rank: 1,
                    title: format!("post {i}"),
                    url: format!("https://blog.example/{i}"),
                    platform: "naver".to_string(),
                })
                .collect())
        }
    }

    let blogs = BlogAcquirer::new(Arc::new(SameResults))
        .acquire("x review", "x", 10, None)
        .await;
    assert_eq!(blogs.len(), 3);
    assert_contiguous(&blogs);
}

#[tokio::test]
async fn zero_target_makes_no_calls() {
    let search = Arc::new(ScriptedSearch::default().with("a", 5));
    let blogs = acquirer(&search).acquire("a", "b", 0, None).await;
    assert!(blogs.is_empty());
    assert!(search.calls().is_empty());
}
