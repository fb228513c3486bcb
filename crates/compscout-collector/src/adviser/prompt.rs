//! Request building for relevance selection.

use std::fmt::Write as _;

use compscout_core::{CandidateBlog, CandidateVideo, ChatMessage, CollectionRequest};

const SYSTEM_PROMPT: &str = "You are a content strategist. You pick the search results that are \
most useful as reference material for a new article. Answer with a single JSON object only.";

pub(super) fn build_messages(
    target_title: &str,
    request: &CollectionRequest,
    blogs: &[CandidateBlog],
    videos: Option<&[CandidateVideo]>,
    max_selected: usize,
) -> Vec<ChatMessage> {
    let mut prompt = String::new();

    let _ = writeln!(prompt, "Target article title: {target_title}");
    let _ = writeln!(prompt, "Search keyword: {}", request.search_keyword);
    let _ = writeln!(prompt, "Main keyword: {}", request.main_keyword());
    let _ = writeln!(prompt, "Content type: {}", request.content_type);
    if let Some(review_type) = request.review_type.as_deref() {
        let _ = writeln!(prompt, "Review type: {review_type}");
    }
    if !request.sub_keywords.is_empty() {
        let _ = writeln!(prompt, "Sub keywords: {}", request.sub_keywords.join(", "));
    }

    let _ = writeln!(prompt, "\nBlog results:");
    for (i, blog) in blogs.iter().enumerate() {
        let _ = writeln!(prompt, "{}. {} ({})", i + 1, blog.title, blog.platform);
    }

    let videos = videos.unwrap_or_default();
    if !videos.is_empty() {
        let _ = writeln!(prompt, "\nVideo results:");
        for (i, video) in videos.iter().enumerate() {
            let _ = writeln!(
                prompt,
                "{}. {} [{} | {} views | {}]",
                i + 1,
                video.title,
                video.channel_name,
                video.view_count,
                video.duration
            );
        }
    }

    let _ = write!(
        prompt,
        "\nSelection criteria:\n\
         - direct relevance to the target title and keywords\n\
         - depth of information a writer could reuse\n\
         - prefer first-hand experience and concrete detail over listicles\n\
         - avoid near-duplicate results\n\n\
         Select at most {max_selected} blogs and at most {max_selected} videos. \
         Copy each title exactly as listed. Respond with:\n\
         ```json\n\
         {{\"selected_blogs\": [{{\"title\": \"...\", \"relevance_reason\": \"...\"}}], \
         \"selected_videos\": [{{\"title\": \"...\", \"relevance_reason\": \"...\"}}]}}\n\
         ```"
    );

    vec![ChatMessage::system(SYSTEM_PROMPT), ChatMessage::user(prompt)]
}
