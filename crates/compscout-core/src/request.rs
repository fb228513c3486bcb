use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, RequestError};

/// What to collect competitive signal for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionRequest {
    pub search_keyword: String,
    #[serde(default)]
    pub main_keyword: Option<String>,
    pub selected_title: String,
    pub content_type: String,
    #[serde(default)]
    pub review_type: Option<String>,
    #[serde(default)]
    pub sub_keywords: Vec<String>,
}

impl CollectionRequest {
    #[must_use]
    pub fn new(
        search_keyword: impl Into<String>,
        selected_title: impl Into<String>,
        content_type: impl Into<String>,
    ) -> Self {
        Self {
            search_keyword: search_keyword.into(),
            main_keyword: None,
            selected_title: selected_title.into(),
            content_type: content_type.into(),
            review_type: None,
            sub_keywords: Vec::new(),
        }
    }

    /// The main keyword, falling back to the search keyword when unset or blank.
    #[must_use]
    pub fn main_keyword(&self) -> &str {
        self.main_keyword
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .unwrap_or(self.search_keyword.trim())
    }

    /// Check that the request carries enough to run a collection.
    ///
    /// # Errors
    ///
    /// Returns the first [`RequestError`] found.
    pub fn validate(&self) -> Result<(), RequestError> {
        if self.search_keyword.trim().is_empty() {
            return Err(RequestError::EmptySearchKeyword);
        }
        if self.selected_title.trim().is_empty() {
            return Err(RequestError::EmptyTitle);
        }
        if self.content_type.trim().is_empty() {
            return Err(RequestError::EmptyContentType);
        }
        if let Some(pos) = self.sub_keywords.iter().position(|k| k.trim().is_empty()) {
            return Err(RequestError::BlankSubKeyword(pos));
        }
        Ok(())
    }
}

/// Load and validate a collection request from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_request(path: &Path) -> Result<CollectionRequest, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::RequestFileIo {
        path: path.display().to_string(),
        source: e,
    })?;
    parse_request(&content)
}

fn parse_request(content: &str) -> Result<CollectionRequest, ConfigError> {
    let request: CollectionRequest = serde_yaml::from_str(content)?;
    request.validate()?;
    Ok(request)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn main_keyword_defaults_to_search_keyword() {
        let request = CollectionRequest::new("hemp soda", "Best hemp sodas", "review");
        assert_eq!(request.main_keyword(), "hemp soda");
    }

    #[test]
    fn blank_main_keyword_defaults_to_search_keyword() {
        let mut request = CollectionRequest::new("hemp soda", "Best hemp sodas", "review");
        request.main_keyword = Some("   ".to_string());
        assert_eq!(request.main_keyword(), "hemp soda");
    }

    #[test]
    fn explicit_main_keyword_wins() {
        let mut request = CollectionRequest::new("hemp soda review", "t", "review");
        request.main_keyword = Some("hemp soda".to_string());
        assert_eq!(request.main_keyword(), "hemp soda");
    }

    #[test]
    fn parse_request_reads_optional_fields() {
        let yaml = r"
search_keyword: camping chair review
main_keyword: camping chair
selected_title: The 5 camping chairs worth buying
content_type: review
review_type: comparison
sub_keywords:
  - lightweight
  - budget
";
        let request = parse_request(yaml).expect("valid request");
        assert_eq!(request.main_keyword(), "camping chair");
        assert_eq!(request.review_type.as_deref(), Some("comparison"));
        assert_eq!(request.sub_keywords.len(), 2);
    }

    #[test]
    fn parse_request_rejects_empty_title() {
        let yaml = "search_keyword: chairs\nselected_title: ' '\ncontent_type: review\n";
        let err = parse_request(yaml).unwrap_err();
        assert!(
            matches!(err, ConfigError::InvalidRequest(RequestError::EmptyTitle)),
            "expected EmptyTitle, got: {err:?}"
        );
    }

    #[test]
    fn validate_flags_blank_sub_keyword_position() {
        let mut request = CollectionRequest::new("chairs", "title", "review");
        request.sub_keywords = vec!["ok".to_string(), String::new()];
        assert_eq!(request.validate(), Err(RequestError::BlankSubKeyword(1)));
    }

    #[test]
    fn load_request_reports_missing_file() {
        let err = load_request(Path::new("/nonexistent/request.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::RequestFileIo { .. }));
    }
}
