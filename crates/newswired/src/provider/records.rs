//! Full provider records cached per session.
//!
//! These are the payloads the provider returns verbatim. List responses only
//! expose the summary projection; the full record stays server-side until a
//! detail lookup asks for it.

use serde::{Deserialize, Serialize};

use newswire_protocol::{HeadlineDetails, HeadlineSummary, SourceDetails, SourceSummary};

const UNKNOWN: &str = "Unknown";
const NO_TITLE: &str = "No title";

/// Publisher attribution attached to an article.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArticleSource {
    pub id: Option<String>,
    pub name: Option<String>,
}

/// One article as returned by the provider's headline endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Article {
    #[serde(default)]
    pub source: ArticleSource,
    pub author: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
    #[serde(rename = "urlToImage")]
    pub url_to_image: Option<String>,
    #[serde(rename = "publishedAt")]
    pub published_at: Option<String>,
    pub content: Option<String>,
}

impl Article {
    /// Projects the list-view summary at the given 1-based position.
    #[must_use]
    pub fn summary(&self, index: usize) -> HeadlineSummary {
        HeadlineSummary {
            index,
            source: self
                .source
                .name
                .clone()
                .unwrap_or_else(|| UNKNOWN.to_owned()),
            author: self.author.clone().unwrap_or_else(|| UNKNOWN.to_owned()),
            title: self.title.clone().unwrap_or_else(|| NO_TITLE.to_owned()),
        }
    }

    /// Projects the full detail record sent on a detail lookup.
    #[must_use]
    pub fn details(&self) -> HeadlineDetails {
        HeadlineDetails {
            source: self
                .source
                .name
                .clone()
                .unwrap_or_else(|| UNKNOWN.to_owned()),
            author: self.author.clone(),
            title: self.title.clone().unwrap_or_else(|| NO_TITLE.to_owned()),
            url: self.url.clone(),
            description: self.description.clone(),
            published_at: self.published_at.clone(),
            content: self.content.clone(),
        }
    }
}

/// One outlet as returned by the provider's source endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceRecord {
    pub id: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
    pub category: Option<String>,
    pub language: Option<String>,
    pub country: Option<String>,
}

impl SourceRecord {
    /// Projects the list-view summary at the given 1-based position.
    #[must_use]
    pub fn summary(&self, index: usize) -> SourceSummary {
        SourceSummary {
            index,
            name: self.name.clone().unwrap_or_else(|| UNKNOWN.to_owned()),
        }
    }

    /// Projects the full detail record sent on a detail lookup.
    #[must_use]
    pub fn details(&self) -> SourceDetails {
        SourceDetails {
            name: self.name.clone().unwrap_or_else(|| UNKNOWN.to_owned()),
            country: self.country.clone(),
            description: self.description.clone(),
            url: self.url.clone(),
            category: self.category.clone(),
            language: self.language.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_substitutes_missing_fields() {
        let article = Article {
            title: Some("Quake off Hokkaido".into()),
            ..Article::default()
        };
        let summary = article.summary(3);
        assert_eq!(summary.index, 3);
        assert_eq!(summary.source, "Unknown");
        assert_eq!(summary.author, "Unknown");
        assert_eq!(summary.title, "Quake off Hokkaido");
    }

    #[test]
    fn details_keep_optional_fields_optional() {
        let record = SourceRecord {
            name: Some("BBC News".into()),
            country: Some("gb".into()),
            ..SourceRecord::default()
        };
        let details = record.details();
        assert_eq!(details.name, "BBC News");
        assert_eq!(details.country.as_deref(), Some("gb"));
        assert!(details.description.is_none());
    }

    #[test]
    fn article_parses_provider_field_names() {
        let json = r#"{
            "source": {"id": "reuters", "name": "Reuters"},
            "author": "A. Reporter",
            "title": "Markets rally",
            "description": "d",
            "url": "https://example.com/a",
            "urlToImage": "https://example.com/a.jpg",
            "publishedAt": "2026-08-01T10:00:00Z",
            "content": "c"
        }"#;
        let article: Article = serde_json::from_str(json).expect("parse article");
        assert_eq!(article.source.name.as_deref(), Some("Reuters"));
        assert_eq!(article.published_at.as_deref(), Some("2026-08-01T10:00:00Z"));
        assert_eq!(article.url_to_image.as_deref(), Some("https://example.com/a.jpg"));
    }
}
