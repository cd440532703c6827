//! Content provider boundary.
//!
//! The dispatcher only depends on the [`ContentProvider`] trait; the concrete
//! [`NewsApiProvider`] talks to a NewsAPI-compatible HTTP service. The trait
//! object is the single process-wide shared resource, so implementations must
//! be safe for concurrent use by every connection thread.

mod newsapi;
mod records;

use thiserror::Error;

use newswire_protocol::{Category, Country, Language};

pub use newsapi::NewsApiProvider;
pub use records::{Article, ArticleSource, SourceRecord};

/// The single discriminating filter accepted by a headline query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeadlineFilter {
    /// Free-text search term.
    Keyword(String),
    Category(Category),
    Country(Country),
}

/// Validated parameters for a headline list query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeadlineQuery {
    /// At most one discriminating filter; `None` requests the provider's
    /// baseline query.
    pub filter: Option<HeadlineFilter>,
}

/// The single discriminating filter accepted by a source query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceFilter {
    Category(Category),
    Country(Country),
    Language(Language),
}

/// Validated parameters for a source list query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceQuery {
    pub filter: Option<SourceFilter>,
}

/// Failures reported by the upstream provider.
///
/// The dispatcher treats every variant uniformly as a recoverable
/// dispatch-level failure; there are no retries.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The HTTP request could not be completed or decoded.
    #[error("provider request failed: {0}")]
    Transport(#[from] reqwest::Error),
    /// The provider answered with an error status.
    #[error("provider rejected the query: {message}")]
    Api { message: String },
}

/// Upstream news source consumed by the dispatcher.
pub trait ContentProvider: Send + Sync {
    /// Fetches a bounded batch of headline articles for the query.
    ///
    /// # Errors
    ///
    /// Returns a [`ProviderError`] when the upstream call fails.
    fn fetch_headlines(&self, query: &HeadlineQuery) -> Result<Vec<Article>, ProviderError>;

    /// Fetches a bounded batch of source records for the query.
    ///
    /// # Errors
    ///
    /// Returns a [`ProviderError`] when the upstream call fails.
    fn fetch_sources(&self, query: &SourceQuery) -> Result<Vec<SourceRecord>, ProviderError>;
}
