//! HTTP adapter for a NewsAPI-compatible provider.

use serde::Deserialize;
use tracing::debug;

use newswire_config::Config;
use newswire_protocol::Country;

use crate::session::MAX_RESULTS;

use super::{
    Article, ContentProvider, HeadlineFilter, HeadlineQuery, ProviderError, SourceFilter,
    SourceQuery, SourceRecord,
};

const PROVIDER_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::provider");

/// Baseline country used when a headline query carries no filter; the
/// upstream headline endpoint requires at least one discriminator.
const BASELINE_COUNTRY: Country = Country::Us;

/// Blocking HTTP client for the upstream news service.
///
/// One instance is shared by every connection thread; `reqwest`'s blocking
/// client is internally synchronised and needs no external locking.
pub struct NewsApiProvider {
    client: reqwest::blocking::Client,
    base_url: String,
    api_key: String,
}

impl NewsApiProvider {
    /// Creates a provider for the given API base URL and key.
    #[must_use]
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::blocking::Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    /// Creates a provider from the daemon configuration.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.provider_url.clone(), config.api_key.clone())
    }

    fn get<T: serde::de::DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
    ) -> Result<T, ProviderError> {
        let url = format!("{}/{endpoint}", self.base_url.trim_end_matches('/'));
        debug!(target: PROVIDER_TARGET, %url, "provider request");
        let response = self
            .client
            .get(url)
            .query(&[("apiKey", self.api_key.as_str())])
            .query(params)
            .send()?;
        Ok(response.json()?)
    }
}

impl ContentProvider for NewsApiProvider {
    fn fetch_headlines(&self, query: &HeadlineQuery) -> Result<Vec<Article>, ProviderError> {
        let envelope: HeadlinesEnvelope = self.get("top-headlines", &headline_params(query))?;
        envelope.into_articles()
    }

    fn fetch_sources(&self, query: &SourceQuery) -> Result<Vec<SourceRecord>, ProviderError> {
        let envelope: SourcesEnvelope = self.get("sources", &source_params(query))?;
        envelope.into_sources()
    }
}

/// Query-string parameters for a headline request.
fn headline_params(query: &HeadlineQuery) -> Vec<(&'static str, String)> {
    let mut params = vec![("pageSize", MAX_RESULTS.to_string())];
    match &query.filter {
        Some(HeadlineFilter::Keyword(keyword)) => params.push(("q", keyword.clone())),
        Some(HeadlineFilter::Category(category)) => {
            params.push(("category", category.to_string()));
        }
        Some(HeadlineFilter::Country(country)) => params.push(("country", country.to_string())),
        None => params.push(("country", BASELINE_COUNTRY.to_string())),
    }
    params
}

/// Query-string parameters for a source request.
fn source_params(query: &SourceQuery) -> Vec<(&'static str, String)> {
    match &query.filter {
        Some(SourceFilter::Category(category)) => vec![("category", category.to_string())],
        Some(SourceFilter::Country(country)) => vec![("country", country.to_string())],
        Some(SourceFilter::Language(language)) => vec![("language", language.to_string())],
        None => Vec::new(),
    }
}

#[derive(Debug, Deserialize)]
struct HeadlinesEnvelope {
    status: String,
    #[serde(default)]
    articles: Vec<Article>,
    message: Option<String>,
}

impl HeadlinesEnvelope {
    fn into_articles(self) -> Result<Vec<Article>, ProviderError> {
        ensure_ok(&self.status, self.message)?;
        Ok(self.articles)
    }
}

#[derive(Debug, Deserialize)]
struct SourcesEnvelope {
    status: String,
    #[serde(default)]
    sources: Vec<SourceRecord>,
    message: Option<String>,
}

impl SourcesEnvelope {
    fn into_sources(self) -> Result<Vec<SourceRecord>, ProviderError> {
        ensure_ok(&self.status, self.message)?;
        Ok(self.sources)
    }
}

fn ensure_ok(status: &str, message: Option<String>) -> Result<(), ProviderError> {
    if status == "ok" {
        return Ok(());
    }
    Err(ProviderError::Api {
        message: message.unwrap_or_else(|| "upstream error".to_owned()),
    })
}
