//! Operation routing and parameter validation.

use std::collections::BTreeMap;
use std::str::FromStr;
use std::sync::Arc;

use tracing::{debug, warn};

use newswire_protocol::{
    Category, Country, HeadlineSummary, Language, PayloadKind, Request, RequestParam, Response,
    ResultKind, SourceSummary,
};

use crate::archive::Archive;
use crate::provider::{
    ContentProvider, HeadlineFilter, HeadlineQuery, SourceFilter, SourceQuery,
};
use crate::session::Session;

use super::DISPATCH_TARGET;
use super::errors::DispatchError;

/// Operations understood by the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operation {
    Headlines,
    Sources,
    Details,
}

impl Operation {
    fn parse(option: &str) -> Result<Self, DispatchError> {
        match option.trim().to_ascii_lowercase().as_str() {
            "headlines" => Ok(Self::Headlines),
            "sources" => Ok(Self::Sources),
            "details" => Ok(Self::Details),
            _ => Err(DispatchError::unknown_operation(option.trim())),
        }
    }
}

/// Routes validated requests to provider calls and session lookups.
///
/// The router holds the only process-wide shared state (the provider
/// adapter); the session it mutates belongs to a single connection.
pub struct RequestRouter {
    provider: Arc<dyn ContentProvider>,
    archive: Option<Archive>,
}

impl RequestRouter {
    /// Creates a router over the given provider and optional archive.
    #[must_use]
    pub fn new(provider: Arc<dyn ContentProvider>, archive: Option<Archive>) -> Self {
        Self { provider, archive }
    }

    /// Dispatches one request, always producing exactly one response.
    ///
    /// Failures are folded into `error` responses here so the connection
    /// loop never has to tear down over a dispatch-level problem.
    pub fn dispatch(&self, session: &mut Session, request: &Request) -> Response {
        match self.execute(session, request) {
            Ok(response) => response,
            Err(error) => {
                warn!(
                    target: DISPATCH_TARGET,
                    client = session.display_name(),
                    option = request.option.as_str(),
                    %error,
                    "request failed"
                );
                Response::error(error.to_string())
            }
        }
    }

    fn execute(
        &self,
        session: &mut Session,
        request: &Request,
    ) -> Result<Response, DispatchError> {
        let operation = Operation::parse(&request.option)?;
        debug!(
            target: DISPATCH_TARGET,
            client = session.display_name(),
            operation = ?operation,
            "dispatching request"
        );
        match operation {
            Operation::Headlines => self.headlines(session, &request.parameters),
            Operation::Sources => self.sources(session, &request.parameters),
            Operation::Details => self.details(session, &request.parameters),
        }
    }

    fn headlines(
        &self,
        session: &mut Session,
        parameters: &BTreeMap<String, RequestParam>,
    ) -> Result<Response, DispatchError> {
        let query = HeadlineQuery {
            filter: headline_filter(parameters),
        };
        let items = self.provider.fetch_headlines(&query)?;
        let rows: Vec<HeadlineSummary> = session
            .replace_headlines(items)
            .iter()
            .enumerate()
            .map(|(offset, article)| article.summary(offset + 1))
            .collect();
        self.archive_stored(session, ResultKind::Headline);
        let message = format!("Found {} headlines", rows.len());
        Ok(Response::success(
            PayloadKind::HeadlinesList,
            &rows,
            Some(message),
        )?)
    }

    fn sources(
        &self,
        session: &mut Session,
        parameters: &BTreeMap<String, RequestParam>,
    ) -> Result<Response, DispatchError> {
        let query = SourceQuery {
            filter: source_filter(parameters),
        };
        let items = self.provider.fetch_sources(&query)?;
        let rows: Vec<SourceSummary> = session
            .replace_sources(items)
            .iter()
            .enumerate()
            .map(|(offset, source)| source.summary(offset + 1))
            .collect();
        self.archive_stored(session, ResultKind::Source);
        let message = format!("Found {} sources", rows.len());
        Ok(Response::success(
            PayloadKind::SourcesList,
            &rows,
            Some(message),
        )?)
    }

    fn details(
        &self,
        session: &Session,
        parameters: &BTreeMap<String, RequestParam>,
    ) -> Result<Response, DispatchError> {
        let kind_text = parameters
            .get("kind")
            .ok_or(DispatchError::MissingParameter { name: "kind" })?
            .as_text()
            .ok_or_else(|| DispatchError::invalid_parameter("kind", "expected a string"))?;
        let kind = ResultKind::from_str(kind_text).map_err(|_| {
            DispatchError::invalid_parameter("kind", format!("'{kind_text}' is not a result kind"))
        })?;
        let index = parameters
            .get("index")
            .ok_or(DispatchError::MissingParameter { name: "index" })?
            .as_number()
            .ok_or_else(|| DispatchError::invalid_parameter("index", "expected a number"))?;

        let payload_kind = PayloadKind::details_for(kind);
        match kind {
            ResultKind::Headline => {
                let article = session.headline_at(index)?;
                Ok(Response::success(payload_kind, &article.details(), None)?)
            }
            ResultKind::Source => {
                let source = session.source_at(index)?;
                Ok(Response::success(payload_kind, &source.details(), None)?)
            }
        }
    }

    /// Writes the session's latest list of `kind` to the archive, if one is
    /// configured. Archive failures are logged, never surfaced to the client.
    fn archive_stored(&self, session: &Session, kind: ResultKind) {
        let Some(archive) = &self.archive else {
            return;
        };
        let result = match kind {
            ResultKind::Headline => {
                let Some(items) = session.headlines() else {
                    return;
                };
                archive.store(session, kind, items)
            }
            ResultKind::Source => {
                let Some(items) = session.sources() else {
                    return;
                };
                archive.store(session, kind, items)
            }
        };
        match result {
            Ok(path) => {
                debug!(target: DISPATCH_TARGET, path = %path.display(), "archived provider payload");
            }
            Err(error) => {
                warn!(target: DISPATCH_TARGET, %error, "failed to archive provider payload");
            }
        }
    }
}

/// Extracts the discriminating headline filter, if any survives validation.
///
/// Values outside the catalogue are ignored with a warning rather than
/// rejected; the query then proceeds as if the filter were absent. When
/// several filters are present the first in precedence order (keyword,
/// category, country) wins.
fn headline_filter(parameters: &BTreeMap<String, RequestParam>) -> Option<HeadlineFilter> {
    if let Some(keyword) = text_param(parameters, "keyword") {
        let keyword = keyword.trim();
        if !keyword.is_empty() {
            return Some(HeadlineFilter::Keyword(keyword.to_owned()));
        }
    }
    if let Some(category) = catalogue_param::<Category>(parameters, "category") {
        return Some(HeadlineFilter::Category(category));
    }
    if let Some(country) = catalogue_param::<Country>(parameters, "country") {
        return Some(HeadlineFilter::Country(country));
    }
    None
}

/// Extracts the discriminating source filter; same policy as headlines with
/// precedence category, country, language.
fn source_filter(parameters: &BTreeMap<String, RequestParam>) -> Option<SourceFilter> {
    if let Some(category) = catalogue_param::<Category>(parameters, "category") {
        return Some(SourceFilter::Category(category));
    }
    if let Some(country) = catalogue_param::<Country>(parameters, "country") {
        return Some(SourceFilter::Country(country));
    }
    if let Some(language) = catalogue_param::<Language>(parameters, "language") {
        return Some(SourceFilter::Language(language));
    }
    None
}

fn text_param<'a>(
    parameters: &'a BTreeMap<String, RequestParam>,
    name: &str,
) -> Option<&'a str> {
    let value = parameters.get(name)?;
    match value.as_text() {
        Some(text) => Some(text),
        None => {
            warn!(
                target: DISPATCH_TARGET,
                parameter = name,
                "ignoring non-string filter value"
            );
            None
        }
    }
}

fn catalogue_param<T: FromStr>(
    parameters: &BTreeMap<String, RequestParam>,
    name: &str,
) -> Option<T> {
    let text = text_param(parameters, name)?;
    match text.parse::<T>() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(
                target: DISPATCH_TARGET,
                parameter = name,
                value = text,
                "ignoring filter value outside the catalogue"
            );
            None
        }
    }
}
