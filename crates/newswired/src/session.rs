//! Per-connection session state.
//!
//! A `Session` is created after the identity handshake and owned exclusively
//! by its connection thread; it is dropped, along with both cached result
//! lists, the moment the connection closes. Detail lookups always resolve
//! against the most recent list of the matching kind in this session, never
//! against another connection's state.

use thiserror::Error;

use newswire_protocol::ResultKind;

use crate::provider::{Article, SourceRecord};

/// Upper bound on cached list length, regardless of provider result size.
pub const MAX_RESULTS: usize = 15;

/// Failures while resolving a cached list position.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LookupError {
    /// No list query of this kind has succeeded on this session yet.
    #[error("no prior {kind} results in this session")]
    NoPriorResults { kind: ResultKind },
    /// The index falls outside the current list.
    #[error("index {index} is outside the current {kind} list (1..={len})")]
    IndexOutOfRange {
        kind: ResultKind,
        index: i64,
        len: usize,
    },
}

/// Mutable state held for one live connection.
#[derive(Debug)]
pub struct Session {
    connection_id: u64,
    display_name: String,
    headlines: Option<Vec<Article>>,
    sources: Option<Vec<SourceRecord>>,
}

impl Session {
    /// Creates a fresh session with empty result caches.
    #[must_use]
    pub fn new(connection_id: u64, display_name: impl Into<String>) -> Self {
        Self {
            connection_id,
            display_name: display_name.into(),
            headlines: None,
            sources: None,
        }
    }

    /// Identifier assigned by the connection supervisor.
    #[must_use]
    pub fn connection_id(&self) -> u64 {
        self.connection_id
    }

    /// Display name received during the handshake.
    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Replaces the headline list wholesale, truncating to [`MAX_RESULTS`].
    pub fn replace_headlines(&mut self, mut items: Vec<Article>) -> &[Article] {
        items.truncate(MAX_RESULTS);
        self.headlines.insert(items).as_slice()
    }

    /// Replaces the source list wholesale, truncating to [`MAX_RESULTS`].
    pub fn replace_sources(&mut self, mut items: Vec<SourceRecord>) -> &[SourceRecord] {
        items.truncate(MAX_RESULTS);
        self.sources.insert(items).as_slice()
    }

    /// Most recent headline list, if any query has succeeded.
    #[must_use]
    pub fn headlines(&self) -> Option<&[Article]> {
        self.headlines.as_deref()
    }

    /// Most recent source list, if any query has succeeded.
    #[must_use]
    pub fn sources(&self) -> Option<&[SourceRecord]> {
        self.sources.as_deref()
    }

    /// Resolves a 1-based position in the most recent headline list.
    ///
    /// # Errors
    ///
    /// Returns a [`LookupError`] when no headline list exists or the index is
    /// outside it.
    pub fn headline_at(&self, index: i64) -> Result<&Article, LookupError> {
        lookup(self.headlines.as_deref(), ResultKind::Headline, index)
    }

    /// Resolves a 1-based position in the most recent source list.
    ///
    /// # Errors
    ///
    /// Returns a [`LookupError`] when no source list exists or the index is
    /// outside it.
    pub fn source_at(&self, index: i64) -> Result<&SourceRecord, LookupError> {
        lookup(self.sources.as_deref(), ResultKind::Source, index)
    }
}

fn lookup<T>(list: Option<&[T]>, kind: ResultKind, index: i64) -> Result<&T, LookupError> {
    let list = list.ok_or(LookupError::NoPriorResults { kind })?;
    let out_of_range = || LookupError::IndexOutOfRange {
        kind,
        index,
        len: list.len(),
    };
    // Reject before subtracting; index - 1 overflows on i64::MIN.
    if index < 1 {
        return Err(out_of_range());
    }
    usize::try_from(index - 1)
        .ok()
        .and_then(|position| list.get(position))
        .ok_or_else(out_of_range)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn titled(title: &str) -> Article {
        Article {
            title: Some(title.to_owned()),
            ..Article::default()
        }
    }

    fn articles(count: usize) -> Vec<Article> {
        (1..=count).map(|n| titled(&format!("story {n}"))).collect()
    }

    #[test]
    fn fresh_session_has_no_prior_results_of_either_kind() {
        let session = Session::new(1, "alice");
        assert_eq!(
            session.headline_at(1),
            Err(LookupError::NoPriorResults {
                kind: ResultKind::Headline
            })
        );
        assert_eq!(
            session.source_at(1),
            Err(LookupError::NoPriorResults {
                kind: ResultKind::Source
            })
        );
    }

    #[test]
    fn lookup_succeeds_within_bounds_only() {
        let mut session = Session::new(1, "alice");
        session.replace_headlines(articles(3));

        assert_eq!(
            session.headline_at(1).expect("first").title.as_deref(),
            Some("story 1")
        );
        assert_eq!(
            session.headline_at(3).expect("last").title.as_deref(),
            Some("story 3")
        );
        for bad in [0, -1, 4] {
            assert_eq!(
                session.headline_at(bad),
                Err(LookupError::IndexOutOfRange {
                    kind: ResultKind::Headline,
                    index: bad,
                    len: 3
                })
            );
        }
    }

    #[test]
    fn extreme_indices_are_out_of_range_not_panics() {
        let mut session = Session::new(1, "alice");
        session.replace_headlines(articles(3));

        for extreme in [i64::MIN, i64::MIN + 1, i64::MAX] {
            assert_eq!(
                session.headline_at(extreme),
                Err(LookupError::IndexOutOfRange {
                    kind: ResultKind::Headline,
                    index: extreme,
                    len: 3
                })
            );
        }
    }

    #[test]
    fn replacement_is_wholesale_not_merged() {
        let mut session = Session::new(1, "alice");
        session.replace_headlines(articles(5));
        session.replace_headlines(articles(2));

        assert!(session.headline_at(2).is_ok());
        assert_eq!(
            session.headline_at(5),
            Err(LookupError::IndexOutOfRange {
                kind: ResultKind::Headline,
                index: 5,
                len: 2
            })
        );
    }

    #[test]
    fn stored_lists_are_capped_at_fifteen() {
        let mut session = Session::new(1, "alice");
        let stored = session.replace_headlines(articles(40));
        assert_eq!(stored.len(), MAX_RESULTS);
        assert!(session.headline_at(15).is_ok());
        assert!(session.headline_at(16).is_err());
    }

    #[test]
    fn kinds_are_tracked_independently() {
        let mut session = Session::new(1, "alice");
        session.replace_headlines(articles(2));
        assert!(matches!(
            session.source_at(1),
            Err(LookupError::NoPriorResults {
                kind: ResultKind::Source
            })
        ));
    }

    #[test]
    fn detail_lookup_does_not_invalidate_the_list() {
        let mut session = Session::new(1, "alice");
        session.replace_headlines(articles(2));
        let first = session.headline_at(1).expect("first").clone();
        let again = session.headline_at(1).expect("still there");
        assert_eq!(&first, again);
    }
}
