//! Request and response envelopes plus list/detail payload shapes.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::{Display, EnumString};

/// Discriminator between the two cached result kinds.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumString, Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ResultKind {
    Headline,
    Source,
}

/// A single named request parameter; the wire allows strings and integers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RequestParam {
    Text(String),
    Number(i64),
}

impl RequestParam {
    /// Returns the textual form of the parameter when it carries text.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(value) => Some(value),
            Self::Number(_) => None,
        }
    }

    /// Returns the numeric form of the parameter when it carries a number.
    #[must_use]
    pub fn as_number(&self) -> Option<i64> {
        match self {
            Self::Number(value) => Some(*value),
            Self::Text(_) => None,
        }
    }
}

/// Client request envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Request {
    /// Requested operation (`headlines`, `sources`, `details`).
    pub option: String,
    /// Named filter or lookup values for the operation.
    #[serde(default)]
    pub parameters: BTreeMap<String, RequestParam>,
}

impl Request {
    /// Creates a request with no parameters.
    #[must_use]
    pub fn new(option: impl Into<String>) -> Self {
        Self {
            option: option.into(),
            parameters: BTreeMap::new(),
        }
    }

    /// Adds a textual parameter.
    #[must_use]
    pub fn with_text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters
            .insert(name.into(), RequestParam::Text(value.into()));
        self
    }

    /// Adds a numeric parameter.
    #[must_use]
    pub fn with_number(mut self, name: impl Into<String>, value: i64) -> Self {
        self.parameters
            .insert(name.into(), RequestParam::Number(value));
        self
    }

    /// Builds a detail lookup for the given kind and 1-based index.
    #[must_use]
    pub fn details(kind: ResultKind, index: i64) -> Self {
        Self::new("details")
            .with_text("kind", kind.to_string())
            .with_number("index", index)
    }
}

/// Outcome marker on every response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    Success,
    Error,
}

/// Payload discriminator carried in the response `type` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PayloadKind {
    HeadlinesList,
    SourcesList,
    HeadlineDetails,
    SourceDetails,
}

impl PayloadKind {
    /// Maps a result kind to its detail payload discriminator.
    #[must_use]
    pub fn details_for(kind: ResultKind) -> Self {
        match kind {
            ResultKind::Headline => Self::HeadlineDetails,
            ResultKind::Source => Self::SourceDetails,
        }
    }
}

/// Server response envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Response {
    pub status: ResponseStatus,
    /// Payload discriminator; omitted on plain error responses.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<PayloadKind>,
    /// List or detail payload matching `kind`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    /// Human-readable status or error text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Response {
    /// Builds a success response carrying a typed payload.
    ///
    /// # Errors
    ///
    /// Returns a serialization error when the payload cannot be encoded.
    pub fn success<T: Serialize>(
        kind: PayloadKind,
        data: &T,
        message: Option<String>,
    ) -> Result<Self, serde_json::Error> {
        Ok(Self {
            status: ResponseStatus::Success,
            kind: Some(kind),
            data: Some(serde_json::to_value(data)?),
            message,
        })
    }

    /// Builds an error response with a human-readable message.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: ResponseStatus::Error,
            kind: None,
            data: None,
            message: Some(message.into()),
        }
    }

    /// True when the response reports success.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status == ResponseStatus::Success
    }

    /// Decodes the payload into the expected shape.
    ///
    /// # Errors
    ///
    /// Returns a deserialization error when the payload is absent or does not
    /// match `T`.
    pub fn decode_data<T: serde::de::DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        let data = self.data.clone().unwrap_or(Value::Null);
        serde_json::from_value(data)
    }
}

/// One row of a headline list response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeadlineSummary {
    /// 1-based position within the most recent headline list.
    pub index: usize,
    pub source: String,
    pub author: String,
    pub title: String,
}

/// One row of a source list response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceSummary {
    /// 1-based position within the most recent source list.
    pub index: usize,
    pub name: String,
}

/// Full detail record for a previously listed headline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeadlineDetails {
    pub source: String,
    pub author: Option<String>,
    pub title: String,
    pub url: Option<String>,
    pub description: Option<String>,
    #[serde(rename = "publishedAt")]
    pub published_at: Option<String>,
    pub content: Option<String>,
}

/// Full detail record for a previously listed source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceDetails {
    pub name: String,
    pub country: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
    pub category: Option<String>,
    pub language: Option<String>,
}
