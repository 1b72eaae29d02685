//! Error types for request shaping and envelope classification.
//!
//! "No content" is deliberately absent here: an empty or undecodable reply is
//! reported as `Ok(None)` by the fetcher, and callers check for it per call.

use thiserror::Error;

/// Errors returned by query rendering, shape composition and fetching.
#[derive(Debug, Clone, Error)]
pub enum ClientError {
    /// The provider's envelope reported a non-success status or code.
    #[error("remote API error: {status}")]
    Remote {
        /// Numeric code from the envelope, when present.
        code: Option<i64>,
        /// Status text from the envelope, verbatim.
        status: String,
    },

    /// A shape's template and parameters are inconsistent.
    #[error("cannot build request for shape '{shape}': {reason}")]
    Builder {
        /// Name of the request shape (or template) being rendered.
        shape: String,
        /// What was inconsistent.
        reason: String,
    },

    /// A success envelope did not carry the payload it must carry.
    #[error("malformed response envelope from {url}: {reason}")]
    MalformedEnvelope {
        /// The URL that produced the envelope.
        url: String,
        /// What was missing or unexpected.
        reason: String,
    },

    /// A `timezonestr` value did not name a known IANA zone.
    #[error("unknown time zone '{zone}'")]
    UnknownTimeZone {
        /// The rejected zone identifier.
        zone: String,
    },

    /// The shared HTTP session could not be created.
    #[error(transparent)]
    Session(#[from] SessionError),
}

impl ClientError {
    /// Creates a `Remote` error from envelope fields.
    #[must_use]
    pub fn remote(code: Option<i64>, status: impl Into<String>) -> Self {
        Self::Remote {
            code,
            status: status.into(),
        }
    }

    /// Creates a `Builder` error.
    #[must_use]
    pub fn builder(shape: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Builder {
            shape: shape.into(),
            reason: reason.into(),
        }
    }

    /// Creates a `MalformedEnvelope` error.
    #[must_use]
    pub fn malformed(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedEnvelope {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// Creates an `UnknownTimeZone` error.
    #[must_use]
    pub fn unknown_time_zone(zone: impl Into<String>) -> Self {
        Self::UnknownTimeZone { zone: zone.into() }
    }

    /// Returns the provider status text for `Remote` errors.
    #[must_use]
    pub fn remote_status(&self) -> Option<&str> {
        match self {
            Self::Remote { status, .. } => Some(status),
            _ => None,
        }
    }
}

/// Failure to build the shared `reqwest` client.
#[derive(Debug, Clone, Error)]
#[error("HTTP session could not be created: {reason}")]
pub struct SessionError {
    /// Why construction failed.
    pub reason: String,
}

impl SessionError {
    /// Creates a session error with the given reason.
    #[must_use]
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Invalid client configuration values.
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// A numeric setting was outside its accepted range.
    #[error("invalid config value for `{field}`: {value}. Expected range: {expected}")]
    OutOfRange {
        /// Setting name.
        field: &'static str,
        /// Offending value as given.
        value: String,
        /// Human-readable accepted range.
        expected: &'static str,
    },

    /// A base URL did not parse or used an unsupported scheme.
    #[error("invalid base URL for `{field}`: '{value}' ({reason})")]
    InvalidUrl {
        /// Setting name.
        field: &'static str,
        /// Offending value.
        value: String,
        /// Parser or scheme complaint.
        reason: String,
    },
}

// No From<reqwest::Error> / From<serde_json::Error>: every variant needs a URL
// or shape name that the source errors do not carry.
