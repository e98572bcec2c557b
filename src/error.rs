//! Extraction error types.
//!
//! One error enum covers every way an extraction can fail. Each variant
//! carries the display identity of the release or search being processed,
//! so a caller driving many extractions can tell which one failed from the
//! message alone.
//!
//! There is no partial-success mode: either the full canonical structure
//! assembles, or the extraction call fails with one of these.

/// Crate-wide result type.
pub type Result<T> = std::result::Result<T, ExtractError>;

/// Error raised while extracting one release or one search.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExtractError {
    /// Transport-level failure: a non-success response or a network error.
    #[error("{message} [{identity}]")]
    Transport { message: String, identity: String },

    /// The source's "search found nothing" transport condition.
    ///
    /// The search orchestrator translates exactly this variant into an
    /// empty result list; everywhere else it propagates like any other
    /// error.
    #[error("nothing found [{identity}]")]
    NotFound { identity: String },

    /// A required field was absent after parsing.
    #[error("missing required field `{field}` [{identity}]")]
    MissingField { field: String, identity: String },

    /// A container was located but no valid value could be extracted from
    /// it, e.g. an expected-single element found zero or several times, or
    /// an unparseable server response.
    #[error("{message} [{identity}]")]
    Malformed { message: String, identity: String },
}

impl ExtractError {
    /// Create a transport error.
    pub fn transport(message: impl Into<String>, identity: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
            identity: identity.into(),
        }
    }

    /// Create the typed "search found nothing" condition.
    pub fn not_found(identity: impl Into<String>) -> Self {
        Self::NotFound {
            identity: identity.into(),
        }
    }

    /// Create a missing-required-field error.
    pub fn missing_field(field: impl Into<String>, identity: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
            identity: identity.into(),
        }
    }

    /// Create a malformed-field error.
    pub fn malformed(message: impl Into<String>, identity: impl Into<String>) -> Self {
        Self::Malformed {
            message: message.into(),
            identity: identity.into(),
        }
    }

    /// The display identity of the release or search this error belongs to.
    pub fn identity(&self) -> &str {
        match self {
            Self::Transport { identity, .. }
            | Self::NotFound { identity }
            | Self::MissingField { identity, .. }
            | Self::Malformed { identity, .. } => identity,
        }
    }
}
