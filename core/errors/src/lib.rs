//! Error taxonomy for the Warden authorization core.
//!
//! Errors are reported as [`anyhow::Error`]s and classified with typed markers.
//! A marker can be the root cause of an error or attached to it as context:
//!
//! ```ignore
//! use anyhow::Context;
//!
//! let error = anyhow::anyhow!("user lookup failed");
//! Err(error.context(AccessDenied::generic()))
//! ```
//!
//! Either way callers test for the kind with [`anyhow::Error::is`] or [`ErrorKind::of`].

/// The request is not allowed to proceed.
///
/// The message is caller facing and must not disclose lookup details.
#[derive(Debug, thiserror::Error)]
#[error("{reason}")]
pub struct AccessDenied {
    reason: String,
}

impl AccessDenied {
    /// Deny access with a generic message that reveals nothing about the cause.
    pub fn generic() -> Self {
        Self::new("access denied")
    }

    /// Deny access with the given reason.
    pub fn new<S: Into<String>>(reason: S) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    /// Reason the request was denied.
    pub fn reason(&self) -> &str {
        &self.reason
    }
}

/// A required parameter was not provided or is invalid.
#[derive(Debug, thiserror::Error)]
#[error("missing or invalid parameter {parameter}: {detail}")]
pub struct BadParameter {
    pub detail: String,
    pub parameter: String,
}

impl BadParameter {
    /// A required parameter was not set.
    pub fn missing<S: Into<String>>(parameter: S) -> Self {
        Self {
            detail: "value is not set".into(),
            parameter: parameter.into(),
        }
    }

    /// A parameter was set to an invalid value.
    pub fn invalid<S1: Into<String>, S2: Into<String>>(parameter: S1, detail: S2) -> Self {
        Self {
            detail: detail.into(),
            parameter: parameter.into(),
        }
    }
}

/// The requested record does not exist.
#[derive(Debug, thiserror::Error)]
#[error("{kind} '{name}' was not found")]
pub struct NotFound {
    pub kind: String,
    pub name: String,
}

impl NotFound {
    /// The record of the given kind and name does not exist.
    pub fn new<S1: Into<String>, S2: Into<String>>(kind: S1, name: S2) -> Self {
        Self {
            kind: kind.into(),
            name: name.into(),
        }
    }
}

/// Classification of errors returned by the authorization core.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ErrorKind {
    /// The request was denied.
    AccessDenied,

    /// A required parameter was missing or invalid.
    BadParameter,

    /// A record needed to resolve the request does not exist.
    NotFound,

    /// Any other failure, usually from a collaborator.
    Other,
}

impl ErrorKind {
    /// Classify an error by the markers found anywhere in it.
    ///
    /// [`AccessDenied`] takes precedence over any other marker so that an error re-wrapped
    /// as denied is reported as such even when its cause is a [`NotFound`].
    pub fn of(error: &anyhow::Error) -> ErrorKind {
        if has_marker::<AccessDenied>(error) {
            ErrorKind::AccessDenied
        } else if has_marker::<BadParameter>(error) {
            ErrorKind::BadParameter
        } else if has_marker::<NotFound>(error) {
            ErrorKind::NotFound
        } else {
            ErrorKind::Other
        }
    }

    /// Label used for this kind in logs and metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::AccessDenied => "access-denied",
            ErrorKind::BadParameter => "bad-parameter",
            ErrorKind::NotFound => "not-found",
            ErrorKind::Other => "other",
        }
    }
}

/// Look for a marker attached as context or present as a cause in the chain.
fn has_marker<M>(error: &anyhow::Error) -> bool
where
    M: std::error::Error + Send + Sync + 'static,
{
    error.is::<M>() || error.chain().any(|cause| cause.is::<M>())
}
