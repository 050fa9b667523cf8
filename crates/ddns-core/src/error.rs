//! Error types for the DDNS updater
//!
//! Every failure carries exactly one [`ResultCode`] plus a human-readable
//! message. The taxonomy is flat: transport, provider and local input
//! failures are told apart only by their code.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Result type alias for DDNS operations
pub type Result<T> = std::result::Result<T, Error>;

/// Outcome token reported to the invoking host platform
///
/// The wire tokens are fixed by the host platform and must not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "&'static str")]
pub enum ResultCode {
    /// Update succeeded
    Good,
    /// Resolved IP equals the last-known IP; nothing was sent
    NoChange,
    /// Provider rejected the credential
    BadAuth,
    /// Requested zone or record does not exist
    NoHost,
    /// Malformed IP value supplied
    BadAgent,
    /// Network timeout
    BadConn,
    /// DNS resolution failure reaching the provider
    BadResolv,
    /// Generic or unclassified failure
    Unclassified,
}

impl ResultCode {
    /// The token printed on standard output and written to the run log
    pub fn as_str(&self) -> &'static str {
        match self {
            ResultCode::Good => "good",
            ResultCode::NoChange => "nochg",
            ResultCode::BadAuth => "badauth",
            ResultCode::NoHost => "nohost",
            ResultCode::BadAgent => "badagent",
            ResultCode::BadConn => "badconn",
            ResultCode::BadResolv => "badresolv",
            ResultCode::Unclassified => "911",
        }
    }

    /// `good` and `nochg` are the only successful outcomes
    pub fn is_success(&self) -> bool {
        matches!(self, ResultCode::Good | ResultCode::NoChange)
    }
}

impl fmt::Display for ResultCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<ResultCode> for &'static str {
    fn from(code: ResultCode) -> Self {
        code.as_str()
    }
}

/// Core error type for the DDNS updater
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct Error {
    code: ResultCode,
    message: String,
}

impl Error {
    /// Create an error with an explicit result code
    pub fn new(code: ResultCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// The result code this error reports to the host platform
    pub fn code(&self) -> ResultCode {
        self.code
    }

    /// The human-readable message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Arguments did not have the expected shape
    pub fn bad_invocation(msg: impl Into<String>) -> Self {
        Self::new(ResultCode::Unclassified, msg)
    }

    /// No IPv4 address could be found in the IP source
    pub fn malformed_ip(msg: impl Into<String>) -> Self {
        Self::new(ResultCode::BadAgent, msg)
    }

    /// Create an authentication error
    pub fn auth(msg: impl Into<String>) -> Self {
        Self::new(ResultCode::BadAuth, msg)
    }

    /// Zone or record does not exist
    pub fn no_host(msg: impl Into<String>) -> Self {
        Self::new(ResultCode::NoHost, msg)
    }

    /// A network call exceeded its timeout
    pub fn timeout(msg: impl Into<String>) -> Self {
        Self::new(ResultCode::BadConn, msg)
    }

    /// The provider's host name could not be resolved
    pub fn resolve(msg: impl Into<String>) -> Self {
        Self::new(ResultCode::BadResolv, msg)
    }

    /// Any other transport or decode failure
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::new(ResultCode::Unclassified, msg)
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::new(ResultCode::Unclassified, msg)
    }

    /// Create a state store error
    pub fn state_store(msg: impl Into<String>) -> Self {
        Self::new(ResultCode::Unclassified, msg)
    }

    /// Generic error with context
    pub fn other(msg: impl Into<String>) -> Self {
        Self::new(ResultCode::Unclassified, msg)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::other(format!("I/O error: {}", err))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::other(format!("JSON error: {}", err))
    }
}

/// Check whether an error chain reports a host name resolution failure
///
/// HTTP clients surface resolver failures as a generic connect error, so the
/// only reliable signal is the wording somewhere in the source chain.
pub fn is_resolution_failure(err: &(dyn std::error::Error + 'static)) -> bool {
    let mut current = Some(err);
    while let Some(e) = current {
        let text = e.to_string().to_lowercase();
        if text.contains("dns error")
            || text.contains("failed to lookup address")
            || text.contains("name or service not known")
            || text.contains("no such host")
        {
            return true;
        }
        current = e.source();
    }
    false
}
