// ABOUTME: Error types for the readscore pipeline including ErrorCode enum and ReadscoreError struct.
// ABOUTME: Separates fatal fetch failures from the recoverable empty-category condition.

use std::fmt;

/// Error codes representing the categories of pipeline failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// The category name was empty after normalization.
    InvalidCategory,
    /// The API could not be reached or answered with a non-200 status.
    Fetch,
    /// The API did not answer within the configured timeout.
    Timeout,
    /// The API answered with content that is not the expected JSON shape.
    Decode,
    /// The category exists but has no article members after filtering.
    EmptyCategory,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCode::InvalidCategory => "invalid category",
            ErrorCode::Fetch => "fetch error",
            ErrorCode::Timeout => "timeout",
            ErrorCode::Decode => "unexpected response",
            ErrorCode::EmptyCategory => "no articles found",
        };
        write!(f, "{}", s)
    }
}

/// The main error type for readscore operations.
///
/// `target` is the category name or request URL the operation worked on and
/// `op` names the stage that failed.
#[derive(Debug, thiserror::Error)]
pub struct ReadscoreError {
    pub code: ErrorCode,
    pub target: String,
    pub op: String,
    #[source]
    pub source: Option<anyhow::Error>,
}

impl fmt::Display for ReadscoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "readscore: {} {}: {}", self.op, self.target, self.code)?;
        if let Some(ref src) = self.source {
            write!(f, ": {}", src)?;
        }
        Ok(())
    }
}

impl ReadscoreError {
    fn with_code(
        code: ErrorCode,
        target: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self {
            code,
            target: target.into(),
            op: op.into(),
            source,
        }
    }

    /// Create an InvalidCategory error.
    pub fn invalid_category(target: impl Into<String>, op: impl Into<String>) -> Self {
        Self::with_code(
            ErrorCode::InvalidCategory,
            target,
            op,
            Some(anyhow::anyhow!("category name must not be empty")),
        )
    }

    /// Create a Fetch error.
    pub fn fetch(
        target: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self::with_code(ErrorCode::Fetch, target, op, source)
    }

    /// Create a Timeout error.
    pub fn timeout(
        target: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self::with_code(ErrorCode::Timeout, target, op, source)
    }

    /// Create a Decode error.
    pub fn decode(
        target: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self::with_code(ErrorCode::Decode, target, op, source)
    }

    /// Create an EmptyCategory error.
    pub fn empty_category(target: impl Into<String>, op: impl Into<String>) -> Self {
        Self::with_code(ErrorCode::EmptyCategory, target, op, None)
    }

    /// Replace the operation name, keeping code, target and source.
    pub fn in_op(mut self, op: impl Into<String>) -> Self {
        self.op = op.into();
        self
    }

    /// Returns true for any failure talking to the API: transport, timeout or decode.
    pub fn is_fetch_failure(&self) -> bool {
        matches!(
            self.code,
            ErrorCode::Fetch | ErrorCode::Timeout | ErrorCode::Decode
        )
    }

    /// Returns true if this is a Timeout error.
    pub fn is_timeout(&self) -> bool {
        self.code == ErrorCode::Timeout
    }

    /// Returns true if this is a Decode error.
    pub fn is_decode(&self) -> bool {
        self.code == ErrorCode::Decode
    }

    /// Returns true if the category had no article members.
    pub fn is_empty_category(&self) -> bool {
        self.code == ErrorCode::EmptyCategory
    }

    /// Returns true if this is an InvalidCategory error.
    pub fn is_invalid_category(&self) -> bool {
        self.code == ErrorCode::InvalidCategory
    }
}
