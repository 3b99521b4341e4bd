//! Error codes and user-facing notices.
//!
//! Every module error implements [`ErrorCode`] so callers can map it to a
//! stable, grepable code. [`Notice`] is what the host shows in its
//! notification area; failures are converted at the boundary and never unwind
//! editor state.

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

use serde::Serialize;

/// Stable machine-readable code for an error variant.
pub trait ErrorCode {
    fn error_code(&self) -> &'static str;

    /// Whether retrying the same operation may succeed.
    fn retryable(&self) -> bool {
        false
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Info,
    Success,
    Error,
}

/// A message for the host's notification channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub code: &'static str,
    pub message: String,
    pub retryable: bool,
}

impl Notice {
    #[must_use]
    pub fn success(code: &'static str, message: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Success, code, message: message.into(), retryable: false }
    }

    #[must_use]
    pub fn info(code: &'static str, message: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Info, code, message: message.into(), retryable: false }
    }

    /// Build an error notice from any coded error.
    #[must_use]
    pub fn from_error<E>(err: &E) -> Self
    where
        E: ErrorCode + std::fmt::Display,
    {
        Self { level: NoticeLevel::Error, code: err.error_code(), message: err.to_string(), retryable: err.retryable() }
    }
}
