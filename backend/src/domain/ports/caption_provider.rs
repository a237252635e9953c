//! Text-generation provider port.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::prompt::Prompt;

/// Errors surfaced by provider adapters. No retries happen at this layer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CaptionProviderError {
    /// No response arrived within the bounded interval.
    #[error("provider timed out: {message}")]
    Timeout { message: String },
    /// The request never completed (connection, TLS, DNS).
    #[error("provider transport failure: {message}")]
    Transport { message: String },
    /// The provider answered with a non-success status; `message` carries a
    /// preview of the error body for diagnostics.
    #[error("provider returned status {status}: {message}")]
    Upstream { status: u16, message: String },
}

impl CaptionProviderError {
    /// Helper for timeouts.
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::Timeout {
            message: message.into(),
        }
    }

    /// Helper for transport failures.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Helper for non-success provider statuses.
    pub fn upstream(status: u16, message: impl Into<String>) -> Self {
        Self::Upstream {
            status,
            message: message.into(),
        }
    }
}

/// Perform one completion call and return the raw generated text.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CaptionProvider: Send + Sync {
    async fn complete(&self, prompt: &Prompt) -> Result<String, CaptionProviderError>;
}
