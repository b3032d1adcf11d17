//! Error types for the Chorus workspace.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A shared error type for the entire Chorus workspace.
///
/// Operation-level variants (`Locked`, `IncompleteRequirements`,
/// `NotConfirmed`, `AlreadyProcessing`, `NotReady`) are advisory: the live
/// persona relays them conversationally via [`ChorusError::advisory`] and the
/// session keeps running. Infrastructure variants (`Persistence`,
/// `Analytics`) are non-fatal and only ever logged.
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
pub enum ChorusError {
    /// Requirements are locked while synthesis is in flight
    #[error("Requirements are locked during processing")]
    Locked,

    /// Required requirement fields are missing or invalid
    #[error("Incomplete requirements: missing {}", .missing.join(", "))]
    IncompleteRequirements { missing: Vec<String> },

    /// Finalize was called before the confirmation step
    #[error("Requirements have not been confirmed")]
    NotConfirmed,

    /// A synthesis task is already in flight for this context
    #[error("Synthesis is already in progress")]
    AlreadyProcessing,

    /// The demo agent is not ready for handoff
    #[error("Demo agent is not ready")]
    NotReady,

    /// Specification synthesis failed
    #[error("Synthesis failed: {0}")]
    SynthesisFailed(String),

    /// Specification synthesis exceeded the configured ceiling
    #[error("Synthesis timed out")]
    SynthesisTimeout,

    /// A handoff between personas could not be completed
    #[error("Handoff failed: {0}")]
    HandoffFailed(String),

    /// Saving or loading an agent configuration failed (non-fatal)
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// Call bookkeeping failed (non-fatal)
    #[error("Analytics error: {0}")]
    Analytics(String),

    /// The live session transport rejected an operation
    #[error("Session error: {0}")]
    Session(String),

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization { format: String, message: String },

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ChorusError {
    /// Creates an IncompleteRequirements error from missing field names.
    pub fn incomplete(missing: Vec<String>) -> Self {
        Self::IncompleteRequirements { missing }
    }

    /// Creates a SynthesisFailed error
    pub fn synthesis_failed(message: impl Into<String>) -> Self {
        Self::SynthesisFailed(message.into())
    }

    /// Creates a HandoffFailed error
    pub fn handoff_failed(message: impl Into<String>) -> Self {
        Self::HandoffFailed(message.into())
    }

    /// Creates a Persistence error
    pub fn persistence(message: impl Into<String>) -> Self {
        Self::Persistence(message.into())
    }

    /// Creates an Analytics error
    pub fn analytics(message: impl Into<String>) -> Self {
        Self::Analytics(message.into())
    }

    /// Creates a Session error
    pub fn session(message: impl Into<String>) -> Self {
        Self::Session(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Check if this is an operation-level error the live persona should
    /// relay conversationally instead of treating as a fault.
    pub fn is_advisory(&self) -> bool {
        matches!(
            self,
            Self::Locked
                | Self::IncompleteRequirements { .. }
                | Self::NotConfirmed
                | Self::AlreadyProcessing
                | Self::NotReady
        )
    }

    /// Check if this error must never interrupt conversation flow.
    pub fn is_non_fatal(&self) -> bool {
        matches!(self, Self::Persistence(_) | Self::Analytics(_))
    }

    /// A conversational phrasing of this error for the live persona.
    ///
    /// Only meaningful for advisory variants; other variants fall back to a
    /// generic apology so a raw error never reaches the caller's ear.
    pub fn advisory(&self) -> String {
        match self {
            Self::Locked => "I'm currently creating your agent with the details we confirmed. \
                 Once you've tried it, we can adjust anything you'd like!"
                .to_string(),
            Self::IncompleteRequirements { missing } => format!(
                "Before I can continue I still need: {}. Could you share those?",
                missing.join(", ")
            ),
            Self::NotConfirmed => "Let me first show you a summary of what I've gathered so you \
                 can confirm everything looks right."
                .to_string(),
            Self::AlreadyProcessing => {
                "I'm already working on your agent! Just a few more moments.".to_string()
            }
            Self::NotReady => {
                "Your agent isn't quite ready yet. Let me finish setting it up first.".to_string()
            }
            _ => "I'm sorry, something went wrong on my end. Let's try that again.".to_string(),
        }
    }
}

impl From<std::io::Error> for ChorusError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for ChorusError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for ChorusError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for ChorusError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// A type alias for `Result<T, ChorusError>`.
pub type Result<T> = std::result::Result<T, ChorusError>;
