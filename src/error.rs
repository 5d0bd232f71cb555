//! Error taxonomy for command handling.
//!
//! [`BotError`] covers every failure a command handler can surface. The
//! dispatcher converts these into user-facing replies at the boundary:
//! expected outcomes become instructive messages, collaborator faults are
//! logged and rendered as a generic retry suggestion.

use thiserror::Error;

/// Failure modes for bot commands and their collaborators.
#[derive(Debug, Error)]
pub enum BotError {
    /// The user has no stored profile yet. Expected state, not a fault.
    #[error("no profile stored; set interests first")]
    ProfileRequired,

    /// The command arguments were missing or unusable. Expected, not a fault.
    #[error("{0}")]
    Usage(String),

    /// The profile store failed while reading.
    #[error("profile store read failed: {0}")]
    StoreRead(String),

    /// The profile store failed while writing.
    #[error("profile store write failed: {0}")]
    StoreWrite(String),

    /// The completion API call failed (transport, status, or decode).
    #[error("completion relay failed: {0}")]
    Relay(String),
}

impl BotError {
    /// `true` for expected user-correctable outcomes that should not be
    /// logged as faults.
    pub fn is_user_error(&self) -> bool {
        matches!(self, Self::ProfileRequired | Self::Usage(_))
    }
}
