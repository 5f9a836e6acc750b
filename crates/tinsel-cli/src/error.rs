//! CLI error types.

use std::{io, path::PathBuf};

use thiserror::Error;
use tinsel_core::AssignError;

use crate::party::PartyError;

/// Errors that stop a run.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Party file could not be loaded or written
    #[error(transparent)]
    Party(#[from] PartyError),

    /// Outbox could not be prepared
    #[error("outbox {}: {source}", .path.display())]
    Outbox {
        /// Outbox directory.
        path: PathBuf,
        /// Underlying error.
        source: io::Error,
    },

    /// SMTP transport could not be set up
    #[error("smtp relay {host}: {source}")]
    Smtp {
        /// Relay host.
        host: String,
        /// Underlying error.
        source: lettre::transport::smtp::Error,
    },

    /// No valid draw was produced
    #[error("assignment failed: {0}")]
    Assign(#[from] AssignError),

    /// Some participants were not notified
    #[error("{failed} of {total} notifications failed")]
    Delivery {
        /// Recipients whose delivery failed.
        failed: usize,
        /// Participants in the roster.
        total: usize,
    },
}

impl CliError {
    /// Process exit code for this error.
    ///
    /// - `1`: configuration, file I/O or transport setup problem
    /// - `2`: no valid assignment could be produced
    /// - `3`: draw succeeded but some notifications failed
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Config(_) | Self::Party(_) | Self::Outbox { .. } | Self::Smtp { .. } => 1,
            Self::Assign(_) => 2,
            Self::Delivery { .. } => 3,
        }
    }
}
