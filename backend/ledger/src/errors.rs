//! Application-wide error types.
//!
//! Every failure belongs to one of two kinds: [`ErrorKind::InputData`] for
//! problems the caller can fix by changing the request, and
//! [`ErrorKind::ServerSide`] for everything else.

use thiserror::Error;

use crate::types::Money;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InputData,
    ServerSide,
}

#[derive(Debug, Error)]
pub enum LedgerError {
    /// Missing entity, or one the caller is not a party to. The two cases are
    /// deliberately reported the same way.
    #[error("{0}")]
    NotFound(String),

    #[error("Job '{0}' is already paid")]
    AlreadySettled(i64),

    #[error("You have not enough money to pay for Job costing '{price}'")]
    InsufficientFunds { price: Money },

    #[error("Cannot pay '{amount}' to '{contractor_id}' as it exceeds threshold of '{cap}'")]
    CapExceeded {
        amount: Money,
        contractor_id: i64,
        cap: Money,
    },

    #[error("Cannot pay to '{0}' as it is not a Contractor")]
    InvalidTarget(i64),

    #[error("{0}")]
    InvalidInput(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl LedgerError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound(_)
            | Self::AlreadySettled(_)
            | Self::InsufficientFunds { .. }
            | Self::CapExceeded { .. }
            | Self::InvalidTarget(_)
            | Self::InvalidInput(_) => ErrorKind::InputData,
            Self::Database(_) | Self::Migrate(_) | Self::Config(_) => ErrorKind::ServerSide,
        }
    }
}

pub type Result<T> = std::result::Result<T, LedgerError>;
