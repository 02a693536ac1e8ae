//! Dispatch error types.

use thiserror::Error;

use super::seating::SeatingError;
use crate::{auth::AuthError, game::IntentError, ledger::LedgerError, net::NetError};

/// Why a user intent did not complete.
///
/// Every variant is per-action: nothing here ends the session.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// Another action holds the in-flight token
    #[error("Another action is still in flight")]
    Busy,

    /// Intent is not legal in the current phase or mode
    #[error(transparent)]
    Intent(#[from] IntentError),

    /// Seating preconditions failed
    #[error(transparent)]
    Precondition(#[from] SeatingError),

    /// Request could not be signed; nothing was sent
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Coordinator call failed
    #[error(transparent)]
    Net(#[from] NetError),

    /// Direct contract call failed
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

impl DispatchError {
    /// Rejected locally, before any network traffic.
    pub fn is_precondition(&self) -> bool {
        matches!(self, Self::Busy | Self::Intent(_) | Self::Precondition(_))
    }
}

/// Result type for dispatcher operations
pub type DispatchResult<T> = Result<T, DispatchError>;
