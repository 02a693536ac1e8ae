//! Ledger submission error types.

use thiserror::Error;

use crate::auth::SignerError;

/// Errors raised while building, signing, submitting or confirming a
/// contract call.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Transaction could not be assembled
    #[error("Failed to build transaction: {0}")]
    Build(String),

    /// Wallet refused to sign the transaction
    #[error("Transaction signing failed: {0}")]
    Signer(#[from] SignerError),

    /// RPC node refused the submission
    #[error("Submission rejected: {0}")]
    Submit(String),

    /// Transaction reached a terminal failed status
    #[error("Transaction {hash} failed: {reason}")]
    Rejected { hash: String, reason: String },

    /// No terminal status observed within the polling budget
    #[error("Transaction {hash} not confirmed after {attempts} attempts")]
    ConfirmationTimeout { hash: String, attempts: u32 },

    /// Transport error talking to the RPC node
    #[error("RPC error: {0}")]
    Rpc(String),
}

impl From<reqwest::Error> for LedgerError {
    fn from(e: reqwest::Error) -> Self {
        Self::Rpc(e.to_string())
    }
}

/// Result type for ledger operations
pub type LedgerResult<T> = Result<T, LedgerError>;
