//! Authentication error types.

use thiserror::Error;

/// Failures reported by a wallet signing capability.
#[derive(Debug, Error)]
pub enum SignerError {
    /// The wallet refused to sign
    #[error("Signing rejected: {0}")]
    Rejected(String),

    /// The wallet could not be reached
    #[error("Signer unavailable: {0}")]
    Unavailable(String),

    /// The configured key material is unusable
    #[error("Invalid signing key: {0}")]
    InvalidKey(String),
}

/// Request authentication errors
#[derive(Debug, Error)]
pub enum AuthError {
    /// Signer failed; nothing was sent
    #[error("Authentication failed: {0}")]
    Signer(#[from] SignerError),

    /// Signer reported no usable identity
    #[error("Signer has no address")]
    MissingAddress,
}

/// Result type for authentication operations
pub type AuthResult<T> = Result<T, AuthError>;
