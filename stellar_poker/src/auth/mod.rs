//! Request authentication for the coordinator protocol.
//!
//! This module provides:
//! - Replay-resistant signed envelopes with a per-session nonce
//! - The asynchronous wallet signing capability and a local-key signer
//! - Stellar address validation

pub mod authenticator;
pub mod errors;
pub mod nonce;
pub mod signer;

pub use authenticator::{
    AuthHeaders, RequestAuthenticator, SignedEnvelope, actions, canonical_message,
};
pub use errors::{AuthError, AuthResult, SignerError};
pub use nonce::NonceSession;
pub use signer::{LocalKeySigner, WalletSigner, is_valid_address, verify_message};
