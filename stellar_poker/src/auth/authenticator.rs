//! Signed request envelopes for state-mutating coordinator calls.
//!
//! Every mutating request binds `(address, table, action, nonce, timestamp)`
//! into one canonical message:
//!
//! ```text
//! stellar-poker|<address>|<table_id>|<action>|<nonce>|<timestamp>
//! ```
//!
//! The coordinator rebuilds the same string byte for byte, verifies the
//! signature and refuses any nonce not strictly above the last one it saw for
//! the address.

use super::{
    errors::{AuthError, AuthResult},
    nonce::NonceSession,
    signer::WalletSigner,
};
use crate::game::constants::AUTH_DOMAIN;

pub const HEADER_ADDRESS: &str = "x-player-address";
pub const HEADER_SIGNATURE: &str = "x-auth-signature";
pub const HEADER_NONCE: &str = "x-auth-nonce";
pub const HEADER_TIMESTAMP: &str = "x-auth-timestamp";

/// A signed request: the canonical message plus its binding values.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SignedEnvelope {
    pub address: String,
    pub nonce: u64,
    pub timestamp: i64,
    pub signature: String,
    pub message: String,
}

/// Headers attached to an outgoing coordinator request.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum AuthHeaders {
    Signed(SignedEnvelope),
    /// Development-only path: identity without a signature.
    IdentityOnly(String),
}

impl AuthHeaders {
    pub fn address(&self) -> &str {
        match self {
            Self::Signed(envelope) => &envelope.address,
            Self::IdentityOnly(address) => address,
        }
    }

    /// Header name/value pairs in a stable order.
    pub fn pairs(&self) -> Vec<(&'static str, String)> {
        match self {
            Self::Signed(envelope) => vec![
                (HEADER_ADDRESS, envelope.address.clone()),
                (HEADER_SIGNATURE, envelope.signature.clone()),
                (HEADER_NONCE, envelope.nonce.to_string()),
                (HEADER_TIMESTAMP, envelope.timestamp.to_string()),
            ],
            Self::IdentityOnly(address) => vec![(HEADER_ADDRESS, address.clone())],
        }
    }
}

/// Build the exact string a request signature covers.
pub fn canonical_message(
    address: &str,
    table_id: u32,
    action: &str,
    nonce: u64,
    timestamp: i64,
) -> String {
    format!("{AUTH_DOMAIN}|{address}|{table_id}|{action}|{nonce}|{timestamp}")
}

/// Action labels understood by the coordinator.
pub mod actions {
    use crate::game::entities::{BettingAction, Street};

    pub const CREATE_TABLE: &str = "create_table";
    pub const JOIN_TABLE: &str = "join_table";
    pub const REQUEST_DEAL: &str = "request_deal";
    pub const REQUEST_SHOWDOWN: &str = "request_showdown";
    pub const GET_PLAYER_CARDS: &str = "get_player_cards";

    pub fn request_reveal(street: Street) -> String {
        format!("request_reveal:{street}")
    }

    pub fn player_action(action: BettingAction) -> String {
        format!("player_action:{}", action.label())
    }
}

/// Produces signed envelopes and owns the session's nonce counter.
#[derive(Debug, Default)]
pub struct RequestAuthenticator {
    nonces: NonceSession,
}

impl RequestAuthenticator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sign `action` on `table_id` for the signer's identity.
    ///
    /// Fails closed: if the signer refuses, no envelope exists and the caller
    /// must not send the request.
    pub async fn authenticate(
        &self,
        table_id: u32,
        action: &str,
        signer: &dyn WalletSigner,
    ) -> AuthResult<SignedEnvelope> {
        let address = signer.address().to_string();
        if address.is_empty() {
            return Err(AuthError::MissingAddress);
        }

        let nonce = self.nonces.next();
        let timestamp = chrono::Utc::now().timestamp();
        let message = canonical_message(&address, table_id, action, nonce, timestamp);

        let signature = signer.sign_message(&message).await.map_err(|e| {
            log::warn!("Signer refused '{}' on table {}: {}", action, table_id, e);
            AuthError::from(e)
        })?;

        log::debug!("Signed '{}' on table {} with nonce {}", action, table_id, nonce);

        Ok(SignedEnvelope {
            address,
            nonce,
            timestamp,
            signature,
            message,
        })
    }

    /// Signed headers for a request.
    pub async fn headers(
        &self,
        table_id: u32,
        action: &str,
        signer: &dyn WalletSigner,
    ) -> AuthResult<AuthHeaders> {
        self.authenticate(table_id, action, signer)
            .await
            .map(AuthHeaders::Signed)
    }

    pub fn nonces(&self) -> &NonceSession {
        &self.nonces
    }
}
