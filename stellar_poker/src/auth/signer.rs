//! Wallet signing capability.
//!
//! The client never owns a browser wallet; it talks to anything that can
//! report an address and sign. [`LocalKeySigner`] is the in-process
//! implementation backed by a Stellar secret seed.

use async_trait::async_trait;
use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use sha2::{Digest, Sha256};
use tokio::process::Command;

use super::errors::SignerError;

/// An asynchronous signing capability bound to one identity.
///
/// Every call is a suspension point. Implementations must not retry
/// internally: a rejection is reported once and the caller decides.
#[async_trait]
pub trait WalletSigner: Send + Sync {
    /// Stellar account address (`G...`) this signer speaks for.
    fn address(&self) -> &str;

    /// Sign an arbitrary UTF-8 message, returning a hex signature.
    async fn sign_message(&self, message: &str) -> Result<String, SignerError>;

    /// Sign a base64 transaction envelope for the given network, returning
    /// the signed envelope.
    async fn sign_transaction(
        &self,
        envelope_xdr: &str,
        network_passphrase: &str,
    ) -> Result<String, SignerError>;
}

/// Ed25519 signer over a locally held Stellar secret seed (`S...`).
pub struct LocalKeySigner {
    signing_key: SigningKey,
    address: String,
    secret: String,
}

impl LocalKeySigner {
    /// Build from a Stellar secret seed.
    pub fn from_secret(secret: &str) -> Result<Self, SignerError> {
        let seed = stellar_strkey::ed25519::PrivateKey::from_string(secret.trim())
            .map_err(|_| SignerError::InvalidKey("not a Stellar secret seed".to_string()))?;
        Ok(Self::from_seed(seed.0))
    }

    /// Build from raw 32-byte seed material.
    pub fn from_seed(seed: [u8; 32]) -> Self {
        let signing_key = SigningKey::from_bytes(&seed);
        let address =
            stellar_strkey::ed25519::PublicKey(signing_key.verifying_key().to_bytes()).to_string();
        let secret = stellar_strkey::ed25519::PrivateKey(seed).to_string();
        Self {
            signing_key,
            address,
            secret,
        }
    }

    pub fn verifying_key(&self) -> VerifyingKey {
        self.signing_key.verifying_key()
    }
}

impl std::fmt::Debug for LocalKeySigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalKeySigner")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl WalletSigner for LocalKeySigner {
    fn address(&self) -> &str {
        &self.address
    }

    async fn sign_message(&self, message: &str) -> Result<String, SignerError> {
        let signature = self.signing_key.sign(message.as_bytes());
        Ok(hex::encode(signature.to_bytes()))
    }

    async fn sign_transaction(
        &self,
        envelope_xdr: &str,
        network_passphrase: &str,
    ) -> Result<String, SignerError> {
        let output = Command::new("stellar")
            .args([
                "tx",
                "sign",
                envelope_xdr,
                "--sign-with-key",
                &self.secret,
                "--network-passphrase",
                network_passphrase,
            ])
            .output()
            .await
            .map_err(|e| SignerError::Unavailable(format!("failed to run stellar CLI: {e}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(SignerError::Rejected(stderr.trim().to_string()));
        }

        let signed = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if signed.is_empty() {
            return Err(SignerError::Rejected("empty signed envelope".to_string()));
        }
        Ok(signed)
    }
}

/// Whether `address` is a well-formed Stellar account strkey.
pub fn is_valid_address(address: &str) -> bool {
    stellar_strkey::ed25519::PublicKey::from_string(address).is_ok()
}

/// Prefix wallets apply before hashing a message for `signMessage`.
const SEP53_PREFIX: &str = "Stellar Signed Message:\n";

/// SHA-256 of the SEP-53 prefixed message, the payload browser wallets sign.
pub fn sep53_digest(message: &str) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(SEP53_PREFIX.as_bytes());
    hasher.update(message.as_bytes());
    hasher.finalize().into()
}

/// Check a hex signature over `message` against a Stellar address.
///
/// Accepts a signature over the raw message bytes or over its SEP-53 digest.
pub fn verify_message(address: &str, message: &str, signature_hex: &str) -> bool {
    let Ok(public_key) = stellar_strkey::ed25519::PublicKey::from_string(address) else {
        return false;
    };
    let Ok(verifying_key) = VerifyingKey::from_bytes(&public_key.0) else {
        return false;
    };
    let Ok(bytes) = hex::decode(signature_hex.trim().trim_start_matches("0x")) else {
        return false;
    };
    let Ok(signature) = Signature::from_slice(&bytes) else {
        return false;
    };
    verifying_key.verify(message.as_bytes(), &signature).is_ok()
        || verifying_key
            .verify(&sep53_digest(message), &signature)
            .is_ok()
}
