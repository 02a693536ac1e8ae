//! Client configuration management.
//!
//! Consolidates all environment variable reads and provides validated configuration.

use crate::{
    bot::OpponentDifficulty,
    game::{
        constants::{
            DEFAULT_BUY_IN, DEFAULT_CONFIRM_ATTEMPTS, DEFAULT_CONFIRM_DELAY_MS,
            DEFAULT_POLL_INTERVAL_SECS,
        },
        entities::PlayMode,
    },
};

/// Complete client configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Coordinator base URL
    pub coordinator_url: String,
    /// Play mode for this session
    pub mode: PlayMode,
    /// Table to attach to (0 = none yet)
    pub table_id: u32,
    /// Stellar secret seed of the local identity (required)
    pub player_secret: String,
    /// Reconciler polling interval
    pub poll_interval_secs: u64,
    /// Per-request coordinator timeout
    pub request_timeout_secs: u64,
    /// Send identity-only requests first. Development only.
    pub allow_insecure_dev_auth: bool,
    /// Buy-in used for joins and fresh stacks
    pub buy_in: i128,
    /// Fabricated stack for solo play
    pub solo_stack: i128,
    /// Direct ledger access; `None` routes betting through the coordinator
    pub ledger: Option<LedgerConfig>,
    /// Solo opponent difficulty
    pub opponent_difficulty: OpponentDifficulty,
}

/// Ledger endpoint configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerConfig {
    pub rpc_url: String,
    pub network_passphrase: String,
    pub contract_id: String,
    /// Confirmation polling attempts
    pub confirm_attempts: u32,
    /// Delay between confirmation polls
    pub confirm_delay_ms: u64,
}

/// Values from the command line that win over the environment
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub coordinator_url: Option<String>,
    pub mode: Option<PlayMode>,
    pub table_id: Option<u32>,
}

impl ClientConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns error if required variables are missing or invalid
    pub fn from_env(overrides: ConfigOverrides) -> Result<Self, ConfigError> {
        let coordinator_url = overrides
            .coordinator_url
            .or_else(|| std::env::var("COORDINATOR_URL").ok())
            .unwrap_or_else(|| "http://localhost:8080".to_string());

        let mode = match overrides.mode {
            Some(mode) => mode,
            None => match std::env::var("PLAY_MODE") {
                Ok(raw) => raw.parse().map_err(|reason| ConfigError::Invalid {
                    var: "PLAY_MODE".to_string(),
                    reason,
                })?,
                Err(_) => PlayMode::default(),
            },
        };

        let player_secret =
            std::env::var("PLAYER_SECRET").map_err(|_| ConfigError::MissingRequired {
                var: "PLAYER_SECRET".to_string(),
                hint: "Generate with: stellar keys generate --no-fund player && stellar keys show player"
                    .to_string(),
            })?;

        let opponent_difficulty = std::env::var("OPPONENT_DIFFICULTY")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or_default();

        let ledger = match (
            std::env::var("STELLAR_RPC_URL").ok(),
            std::env::var("STELLAR_NETWORK_PASSPHRASE").ok(),
            std::env::var("POKER_TABLE_CONTRACT").ok(),
        ) {
            (Some(rpc_url), Some(network_passphrase), Some(contract_id)) => Some(LedgerConfig {
                rpc_url,
                network_passphrase,
                contract_id,
                confirm_attempts: parse_env_or("LEDGER_CONFIRM_ATTEMPTS", DEFAULT_CONFIRM_ATTEMPTS),
                confirm_delay_ms: parse_env_or("LEDGER_CONFIRM_DELAY_MS", DEFAULT_CONFIRM_DELAY_MS),
            }),
            _ => None,
        };

        Ok(ClientConfig {
            coordinator_url,
            mode,
            table_id: overrides
                .table_id
                .unwrap_or_else(|| parse_env_or("TABLE_ID", 0)),
            player_secret,
            poll_interval_secs: parse_env_or("POLL_INTERVAL_SECS", DEFAULT_POLL_INTERVAL_SECS),
            request_timeout_secs: parse_env_or("REQUEST_TIMEOUT_SECS", 300),
            allow_insecure_dev_auth: env_flag("ALLOW_INSECURE_DEV_AUTH"),
            buy_in: parse_env_or("DEFAULT_BUY_IN", DEFAULT_BUY_IN),
            solo_stack: parse_env_or("SOLO_STACK", DEFAULT_BUY_IN),
            ledger,
            opponent_difficulty,
        })
    }

    /// Validate configuration after loading
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.coordinator_url.starts_with("http://")
            || self.coordinator_url.starts_with("https://"))
        {
            return Err(ConfigError::Invalid {
                var: "COORDINATOR_URL".to_string(),
                reason: "Must start with http:// or https://".to_string(),
            });
        }

        if self.player_secret.trim().is_empty() {
            return Err(ConfigError::Invalid {
                var: "PLAYER_SECRET".to_string(),
                reason: "Must not be empty".to_string(),
            });
        }

        if self.poll_interval_secs == 0 {
            return Err(ConfigError::Invalid {
                var: "POLL_INTERVAL_SECS".to_string(),
                reason: "Must be greater than 0".to_string(),
            });
        }

        if self.buy_in <= 0 {
            return Err(ConfigError::Invalid {
                var: "DEFAULT_BUY_IN".to_string(),
                reason: "Must be greater than 0".to_string(),
            });
        }

        if self.solo_stack <= 0 {
            return Err(ConfigError::Invalid {
                var: "SOLO_STACK".to_string(),
                reason: "Must be greater than 0".to_string(),
            });
        }

        if self.ledger.as_ref().is_some_and(|l| l.confirm_attempts == 0) {
            return Err(ConfigError::Invalid {
                var: "LEDGER_CONFIRM_ATTEMPTS".to_string(),
                reason: "Must be at least 1".to_string(),
            });
        }

        Ok(())
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {var}\nHint: {hint}")]
    MissingRequired { var: String, hint: String },

    #[error("Invalid configuration for {var}: {reason}")]
    Invalid { var: String, reason: String },
}

/// Helper to parse environment variable with default fallback
fn parse_env_or<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// `1`, `true`, `yes` and `on` enable a flag; anything else, or unset, disables it.
fn env_flag(key: &str) -> bool {
    match std::env::var(key) {
        Ok(value) => matches!(
            value.trim().to_ascii_lowercase().as_str(),
            "1" | "true" | "yes" | "on"
        ),
        Err(_) => false,
    }
}
