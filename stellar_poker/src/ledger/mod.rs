//! Direct table-contract calls: invocation building and confirmed submission.
//!
//! A contract call goes through four steps: the gateway assembles an
//! unsigned transaction, the wallet signs it, the gateway submits it, and
//! the submitter polls for a terminal status a bounded number of times.
//! Running out of attempts is an error, never an implicit success.

pub mod errors;
pub mod stellar;

use async_trait::async_trait;
use std::{sync::Arc, time::Duration};

use crate::{
    auth::WalletSigner,
    game::{
        constants::{DEFAULT_CONFIRM_ATTEMPTS, DEFAULT_CONFIRM_DELAY_MS},
        entities::{BettingAction, Chips},
    },
};

pub use errors::{LedgerError, LedgerResult};
pub use stellar::StellarGateway;

/// A typed positional contract argument.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ScArg {
    U32(u32),
    Address(String),
    I128(Chips),
    Action(BettingAction),
}

impl ScArg {
    /// Value as the `stellar contract invoke` CLI expects it.
    pub fn cli_value(&self) -> String {
        match self {
            Self::U32(v) => v.to_string(),
            Self::Address(address) => address.clone(),
            Self::I128(v) => v.to_string(),
            Self::Action(action) => match action {
                BettingAction::Fold => "\"Fold\"".to_string(),
                BettingAction::Check => "\"Check\"".to_string(),
                BettingAction::Call => "\"Call\"".to_string(),
                BettingAction::AllIn => "\"AllIn\"".to_string(),
                BettingAction::Bet(amount) => format!("{{\"Bet\":\"{amount}\"}}"),
                BettingAction::Raise(amount) => format!("{{\"Raise\":\"{amount}\"}}"),
            },
        }
    }
}

/// A contract method with named positional arguments.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ContractInvocation {
    pub method: &'static str,
    pub args: Vec<(&'static str, ScArg)>,
}

impl ContractInvocation {
    pub fn player_action(table_id: u32, player: &str, action: BettingAction) -> Self {
        Self {
            method: "player_action",
            args: vec![
                ("table_id", ScArg::U32(table_id)),
                ("player", ScArg::Address(player.to_string())),
                ("action", ScArg::Action(action)),
            ],
        }
    }

    pub fn join_table(table_id: u32, player: &str, buy_in: Chips) -> Self {
        Self {
            method: "join_table",
            args: vec![
                ("table_id", ScArg::U32(table_id)),
                ("player", ScArg::Address(player.to_string())),
                ("buy_in", ScArg::I128(buy_in)),
            ],
        }
    }

    /// Arguments after the `--` separator of `stellar contract invoke`.
    pub fn cli_args(&self) -> Vec<String> {
        let mut out = Vec::with_capacity(1 + self.args.len() * 2);
        out.push(self.method.to_string());
        for (name, value) in &self.args {
            out.push(format!("--{name}"));
            out.push(value.cli_value());
        }
        out
    }
}

/// Status of a submitted transaction.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TxStatus {
    Pending,
    Success,
    Failed(String),
}

/// Ledger access used by [`LedgerSubmitter`].
#[async_trait]
pub trait LedgerGateway: Send + Sync {
    /// Network the gateway submits to; signers bind signatures to it.
    fn network_passphrase(&self) -> &str;

    /// Assemble an unsigned transaction envelope with `source` as the
    /// transaction source account.
    async fn build_transaction(
        &self,
        source: &str,
        invocation: &ContractInvocation,
    ) -> LedgerResult<String>;

    /// Submit a signed envelope, returning its hash.
    async fn submit_transaction(&self, signed_envelope: &str) -> LedgerResult<String>;

    async fn transaction_status(&self, hash: &str) -> LedgerResult<TxStatus>;
}

/// Build, sign, submit and confirm contract calls.
#[derive(Clone)]
pub struct LedgerSubmitter {
    gateway: Arc<dyn LedgerGateway>,
    attempts: u32,
    delay: Duration,
}

impl LedgerSubmitter {
    pub fn new(gateway: Arc<dyn LedgerGateway>) -> Self {
        Self {
            gateway,
            attempts: DEFAULT_CONFIRM_ATTEMPTS,
            delay: Duration::from_millis(DEFAULT_CONFIRM_DELAY_MS),
        }
    }

    /// Override the confirmation polling budget.
    pub fn with_polling(mut self, attempts: u32, delay: Duration) -> Self {
        self.attempts = attempts.max(1);
        self.delay = delay;
        self
    }

    /// Run `invocation` as the signer's account and wait for a terminal
    /// status. Returns the confirmed transaction hash.
    pub async fn submit(
        &self,
        invocation: &ContractInvocation,
        signer: &dyn WalletSigner,
    ) -> LedgerResult<String> {
        let unsigned = self
            .gateway
            .build_transaction(signer.address(), invocation)
            .await?;
        let signed = signer
            .sign_transaction(&unsigned, self.gateway.network_passphrase())
            .await?;
        let hash = self.gateway.submit_transaction(&signed).await?;
        log::info!("Submitted {} as {}", invocation.method, hash);

        self.await_confirmation(&hash).await
    }

    /// Poll until `hash` succeeds or fails, up to the configured attempts.
    pub async fn await_confirmation(&self, hash: &str) -> LedgerResult<String> {
        for attempt in 1..=self.attempts {
            match self.gateway.transaction_status(hash).await {
                Ok(TxStatus::Success) => {
                    log::info!("Transaction {} confirmed (attempt {})", hash, attempt);
                    return Ok(hash.to_string());
                }
                Ok(TxStatus::Failed(reason)) => {
                    log::error!("Transaction {} failed: {}", hash, reason);
                    return Err(LedgerError::Rejected {
                        hash: hash.to_string(),
                        reason,
                    });
                }
                Ok(TxStatus::Pending) => {}
                Err(e) => {
                    log::warn!(
                        "Status poll for {} failed (attempt {}/{}): {}",
                        hash,
                        attempt,
                        self.attempts,
                        e
                    );
                }
            }

            if attempt < self.attempts {
                tokio::time::sleep(self.delay).await;
            }
        }

        Err(LedgerError::ConfirmationTimeout {
            hash: hash.to_string(),
            attempts: self.attempts,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_action_cli_args() {
        let invocation = ContractInvocation::player_action(4, "GPLAYER", BettingAction::Raise(500));
        assert_eq!(
            invocation.cli_args(),
            vec![
                "player_action",
                "--table_id",
                "4",
                "--player",
                "GPLAYER",
                "--action",
                r#"{"Raise":"500"}"#,
            ]
        );
    }

    #[test]
    fn test_unit_actions_are_quoted_variants() {
        assert_eq!(ScArg::Action(BettingAction::AllIn).cli_value(), r#""AllIn""#);
        assert_eq!(ScArg::Action(BettingAction::Check).cli_value(), r#""Check""#);
    }

    #[test]
    fn test_join_table_cli_args() {
        let invocation = ContractInvocation::join_table(1, "GPLAYER", 1_000_000_000);
        assert_eq!(invocation.method, "join_table");
        assert_eq!(invocation.cli_args()[6], "1000000000");
    }
}
