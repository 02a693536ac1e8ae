//! # Stellar Poker
//!
//! Table client for a zero-knowledge Texas Hold'em game whose authoritative
//! state lives partly in an off-chain coordinator (which brokers the deal,
//! reveal and showdown proofs) and partly in a Soroban table contract.
//!
//! The client keeps one continuously-updated [`GameState`] while:
//!
//! - signing every mutating coordinator request with a replay-resistant
//!   envelope ([`auth`]),
//! - applying optimistic updates as intents are dispatched ([`dispatch`]),
//! - reconciling against polled table state on a fixed interval ([`sync`]).
//!
//! ## Play modes
//!
//! - **single**: the local player against a simulated opponent ([`bot`]);
//!   betting never leaves the process.
//! - **headsup**: exactly two joined wallets; betting goes on-chain.
//! - **multi**: three to six joined wallets; betting goes on-chain.
//!
//! ## Phases
//!
//! ```text
//! waiting -> dealing -> preflop -> flop -> turn -> river -> showdown -> settlement
//! ```
//!
//! On-chain phase names are mapped onto these by [`game::map_phase`];
//! anything without a mapping leaves the current phase alone.
//!
//! ## Core Modules
//!
//! - [`game`]: Phases, entities, intent validation and the shared store
//! - [`auth`]: Signed request envelopes and wallet signing
//! - [`net`]: Coordinator HTTP client and message types
//! - [`ledger`]: Direct table-contract calls with bounded confirmation
//! - [`sync`]: Defensive state parsing and field-by-field merge
//! - [`dispatch`]: The intent state machine
//!
//! ## Example
//!
//! ```
//! use stellar_poker::{GameState, Phase, map_phase};
//!
//! let mut state = GameState::new(1);
//! state.set_phase(map_phase("DealingTurn").or_keep(Phase::Waiting));
//! assert_eq!(state.phase, Phase::Flop);
//! ```

/// Signed request envelopes and wallet signing.
pub mod auth;
pub use auth::{AuthHeaders, LocalKeySigner, RequestAuthenticator, WalletSigner};

/// Simulated opponent for solo play.
pub mod bot;

/// Client configuration loaded from the environment.
pub mod config;
pub use config::{ClientConfig, ConfigError, ConfigOverrides};

/// Intent validation, routing and optimistic updates.
pub mod dispatch;
pub use dispatch::{ActionDispatcher, ActionOutcome, DispatchError, DispatchSettings};

/// Table model and phase rules.
pub mod game;
pub use game::{
    BettingAction, Card, GameState, GameStore, Intent, Phase, PlayMode, Player, Street,
    constants, map_phase,
};

/// Direct table-contract submission.
pub mod ledger;

/// Coordinator client.
pub mod net;
pub use net::{Coordinator, CoordinatorClient, messages};

/// Authoritative state polling and merge.
pub mod sync;
pub use sync::{PollOutcome, StateReconciler};
