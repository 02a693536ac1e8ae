//! Table model: phases, entities, the intent state machine and the shared store.
//!
//! This module provides:
//! - The client phase model and its board-capacity rules
//! - The on-chain phase mapper
//! - Phase- and mode-aware intent validation
//! - The shared game store

pub mod constants;
pub mod entities;
pub mod phase;
pub mod state_machine;
pub mod store;

pub use entities::{
    Address, BettingAction, Card, Chips, GameState, Phase, PlayMode, Player, Street,
};
pub use phase::{OnChainPhase, PhaseMapping, map_phase};
pub use state_machine::{Intent, IntentError, check_intent};
pub use store::GameStore;
