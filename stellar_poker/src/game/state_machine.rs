//! Which user intents are legal in which phase, per play mode.
//!
//! ```text
//! waiting -> dealing -> preflop -> flop -> turn -> river -> showdown -> settlement
//!    ^                                                                     |
//!    +---------------------------------- start ----------------------------+
//! ```
//!
//! `start` jumps straight to `preflop` optimistically; `dealing` is only ever
//! observed through the reconciler.

use std::fmt;
use thiserror::Error;

use super::entities::{Address, BettingAction, GameState, Phase, PlayMode, Street};

/// A user intent, before any validation.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Intent {
    /// Deal a new hand. `players` may be empty to let the coordinator
    /// resolve seats from the lobby.
    Start { players: Vec<Address> },
    /// Take a seat at the table.
    Join { buy_in: Option<i128> },
    Bet(BettingAction),
    Reveal(Street),
    Showdown,
}

impl Intent {
    pub fn label(&self) -> String {
        match self {
            Self::Start { .. } => "start".to_string(),
            Self::Join { .. } => "join".to_string(),
            Self::Bet(action) => action.label().to_string(),
            Self::Reveal(street) => format!("reveal {street}"),
            Self::Showdown => "showdown".to_string(),
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Reasons an intent is rejected before reaching the network.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum IntentError {
    /// Intent not legal in the current phase
    #[error("'{intent}' is not allowed during {phase}")]
    WrongPhase { intent: String, phase: Phase },

    /// Intent not available in this play mode
    #[error("'{intent}' is not available in {mode} mode")]
    WrongMode { intent: String, mode: PlayMode },

    /// Local identity is not seated
    #[error("You are not seated at this table")]
    NotSeated,

    /// Local identity already folded this hand
    #[error("You have already folded this hand")]
    AlreadyFolded,

    /// Another seat is on turn
    #[error("Not your turn (seat {current_turn} to act)")]
    NotYourTurn { current_turn: u32 },

    /// Bet or raise without a positive amount
    #[error("{action} requires a positive amount")]
    InvalidAmount { action: &'static str },
}

/// Validate `intent` against the current snapshot for the `local` identity.
///
/// In `single` mode betting is not gated by the turn index: the simulated
/// opponent answers synchronously, so the local seat is always next to act.
pub fn check_intent(
    state: &GameState,
    mode: PlayMode,
    local: &str,
    intent: &Intent,
) -> Result<(), IntentError> {
    let wrong_phase = || IntentError::WrongPhase {
        intent: intent.label(),
        phase: state.phase,
    };

    match intent {
        Intent::Start { .. } => {
            if !state.phase.is_hand_boundary() {
                return Err(wrong_phase());
            }
        }

        Intent::Join { buy_in } => {
            if buy_in.is_some_and(|amount| amount <= 0) {
                return Err(IntentError::InvalidAmount { action: "join" });
            }
            if mode.is_solo() {
                return Err(IntentError::WrongMode {
                    intent: intent.label(),
                    mode,
                });
            }
            if !state.phase.is_hand_boundary() {
                return Err(wrong_phase());
            }
        }

        Intent::Bet(action) => {
            if !state.phase.is_betting_round() {
                return Err(wrong_phase());
            }
            if action.amount().is_some_and(|amount| amount <= 0) {
                return Err(IntentError::InvalidAmount {
                    action: action.label(),
                });
            }
            let player = state.player(local).ok_or(IntentError::NotSeated)?;
            if player.folded {
                return Err(IntentError::AlreadyFolded);
            }
            if !mode.is_solo() && player.seat_index != state.current_turn {
                return Err(IntentError::NotYourTurn {
                    current_turn: state.current_turn,
                });
            }
        }

        Intent::Reveal(street) => {
            if state.phase != street.requested_from() {
                return Err(wrong_phase());
            }
        }

        Intent::Showdown => {
            if !matches!(state.phase, Phase::River | Phase::Showdown) {
                return Err(wrong_phase());
            }
        }
    }

    Ok(())
}

/// Intents that make sense to offer in the current phase, for help output.
pub fn available_intents(state: &GameState, mode: PlayMode) -> Vec<&'static str> {
    let mut intents = Vec::new();
    match state.phase {
        Phase::Waiting | Phase::Settlement => {
            intents.push("start");
            if !mode.is_solo() {
                intents.push("join");
            }
        }
        Phase::Dealing => {}
        Phase::Preflop | Phase::Flop | Phase::Turn | Phase::River => {
            intents.extend(["fold", "check", "call", "bet", "raise", "allin"]);
            match state.phase.next_street() {
                Some(Street::Flop) => intents.push("reveal flop"),
                Some(Street::Turn) => intents.push("reveal turn"),
                Some(Street::River) => intents.push("reveal river"),
                None => intents.push("showdown"),
            }
        }
        Phase::Showdown => intents.push("showdown"),
    }
    intents
}
