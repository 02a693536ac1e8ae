//! Seat preconditions for dealing and winner resolution at showdown.

use std::collections::HashSet;
use thiserror::Error;

use crate::{
    auth::is_valid_address,
    game::entities::{Address, GameState, PlayMode},
    net::messages::TableLobbyResponse,
};

/// Seating checks that fail before any network call.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum SeatingError {
    /// Wrong number of identities for the play mode
    #[error("{mode} mode needs {min}-{max} players, got {got}")]
    SeatCount {
        mode: PlayMode,
        min: usize,
        max: usize,
        got: usize,
    },

    /// Same address listed twice
    #[error("Duplicate player address: {0}")]
    Duplicate(Address),

    /// Local identity listed as its own opponent
    #[error("Your own address cannot be an opponent")]
    SelfAsOpponent,

    /// Address is not a Stellar account strkey
    #[error("Invalid Stellar address: {0}")]
    InvalidAddress(String),

    /// Local identity has not taken a seat at the table
    #[error("You have not joined this table")]
    NotJoined,
}

/// Check a deal request: `local` plus `opponents` must fit the mode's seat
/// bounds, be well-formed and distinct. Returns the full seat list, local
/// first.
pub fn validate_start(
    mode: PlayMode,
    local: &str,
    opponents: &[Address],
) -> Result<Vec<Address>, SeatingError> {
    let (min, max) = mode.seat_bounds();
    let got = opponents.len() + 1;
    if got < min || got > max {
        return Err(SeatingError::SeatCount {
            mode,
            min,
            max,
            got,
        });
    }

    let mut seen = HashSet::with_capacity(got);
    seen.insert(local);
    for opponent in opponents {
        let opponent = opponent.trim();
        if opponent == local {
            return Err(SeatingError::SelfAsOpponent);
        }
        if !is_valid_address(opponent) {
            return Err(SeatingError::InvalidAddress(opponent.to_string()));
        }
        if !seen.insert(opponent) {
            return Err(SeatingError::Duplicate(opponent.to_string()));
        }
    }

    let mut seats = Vec::with_capacity(got);
    seats.push(local.to_string());
    seats.extend(opponents.iter().map(|o| o.trim().to_string()));
    Ok(seats)
}

/// Opponents of `local` taken from the lobby's joined wallets.
pub fn opponents_from_lobby(
    lobby: &TableLobbyResponse,
    local: &str,
) -> Result<Vec<Address>, SeatingError> {
    let wallets = lobby.joined_wallets();
    if !wallets.iter().any(|w| w == local) {
        return Err(SeatingError::NotJoined);
    }
    Ok(wallets.into_iter().filter(|w| w != local).collect())
}

/// Map a showdown winner onto a known identity.
///
/// Tries the reported address directly, then the lobby's chain-to-wallet
/// table, then the seat index. A lobby mapping only counts when it names a
/// seated player. Falls back to the lobby wallet for the seat, then the
/// reported address.
pub fn resolve_winner(
    state: &GameState,
    lobby: Option<&TableLobbyResponse>,
    winner: &str,
    winner_index: u32,
) -> Address {
    if state.player(winner).is_some() {
        return winner.to_string();
    }

    if let Some(wallet) = lobby
        .and_then(|l| l.wallet_for_chain(winner))
        .filter(|wallet| state.player(wallet).is_some())
    {
        return wallet.to_string();
    }

    if let Some(player) = state.player_at_seat(winner_index) {
        return player.address.clone();
    }

    lobby
        .and_then(|l| l.wallet_for_seat(winner_index))
        .unwrap_or(winner)
        .to_string()
}
