//! Core table entities: phases, cards, players and the canonical game snapshot.

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use super::constants::{DECK_SIZE, MAX_BOARD_CARDS, MAX_PLAYERS, MULTI_MIN_PLAYERS};

/// Player identity. Stellar account strkeys (`G...`) for seated wallets.
pub type Address = String;

/// Chip amounts in stroops. Contract amounts are `i128`.
pub type Chips = i128;

/// Client-side view of where the hand currently is.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    #[default]
    Waiting,
    Dealing,
    Preflop,
    Flop,
    Turn,
    River,
    Showdown,
    Settlement,
}

impl Phase {
    pub const ALL: [Phase; 8] = [
        Phase::Waiting,
        Phase::Dealing,
        Phase::Preflop,
        Phase::Flop,
        Phase::Turn,
        Phase::River,
        Phase::Showdown,
        Phase::Settlement,
    ];

    /// Maximum number of board cards that may be visible in this phase.
    pub fn board_capacity(self) -> usize {
        match self {
            Self::Waiting | Self::Dealing | Self::Preflop => 0,
            Self::Flop => 3,
            Self::Turn => 4,
            Self::River | Self::Showdown | Self::Settlement => MAX_BOARD_CARDS,
        }
    }

    /// Whether betting actions can be taken in this phase.
    pub fn is_betting_round(self) -> bool {
        matches!(self, Self::Preflop | Self::Flop | Self::Turn | Self::River)
    }

    /// Whether a new hand may be started from this phase.
    pub fn is_hand_boundary(self) -> bool {
        matches!(self, Self::Waiting | Self::Settlement)
    }

    /// The street that closes this betting round, if any.
    pub fn next_street(self) -> Option<Street> {
        match self {
            Self::Preflop => Some(Street::Flop),
            Self::Flop => Some(Street::Turn),
            Self::Turn => Some(Street::River),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Waiting => "waiting",
            Self::Dealing => "dealing",
            Self::Preflop => "preflop",
            Self::Flop => "flop",
            Self::Turn => "turn",
            Self::River => "river",
            Self::Showdown => "showdown",
            Self::Settlement => "settlement",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A community-card reveal step.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Street {
    Flop,
    Turn,
    River,
}

impl Street {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Flop => "flop",
            Self::Turn => "turn",
            Self::River => "river",
        }
    }

    /// Phase the table is in once this street has been revealed.
    pub fn phase(self) -> Phase {
        match self {
            Self::Flop => Phase::Flop,
            Self::Turn => Phase::Turn,
            Self::River => Phase::River,
        }
    }

    /// Phase in which this street may be requested.
    pub fn requested_from(self) -> Phase {
        match self {
            Self::Flop => Phase::Preflop,
            Self::Turn => Phase::Flop,
            Self::River => Phase::Turn,
        }
    }
}

impl fmt::Display for Street {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Street {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "flop" => Ok(Self::Flop),
            "turn" => Ok(Self::Turn),
            "river" => Ok(Self::River),
            other => Err(format!("unknown street '{other}'")),
        }
    }
}

/// Seating and authority ruleset, fixed for a table session.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayMode {
    /// Local identity against a simulated opponent; betting never leaves the process.
    #[default]
    Single,
    /// Exactly two joined identities; betting goes on-chain.
    Headsup,
    /// Three to six joined identities; betting goes on-chain.
    Multi,
}

impl PlayMode {
    /// Inclusive bounds on the number of joined identities required to deal.
    pub fn seat_bounds(self) -> (usize, usize) {
        match self {
            Self::Single => (1, 1),
            Self::Headsup => (2, 2),
            Self::Multi => (MULTI_MIN_PLAYERS, MAX_PLAYERS),
        }
    }

    pub fn is_solo(self) -> bool {
        self == Self::Single
    }
}

impl fmt::Display for PlayMode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let repr = match self {
            Self::Single => "single",
            Self::Headsup => "headsup",
            Self::Multi => "multi",
        };
        write!(f, "{repr}")
    }
}

impl FromStr for PlayMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "single" | "solo" => Ok(Self::Single),
            "headsup" | "heads-up" => Ok(Self::Headsup),
            "multi" => Ok(Self::Multi),
            other => Err(format!("unknown play mode '{other}'")),
        }
    }
}

/// A card encoded as `suit * 13 + rank`.
///
/// Suits are ordered clubs, diamonds, hearts, spades; rank 0 is a deuce and
/// rank 12 is an ace.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct Card(pub u32);

impl Card {
    pub fn is_valid(self) -> bool {
        self.0 < DECK_SIZE
    }

    /// Rank in `0..13`, deuce first.
    pub fn rank(self) -> u32 {
        self.0 % 13
    }

    /// Suit in `0..4`.
    pub fn suit(self) -> u32 {
        self.0 / 13
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if !self.is_valid() {
            return write!(f, "??");
        }
        let rank = match self.rank() {
            8 => "10".to_string(),
            9 => "J".to_string(),
            10 => "Q".to_string(),
            11 => "K".to_string(),
            12 => "A".to_string(),
            r => (r + 2).to_string(),
        };
        let suit = match self.suit() {
            0 => "♣",
            1 => "♦",
            2 => "♥",
            _ => "♠",
        };
        write!(f, "{rank}{suit}")
    }
}

/// A betting decision by a seated player.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum BettingAction {
    Fold,
    Check,
    Call,
    Bet(Chips),
    Raise(Chips),
    AllIn,
}

impl BettingAction {
    /// Wire label used in action names and request bodies.
    pub fn label(self) -> &'static str {
        match self {
            Self::Fold => "fold",
            Self::Check => "check",
            Self::Call => "call",
            Self::Bet(_) => "bet",
            Self::Raise(_) => "raise",
            Self::AllIn => "allin",
        }
    }

    pub fn amount(self) -> Option<Chips> {
        match self {
            Self::Bet(amount) | Self::Raise(amount) => Some(amount),
            _ => None,
        }
    }
}

impl fmt::Display for BettingAction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Fold => write!(f, "folds"),
            Self::Check => write!(f, "checks"),
            Self::Call => write!(f, "calls"),
            Self::Bet(amount) => write!(f, "bets {amount}"),
            Self::Raise(amount) => write!(f, "raises by {amount}"),
            Self::AllIn => write!(f, "goes all-in"),
        }
    }
}

/// A seated player as the client currently understands it.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Player {
    pub address: Address,
    pub seat_index: u32,
    pub stack: Chips,
    pub bet_this_round: Chips,
    pub folded: bool,
    pub all_in: bool,
    /// Private hole cards. Only ever populated for the local identity.
    pub hole_cards: Option<(Card, Card)>,
}

impl Player {
    pub fn new(address: impl Into<Address>, seat_index: u32, stack: Chips) -> Self {
        Self {
            address: address.into(),
            seat_index,
            stack,
            bet_this_round: 0,
            folded: false,
            all_in: false,
            hole_cards: None,
        }
    }

    /// Whether the player can still act in the current hand.
    pub fn is_active(&self) -> bool {
        !self.folded && !self.all_in
    }

    /// Move up to `amount` chips from the stack into the current round.
    /// Returns the amount actually committed.
    pub fn commit(&mut self, amount: Chips) -> Chips {
        let committed = amount.clamp(0, self.stack);
        self.stack -= committed;
        self.bet_this_round += committed;
        if self.stack == 0 && committed > 0 {
            self.all_in = true;
        }
        committed
    }
}

/// Canonical client snapshot of a table.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct GameState {
    pub table_id: u32,
    pub phase: Phase,
    pub players: Vec<Player>,
    pub pot: Chips,
    pub board: Vec<Card>,
    pub current_turn: u32,
    pub dealer_seat: u32,
    pub hand_number: u32,
    pub last_tx_hash: Option<String>,
    pub last_proof_size: Option<usize>,
    /// Whether the most recent mutating action has been observed in
    /// authoritative state.
    pub confirmed: bool,
    pub winner: Option<Address>,
}

impl GameState {
    pub fn new(table_id: u32) -> Self {
        Self {
            table_id,
            confirmed: true,
            ..Self::default()
        }
    }

    pub fn player(&self, address: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.address == address)
    }

    pub fn player_mut(&mut self, address: &str) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.address == address)
    }

    pub fn player_at_seat(&self, seat_index: u32) -> Option<&Player> {
        self.players.iter().find(|p| p.seat_index == seat_index)
    }

    /// Players that have not folded.
    pub fn live_players(&self) -> impl Iterator<Item = &Player> {
        self.players.iter().filter(|p| !p.folded)
    }

    /// Move the table to `phase`, dropping any board cards the new phase
    /// cannot hold.
    pub fn set_phase(&mut self, phase: Phase) {
        self.phase = phase;
        self.board.truncate(phase.board_capacity());
    }

    /// Append revealed cards, never exceeding the phase's board capacity.
    /// Returns the number of cards accepted.
    pub fn extend_board(&mut self, cards: impl IntoIterator<Item = Card>) -> usize {
        let capacity = self.phase.board_capacity();
        let before = self.board.len();
        for card in cards {
            if self.board.len() >= capacity {
                break;
            }
            self.board.push(card);
        }
        self.board.len() - before
    }

    /// Clear per-round bets at the start of a new street.
    pub fn reset_round_bets(&mut self) {
        for player in &mut self.players {
            player.bet_this_round = 0;
        }
    }

    /// Largest bet any player has committed this round.
    pub fn highest_bet(&self) -> Chips {
        self.players
            .iter()
            .map(|p| p.bet_this_round)
            .max()
            .unwrap_or(0)
    }

    /// Record a freshly-applied local mutation.
    pub fn mark_unconfirmed(&mut self) {
        self.confirmed = false;
    }
}
