//! Coordinator request and response bodies.

use serde::{Deserialize, Serialize};

use crate::game::entities::{BettingAction, Chips};

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct DealRequest {
    /// Seat addresses in order. Empty means "resolve from the lobby".
    pub players: Vec<String>,
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct DealResponse {
    pub status: String,
    pub deck_root: String,
    pub hand_commitments: Vec<String>,
    pub proof_size: usize,
    pub session_id: String,
    #[serde(default)]
    pub tx_hash: Option<String>,
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct RevealResponse {
    pub status: String,
    pub cards: Vec<u32>,
    pub proof_size: usize,
    pub session_id: String,
    #[serde(default)]
    pub tx_hash: Option<String>,
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct ShowdownResponse {
    /// `showdown_complete`, or `settled_timeout` when the hand was settled
    /// without a proof.
    pub status: String,
    pub winner: String,
    pub winner_index: u32,
    pub proof_size: usize,
    pub session_id: String,
    #[serde(default)]
    pub tx_hash: Option<String>,
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct PlayerActionRequest {
    pub action: String,
    pub amount: Option<Chips>,
}

impl From<BettingAction> for PlayerActionRequest {
    fn from(action: BettingAction) -> Self {
        Self {
            action: action.label().to_string(),
            amount: action.amount(),
        }
    }
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct PlayerActionResponse {
    pub status: String,
    pub action: String,
    #[serde(default)]
    pub amount: Option<Chips>,
    pub player: String,
    #[serde(default)]
    pub tx_hash: Option<String>,
}

/// On-chain table state, as an opaque JSON string.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct TableStateResponse {
    pub state: String,
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct PlayerCardsResponse {
    pub card1: u32,
    pub card2: u32,
    pub salt1: String,
    pub salt2: String,
}

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct CreateTableRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_players: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub solo: Option<bool>,
    /// Decimal string; amounts exceed JSON's safe integer range.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buy_in: Option<String>,
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct CreateTableResponse {
    pub table_id: u32,
    pub max_players: u32,
    pub joined_wallets: usize,
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct OpenTableInfo {
    pub table_id: u32,
    pub phase: String,
    pub max_players: u32,
    pub joined_wallets: usize,
    pub open_wallet_slots: usize,
}

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct OpenTablesResponse {
    pub tables: Vec<OpenTableInfo>,
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct JoinTableResponse {
    pub table_id: u32,
    pub seat_index: u32,
    pub seat_address: String,
    pub joined_wallets: usize,
    pub max_players: u32,
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct LobbySeat {
    pub seat_index: u32,
    /// Address the contract seated.
    pub chain_address: String,
    /// Wallet that joined through the coordinator, if known.
    #[serde(default)]
    pub wallet_address: Option<String>,
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct TableLobbyResponse {
    pub table_id: u32,
    pub phase: String,
    pub max_players: u32,
    pub seats: Vec<LobbySeat>,
    pub joined_wallets: usize,
}

impl TableLobbyResponse {
    /// Wallet address for a seat, falling back to the chain address.
    pub fn wallet_for_chain(&self, chain_address: &str) -> Option<&str> {
        self.seats
            .iter()
            .find(|seat| seat.chain_address == chain_address)
            .map(|seat| {
                seat.wallet_address
                    .as_deref()
                    .unwrap_or(seat.chain_address.as_str())
            })
    }

    pub fn wallet_for_seat(&self, seat_index: u32) -> Option<&str> {
        self.seats
            .iter()
            .find(|seat| seat.seat_index == seat_index)
            .map(|seat| {
                seat.wallet_address
                    .as_deref()
                    .unwrap_or(seat.chain_address.as_str())
            })
    }

    /// Wallet addresses of every joined seat, in seat order.
    pub fn joined_wallets(&self) -> Vec<String> {
        let mut seats: Vec<&LobbySeat> = self.seats.iter().collect();
        seats.sort_by_key(|seat| seat.seat_index);
        seats
            .into_iter()
            .map(|seat| {
                seat.wallet_address
                    .clone()
                    .unwrap_or_else(|| seat.chain_address.clone())
            })
            .collect()
    }
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct ChainConfigResponse {
    pub rpc_url: String,
    pub network_passphrase: String,
    pub poker_table_contract: String,
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct CommitteeStatusResponse {
    pub nodes: usize,
    pub healthy: Vec<bool>,
    pub status: String,
}
