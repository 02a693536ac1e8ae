//! Defensive parsing of the contract's `TableState` JSON.
//!
//! Every field is optional. A field that is absent or has the wrong type
//! parses to `None` so the merge keeps the previous value. Contract `i128`
//! values may arrive as JSON numbers or as decimal strings.

use serde_json::Value;

use crate::game::entities::{Card, Chips};

/// Raw authoritative payload plus its best-effort parse.
#[derive(Clone, Debug, PartialEq)]
pub struct PollResult {
    pub raw: String,
    /// `None` when the payload is not a JSON object.
    pub parsed: Option<ParsedTableState>,
}

impl PollResult {
    pub fn from_raw(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let parsed = parse_table_state(&raw);
        Self { raw, parsed }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParsedTableState {
    /// On-chain phase name, unmapped.
    pub phase: Option<String>,
    pub pot: Option<Chips>,
    pub current_turn: Option<u32>,
    pub dealer_seat: Option<u32>,
    pub hand_number: Option<u32>,
    pub board: Option<Vec<Card>>,
    pub players: Option<Vec<ParsedPlayer>>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParsedPlayer {
    pub address: String,
    pub seat_index: Option<u32>,
    pub stack: Option<Chips>,
    pub bet_this_round: Option<Chips>,
    pub folded: Option<bool>,
    pub all_in: Option<bool>,
}

/// Parse the contract's table JSON. Returns `None` unless the payload is a
/// JSON object.
pub fn parse_table_state(raw: &str) -> Option<ParsedTableState> {
    let value: Value = serde_json::from_str(raw.trim()).ok()?;
    let object = value.as_object()?;

    Some(ParsedTableState {
        phase: object.get("phase").and_then(parse_variant_name),
        pot: object.get("pot").and_then(parse_i128_value),
        current_turn: object.get("current_turn").and_then(parse_u32_value),
        dealer_seat: object.get("dealer_seat").and_then(parse_u32_value),
        hand_number: object.get("hand_number").and_then(parse_u32_value),
        board: object.get("board_cards").and_then(parse_cards),
        players: object.get("players").and_then(parse_players),
    })
}

/// Unit enum variants serialise as `"Name"`, `["Name"]` or `{"Name": ..}`
/// depending on the tool that produced the JSON.
fn parse_variant_name(value: &Value) -> Option<String> {
    match value {
        Value::String(name) => Some(name.clone()),
        Value::Array(items) => items.first().and_then(Value::as_str).map(str::to_string),
        Value::Object(map) if map.len() == 1 => map.keys().next().cloned(),
        _ => None,
    }
}

pub fn parse_i128_value(value: &Value) -> Option<i128> {
    if let Some(v) = value.as_i64() {
        return Some(i128::from(v));
    }
    if let Some(v) = value.as_u64() {
        return Some(i128::from(v));
    }
    value.as_str().and_then(|s| s.trim().parse::<i128>().ok())
}

pub fn parse_u32_value(value: &Value) -> Option<u32> {
    if let Some(v) = value.as_u64() {
        return u32::try_from(v).ok();
    }
    value.as_str().and_then(|s| s.trim().parse::<u32>().ok())
}

/// All-or-nothing: one bad card makes the whole board unusable.
fn parse_cards(value: &Value) -> Option<Vec<Card>> {
    value
        .as_array()?
        .iter()
        .map(|v| parse_u32_value(v).map(Card).filter(|c| c.is_valid()))
        .collect()
}

/// Entries without an address are skipped; the rest keep whatever fields
/// parsed.
fn parse_players(value: &Value) -> Option<Vec<ParsedPlayer>> {
    let players = value
        .as_array()?
        .iter()
        .filter_map(|entry| {
            let object = entry.as_object()?;
            let address = object.get("address")?.as_str()?.to_string();
            Some(ParsedPlayer {
                address,
                seat_index: object.get("seat_index").and_then(parse_u32_value),
                stack: object.get("stack").and_then(parse_i128_value),
                bet_this_round: object.get("bet_this_round").and_then(parse_i128_value),
                folded: object.get("folded").and_then(Value::as_bool),
                all_in: object.get("all_in").and_then(Value::as_bool),
            })
        })
        .collect();
    Some(players)
}
