//! Field-by-field merge of polled state into the canonical snapshot.

use super::parsing::{ParsedPlayer, ParsedTableState};
use crate::game::{
    entities::{GameState, Phase, PlayMode, Player},
    phase::{PhaseMapping, map_phase},
};

/// What a merge changed, for logging.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct MergeReport {
    /// On-chain phase name that had no client mapping.
    pub unmapped_phase: Option<String>,
    /// Board from the poll did not fit the merged phase.
    pub board_rejected: bool,
    /// Polled hand number was ahead; stale private cards were dropped.
    pub new_hand: bool,
    pub players_added: usize,
    pub players_removed: usize,
}

/// Merge `parsed` into `state`.
///
/// A present, well-typed field replaces the canonical value; anything else
/// keeps it. The phase goes through the phase mapper first. `hand_number`
/// never decreases and a negative pot is ignored. Players are matched by
/// address and keep their private cards.
///
/// In `single` mode chips and turn order are simulated locally, so only the
/// hand progression (phase, board, counters) is taken from the poll, and a
/// locally settled hand is left alone.
pub fn merge_poll(state: &mut GameState, parsed: &ParsedTableState, mode: PlayMode) -> MergeReport {
    let mut report = MergeReport::default();
    let solo = mode.is_solo();
    let locally_settled = solo && state.phase == Phase::Settlement;

    if let Some(raw) = parsed.phase.as_deref().filter(|_| !locally_settled) {
        match map_phase(raw) {
            PhaseMapping::Mapped(phase) => state.phase = phase,
            PhaseMapping::Unmapped => report.unmapped_phase = Some(raw.to_string()),
        }
    }

    if let Some(hand_number) = parsed.hand_number.filter(|n| *n > state.hand_number) {
        state.hand_number = hand_number;
        report.new_hand = true;
        for player in &mut state.players {
            player.hole_cards = None;
        }
    }

    if let Some(dealer_seat) = parsed.dealer_seat {
        state.dealer_seat = dealer_seat;
    }

    if !solo {
        if let Some(pot) = parsed.pot.filter(|pot| *pot >= 0) {
            state.pot = pot;
        }
        if let Some(current_turn) = parsed.current_turn {
            state.current_turn = current_turn;
        }
        if let Some(players) = parsed.players.as_deref().filter(|p| !p.is_empty()) {
            merge_players(state, players, &mut report);
        }
    }

    if let Some(board) = parsed.board.as_ref().filter(|_| !locally_settled) {
        if board.len() <= state.phase.board_capacity() {
            state.board = board.clone();
        } else {
            report.board_rejected = true;
        }
    }

    // Phase may have moved back without a usable board.
    state.set_phase(state.phase);
    state.confirmed = true;

    report
}

/// The polled list defines who is seated. Known players are updated in
/// place, new addresses are added from public fields only.
fn merge_players(state: &mut GameState, polled: &[ParsedPlayer], report: &mut MergeReport) {
    let mut previous = std::mem::take(&mut state.players);
    let mut merged = Vec::with_capacity(polled.len());

    for (position, incoming) in polled.iter().enumerate() {
        let existing = previous
            .iter()
            .position(|p| p.address == incoming.address)
            .map(|idx| previous.swap_remove(idx));

        let mut player = existing.unwrap_or_else(|| {
            report.players_added += 1;
            let seat = incoming
                .seat_index
                .unwrap_or_else(|| u32::try_from(position).unwrap_or(u32::MAX));
            Player::new(incoming.address.clone(), seat, 0)
        });

        if let Some(seat_index) = incoming.seat_index {
            player.seat_index = seat_index;
        }
        if let Some(stack) = incoming.stack.filter(|s| *s >= 0) {
            player.stack = stack;
        }
        if let Some(bet) = incoming.bet_this_round.filter(|b| *b >= 0) {
            player.bet_this_round = bet;
        }
        if let Some(folded) = incoming.folded {
            player.folded = folded;
        }
        if let Some(all_in) = incoming.all_in {
            player.all_in = all_in;
        }

        merged.push(player);
    }

    report.players_removed = previous.len();
    merged.sort_by_key(|p| p.seat_index);
    state.players = merged;
}
