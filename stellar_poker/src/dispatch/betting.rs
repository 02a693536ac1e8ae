//! Local chip movement for betting actions and hand settlement.
//!
//! Mirrors the table contract's accounting: `bet` puts the amount in,
//! `raise` calls and then adds the amount on top, `call` and `allin` are
//! capped by the stack.

use crate::game::entities::{BettingAction, Chips, GameState, Phase};

/// Apply `action` by `address` to the snapshot. Returns chips moved into the
/// pot; unknown addresses move nothing.
pub fn apply_action(state: &mut GameState, address: &str, action: BettingAction) -> Chips {
    let highest = state.highest_bet();
    let Some(player) = state.player_mut(address) else {
        return 0;
    };
    let to_call = (highest - player.bet_this_round).max(0);

    let committed = match action {
        BettingAction::Fold => {
            player.folded = true;
            0
        }
        BettingAction::Check => 0,
        BettingAction::Call => player.commit(to_call),
        BettingAction::Bet(amount) => player.commit(amount),
        BettingAction::Raise(amount) => player.commit(to_call + amount),
        BettingAction::AllIn => player.commit(player.stack),
    };

    state.pot += committed;
    committed
}

/// Close the hand for `winner`: the pot moves to their stack and the table
/// goes to settlement. An unseated winner leaves the pot in place.
pub fn settle(state: &mut GameState, winner: &str) {
    let pot = state.pot;
    if let Some(player) = state.player_mut(winner) {
        player.stack += pot;
        state.pot = 0;
    } else {
        // Pot stays on the table until a poll settles it.
        log::warn!("Winner {} is not seated; pot of {} left unpaid", winner, pot);
    }
    state.reset_round_bets();
    state.set_phase(Phase::Settlement);
    state.winner = Some(winner.to_string());
}

/// Whether every live player has matched the highest bet or is all-in.
pub fn round_closed(state: &GameState) -> bool {
    let highest = state.highest_bet();
    state
        .live_players()
        .all(|p| p.all_in || p.bet_this_round == highest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::entities::Player;

    fn heads_up() -> GameState {
        let mut state = GameState::new(1);
        state.phase = Phase::Flop;
        state.players = vec![Player::new("HERO", 0, 1_000), Player::new("BOT", 1, 300)];
        state
    }

    #[test]
    fn test_bet_and_call() {
        let mut state = heads_up();
        assert_eq!(apply_action(&mut state, "HERO", BettingAction::Bet(100)), 100);
        assert!(!round_closed(&state));
        assert_eq!(apply_action(&mut state, "BOT", BettingAction::Call), 100);
        assert_eq!(state.pot, 200);
        assert!(round_closed(&state));
    }

    #[test]
    fn test_raise_adds_on_top_of_call() {
        let mut state = heads_up();
        apply_action(&mut state, "HERO", BettingAction::Bet(50));
        assert_eq!(apply_action(&mut state, "BOT", BettingAction::Raise(100)), 150);
        assert_eq!(state.player("BOT").unwrap().bet_this_round, 150);
    }

    #[test]
    fn test_call_capped_by_stack_goes_all_in() {
        let mut state = heads_up();
        apply_action(&mut state, "HERO", BettingAction::Bet(500));
        assert_eq!(apply_action(&mut state, "BOT", BettingAction::Call), 300);
        let bot = state.player("BOT").unwrap();
        assert!(bot.all_in);
        assert_eq!(bot.stack, 0);
        assert!(round_closed(&state));
    }

    #[test]
    fn test_fold_and_settle() {
        let mut state = heads_up();
        state.board = vec![
            crate::game::entities::Card(1),
            crate::game::entities::Card(2),
            crate::game::entities::Card(3),
        ];
        apply_action(&mut state, "HERO", BettingAction::Bet(100));
        apply_action(&mut state, "BOT", BettingAction::Fold);
        settle(&mut state, "HERO");

        assert_eq!(state.phase, Phase::Settlement);
        assert_eq!(state.pot, 0);
        assert_eq!(state.player("HERO").unwrap().stack, 1_000);
        assert_eq!(state.winner.as_deref(), Some("HERO"));
        assert_eq!(state.board.len(), 3);
    }

    #[test]
    fn test_settle_to_unseated_winner_keeps_pot() {
        let mut state = heads_up();
        apply_action(&mut state, "HERO", BettingAction::Bet(100));
        apply_action(&mut state, "BOT", BettingAction::Call);
        settle(&mut state, "GCHAIN_UNKNOWN");

        assert_eq!(state.phase, Phase::Settlement);
        assert_eq!(state.pot, 200);
        let stacks: i128 = state.players.iter().map(|p| p.stack).sum();
        assert_eq!(stacks + state.pot, 1_300);
    }

    #[test]
    fn test_unknown_player_moves_nothing() {
        let mut state = heads_up();
        assert_eq!(apply_action(&mut state, "NOBODY", BettingAction::AllIn), 0);
        assert_eq!(state.pot, 0);
    }
}
