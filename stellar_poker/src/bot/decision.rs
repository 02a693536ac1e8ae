//! Solo-mode opponent decisions.
//!
//! The opponent never sees its own hole cards (the committee dealt them and
//! they stay private until showdown), so hand strength is a per-decision
//! draw shaped by the difficulty preset. It only folds, checks or calls:
//! betting rounds close on its reply.

use super::models::{DifficultyParams, OpponentDifficulty};
use crate::game::entities::{BettingAction, Chips, GameState};
use rand::Rng;

/// Decides the non-human player's reply in `single` mode.
pub trait OpponentModel: Send + Sync {
    /// Reply of `opponent` to the state after the local action was applied.
    fn respond(&self, state: &GameState, opponent: &str) -> BettingAction;
}

/// Thresholds for the simulated opponent.
///
/// All threshold values are hand strength floats in range [0.0, 1.0].
/// Higher threshold = more conservative (tighter play).
#[derive(Debug, Clone)]
pub struct OpponentConfig {
    /// Hand strength below this = fold (Easy).
    pub easy_fold_threshold: f32,

    /// Hand strength above this = always continue (Easy).
    pub easy_continue_threshold: f32,

    /// Hand strength below this = fold (Standard).
    pub standard_fold_threshold: f32,

    /// Hand strength above this = always continue (Standard).
    pub standard_continue_threshold: f32,

    /// Hand strength below this = fold (TAG).
    pub tag_fold_threshold: f32,

    /// Hand strength above this = always continue (TAG).
    pub tag_continue_threshold: f32,

    /// Pot odds above which calling gets a bonus.
    ///
    /// **Range**: 0.2-0.4 (typical: 0.25)
    pub pot_odds_bonus_threshold: f32,

    /// Bonus added to call probability when pot odds are good.
    pub pot_odds_bonus_value: f32,

    /// Base probability of calling with medium-strength hands.
    pub base_call_probability: f32,

    /// call_prob = base + (aggression / divisor)
    pub call_aggression_divisor: f32,
}

impl Default for OpponentConfig {
    fn default() -> Self {
        Self {
            easy_fold_threshold: 0.08,
            easy_continue_threshold: 0.20,
            standard_fold_threshold: 0.12,
            standard_continue_threshold: 0.28,
            tag_fold_threshold: 0.18,
            tag_continue_threshold: 0.33,
            pot_odds_bonus_threshold: 0.25,
            pot_odds_bonus_value: 0.2,
            base_call_probability: 0.3,
            call_aggression_divisor: 5.0,
        }
    }
}

/// Inputs to a single decision.
#[derive(Debug, Clone, Copy)]
pub struct DecisionContext {
    pub pot: Chips,
    pub to_call: Chips,
    pub stack: Chips,
}

impl DecisionContext {
    /// Derive the context for `opponent` from the table snapshot.
    pub fn from_state(state: &GameState, opponent: &str) -> Option<Self> {
        let player = state.player(opponent)?;
        Some(Self {
            pot: state.pot,
            to_call: (state.highest_bet() - player.bet_this_round).max(0),
            stack: player.stack,
        })
    }
}

/// Default [`OpponentModel`] driven by difficulty presets.
#[derive(Debug, Clone)]
pub struct SimulatedOpponent {
    params: DifficultyParams,
    config: OpponentConfig,
}

impl SimulatedOpponent {
    pub fn new(difficulty: OpponentDifficulty) -> Self {
        Self {
            params: DifficultyParams::from_difficulty(difficulty),
            config: OpponentConfig::default(),
        }
    }

    pub fn with_config(difficulty: OpponentDifficulty, config: OpponentConfig) -> Self {
        Self {
            params: DifficultyParams::from_difficulty(difficulty),
            config,
        }
    }

    /// Deterministic core: `strength` and `roll` are both in [0.0, 1.0).
    pub fn decide(&self, ctx: DecisionContext, strength: f32, roll: f32) -> BettingAction {
        // Nothing to call, or already all-in
        if ctx.to_call <= 0 || ctx.stack <= 0 {
            return BettingAction::Check;
        }

        let (fold_threshold, continue_threshold) = match self.params.vpip {
            v if v > 0.40 => (
                self.config.easy_fold_threshold,
                self.config.easy_continue_threshold,
            ),
            v if v > 0.25 => (
                self.config.standard_fold_threshold,
                self.config.standard_continue_threshold,
            ),
            _ => (
                self.config.tag_fold_threshold,
                self.config.tag_continue_threshold,
            ),
        };

        if strength < fold_threshold {
            // Occasionally float with air
            if self.params.bluffs && roll < self.params.bluff_frequency {
                return BettingAction::Call;
            }
            return BettingAction::Fold;
        }

        if strength >= continue_threshold {
            return BettingAction::Call;
        }

        let pot_odds_bonus = if pot_odds(ctx.pot, ctx.to_call) > self.config.pot_odds_bonus_threshold
        {
            self.config.pot_odds_bonus_value
        } else {
            0.0
        };
        let call_probability = self.config.base_call_probability
            + (self.params.aggression_factor / self.config.call_aggression_divisor)
            + pot_odds_bonus;

        if roll < call_probability.min(1.0) {
            BettingAction::Call
        } else {
            BettingAction::Fold
        }
    }
}

impl OpponentModel for SimulatedOpponent {
    fn respond(&self, state: &GameState, opponent: &str) -> BettingAction {
        let Some(ctx) = DecisionContext::from_state(state, opponent) else {
            log::warn!("Opponent {} is not seated; checking", opponent);
            return BettingAction::Check;
        };
        let mut rng = rand::rng();
        let strength = rng.random_range(0.0..1.0);
        let roll = rng.random_range(0.0..1.0);
        self.decide(ctx, strength, roll)
    }
}

/// Pot odds as pot / (pot + call).
fn pot_odds(pot: Chips, to_call: Chips) -> f32 {
    if to_call <= 0 {
        return 1.0;
    }
    let total = pot + to_call;
    if total <= 0 {
        return 0.0;
    }
    pot as f32 / total as f32
}
