//! Simulated opponent difficulty presets.

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Difficulty preset for the solo-mode opponent
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OpponentDifficulty {
    Easy,
    #[default]
    Standard,
    Tag,
}

impl fmt::Display for OpponentDifficulty {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let repr = match self {
            Self::Easy => "easy",
            Self::Standard => "standard",
            Self::Tag => "tag",
        };
        write!(f, "{repr}")
    }
}

impl FromStr for OpponentDifficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Self::Easy),
            "standard" => Ok(Self::Standard),
            "tag" => Ok(Self::Tag),
            other => Err(format!("unknown difficulty '{other}'")),
        }
    }
}

/// Opponent difficulty parameters
#[derive(Clone, Debug, PartialEq)]
pub struct DifficultyParams {
    /// VPIP (Voluntarily Put $ In Pot) percentage
    pub vpip: f32,

    /// Aggression factor (ratio of bets/raises to calls)
    pub aggression_factor: f32,

    /// Whether the opponent calls down with air
    pub bluffs: bool,

    /// Bluff frequency (0.0 to 1.0)
    pub bluff_frequency: f32,
}

impl DifficultyParams {
    /// Loose-passive: calls a lot, never bluffs
    pub fn easy() -> Self {
        Self {
            vpip: 0.45,             // Plays 45% of hands
            aggression_factor: 0.5, // Passive
            bluffs: false,
            bluff_frequency: 0.0,
        }
    }

    /// Balanced TAG (Tight-Aggressive) style
    pub fn standard() -> Self {
        Self {
            vpip: 0.30,
            aggression_factor: 1.5,
            bluffs: true,
            bluff_frequency: 0.15,
        }
    }

    /// Very tight, very sticky once involved
    pub fn tag() -> Self {
        Self {
            vpip: 0.20,
            aggression_factor: 2.5,
            bluffs: true,
            bluff_frequency: 0.25,
        }
    }

    pub fn from_difficulty(difficulty: OpponentDifficulty) -> Self {
        match difficulty {
            OpponentDifficulty::Easy => Self::easy(),
            OpponentDifficulty::Standard => Self::standard(),
            OpponentDifficulty::Tag => Self::tag(),
        }
    }
}
