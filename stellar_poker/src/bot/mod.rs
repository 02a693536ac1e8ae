//! Simulated opponent for `single` mode.
//!
//! ## Difficulty Presets
//!
//! ### Easy (Loose-Passive)
//! - VPIP: 45% (continues with many hands)
//! - Never floats with air
//!
//! ### Standard (Balanced TAG)
//! - VPIP: 30%
//! - Floats 15% of the time
//!
//! ### TAG (Tight-Aggressive)
//! - VPIP: 20%
//! - Floats 25% of the time

pub mod decision;
pub mod models;

pub use decision::{OpponentConfig, OpponentModel, SimulatedOpponent};
pub use models::{DifficultyParams, OpponentDifficulty};
