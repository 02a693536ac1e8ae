//! Mapping from the table contract's phase vocabulary onto client phases.
//!
//! The contract distinguishes transitional `Dealing*` phases that the client
//! folds into the round that is still closing: while the committee is
//! producing the flop the client is still in `preflop`, and so on.

use std::fmt;

use super::entities::Phase;

/// Phases as emitted by the table contract.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum OnChainPhase {
    Waiting,
    Dealing,
    Preflop,
    DealingFlop,
    Flop,
    DealingTurn,
    Turn,
    DealingRiver,
    River,
    Showdown,
    Settlement,
    /// Hand frozen pending a dispute resolution.
    Dispute,
    /// Anything this client does not know about.
    Unknown(String),
}

/// Outcome of mapping an on-chain phase.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PhaseMapping {
    Mapped(Phase),
    /// No information; the caller keeps its previous phase.
    Unmapped,
}

impl PhaseMapping {
    pub fn phase(self) -> Option<Phase> {
        match self {
            Self::Mapped(phase) => Some(phase),
            Self::Unmapped => None,
        }
    }

    /// Resolve against the phase the caller already holds.
    pub fn or_keep(self, previous: Phase) -> Phase {
        self.phase().unwrap_or(previous)
    }
}

impl OnChainPhase {
    /// Parse the contract's variant name. Never fails: unrecognised names
    /// become [`OnChainPhase::Unknown`].
    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            "Waiting" => Self::Waiting,
            "Dealing" => Self::Dealing,
            "Preflop" => Self::Preflop,
            "DealingFlop" => Self::DealingFlop,
            "Flop" => Self::Flop,
            "DealingTurn" => Self::DealingTurn,
            "Turn" => Self::Turn,
            "DealingRiver" => Self::DealingRiver,
            "River" => Self::River,
            "Showdown" => Self::Showdown,
            "Settlement" => Self::Settlement,
            "Dispute" => Self::Dispute,
            other => Self::Unknown(other.to_string()),
        }
    }

    /// Total mapping onto the client's phase model.
    pub fn to_client(&self) -> PhaseMapping {
        let phase = match self {
            Self::Waiting => Phase::Waiting,
            Self::Dealing => Phase::Dealing,
            Self::Preflop | Self::DealingFlop => Phase::Preflop,
            Self::Flop | Self::DealingTurn => Phase::Flop,
            Self::Turn | Self::DealingRiver => Phase::Turn,
            Self::River => Phase::River,
            Self::Showdown => Phase::Showdown,
            Self::Settlement => Phase::Settlement,
            Self::Dispute | Self::Unknown(_) => return PhaseMapping::Unmapped,
        };
        PhaseMapping::Mapped(phase)
    }
}

/// Each client phase has a same-named on-chain phase.
impl From<Phase> for OnChainPhase {
    fn from(phase: Phase) -> Self {
        match phase {
            Phase::Waiting => Self::Waiting,
            Phase::Dealing => Self::Dealing,
            Phase::Preflop => Self::Preflop,
            Phase::Flop => Self::Flop,
            Phase::Turn => Self::Turn,
            Phase::River => Self::River,
            Phase::Showdown => Self::Showdown,
            Phase::Settlement => Self::Settlement,
        }
    }
}

impl fmt::Display for OnChainPhase {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let repr = match self {
            Self::Waiting => "Waiting",
            Self::Dealing => "Dealing",
            Self::Preflop => "Preflop",
            Self::DealingFlop => "DealingFlop",
            Self::Flop => "Flop",
            Self::DealingTurn => "DealingTurn",
            Self::Turn => "Turn",
            Self::DealingRiver => "DealingRiver",
            Self::River => "River",
            Self::Showdown => "Showdown",
            Self::Settlement => "Settlement",
            Self::Dispute => "Dispute",
            Self::Unknown(raw) => raw,
        };
        write!(f, "{repr}")
    }
}

/// Map a raw on-chain phase name onto a client phase.
pub fn map_phase(raw: &str) -> PhaseMapping {
    OnChainPhase::parse(raw).to_client()
}
