//! Reconciliation of the canonical snapshot with polled authoritative state.
//!
//! This module provides:
//! - Defensive parsing of the contract's table JSON
//! - A field-by-field, non-destructive merge
//! - The fixed-interval polling loop

pub mod merge;
pub mod parsing;
pub mod reconciler;

pub use merge::{MergeReport, merge_poll};
pub use parsing::{ParsedPlayer, ParsedTableState, PollResult, parse_table_state};
pub use reconciler::{PollOutcome, StateReconciler};
