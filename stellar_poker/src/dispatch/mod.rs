//! User-intent dispatch: validation, routing and optimistic updates.
//!
//! Deal, reveal and showdown always go through the signed coordinator
//! protocol. Betting goes to the table contract in `headsup` and `multi`
//! (or the coordinator's signed `player-action` endpoint when no ledger is
//! configured) and to the simulated opponent in `single`.

pub mod betting;
pub mod dispatcher;
pub mod errors;
pub mod in_flight;
pub mod seating;

pub use dispatcher::{ActionDispatcher, ActionOutcome, DispatchSettings, SOLO_OPPONENT};
pub use errors::{DispatchError, DispatchResult};
pub use in_flight::{InFlight, InFlightGuard};
pub use seating::{SeatingError, resolve_winner, validate_start};
