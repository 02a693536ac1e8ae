//! Table-wide constants shared by the client components.

/// Domain separator that prefixes every signed request message.
pub const AUTH_DOMAIN: &str = "stellar-poker";

/// Maximum number of seats the table contract supports.
pub const MAX_PLAYERS: usize = 6;

/// Minimum seat count for a `multi` session.
pub const MULTI_MIN_PLAYERS: usize = 3;

/// Cards in a standard deck. Card values are `0..DECK_SIZE`.
pub const DECK_SIZE: u32 = 52;

/// Board cards once the river is out.
pub const MAX_BOARD_CARDS: usize = 5;

/// Default polling cadence of the reconciler.
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 4;

/// Default buy-in in stroops (100 XLM).
pub const DEFAULT_BUY_IN: i128 = 1_000_000_000;

/// Ledger confirmation polling attempts before giving up.
pub const DEFAULT_CONFIRM_ATTEMPTS: u32 = 30;

/// Delay between ledger confirmation polls.
pub const DEFAULT_CONFIRM_DELAY_MS: u64 = 1000;
