use stellar_poker::{
    BettingAction, Intent, Street,
    game::{Address, Chips},
};
use std::fmt;

/// A line of user input, parsed.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Command {
    /// Table intent routed through the dispatcher.
    Intent(Intent),
    /// Create a table and switch to it.
    Create { max_players: Option<u32> },
    /// Switch to another table.
    Table(u32),
    /// List open tables.
    Tables,
    /// Show the current table's lobby.
    Lobby,
    /// Show the proving committee status.
    Committee,
    /// Show the coordinator's ledger configuration.
    Chain,
    /// Print the current table view.
    Show,
    Help,
    Quit,
}

/// Errors that can occur during command parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Bet or raise without an amount.
    MissingAmount(&'static str),
    /// Amount is not a positive whole number.
    InvalidAmount(String),
    /// Reveal of something other than flop, turn or river.
    InvalidStreet(String),
    /// Table id is not a number.
    InvalidTableId(String),
    /// Unrecognized command.
    UnrecognizedCommand(String),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingAmount(action) => {
                write!(f, "'{}' requires an amount (e.g., '{} 100')", action, action)
            }
            Self::InvalidAmount(value) => write!(
                f,
                "Invalid amount '{}'. Must be a positive number (e.g., 'bet 100')",
                value
            ),
            Self::InvalidStreet(value) => write!(
                f,
                "Cannot reveal '{}'. Use 'reveal flop', 'reveal turn' or 'reveal river'",
                value
            ),
            Self::InvalidTableId(value) => {
                write!(f, "Invalid table id '{}' (e.g., 'table 3')", value)
            }
            Self::UnrecognizedCommand(cmd) => write!(
                f,
                "Unrecognized command '{}'. Type 'help' to see available commands",
                cmd
            ),
        }
    }
}

impl std::error::Error for ParseError {}

/// Parse a command string into a [`Command`].
///
/// # Examples
///
/// ```
/// use sp_client::commands::{Command, parse_command};
/// use stellar_poker::{BettingAction, Intent, Street};
///
/// assert_eq!(parse_command("call"), Ok(Command::Intent(Intent::Bet(BettingAction::Call))));
/// assert_eq!(
///     parse_command("raise 100"),
///     Ok(Command::Intent(Intent::Bet(BettingAction::Raise(100))))
/// );
/// assert_eq!(parse_command("flop"), Ok(Command::Intent(Intent::Reveal(Street::Flop))));
/// ```
pub fn parse_command(input: &str) -> Result<Command, ParseError> {
    let trimmed = input.trim();

    // Try single-word commands first
    match trimmed.to_ascii_lowercase().as_str() {
        "fold" => return Ok(bet(BettingAction::Fold)),
        "check" => return Ok(bet(BettingAction::Check)),
        "call" => return Ok(bet(BettingAction::Call)),
        "allin" | "all-in" => return Ok(bet(BettingAction::AllIn)),
        "flop" => return Ok(Command::Intent(Intent::Reveal(Street::Flop))),
        "turn" => return Ok(Command::Intent(Intent::Reveal(Street::Turn))),
        "river" => return Ok(Command::Intent(Intent::Reveal(Street::River))),
        "showdown" => return Ok(Command::Intent(Intent::Showdown)),
        "tables" => return Ok(Command::Tables),
        "lobby" => return Ok(Command::Lobby),
        "committee" => return Ok(Command::Committee),
        "chain" => return Ok(Command::Chain),
        "show" | "state" => return Ok(Command::Show),
        "help" | "?" => return Ok(Command::Help),
        "quit" | "exit" => return Ok(Command::Quit),
        _ => {}
    }

    // Parse multi-word commands
    let parts: Vec<&str> = trimmed.split_ascii_whitespace().collect();
    let keyword = parts.first().map(|p| p.to_ascii_lowercase());
    match keyword.as_deref() {
        Some("start" | "deal") => Ok(parse_start_command(&parts)),
        Some("join") => parse_join_command(&parts),
        Some("bet") => parse_amount(&parts, "bet").map(|a| bet(BettingAction::Bet(a))),
        Some("raise") => parse_amount(&parts, "raise").map(|a| bet(BettingAction::Raise(a))),
        Some("reveal") => parse_reveal_command(&parts),
        Some("table") => parse_table_command(&parts),
        Some("create") => parse_create_command(&parts),
        _ => Err(ParseError::UnrecognizedCommand(trimmed.to_string())),
    }
}

fn bet(action: BettingAction) -> Command {
    Command::Intent(Intent::Bet(action))
}

/// Parse a start command: "start [OPPONENT...]"
fn parse_start_command(parts: &[&str]) -> Command {
    let players: Vec<Address> = parts[1..].iter().map(|p| p.to_string()).collect();
    Command::Intent(Intent::Start { players })
}

/// Parse a join command: "join [BUY_IN]"
fn parse_join_command(parts: &[&str]) -> Result<Command, ParseError> {
    let buy_in = match parts.get(1) {
        Some(value) => Some(parse_positive(value)?),
        None => None,
    };
    Ok(Command::Intent(Intent::Join { buy_in }))
}

/// Parse "bet AMOUNT" / "raise AMOUNT"
fn parse_amount(parts: &[&str], action: &'static str) -> Result<Chips, ParseError> {
    match parts.get(1) {
        Some(value) => parse_positive(value),
        None => Err(ParseError::MissingAmount(action)),
    }
}

/// Parse a reveal command: "reveal flop|turn|river"
fn parse_reveal_command(parts: &[&str]) -> Result<Command, ParseError> {
    let value = parts.get(1).copied().unwrap_or_default();
    value
        .parse::<Street>()
        .map(|street| Command::Intent(Intent::Reveal(street)))
        .map_err(|_| ParseError::InvalidStreet(value.to_string()))
}

/// Parse a table switch: "table ID"
fn parse_table_command(parts: &[&str]) -> Result<Command, ParseError> {
    let value = parts.get(1).copied().unwrap_or_default();
    value
        .parse::<u32>()
        .map(Command::Table)
        .map_err(|_| ParseError::InvalidTableId(value.to_string()))
}

/// Parse a create command: "create [MAX_PLAYERS]"
fn parse_create_command(parts: &[&str]) -> Result<Command, ParseError> {
    let max_players = match parts.get(1) {
        Some(value) => Some(
            value
                .parse::<u32>()
                .map_err(|_| ParseError::InvalidAmount(value.to_string()))?,
        ),
        None => None,
    };
    Ok(Command::Create { max_players })
}

fn parse_positive(value: &str) -> Result<Chips, ParseError> {
    value
        .parse::<Chips>()
        .ok()
        .filter(|amount| *amount > 0)
        .ok_or_else(|| ParseError::InvalidAmount(value.to_string()))
}

/// One-line usage for each command, for the `help` output.
pub const USAGE: &str = "\
  start [OPPONENT...]   deal a new hand (headsup/multi resolve seats from the lobby if none given)
  join [BUY_IN]         take a seat at the current table
  fold | check | call | allin
  bet AMOUNT | raise AMOUNT
  reveal flop|turn|river  (or just: flop, turn, river)
  showdown              request the showdown proof
  create [MAX_PLAYERS]  create a table and switch to it
  table ID              switch to another table
  tables | lobby | committee | chain
  show                  print the table
  quit";
