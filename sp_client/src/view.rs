//! Plain-text rendering of the table snapshot and action outcomes.

use stellar_poker::{
    ActionOutcome, GameState, PlayMode,
    game::state_machine::available_intents,
    messages::{OpenTablesResponse, TableLobbyResponse},
};

/// Render the table as seen by `local`.
pub fn render_table(state: &GameState, local: &str, mode: PlayMode) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "Table {} | hand #{} | {} | {} mode{}\n",
        state.table_id,
        state.hand_number,
        state.phase,
        mode,
        if state.confirmed { "" } else { " (pending)" }
    ));

    let board = if state.board.is_empty() {
        "-".to_string()
    } else {
        state
            .board
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" ")
    };
    out.push_str(&format!("Board: {}   Pot: {}\n", board, state.pot));

    for player in &state.players {
        let marker = if player.seat_index == state.current_turn && state.phase.is_betting_round() {
            ">"
        } else {
            " "
        };
        let who = if player.address == local {
            "you".to_string()
        } else {
            short_address(&player.address)
        };
        let mut flags = Vec::new();
        if player.seat_index == state.dealer_seat {
            flags.push("D");
        }
        if player.folded {
            flags.push("folded");
        }
        if player.all_in {
            flags.push("all-in");
        }
        let cards = match player.hole_cards {
            Some((a, b)) => format!(" [{a} {b}]"),
            None => String::new(),
        };
        out.push_str(&format!(
            "{} seat {} {:<12} stack {:>12} bet {:>10}{} {}\n",
            marker,
            player.seat_index,
            who,
            player.stack,
            player.bet_this_round,
            cards,
            flags.join(",")
        ));
    }

    if let Some(winner) = &state.winner {
        let who = if winner == local {
            "you".to_string()
        } else {
            short_address(winner)
        };
        out.push_str(&format!("Winner: {}\n", who));
    }

    if let Some(hash) = &state.last_tx_hash {
        out.push_str(&format!("Last tx: {}\n", hash));
    }

    let options = available_intents(state, mode);
    if !options.is_empty() {
        out.push_str(&format!("Options: {}\n", options.join(", ")));
    }

    out
}

/// One-line summary of a completed action.
pub fn describe_outcome(outcome: &ActionOutcome) -> String {
    match outcome {
        ActionOutcome::Dealt {
            hand_number,
            proof_size,
            hole_cards,
            ..
        } => match hole_cards {
            Some((a, b)) => format!(
                "Hand #{} dealt ({} byte proof). Your cards: {} {}",
                hand_number, proof_size, a, b
            ),
            None => format!("Hand #{} dealt ({} byte proof)", hand_number, proof_size),
        },
        ActionOutcome::Revealed { street, cards } => {
            let cards: Vec<String> = cards.iter().map(ToString::to_string).collect();
            format!("{}: {}", street, cards.join(" "))
        }
        ActionOutcome::Settled { winner } => format!("Hand settled, winner {}", short_address(winner)),
        ActionOutcome::Acted { action, tx_hash } => match tx_hash {
            Some(hash) => format!("You: {} (tx {})", action, hash),
            None => format!("You: {}", action),
        },
        ActionOutcome::Resolved {
            action,
            reply,
            follow_up,
        } => {
            let mut line = format!("You: {}", action);
            if let Some(reply) = reply {
                line.push_str(&format!(", opponent: {}", reply));
            }
            if let Some(next) = follow_up {
                line.push_str(&format!(". {}", describe_outcome(next)));
            }
            line
        }
        ActionOutcome::Joined {
            seat_index,
            joined_wallets,
            max_players,
        } => format!(
            "Joined seat {} ({}/{} seated)",
            seat_index, joined_wallets, max_players
        ),
    }
}

pub fn render_open_tables(tables: &OpenTablesResponse) -> String {
    if tables.tables.is_empty() {
        return "No open tables".to_string();
    }
    tables
        .tables
        .iter()
        .map(|t| {
            format!(
                "  table {} - {} - {}/{} seated, {} open",
                t.table_id, t.phase, t.joined_wallets, t.max_players, t.open_wallet_slots
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_lobby(lobby: &TableLobbyResponse) -> String {
    let mut out = format!(
        "Table {} ({}) {}/{} seated\n",
        lobby.table_id, lobby.phase, lobby.joined_wallets, lobby.max_players
    );
    for seat in &lobby.seats {
        out.push_str(&format!(
            "  seat {} {}\n",
            seat.seat_index,
            seat.wallet_address.as_deref().unwrap_or(&seat.chain_address)
        ));
    }
    out
}

/// `GABCD…WXYZ` for long strkeys.
pub fn short_address(address: &str) -> String {
    if address.len() <= 12 || !address.is_ascii() {
        return address.to_string();
    }
    format!("{}…{}", &address[..5], &address[address.len() - 4..])
}
