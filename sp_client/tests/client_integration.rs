//! Integration tests for the table client.
//!
//! Drives typed commands through the dispatcher against a local axum
//! coordinator and checks what the client would print.

use axum::{
    Json, Router,
    extract::Path,
    http::{HeaderMap, StatusCode},
    routing::{get, post},
};
use serde_json::json;
use std::sync::Arc;
use tokio::net::TcpListener;

use sp_client::{
    commands::{Command, ParseError, parse_command},
    logging::log_action_outcome,
    view::{describe_outcome, render_open_tables, render_table},
};
use stellar_poker::{
    ActionDispatcher, ActionOutcome, BettingAction, CoordinatorClient, DispatchError,
    DispatchSettings, GameState, GameStore, LocalKeySigner, Phase, PlayMode,
    auth::{
        actions,
        authenticator::{HEADER_ADDRESS, HEADER_NONCE, HEADER_SIGNATURE, HEADER_TIMESTAMP},
        canonical_message, verify_message,
    },
    bot::OpponentModel,
    messages::CreateTableRequest,
};

type Rejection = (StatusCode, String);

/// Opponent that calls everything.
struct CallingStation;

impl OpponentModel for CallingStation {
    fn respond(&self, _state: &GameState, _opponent: &str) -> BettingAction {
        BettingAction::Call
    }
}

fn signed_by(headers: &HeaderMap, table_id: u32, action: &str) -> Result<String, Rejection> {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    let (Some(address), Some(signature), Some(nonce), Some(timestamp)) = (
        header(HEADER_ADDRESS),
        header(HEADER_SIGNATURE),
        header(HEADER_NONCE).and_then(|n| n.parse::<u64>().ok()),
        header(HEADER_TIMESTAMP).and_then(|t| t.parse::<i64>().ok()),
    ) else {
        return Err((StatusCode::UNAUTHORIZED, "signature required".to_string()));
    };

    let message = canonical_message(&address, table_id, action, nonce, timestamp);
    if !verify_message(&address, &message, &signature) {
        return Err((StatusCode::FORBIDDEN, "bad signature".to_string()));
    }
    Ok(address)
}

async fn spawn_coordinator() -> String {
    let router = Router::new()
        .route(
            "/api/tables/create",
            post(|headers: HeaderMap| async move {
                signed_by(&headers, 0, actions::CREATE_TABLE)?;
                Ok::<_, Rejection>(Json(
                    json!({"table_id": 5, "max_players": 2, "joined_wallets": 0}),
                ))
            }),
        )
        .route(
            "/api/tables/open",
            get(|| async {
                Json(json!({"tables": [{
                    "table_id": 5, "phase": "Waiting", "max_players": 2,
                    "joined_wallets": 1, "open_wallet_slots": 1
                }]}))
            }),
        )
        .route(
            "/api/table/{table_id}/request-deal",
            post(
                |Path(table_id): Path<u32>, headers: HeaderMap| async move {
                    signed_by(&headers, table_id, actions::REQUEST_DEAL)?;
                    Ok::<_, Rejection>(Json(json!({
                        "status": "dealt", "deck_root": "0xdeck",
                        "hand_commitments": ["0xa", "0xb"], "proof_size": 14592,
                        "session_id": "deal-5", "tx_hash": "deal-tx"
                    })))
                },
            ),
        )
        .route(
            "/api/table/{table_id}/player/{address}/cards",
            get(
                |Path((table_id, _address)): Path<(u32, String)>, headers: HeaderMap| async move {
                    signed_by(&headers, table_id, actions::GET_PLAYER_CARDS)?;
                    Ok::<_, Rejection>(Json(
                        json!({"card1": 12, "card2": 25, "salt1": "0x1", "salt2": "0x2"}),
                    ))
                },
            ),
        )
        .route(
            "/api/table/{table_id}/request-reveal/{street}",
            post(
                |Path((table_id, street)): Path<(u32, String)>, headers: HeaderMap| async move {
                    signed_by(&headers, table_id, &format!("request_reveal:{street}"))?;
                    let cards: Vec<u32> = match street.as_str() {
                        "flop" => vec![8, 21, 34],
                        "turn" => vec![47],
                        _ => vec![3],
                    };
                    Ok::<_, Rejection>(Json(json!({
                        "status": "revealed", "cards": cards, "proof_size": 2048,
                        "session_id": format!("reveal-{street}")
                    })))
                },
            ),
        )
        .route(
            "/api/table/{table_id}/request-showdown",
            post(
                |Path(table_id): Path<u32>, headers: HeaderMap| async move {
                    let winner = signed_by(&headers, table_id, actions::REQUEST_SHOWDOWN)?;
                    Ok::<_, Rejection>(Json(json!({
                        "status": "showdown_complete", "winner": winner, "winner_index": 0,
                        "proof_size": 4096, "session_id": "showdown-5",
                        "tx_hash": "showdown-tx"
                    })))
                },
            ),
        );

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

fn solo_dispatcher(base_url: String) -> ActionDispatcher {
    let coordinator = Arc::new(CoordinatorClient::new(base_url).unwrap());
    ActionDispatcher::new(
        coordinator,
        Arc::new(LocalKeySigner::from_seed([9; 32])),
        GameStore::new(GameState::new(0)),
        DispatchSettings::for_mode(PlayMode::Single),
    )
    .with_opponent(Arc::new(CallingStation))
}

async fn run_line(dispatcher: &ActionDispatcher, line: &str) -> Result<ActionOutcome, DispatchError> {
    let Ok(Command::Intent(intent)) = parse_command(line) else {
        panic!("'{line}' is not a table intent");
    };
    let table_id = dispatcher.store().read(|s| s.table_id).await;
    let result = dispatcher.dispatch(intent).await;
    log_action_outcome(table_id, line, result.as_ref());
    result
}

// ============================================================================
// Full Hand Tests
// ============================================================================

#[tokio::test]
async fn test_solo_hand_end_to_end() {
    let dispatcher = solo_dispatcher(spawn_coordinator().await);
    let local = dispatcher.local_address().to_string();

    let created = dispatcher
        .create_table(CreateTableRequest {
            solo: Some(true),
            ..CreateTableRequest::default()
        })
        .await
        .unwrap();
    assert_eq!(created.table_id, 5);

    let dealt = run_line(&dispatcher, "deal").await.unwrap();
    assert_eq!(
        describe_outcome(&dealt),
        "Hand #1 dealt (14592 byte proof). Your cards: A♣ A♦"
    );

    let flop = run_line(&dispatcher, "bet 100").await.unwrap();
    assert_eq!(
        describe_outcome(&flop),
        "You: bets 100, opponent: calls. flop: 10♣ 10♦ 10♥"
    );

    let state = dispatcher.store().snapshot().await;
    let view = render_table(&state, &local, PlayMode::Single);
    assert!(view.contains("Table 5 | hand #1 | flop | single mode (pending)"));
    assert!(view.contains("Pot: 200"));
    assert!(view.contains("[A♣ A♦]"));
    assert!(view.contains("reveal turn"));

    run_line(&dispatcher, "check").await.unwrap();
    run_line(&dispatcher, "check").await.unwrap();
    assert_eq!(dispatcher.store().read(|s| s.phase).await, Phase::River);

    let settled = run_line(&dispatcher, "check").await.unwrap();
    assert!(describe_outcome(&settled).ends_with(&format!(
        "Hand settled, winner {}",
        sp_client::view::short_address(&local)
    )));

    let state = dispatcher.store().snapshot().await;
    assert_eq!(state.board.len(), 5);
    assert_eq!(state.winner.as_deref(), Some(local.as_str()));
    assert!(render_table(&state, &local, PlayMode::Single).contains("Winner: you"));
}

#[tokio::test]
async fn test_rejected_intent_leaves_view_alone() {
    let dispatcher = solo_dispatcher(spawn_coordinator().await);

    let err = run_line(&dispatcher, "check").await.unwrap_err();
    assert!(err.is_precondition());
    assert_eq!(dispatcher.store().snapshot().await, GameState::new(0));
}

#[tokio::test]
async fn test_list_open_tables() {
    let dispatcher = solo_dispatcher(spawn_coordinator().await);

    let tables = dispatcher.open_tables().await.unwrap();
    assert_eq!(
        render_open_tables(&tables),
        "  table 5 - Waiting - 1/2 seated, 1 open"
    );
}

#[test]
fn test_incomplete_command_is_a_parse_error() {
    assert_eq!(parse_command("bet"), Err(ParseError::MissingAmount("bet")));
}

// ============================================================================
// Network Error Scenario Tests
// ============================================================================

#[tokio::test]
async fn test_connection_refused() {
    let dispatcher = solo_dispatcher("http://localhost:19999".to_string());

    let result = dispatcher.open_tables().await;

    assert!(
        matches!(result, Err(DispatchError::Net(_))),
        "Should fail when the coordinator is not available"
    );
}

#[tokio::test]
async fn test_failed_deal_is_reported_not_fatal() {
    let dispatcher = solo_dispatcher("http://localhost:19999".to_string());

    let err = run_line(&dispatcher, "deal").await.unwrap_err();
    assert!(!err.is_precondition());

    // Client is still usable afterwards.
    assert!(!dispatcher.in_flight().is_busy());
    let state = dispatcher.store().snapshot().await;
    assert_eq!(state.phase, Phase::Preflop);
    assert!(!state.confirmed);
}
