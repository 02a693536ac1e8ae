/// Integration tests for state reconciliation
///
/// These tests poll an in-memory coordinator and check how authoritative
/// table state is merged into the shared snapshot, plus property tests for
/// the phase mapper and the merge itself.
mod common;

use proptest::prelude::*;
use std::{sync::Arc, time::Duration};
use tokio::sync::watch;

use common::MockCoordinator;
use stellar_poker::{
    Card, GameState, GameStore, Phase, PlayMode, Player, PollOutcome, StateReconciler,
    game::{OnChainPhase, PhaseMapping, map_phase},
    sync::{ParsedPlayer, ParsedTableState, merge_poll},
};

fn reconciler(
    coordinator: &Arc<MockCoordinator>,
    state: GameState,
    mode: PlayMode,
) -> (StateReconciler, GameStore) {
    let store = GameStore::new(state);
    let reconciler = StateReconciler::new(coordinator.clone(), store.clone(), mode);
    (reconciler, store)
}

fn flop_state() -> GameState {
    let mut state = GameState::new(1);
    state.set_phase(Phase::Flop);
    state.board = vec![Card(0), Card(13), Card(26)];
    state.hand_number = 2;
    state.players = vec![Player::new("GLOCAL", 0, 900), Player::new("GOTHER", 1, 900)];
    state
}

// ============================================================================
// Poll Cycle Tests
// ============================================================================

#[tokio::test]
async fn test_dealing_turn_keeps_flop() {
    let coordinator = Arc::new(MockCoordinator::default());
    coordinator.set_table_state(r#"{"phase":"DealingTurn","board_cards":[0,13,26],"pot":"200"}"#);
    let (reconciler, store) = reconciler(&coordinator, flop_state(), PlayMode::Headsup);

    let outcome = reconciler.poll_once().await;

    let PollOutcome::Merged(report) = outcome else {
        panic!("expected a merge, got {outcome:?}");
    };
    assert_eq!(report.unmapped_phase, None);

    let state = store.snapshot().await;
    assert_eq!(state.phase, Phase::Flop);
    assert_eq!(state.board, vec![Card(0), Card(13), Card(26)]);
    assert_eq!(state.pot, 200);
    assert!(state.confirmed);
}

#[tokio::test]
async fn test_malformed_payload_changes_nothing() {
    let coordinator = Arc::new(MockCoordinator::default());
    coordinator.set_table_state("table state unavailable: {phase: Flop");
    let mut state = flop_state();
    state.mark_unconfirmed();
    let (reconciler, store) = reconciler(&coordinator, state.clone(), PlayMode::Headsup);

    assert_eq!(reconciler.poll_once().await, PollOutcome::Unparsed);
    assert_eq!(store.snapshot().await, state);
}

#[tokio::test]
async fn test_fetch_failure_changes_nothing() {
    let coordinator = Arc::new(MockCoordinator::default());
    let (reconciler, store) = reconciler(&coordinator, flop_state(), PlayMode::Headsup);

    assert!(matches!(
        reconciler.poll_once().await,
        PollOutcome::FetchFailed(_)
    ));
    assert_eq!(store.snapshot().await, flop_state());
}

#[tokio::test]
async fn test_dispute_phase_is_reported_and_kept() {
    let coordinator = Arc::new(MockCoordinator::default());
    coordinator.set_table_state(r#"{"phase":["Dispute"],"current_turn":1}"#);
    let (reconciler, store) = reconciler(&coordinator, flop_state(), PlayMode::Headsup);

    let PollOutcome::Merged(report) = reconciler.poll_once().await else {
        panic!("expected a merge");
    };
    assert_eq!(report.unmapped_phase.as_deref(), Some("Dispute"));

    let state = store.snapshot().await;
    assert_eq!(state.phase, Phase::Flop);
    assert_eq!(state.current_turn, 1);
}

#[tokio::test]
async fn test_public_poll_keeps_private_cards() {
    let coordinator = Arc::new(MockCoordinator::default());
    coordinator.set_table_state(
        r#"{
            "phase": "Turn",
            "hand_number": 2,
            "board_cards": [0, 13, 26, 39],
            "players": [
                {"address": "GLOCAL", "seat_index": 0, "stack": "850", "bet_this_round": 50,
                 "folded": false, "all_in": false},
                {"address": "GOTHER", "seat_index": 1, "stack": 850, "bet_this_round": "50",
                 "folded": false, "all_in": false},
                {"address": "GTHIRD", "seat_index": 2, "stack": 1000}
            ]
        }"#,
    );
    let mut state = flop_state();
    state.players[0].hole_cards = Some((Card(12), Card(25)));
    let (reconciler, store) = reconciler(&coordinator, state, PlayMode::Multi);

    let PollOutcome::Merged(report) = reconciler.poll_once().await else {
        panic!("expected a merge");
    };
    assert_eq!(report.players_added, 1);

    let state = store.snapshot().await;
    assert_eq!(state.phase, Phase::Turn);
    assert_eq!(state.board.len(), 4);
    let local = state.player("GLOCAL").unwrap();
    assert_eq!(local.stack, 850);
    assert_eq!(local.bet_this_round, 50);
    assert_eq!(local.hole_cards, Some((Card(12), Card(25))));
    assert_eq!(state.player("GTHIRD").unwrap().hole_cards, None);
}

#[tokio::test]
async fn test_run_polls_until_shutdown() {
    let coordinator = Arc::new(MockCoordinator::default());
    coordinator.set_table_state(r#"{"phase":"Preflop","hand_number":"3","pot":"150"}"#);
    let (reconciler, store) = reconciler(&coordinator, GameState::new(1), PlayMode::Headsup);
    let reconciler = reconciler.with_interval(Duration::from_millis(10));

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let handle = tokio::spawn(reconciler.run(shutdown_rx));

    tokio::time::sleep(Duration::from_millis(60)).await;
    shutdown_tx.send(true).unwrap();
    tokio::time::timeout(Duration::from_secs(1), handle)
        .await
        .expect("reconciler did not stop")
        .unwrap();

    assert!(coordinator.calls_to("state").len() >= 2);
    let state = store.snapshot().await;
    assert_eq!(state.phase, Phase::Preflop);
    assert_eq!(state.hand_number, 3);
    assert_eq!(state.pot, 150);
}

// ============================================================================
// Property Tests
// ============================================================================

const CHAIN_PHASES: [&str; 12] = [
    "Waiting",
    "Dealing",
    "Preflop",
    "DealingFlop",
    "Flop",
    "DealingTurn",
    "Turn",
    "DealingRiver",
    "River",
    "Showdown",
    "Settlement",
    "Dispute",
];

fn phase_strategy() -> impl Strategy<Value = Phase> {
    prop::sample::select(Phase::ALL.to_vec())
}

fn parsed_player_strategy() -> impl Strategy<Value = ParsedPlayer> {
    (
        0usize..4,
        prop::option::of(0u32..6),
        prop::option::of(-10i128..5_000),
        prop::option::of(-10i128..500),
        prop::option::of(any::<bool>()),
    )
        .prop_map(|(id, seat_index, stack, bet_this_round, folded)| ParsedPlayer {
            address: format!("GPLAYER{id}"),
            seat_index,
            stack,
            bet_this_round,
            folded,
            all_in: None,
        })
}

fn parsed_state_strategy() -> impl Strategy<Value = ParsedTableState> {
    (
        prop::option::of(prop::sample::select(CHAIN_PHASES.to_vec())),
        prop::option::of(-100i128..10_000),
        prop::option::of(0u32..6),
        prop::option::of(0u32..20),
        prop::option::of(prop::collection::vec((0u32..52).prop_map(Card), 0..=6)),
        prop::option::of(prop::collection::vec(parsed_player_strategy(), 0..4)),
    )
        .prop_map(|(phase, pot, current_turn, hand_number, board, players)| {
            // Duplicate addresses are not something the contract emits.
            let players = players.map(|mut players| {
                players.sort_by(|a, b| a.address.cmp(&b.address));
                players.dedup_by(|a, b| a.address == b.address);
                players
            });
            ParsedTableState {
                phase: phase.map(str::to_string),
                pot,
                current_turn,
                dealer_seat: current_turn,
                hand_number,
                board,
                players,
            }
        })
}

fn base_state(phase: Phase) -> GameState {
    let mut state = GameState::new(1);
    state.set_phase(phase);
    state.extend_board((0..5).map(Card));
    state.hand_number = 4;
    state.players = vec![Player::new("GPLAYER0", 0, 1_000)];
    state.players[0].hole_cards = Some((Card(1), Card(2)));
    state
}

proptest! {
    #[test]
    fn prop_client_phases_round_trip_through_chain_names(phase in phase_strategy()) {
        let chain = OnChainPhase::from(phase).to_string();
        prop_assert_eq!(map_phase(&chain), PhaseMapping::Mapped(phase));
    }

    #[test]
    fn prop_unknown_names_keep_previous_phase(name in "[a-z_]{1,16}", previous in phase_strategy()) {
        prop_assert_eq!(map_phase(&name).or_keep(previous), previous);
    }

    #[test]
    fn prop_mapping_is_stable(index in 0usize..CHAIN_PHASES.len()) {
        let raw = CHAIN_PHASES[index];
        prop_assert_eq!(map_phase(raw), map_phase(raw));
        if let PhaseMapping::Mapped(phase) = map_phase(raw) {
            let again = OnChainPhase::from(phase).to_string();
            prop_assert_eq!(map_phase(&again), PhaseMapping::Mapped(phase));
        }
    }

    #[test]
    fn prop_merge_is_idempotent(
        parsed in parsed_state_strategy(),
        phase in phase_strategy(),
        solo in any::<bool>(),
    ) {
        let mode = if solo { PlayMode::Single } else { PlayMode::Multi };
        let mut state = base_state(phase);

        merge_poll(&mut state, &parsed, mode);
        let once = state.clone();
        merge_poll(&mut state, &parsed, mode);

        prop_assert_eq!(state, once);
    }

    #[test]
    fn prop_board_fits_phase_after_merge(
        parsed in parsed_state_strategy(),
        phase in phase_strategy(),
        solo in any::<bool>(),
    ) {
        let mode = if solo { PlayMode::Single } else { PlayMode::Headsup };
        let mut state = base_state(phase);
        let hand_before = state.hand_number;

        merge_poll(&mut state, &parsed, mode);

        prop_assert!(state.board.len() <= state.phase.board_capacity());
        prop_assert!(state.hand_number >= hand_before);
        prop_assert!(state.pot >= 0);
        prop_assert!(state.confirmed);
    }
}
