//! Turns user intents into authenticated actions and optimistic updates.

use std::{future::Future, sync::Arc};

use super::{
    betting::{apply_action, round_closed, settle},
    errors::{DispatchError, DispatchResult},
    in_flight::InFlight,
    seating::{SeatingError, opponents_from_lobby, resolve_winner, validate_start},
};
use crate::{
    auth::{AuthHeaders, RequestAuthenticator, WalletSigner, actions},
    bot::{OpponentDifficulty, OpponentModel, SimulatedOpponent},
    game::{
        constants::DEFAULT_BUY_IN,
        entities::{Address, BettingAction, Card, Chips, GameState, Phase, PlayMode, Player, Street},
        state_machine::{Intent, check_intent},
        store::GameStore,
    },
    ledger::{ContractInvocation, LedgerSubmitter},
    net::{
        Coordinator, NetResult,
        messages::{
            ChainConfigResponse, CommitteeStatusResponse, CreateTableRequest, CreateTableResponse,
            DealRequest, OpenTablesResponse, PlayerActionRequest, TableLobbyResponse,
        },
    },
};

/// Address of the fabricated solo opponent when the table has none.
pub const SOLO_OPPONENT: &str = "simulated-opponent";

/// Static per-session dispatch settings.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DispatchSettings {
    pub mode: PlayMode,
    /// Try identity-only requests first, signing only after a 401/403.
    pub allow_insecure_dev_auth: bool,
    /// Stack seeded for each explicit seat when a hand starts.
    pub buy_in: Chips,
    /// Stack fabricated for solo seats.
    pub solo_stack: Chips,
}

impl DispatchSettings {
    pub fn for_mode(mode: PlayMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }
}

impl Default for DispatchSettings {
    fn default() -> Self {
        Self {
            mode: PlayMode::default(),
            allow_insecure_dev_auth: false,
            buy_in: DEFAULT_BUY_IN,
            solo_stack: DEFAULT_BUY_IN,
        }
    }
}

/// What a completed intent did.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ActionOutcome {
    Dealt {
        hand_number: u32,
        proof_size: usize,
        tx_hash: Option<String>,
        hole_cards: Option<(Card, Card)>,
    },
    Revealed {
        street: Street,
        cards: Vec<Card>,
    },
    Settled {
        winner: Address,
    },
    /// Betting action accepted on-chain or by the coordinator.
    Acted {
        action: BettingAction,
        tx_hash: Option<String>,
    },
    /// Solo betting round resolved against the simulated opponent.
    Resolved {
        action: BettingAction,
        reply: Option<BettingAction>,
        follow_up: Option<Box<ActionOutcome>>,
    },
    Joined {
        seat_index: u32,
        joined_wallets: usize,
        max_players: u32,
    },
}

/// Where a solo betting step left the hand.
enum SoloStep {
    Settled {
        reply: Option<BettingAction>,
        winner: Address,
    },
    Continue {
        reply: BettingAction,
        advance: bool,
        next_street: Option<Street>,
    },
}

/// Phase-aware state machine over the shared [`GameStore`].
///
/// Validates every intent against the current snapshot before any network
/// traffic, routes it through the signed coordinator protocol, the ledger or
/// the simulated opponent, and applies the optimistic update. Optimistic
/// changes stay `confirmed = false` until the reconciler's next merge.
pub struct ActionDispatcher {
    coordinator: Arc<dyn Coordinator>,
    authenticator: RequestAuthenticator,
    signer: Arc<dyn WalletSigner>,
    store: GameStore,
    settings: DispatchSettings,
    ledger: Option<LedgerSubmitter>,
    opponent: Arc<dyn OpponentModel>,
    in_flight: InFlight,
}

impl ActionDispatcher {
    pub fn new(
        coordinator: Arc<dyn Coordinator>,
        signer: Arc<dyn WalletSigner>,
        store: GameStore,
        settings: DispatchSettings,
    ) -> Self {
        Self {
            coordinator,
            authenticator: RequestAuthenticator::new(),
            signer,
            store,
            settings,
            ledger: None,
            opponent: Arc::new(SimulatedOpponent::new(OpponentDifficulty::default())),
            in_flight: InFlight::new(),
        }
    }

    /// Submit headsup/multi betting and joins straight to the contract.
    pub fn with_ledger(mut self, ledger: LedgerSubmitter) -> Self {
        self.ledger = Some(ledger);
        self
    }

    pub fn with_opponent(mut self, opponent: Arc<dyn OpponentModel>) -> Self {
        self.opponent = opponent;
        self
    }

    pub fn store(&self) -> &GameStore {
        &self.store
    }

    pub fn settings(&self) -> &DispatchSettings {
        &self.settings
    }

    pub fn local_address(&self) -> &str {
        self.signer.address()
    }

    pub fn authenticator(&self) -> &RequestAuthenticator {
        &self.authenticator
    }

    pub fn in_flight(&self) -> &InFlight {
        &self.in_flight
    }

    /// Validate and run one user intent.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::Busy`] while another intent is running, a
    /// precondition error if the intent is illegal right now, or the failure
    /// of the first network step that did not succeed.
    pub async fn dispatch(&self, intent: Intent) -> DispatchResult<ActionOutcome> {
        let _guard = self.in_flight.try_acquire().ok_or(DispatchError::Busy)?;

        let snapshot = self.store.snapshot().await;
        check_intent(&snapshot, self.settings.mode, self.local_address(), &intent)?;

        let label = intent.label();
        let table_id = snapshot.table_id;
        let result = match intent {
            Intent::Start { players } => self.start(table_id, players).await,
            Intent::Join { buy_in } => self.join(table_id, buy_in).await,
            Intent::Bet(action) if self.settings.mode.is_solo() => {
                self.bet_solo(table_id, action).await
            }
            Intent::Bet(action) => self.bet_on_chain(table_id, action).await,
            Intent::Reveal(street) => self.reveal(table_id, street).await,
            Intent::Showdown => self.showdown(table_id).await,
        };

        match &result {
            Ok(_) => log::info!("Table {}: '{}' completed", table_id, label),
            Err(e) => log::warn!("Table {}: '{}' failed: {}", table_id, label, e),
        }
        result
    }

    // === Session ===

    /// Create a table and switch the session to it.
    pub async fn create_table(
        &self,
        request: CreateTableRequest,
    ) -> DispatchResult<CreateTableResponse> {
        let _guard = self.in_flight.try_acquire().ok_or(DispatchError::Busy)?;

        let coordinator = &self.coordinator;
        let request = &request;
        let response = self
            .send_signed(0, actions::CREATE_TABLE, move |auth| async move {
                coordinator.create_table(request, &auth).await
            })
            .await?;

        self.store
            .update(|state| *state = GameState::new(response.table_id))
            .await;
        log::info!(
            "Created table {} ({} seats)",
            response.table_id,
            response.max_players
        );
        Ok(response)
    }

    /// Point the session at another table, discarding the old snapshot.
    pub async fn select_table(&self, table_id: u32) -> DispatchResult<()> {
        let _guard = self.in_flight.try_acquire().ok_or(DispatchError::Busy)?;
        self.store
            .update(|state| *state = GameState::new(table_id))
            .await;
        log::info!("Switched to table {}", table_id);
        Ok(())
    }

    pub async fn open_tables(&self) -> DispatchResult<OpenTablesResponse> {
        Ok(self.coordinator.open_tables().await?)
    }

    /// Lobby of the current table.
    pub async fn lobby(&self) -> DispatchResult<TableLobbyResponse> {
        let table_id = self.store.read(|s| s.table_id).await;
        Ok(self.coordinator.lobby(table_id).await?)
    }

    pub async fn chain_config(&self) -> DispatchResult<ChainConfigResponse> {
        Ok(self.coordinator.chain_config().await?)
    }

    pub async fn committee_status(&self) -> DispatchResult<CommitteeStatusResponse> {
        Ok(self.coordinator.committee_status().await?)
    }

    // === Intents ===

    async fn start(&self, table_id: u32, opponents: Vec<Address>) -> DispatchResult<ActionOutcome> {
        let mode = self.settings.mode;
        let local = self.local_address();

        let (seats, deal_players) = if !mode.is_solo() && opponents.is_empty() {
            let lobby = self.coordinator.lobby(table_id).await?;
            let opponents = opponents_from_lobby(&lobby, local)?;
            validate_start(mode, local, &opponents)?;
            let seats = lobby.joined_wallets();
            log::debug!("Table {}: {} seats resolved from lobby", table_id, seats.len());
            // Seat order comes from the lobby; the coordinator resolves it the same way.
            (seats, Vec::new())
        } else {
            let seats = validate_start(mode, local, &opponents)?;
            let deal_players = if mode.is_solo() {
                Vec::new()
            } else {
                self.ensure_joined(table_id).await?;
                seats.clone()
            };
            (seats, deal_players)
        };

        let hand_number = self
            .store
            .update(|state| self.begin_hand(state, &seats))
            .await;

        let coordinator = &self.coordinator;
        let request = DealRequest {
            players: deal_players,
        };
        let request = &request;
        let deal = self
            .send_signed(table_id, actions::REQUEST_DEAL, move |auth| async move {
                coordinator.request_deal(table_id, request, &auth).await
            })
            .await?;

        self.store
            .update(|state| {
                state.last_proof_size = Some(deal.proof_size);
                if deal.tx_hash.is_some() {
                    state.last_tx_hash = deal.tx_hash.clone();
                }
            })
            .await;

        let hole_cards = self.fetch_hole_cards(table_id).await;

        Ok(ActionOutcome::Dealt {
            hand_number,
            proof_size: deal.proof_size,
            tx_hash: deal.tx_hash,
            hole_cards,
        })
    }

    /// Local wallet must hold a seat, either in the snapshot or in the lobby.
    async fn ensure_joined(&self, table_id: u32) -> DispatchResult<()> {
        let local = self.local_address();
        if self.store.read(|s| s.player(local).is_some()).await {
            return Ok(());
        }

        let lobby = self.coordinator.lobby(table_id).await?;
        if lobby.joined_wallets().iter().any(|w| w == local) {
            Ok(())
        } else {
            Err(SeatingError::NotJoined.into())
        }
    }

    /// Optimistic deal: fresh hand in `preflop`, seeded stacks, unconfirmed.
    fn begin_hand(&self, state: &mut GameState, seats: &[Address]) -> u32 {
        let local = self.local_address();

        state.set_phase(Phase::Preflop);
        state.board.clear();
        state.hand_number += 1;
        state.winner = None;
        state.pot = 0;
        for player in &mut state.players {
            player.bet_this_round = 0;
            player.folded = false;
            player.all_in = false;
            player.hole_cards = None;
        }

        if self.settings.mode.is_solo() {
            let stack = self.settings.solo_stack;
            if state.player(local).is_none() {
                let seat = next_free_seat(state);
                state.players.push(Player::new(local, seat, stack));
            }
            if !state.players.iter().any(|p| p.address != local) {
                let seat = next_free_seat(state);
                state.players.push(Player::new(SOLO_OPPONENT, seat, stack));
            }
            // Busted solo seats are refilled
            for player in state.players.iter_mut().filter(|p| p.stack <= 0) {
                player.stack = stack;
            }
        } else if !seats.is_empty() {
            state.players = seats
                .iter()
                .enumerate()
                .map(|(seat, address)| {
                    Player::new(
                        address.clone(),
                        u32::try_from(seat).unwrap_or(u32::MAX),
                        self.settings.buy_in,
                    )
                })
                .collect();
        }

        state.mark_unconfirmed();
        state.hand_number
    }

    async fn fetch_hole_cards(&self, table_id: u32) -> Option<(Card, Card)> {
        let local = self.local_address();
        let coordinator = &self.coordinator;
        let result = self
            .send_signed(table_id, actions::GET_PLAYER_CARDS, move |auth| async move {
                coordinator.player_cards(table_id, local, &auth).await
            })
            .await;

        let cards = match result {
            Ok(response) => (Card(response.card1), Card(response.card2)),
            Err(e) => {
                log::warn!("Table {}: could not fetch hole cards: {}", table_id, e);
                return None;
            }
        };
        if !cards.0.is_valid() || !cards.1.is_valid() {
            log::warn!("Table {}: coordinator returned invalid hole cards", table_id);
            return None;
        }

        self.store
            .update(|state| {
                if let Some(player) = state.player_mut(local) {
                    player.hole_cards = Some(cards);
                }
            })
            .await;
        Some(cards)
    }

    async fn join(&self, table_id: u32, buy_in: Option<Chips>) -> DispatchResult<ActionOutcome> {
        let buy_in = buy_in.unwrap_or(self.settings.buy_in);
        let local = self.local_address();

        // The wallet takes its on-chain seat first; the coordinator only maps it.
        if let Some(ledger) = &self.ledger {
            let invocation = ContractInvocation::join_table(table_id, local, buy_in);
            let hash = ledger.submit(&invocation, self.signer.as_ref()).await?;
            self.store
                .update(|state| state.last_tx_hash = Some(hash))
                .await;
        }

        let coordinator = &self.coordinator;
        let response = self
            .send_signed(table_id, actions::JOIN_TABLE, move |auth| async move {
                coordinator.join_table(table_id, &auth).await
            })
            .await?;

        self.store
            .update(|state| {
                if state.player(local).is_none() {
                    state
                        .players
                        .push(Player::new(local, response.seat_index, buy_in));
                    state.players.sort_by_key(|p| p.seat_index);
                }
                state.mark_unconfirmed();
            })
            .await;

        Ok(ActionOutcome::Joined {
            seat_index: response.seat_index,
            joined_wallets: response.joined_wallets,
            max_players: response.max_players,
        })
    }

    async fn bet_on_chain(&self, table_id: u32, action: BettingAction) -> DispatchResult<ActionOutcome> {
        let local = self.local_address();

        let tx_hash = match &self.ledger {
            Some(ledger) => {
                let invocation = ContractInvocation::player_action(table_id, local, action);
                Some(ledger.submit(&invocation, self.signer.as_ref()).await?)
            }
            None => {
                let coordinator = &self.coordinator;
                let request = PlayerActionRequest::from(action);
                let request = &request;
                let response = self
                    .send_signed(
                        table_id,
                        &actions::player_action(action),
                        move |auth| async move {
                            coordinator.player_action(table_id, request, &auth).await
                        },
                    )
                    .await?;
                response.tx_hash
            }
        };

        self.store
            .update(|state| {
                apply_action(state, local, action);
                if tx_hash.is_some() {
                    state.last_tx_hash = tx_hash.clone();
                }
                state.mark_unconfirmed();
            })
            .await;

        Ok(ActionOutcome::Acted { action, tx_hash })
    }

    /// Resolve a solo betting step locally, then advance the hand if the
    /// round closed. The follow-up runs under the same in-flight token.
    async fn bet_solo(&self, table_id: u32, action: BettingAction) -> DispatchResult<ActionOutcome> {
        let local = self.local_address();
        let opponent = Arc::clone(&self.opponent);

        let step = self
            .store
            .update(|state| {
                apply_action(state, local, action);
                state.mark_unconfirmed();

                let Some(opponent_address) = state
                    .players
                    .iter()
                    .find(|p| p.address != local)
                    .map(|p| p.address.clone())
                else {
                    settle(state, local);
                    return SoloStep::Settled {
                        reply: None,
                        winner: local.to_string(),
                    };
                };

                if action == BettingAction::Fold {
                    settle(state, &opponent_address);
                    return SoloStep::Settled {
                        reply: None,
                        winner: opponent_address,
                    };
                }

                let reply = opponent.respond(state, &opponent_address);
                apply_action(state, &opponent_address, reply);
                log::debug!("Table {}: opponent {}", table_id, reply);

                if reply == BettingAction::Fold {
                    settle(state, local);
                    return SoloStep::Settled {
                        reply: Some(reply),
                        winner: local.to_string(),
                    };
                }

                SoloStep::Continue {
                    reply,
                    advance: round_closed(state),
                    next_street: state.phase.next_street(),
                }
            })
            .await;

        match step {
            SoloStep::Settled { reply, winner } => Ok(ActionOutcome::Resolved {
                action,
                reply,
                follow_up: Some(Box::new(ActionOutcome::Settled { winner })),
            }),
            SoloStep::Continue {
                reply,
                advance: false,
                ..
            } => Ok(ActionOutcome::Resolved {
                action,
                reply: Some(reply),
                follow_up: None,
            }),
            SoloStep::Continue {
                reply, next_street, ..
            } => {
                let follow_up = match next_street {
                    Some(street) => self.reveal(table_id, street).await?,
                    None => self.showdown(table_id).await?,
                };
                Ok(ActionOutcome::Resolved {
                    action,
                    reply: Some(reply),
                    follow_up: Some(Box::new(follow_up)),
                })
            }
        }
    }

    async fn reveal(&self, table_id: u32, street: Street) -> DispatchResult<ActionOutcome> {
        let coordinator = &self.coordinator;
        let response = self
            .send_signed(
                table_id,
                &actions::request_reveal(street),
                move |auth| async move { coordinator.request_reveal(table_id, street, &auth).await },
            )
            .await?;

        let cards: Vec<Card> = response
            .cards
            .iter()
            .copied()
            .map(Card)
            .filter(|card| card.is_valid())
            .collect();

        self.store
            .update(|state| {
                // A poll may already have moved the table forward.
                if state.phase == street.requested_from() {
                    state.set_phase(street.phase());
                    state.reset_round_bets();
                }
                if state.phase == street.phase() {
                    let accepted = state.extend_board(cards.iter().copied());
                    if accepted < cards.len() {
                        log::debug!(
                            "Table {}: {} of {} {} cards already on the board",
                            table_id,
                            cards.len() - accepted,
                            cards.len(),
                            street
                        );
                    }
                }
                state.last_proof_size = Some(response.proof_size);
                if response.tx_hash.is_some() {
                    state.last_tx_hash = response.tx_hash.clone();
                }
                state.mark_unconfirmed();
            })
            .await;

        Ok(ActionOutcome::Revealed { street, cards })
    }

    async fn showdown(&self, table_id: u32) -> DispatchResult<ActionOutcome> {
        let coordinator = &self.coordinator;
        let response = self
            .send_signed(table_id, actions::REQUEST_SHOWDOWN, move |auth| async move {
                coordinator.request_showdown(table_id, &auth).await
            })
            .await?;

        if response.status == "settled_timeout" {
            log::warn!("Table {}: hand settled by timeout, no proof", table_id);
        }

        let known = self
            .store
            .read(|s| s.player(&response.winner).is_some())
            .await;
        let lobby = if known {
            None
        } else {
            match self.coordinator.lobby(table_id).await {
                Ok(lobby) => Some(lobby),
                Err(e) => {
                    log::debug!("Table {}: lobby unavailable for winner lookup: {}", table_id, e);
                    None
                }
            }
        };

        let solo = self.settings.mode.is_solo();
        let winner = self
            .store
            .update(|state| {
                let winner = resolve_winner(
                    state,
                    lobby.as_ref(),
                    &response.winner,
                    response.winner_index,
                );
                if solo {
                    settle(state, &winner);
                } else {
                    state.set_phase(Phase::Settlement);
                    state.winner = Some(winner.clone());
                }
                state.last_proof_size = Some(response.proof_size);
                if response.tx_hash.is_some() {
                    state.last_tx_hash = response.tx_hash.clone();
                }
                state.mark_unconfirmed();
                winner
            })
            .await;

        Ok(ActionOutcome::Settled { winner })
    }

    // === Transport ===

    /// Send a mutating or private coordinator request.
    ///
    /// With `allow_insecure_dev_auth` the request first goes out with only
    /// the identity header; a 401/403 falls through to the signed path. The
    /// signer is only consulted on the signed path, and a refusal means
    /// nothing is sent.
    async fn send_signed<T, F, Fut>(&self, table_id: u32, action: &str, call: F) -> DispatchResult<T>
    where
        F: Fn(AuthHeaders) -> Fut,
        Fut: Future<Output = NetResult<T>>,
    {
        if self.settings.allow_insecure_dev_auth {
            let identity = AuthHeaders::IdentityOnly(self.local_address().to_string());
            match call(identity).await {
                Ok(response) => return Ok(response),
                Err(e) if e.is_unauthorized() => {
                    log::info!(
                        "Table {}: '{}' rejected without signature, retrying signed",
                        table_id,
                        action
                    );
                }
                Err(e) => return Err(e.into()),
            }
        }

        let headers = self
            .authenticator
            .headers(table_id, action, self.signer.as_ref())
            .await?;
        Ok(call(headers).await?)
    }
}

fn next_free_seat(state: &GameState) -> u32 {
    state
        .players
        .iter()
        .map(|p| p.seat_index + 1)
        .max()
        .unwrap_or(0)
}
