//! In-memory coordinator, ledger and signers shared by the integration tests.
#![allow(dead_code)]

use async_trait::async_trait;
use std::{
    collections::HashMap,
    sync::{
        Mutex,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use stellar_poker::{
    AuthHeaders, BettingAction, GameState, LocalKeySigner, Street, WalletSigner,
    auth::SignerError,
    bot::OpponentModel,
    ledger::{ContractInvocation, LedgerError, LedgerGateway, LedgerResult, TxStatus},
    messages::{
        ChainConfigResponse, CommitteeStatusResponse, CreateTableRequest, CreateTableResponse,
        DealRequest, DealResponse, JoinTableResponse, LobbySeat, OpenTablesResponse,
        PlayerActionRequest, PlayerActionResponse, PlayerCardsResponse, RevealResponse,
        ShowdownResponse, TableLobbyResponse, TableStateResponse,
    },
    net::{Coordinator, NetError, NetResult},
};

/// Valid Stellar address derived from a fixed seed.
pub fn address(seed: u8) -> String {
    LocalKeySigner::from_seed([seed; 32]).address().to_string()
}

/// One request the mock coordinator received.
#[derive(Clone, Debug)]
pub struct RecordedCall {
    pub endpoint: &'static str,
    pub table_id: u32,
    pub auth: Option<AuthHeaders>,
    pub players: Option<Vec<String>>,
}

/// Scriptable [`Coordinator`] that records every call.
pub struct MockCoordinator {
    pub calls: Mutex<Vec<RecordedCall>>,
    /// Raw `TableState` JSON returned by polls; `None` fails the fetch.
    pub table_state: Mutex<Option<String>>,
    pub lobby: Mutex<Option<TableLobbyResponse>>,
    pub reveal_cards: HashMap<Street, Vec<u32>>,
    /// Showdown winner as reported by the coordinator and its seat.
    pub winner: Mutex<(String, u32)>,
    /// Reject identity-only requests with 401.
    pub require_signature: bool,
    pub fail_deal: bool,
    pub deal_delay: Option<Duration>,
}

impl Default for MockCoordinator {
    fn default() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            table_state: Mutex::new(None),
            lobby: Mutex::new(None),
            reveal_cards: HashMap::from([
                (Street::Flop, vec![0, 13, 26]),
                (Street::Turn, vec![39]),
                (Street::River, vec![51]),
            ]),
            winner: Mutex::new((String::new(), 0)),
            require_signature: false,
            fail_deal: false,
            deal_delay: None,
        }
    }
}

impl MockCoordinator {
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_to(&self, endpoint: &str) -> Vec<RecordedCall> {
        self.calls()
            .into_iter()
            .filter(|c| c.endpoint == endpoint)
            .collect()
    }

    pub fn set_table_state(&self, raw: &str) {
        *self.table_state.lock().unwrap() = Some(raw.to_string());
    }

    pub fn set_lobby(&self, seats: Vec<(u32, String, Option<String>)>) {
        let lobby = TableLobbyResponse {
            table_id: 1,
            phase: "Waiting".to_string(),
            max_players: 6,
            joined_wallets: seats.len(),
            seats: seats
                .into_iter()
                .map(|(seat_index, chain_address, wallet_address)| LobbySeat {
                    seat_index,
                    chain_address,
                    wallet_address,
                })
                .collect(),
        };
        *self.lobby.lock().unwrap() = Some(lobby);
    }

    pub fn set_winner(&self, winner: &str, seat: u32) {
        *self.winner.lock().unwrap() = (winner.to_string(), seat);
    }

    fn record(
        &self,
        endpoint: &'static str,
        table_id: u32,
        auth: Option<&AuthHeaders>,
        players: Option<Vec<String>>,
    ) -> NetResult<()> {
        self.calls.lock().unwrap().push(RecordedCall {
            endpoint,
            table_id,
            auth: auth.cloned(),
            players,
        });
        if self.require_signature && matches!(auth, Some(AuthHeaders::IdentityOnly(_))) {
            return Err(NetError::from_status(401, "signature required".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl Coordinator for MockCoordinator {
    async fn request_deal(
        &self,
        table_id: u32,
        request: &DealRequest,
        auth: &AuthHeaders,
    ) -> NetResult<DealResponse> {
        self.record("request-deal", table_id, Some(auth), Some(request.players.clone()))?;
        if let Some(delay) = self.deal_delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_deal {
            return Err(NetError::from_status(503, "committee offline".to_string()));
        }
        Ok(DealResponse {
            status: "dealt".to_string(),
            deck_root: "0xroot".to_string(),
            hand_commitments: vec!["0xa".to_string(), "0xb".to_string()],
            proof_size: 14_592,
            session_id: "deal-1".to_string(),
            tx_hash: Some("deal-tx".to_string()),
        })
    }

    async fn request_reveal(
        &self,
        table_id: u32,
        street: Street,
        auth: &AuthHeaders,
    ) -> NetResult<RevealResponse> {
        self.record("request-reveal", table_id, Some(auth), None)?;
        Ok(RevealResponse {
            status: "revealed".to_string(),
            cards: self.reveal_cards.get(&street).cloned().unwrap_or_default(),
            proof_size: 2_048,
            session_id: format!("reveal-{street}"),
            tx_hash: Some(format!("{street}-tx")),
        })
    }

    async fn request_showdown(
        &self,
        table_id: u32,
        auth: &AuthHeaders,
    ) -> NetResult<ShowdownResponse> {
        self.record("request-showdown", table_id, Some(auth), None)?;
        let (winner, winner_index) = self.winner.lock().unwrap().clone();
        Ok(ShowdownResponse {
            status: "showdown_complete".to_string(),
            winner,
            winner_index,
            proof_size: 4_096,
            session_id: "showdown-1".to_string(),
            tx_hash: Some("showdown-tx".to_string()),
        })
    }

    async fn player_action(
        &self,
        table_id: u32,
        request: &PlayerActionRequest,
        auth: &AuthHeaders,
    ) -> NetResult<PlayerActionResponse> {
        self.record("player-action", table_id, Some(auth), None)?;
        Ok(PlayerActionResponse {
            status: "ok".to_string(),
            action: request.action.clone(),
            amount: request.amount,
            player: auth.address().to_string(),
            tx_hash: Some("action-tx".to_string()),
        })
    }

    async fn table_state(&self, table_id: u32) -> NetResult<TableStateResponse> {
        self.record("state", table_id, None, None)?;
        match self.table_state.lock().unwrap().clone() {
            Some(state) => Ok(TableStateResponse { state }),
            None => Err(NetError::from_status(404, "no such table".to_string())),
        }
    }

    async fn player_cards(
        &self,
        table_id: u32,
        _address: &str,
        auth: &AuthHeaders,
    ) -> NetResult<PlayerCardsResponse> {
        self.record("player-cards", table_id, Some(auth), None)?;
        Ok(PlayerCardsResponse {
            card1: 12,
            card2: 25,
            salt1: "0x01".to_string(),
            salt2: "0x02".to_string(),
        })
    }

    async fn create_table(
        &self,
        request: &CreateTableRequest,
        auth: &AuthHeaders,
    ) -> NetResult<CreateTableResponse> {
        self.record("create", 0, Some(auth), None)?;
        Ok(CreateTableResponse {
            table_id: 42,
            max_players: request.max_players.unwrap_or(2),
            joined_wallets: 0,
        })
    }

    async fn join_table(&self, table_id: u32, auth: &AuthHeaders) -> NetResult<JoinTableResponse> {
        self.record("join", table_id, Some(auth), None)?;
        Ok(JoinTableResponse {
            table_id,
            seat_index: 1,
            seat_address: auth.address().to_string(),
            joined_wallets: 2,
            max_players: 2,
        })
    }

    async fn open_tables(&self) -> NetResult<OpenTablesResponse> {
        Ok(OpenTablesResponse::default())
    }

    async fn lobby(&self, table_id: u32) -> NetResult<TableLobbyResponse> {
        self.record("lobby", table_id, None, None)?;
        self.lobby
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| NetError::from_status(404, "no lobby".to_string()))
    }

    async fn chain_config(&self) -> NetResult<ChainConfigResponse> {
        Ok(ChainConfigResponse {
            rpc_url: "http://localhost:8000/soroban/rpc".to_string(),
            network_passphrase: "Standalone Network ; February 2017".to_string(),
            poker_table_contract: "CTABLE".to_string(),
        })
    }

    async fn committee_status(&self) -> NetResult<CommitteeStatusResponse> {
        Ok(CommitteeStatusResponse {
            nodes: 3,
            healthy: vec![true, true, true],
            status: "healthy".to_string(),
        })
    }
}

/// Local key for message signing; transaction signing stays in-process.
pub struct TestSigner {
    inner: LocalKeySigner,
    pub message_signatures: AtomicUsize,
}

impl TestSigner {
    pub fn new(seed: u8) -> Self {
        Self {
            inner: LocalKeySigner::from_seed([seed; 32]),
            message_signatures: AtomicUsize::new(0),
        }
    }

    pub fn signatures(&self) -> usize {
        self.message_signatures.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WalletSigner for TestSigner {
    fn address(&self) -> &str {
        self.inner.address()
    }

    async fn sign_message(&self, message: &str) -> Result<String, SignerError> {
        self.message_signatures.fetch_add(1, Ordering::SeqCst);
        self.inner.sign_message(message).await
    }

    async fn sign_transaction(
        &self,
        envelope_xdr: &str,
        _network_passphrase: &str,
    ) -> Result<String, SignerError> {
        Ok(format!("signed:{envelope_xdr}"))
    }
}

/// Signer whose user closes every popup.
pub struct RefusingSigner {
    address: String,
}

impl RefusingSigner {
    pub fn new(seed: u8) -> Self {
        Self {
            address: address(seed),
        }
    }
}

#[async_trait]
impl WalletSigner for RefusingSigner {
    fn address(&self) -> &str {
        &self.address
    }

    async fn sign_message(&self, _message: &str) -> Result<String, SignerError> {
        Err(SignerError::Rejected("user declined".to_string()))
    }

    async fn sign_transaction(&self, _: &str, _: &str) -> Result<String, SignerError> {
        Err(SignerError::Rejected("user declined".to_string()))
    }
}

/// Opponent that always answers the same way.
pub struct FixedOpponent(pub BettingAction);

impl OpponentModel for FixedOpponent {
    fn respond(&self, _state: &GameState, _opponent: &str) -> BettingAction {
        self.0
    }
}

/// Ledger whose transactions stay in `status` forever.
pub struct MockLedger {
    pub status: TxStatus,
    pub submitted: Mutex<Vec<String>>,
    pub invocations: Mutex<Vec<ContractInvocation>>,
}

impl MockLedger {
    pub fn new(status: TxStatus) -> Self {
        Self {
            status,
            submitted: Mutex::new(Vec::new()),
            invocations: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl LedgerGateway for MockLedger {
    fn network_passphrase(&self) -> &str {
        "Test SDF Network ; September 2015"
    }

    async fn build_transaction(
        &self,
        source: &str,
        invocation: &ContractInvocation,
    ) -> LedgerResult<String> {
        if source.is_empty() {
            return Err(LedgerError::Build("no source account".to_string()));
        }
        self.invocations.lock().unwrap().push(invocation.clone());
        Ok(format!("unsigned-{}", invocation.method))
    }

    async fn submit_transaction(&self, signed_envelope: &str) -> LedgerResult<String> {
        self.submitted
            .lock()
            .unwrap()
            .push(signed_envelope.to_string());
        Ok("abc123".to_string())
    }

    async fn transaction_status(&self, _hash: &str) -> LedgerResult<TxStatus> {
        Ok(self.status.clone())
    }
}
