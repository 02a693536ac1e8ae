//! HTTP client for the coordinator service.

use async_trait::async_trait;
use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use std::time::Duration;

use super::{
    errors::{NetError, NetResult},
    messages::{
        ChainConfigResponse, CommitteeStatusResponse, CreateTableRequest, CreateTableResponse,
        DealRequest, DealResponse, JoinTableResponse, OpenTablesResponse, PlayerActionRequest,
        PlayerActionResponse, PlayerCardsResponse, RevealResponse, ShowdownResponse,
        TableLobbyResponse, TableStateResponse,
    },
};
use crate::{auth::AuthHeaders, game::entities::Street};

/// Proof generation can take minutes; this bounds a single request.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(300);

/// Everything the client needs from the coordinator.
///
/// Mutating and private calls take pre-built [`AuthHeaders`]; the caller owns
/// signing so that a refused signature never produces a request.
#[async_trait]
pub trait Coordinator: Send + Sync {
    async fn request_deal(
        &self,
        table_id: u32,
        request: &DealRequest,
        auth: &AuthHeaders,
    ) -> NetResult<DealResponse>;

    async fn request_reveal(
        &self,
        table_id: u32,
        street: Street,
        auth: &AuthHeaders,
    ) -> NetResult<RevealResponse>;

    async fn request_showdown(&self, table_id: u32, auth: &AuthHeaders)
    -> NetResult<ShowdownResponse>;

    async fn player_action(
        &self,
        table_id: u32,
        request: &PlayerActionRequest,
        auth: &AuthHeaders,
    ) -> NetResult<PlayerActionResponse>;

    async fn table_state(&self, table_id: u32) -> NetResult<TableStateResponse>;

    async fn player_cards(
        &self,
        table_id: u32,
        address: &str,
        auth: &AuthHeaders,
    ) -> NetResult<PlayerCardsResponse>;

    async fn create_table(
        &self,
        request: &CreateTableRequest,
        auth: &AuthHeaders,
    ) -> NetResult<CreateTableResponse>;

    async fn join_table(&self, table_id: u32, auth: &AuthHeaders) -> NetResult<JoinTableResponse>;

    async fn open_tables(&self) -> NetResult<OpenTablesResponse>;

    async fn lobby(&self, table_id: u32) -> NetResult<TableLobbyResponse>;

    async fn chain_config(&self) -> NetResult<ChainConfigResponse>;

    async fn committee_status(&self) -> NetResult<CommitteeStatusResponse>;
}

/// reqwest-backed [`Coordinator`].
#[derive(Clone, Debug)]
pub struct CoordinatorClient {
    base_url: String,
    client: reqwest::Client,
}

impl CoordinatorClient {
    /// Create a client with the default request timeout
    pub fn new(base_url: impl Into<String>) -> NetResult<Self> {
        Self::with_timeout(base_url, DEFAULT_REQUEST_TIMEOUT)
    }

    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> NetResult<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { base_url, client })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api{}", self.base_url, path)
    }
}

fn with_auth(mut request: RequestBuilder, auth: &AuthHeaders) -> RequestBuilder {
    for (name, value) in auth.pairs() {
        request = request.header(name, value);
    }
    request
}

async fn send_json<T: DeserializeOwned>(request: RequestBuilder, what: &str) -> NetResult<T> {
    let response = request.send().await?;
    let status = response.status();

    if !status.is_success() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|e| format!("Failed to read error response: {}", e));
        log::warn!("{} failed with {}: {}", what, status, body);
        return Err(NetError::from_status(status.as_u16(), body));
    }

    response
        .json()
        .await
        .map_err(|e| NetError::Decode(format!("Failed to parse {} response: {}", what, e)))
}

#[async_trait]
impl Coordinator for CoordinatorClient {
    async fn request_deal(
        &self,
        table_id: u32,
        request: &DealRequest,
        auth: &AuthHeaders,
    ) -> NetResult<DealResponse> {
        let builder = self
            .client
            .post(self.url(&format!("/table/{table_id}/request-deal")))
            .json(request);
        send_json(with_auth(builder, auth), "request-deal").await
    }

    async fn request_reveal(
        &self,
        table_id: u32,
        street: Street,
        auth: &AuthHeaders,
    ) -> NetResult<RevealResponse> {
        let builder = self
            .client
            .post(self.url(&format!("/table/{table_id}/request-reveal/{street}")));
        send_json(with_auth(builder, auth), "request-reveal").await
    }

    async fn request_showdown(
        &self,
        table_id: u32,
        auth: &AuthHeaders,
    ) -> NetResult<ShowdownResponse> {
        let builder = self
            .client
            .post(self.url(&format!("/table/{table_id}/request-showdown")));
        send_json(with_auth(builder, auth), "request-showdown").await
    }

    async fn player_action(
        &self,
        table_id: u32,
        request: &PlayerActionRequest,
        auth: &AuthHeaders,
    ) -> NetResult<PlayerActionResponse> {
        let builder = self
            .client
            .post(self.url(&format!("/table/{table_id}/player-action")))
            .json(request);
        send_json(with_auth(builder, auth), "player-action").await
    }

    async fn table_state(&self, table_id: u32) -> NetResult<TableStateResponse> {
        let builder = self.client.get(self.url(&format!("/table/{table_id}/state")));
        send_json(builder, "table state").await
    }

    async fn player_cards(
        &self,
        table_id: u32,
        address: &str,
        auth: &AuthHeaders,
    ) -> NetResult<PlayerCardsResponse> {
        let builder = self
            .client
            .get(self.url(&format!("/table/{table_id}/player/{address}/cards")));
        send_json(with_auth(builder, auth), "player cards").await
    }

    async fn create_table(
        &self,
        request: &CreateTableRequest,
        auth: &AuthHeaders,
    ) -> NetResult<CreateTableResponse> {
        let builder = self.client.post(self.url("/tables/create")).json(request);
        send_json(with_auth(builder, auth), "create table").await
    }

    async fn join_table(&self, table_id: u32, auth: &AuthHeaders) -> NetResult<JoinTableResponse> {
        let builder = self.client.post(self.url(&format!("/table/{table_id}/join")));
        send_json(with_auth(builder, auth), "join table").await
    }

    async fn open_tables(&self) -> NetResult<OpenTablesResponse> {
        send_json(self.client.get(self.url("/tables/open")), "open tables").await
    }

    async fn lobby(&self, table_id: u32) -> NetResult<TableLobbyResponse> {
        let builder = self.client.get(self.url(&format!("/table/{table_id}/lobby")));
        send_json(builder, "lobby").await
    }

    async fn chain_config(&self) -> NetResult<ChainConfigResponse> {
        send_json(self.client.get(self.url("/chain-config")), "chain config").await
    }

    async fn committee_status(&self) -> NetResult<CommitteeStatusResponse> {
        send_json(self.client.get(self.url("/committee/status")), "committee status").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_slash_trimmed() {
        let client = CoordinatorClient::new("http://localhost:8080/").unwrap();
        assert_eq!(client.base_url(), "http://localhost:8080");
        assert_eq!(
            client.url("/table/3/state"),
            "http://localhost:8080/api/table/3/state"
        );
    }

    #[test]
    fn test_status_classification() {
        assert!(NetError::from_status(401, String::new()).is_unauthorized());
        assert!(NetError::from_status(403, String::new()).is_unauthorized());
        assert!(!NetError::from_status(409, String::new()).is_unauthorized());
    }
}
