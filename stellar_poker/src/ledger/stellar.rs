//! Stellar network gateway.
//!
//! Transactions are assembled with `stellar contract invoke --build-only`
//! (the CLI simulates and attaches the footprint), then submitted and
//! polled through the Soroban JSON-RPC endpoint.

use async_trait::async_trait;
use serde_json::{Value, json};
use tokio::process::Command;

use super::{
    ContractInvocation, LedgerGateway, TxStatus,
    errors::{LedgerError, LedgerResult},
};

/// Gateway to a Soroban RPC node and the poker table contract.
#[derive(Clone, Debug)]
pub struct StellarGateway {
    rpc_url: String,
    network_passphrase: String,
    contract_id: String,
    client: reqwest::Client,
}

impl StellarGateway {
    pub fn new(
        rpc_url: impl Into<String>,
        network_passphrase: impl Into<String>,
        contract_id: impl Into<String>,
    ) -> Self {
        Self {
            rpc_url: rpc_url.into(),
            network_passphrase: network_passphrase.into(),
            contract_id: contract_id.into(),
            client: reqwest::Client::new(),
        }
    }

    pub fn contract_id(&self) -> &str {
        &self.contract_id
    }

    async fn rpc_call(&self, method: &str, params: Value) -> LedgerResult<Value> {
        let payload: Value = self
            .client
            .post(&self.rpc_url)
            .json(&json!({
                "jsonrpc": "2.0",
                "id": 1,
                "method": method,
                "params": params,
            }))
            .send()
            .await?
            .json()
            .await?;

        if let Some(err) = payload.get("error") {
            return Err(LedgerError::Rpc(format!("{method} returned error: {err}")));
        }
        payload
            .get("result")
            .cloned()
            .ok_or_else(|| LedgerError::Rpc(format!("{method} missing result")))
    }
}

#[async_trait]
impl LedgerGateway for StellarGateway {
    fn network_passphrase(&self) -> &str {
        &self.network_passphrase
    }

    async fn build_transaction(
        &self,
        source: &str,
        invocation: &ContractInvocation,
    ) -> LedgerResult<String> {
        let mut args = vec![
            "contract".to_string(),
            "invoke".to_string(),
            "--id".to_string(),
            self.contract_id.clone(),
            "--source-account".to_string(),
            source.to_string(),
            "--rpc-url".to_string(),
            self.rpc_url.clone(),
            "--network-passphrase".to_string(),
            self.network_passphrase.clone(),
            "--build-only".to_string(),
            "--".to_string(),
        ];
        args.extend(invocation.cli_args());

        let output = Command::new("stellar")
            .args(&args)
            .output()
            .await
            .map_err(|e| LedgerError::Build(format!("failed to run stellar CLI: {e}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(LedgerError::Build(stderr.trim().to_string()));
        }

        let envelope = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if envelope.is_empty() {
            return Err(LedgerError::Build("empty transaction envelope".to_string()));
        }
        Ok(envelope)
    }

    async fn submit_transaction(&self, signed_envelope: &str) -> LedgerResult<String> {
        let result = self
            .rpc_call("sendTransaction", json!({ "transaction": signed_envelope }))
            .await?;
        parse_send_result(&result)
    }

    async fn transaction_status(&self, hash: &str) -> LedgerResult<TxStatus> {
        let result = self
            .rpc_call("getTransaction", json!({ "hash": hash }))
            .await?;
        Ok(parse_transaction_status(&result))
    }
}

fn parse_send_result(result: &Value) -> LedgerResult<String> {
    let status = result.get("status").and_then(Value::as_str).unwrap_or("");
    let hash = result.get("hash").and_then(Value::as_str);

    match (status, hash) {
        ("PENDING" | "DUPLICATE", Some(hash)) => Ok(hash.to_string()),
        ("ERROR", _) => {
            let detail = result
                .get("errorResultXdr")
                .and_then(Value::as_str)
                .unwrap_or("no error result");
            Err(LedgerError::Submit(format!("transaction error: {detail}")))
        }
        (other, _) => Err(LedgerError::Submit(format!(
            "unexpected sendTransaction status '{other}'"
        ))),
    }
}

fn parse_transaction_status(result: &Value) -> TxStatus {
    match result.get("status").and_then(Value::as_str) {
        Some("SUCCESS") => TxStatus::Success,
        Some("FAILED") => TxStatus::Failed(
            result
                .get("resultXdr")
                .and_then(Value::as_str)
                .unwrap_or("transaction failed")
                .to_string(),
        ),
        _ => TxStatus::Pending,
    }
}
