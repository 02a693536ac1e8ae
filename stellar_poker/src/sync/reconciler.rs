//! Periodic reconciliation against authoritative table state.

use std::{sync::Arc, time::Duration};
use tokio::{
    sync::watch,
    time::{MissedTickBehavior, interval},
};

use super::{
    merge::{MergeReport, merge_poll},
    parsing::PollResult,
};
use crate::{
    game::{constants::DEFAULT_POLL_INTERVAL_SECS, entities::PlayMode, store::GameStore},
    net::Coordinator,
};

/// Outcome of one poll cycle.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum PollOutcome {
    Merged(MergeReport),
    /// Payload was fetched but not parseable; nothing merged.
    Unparsed,
    /// Fetch failed; nothing merged.
    FetchFailed(String),
    /// The session moved to another table while fetching.
    Stale,
}

/// Polls the coordinator on a fixed interval, independently of user
/// actions, and merges what it finds into the store.
pub struct StateReconciler {
    coordinator: Arc<dyn Coordinator>,
    store: GameStore,
    mode: PlayMode,
    interval: Duration,
}

impl StateReconciler {
    pub fn new(coordinator: Arc<dyn Coordinator>, store: GameStore, mode: PlayMode) -> Self {
        Self {
            coordinator,
            store,
            mode,
            interval: Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS),
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Fetch, parse and merge once.
    pub async fn poll_once(&self) -> PollOutcome {
        let table_id = self.store.read(|s| s.table_id).await;

        let raw = match self.coordinator.table_state(table_id).await {
            Ok(response) => response.state,
            Err(e) => {
                log::warn!("Table {}: state poll failed: {}", table_id, e);
                return PollOutcome::FetchFailed(e.to_string());
            }
        };

        let poll = PollResult::from_raw(raw);
        let Some(parsed) = poll.parsed else {
            log::debug!("Table {}: unparseable state payload ignored", table_id);
            return PollOutcome::Unparsed;
        };

        let report = self
            .store
            .update(|state| {
                // Table switched while the fetch was in flight.
                if state.table_id != table_id {
                    return None;
                }
                Some(merge_poll(state, &parsed, self.mode))
            })
            .await;

        match report {
            Some(report) => {
                if let Some(phase) = &report.unmapped_phase {
                    log::info!("Table {}: on-chain phase {} has no client mapping", table_id, phase);
                }
                if report.board_rejected {
                    log::warn!("Table {}: polled board exceeds phase capacity", table_id);
                }
                PollOutcome::Merged(report)
            }
            None => PollOutcome::Stale,
        }
    }

    /// Poll until `shutdown` flips to `true` or its sender is dropped.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        log::info!("Reconciler starting ({:?} interval)", self.interval);

        let mut ticker = interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.poll_once().await;
                }

                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }

        log::info!("Reconciler stopped");
    }
}
