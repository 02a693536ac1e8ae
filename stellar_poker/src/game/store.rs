//! Shared handle to the canonical game snapshot.

use std::sync::Arc;
use tokio::sync::RwLock;

use super::entities::GameState;

/// The single mutable snapshot read and written by the dispatcher and the
/// reconciler. Locks are held only for in-memory mutation, never across a
/// network await.
#[derive(Clone, Debug, Default)]
pub struct GameStore {
    inner: Arc<RwLock<GameState>>,
}

impl GameStore {
    pub fn new(state: GameState) -> Self {
        Self {
            inner: Arc::new(RwLock::new(state)),
        }
    }

    /// Clone of the current snapshot.
    pub async fn snapshot(&self) -> GameState {
        self.inner.read().await.clone()
    }

    /// Read a projection of the snapshot without cloning all of it.
    pub async fn read<R>(&self, f: impl FnOnce(&GameState) -> R) -> R {
        let guard = self.inner.read().await;
        f(&guard)
    }

    /// Apply a mutation under the write lock.
    pub async fn update<R>(&self, f: impl FnOnce(&mut GameState) -> R) -> R {
        let mut guard = self.inner.write().await;
        f(&mut guard)
    }
}
