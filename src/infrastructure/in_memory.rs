use crate::domain::order::Order;
use crate::domain::ports::{Clock, TransactionSlot};
use crate::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::RwLock;

/// Storage key for the in-flight order.
pub const TOPUP_KEY: &str = "topup_data";

/// In-memory emulation of session-scoped string storage.
///
/// The order slot lives under [`TOPUP_KEY`] as a JSON object
/// `{ "country": .., "links": [..], "total": .. }`. Entries survive logout
/// and are only removed by `clear` or overwritten by the next `write`.
#[derive(Default, Clone)]
pub struct InMemorySessionStorage {
    entries: Arc<RwLock<HashMap<String, String>>>,
}

impl InMemorySessionStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw stored string, for inspecting the serialized payload.
    pub async fn raw(&self, key: &str) -> Option<String> {
        self.entries.read().await.get(key).cloned()
    }
}

#[async_trait]
impl TransactionSlot for InMemorySessionStorage {
    async fn write(&self, order: Order) -> Result<()> {
        let json = serde_json::to_string(&order)?;
        let mut entries = self.entries.write().await;
        entries.insert(TOPUP_KEY.to_string(), json);
        Ok(())
    }

    async fn read(&self) -> Result<Option<Order>> {
        let entries = self.entries.read().await;
        match entries.get(TOPUP_KEY) {
            Some(raw) => Ok(Some(serde_json::from_str(raw)?)),
            None => Ok(None),
        }
    }

    async fn clear(&self) -> Result<()> {
        let mut entries = self.entries.write().await;
        entries.remove(TOPUP_KEY);
        Ok(())
    }
}

/// Clock backed by tokio timers, for driving the flow in real time.
pub struct TokioClock;

#[async_trait]
impl Clock for TokioClock {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Clock that returns immediately, recording how much logical time was
/// requested. Used for script replay and deterministic tests.
#[derive(Default, Clone)]
pub struct InstantClock {
    slept: Arc<AtomicU64>,
}

impl InstantClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total logical milliseconds slept so far.
    pub fn slept_ms(&self) -> u64 {
        self.slept.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl Clock for InstantClock {
    async fn sleep(&self, duration: Duration) {
        self.slept
            .fetch_add(duration.as_millis() as u64, Ordering::Relaxed);
    }
}
