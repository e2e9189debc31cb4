// Per-link reserved bandwidth, debited on path install and never
// released (an open question left as-is, see DESIGN.md).

use std::collections::HashMap;
use tokio::sync::Mutex;

#[derive(Default)]
pub struct ReservationLedger {
    inner: Mutex<HashMap<String, u32>>,
}

impl ReservationLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn reserved(&self, link_id: &str) -> u32 {
        *self.inner.lock().await.get(link_id).unwrap_or(&0)
    }

    pub async fn reserve(&self, link_id: &str, bw: u32) {
        *self.inner.lock().await.entry(link_id.to_string()).or_insert(0) += bw;
    }

    pub async fn remove(&self, link_id: &str) {
        self.inner.lock().await.remove(link_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn reservations_accumulate_and_never_go_negative() {
        let ledger = ReservationLedger::new();
        assert_eq!(ledger.reserved("r1-r3").await, 0);
        ledger.reserve("r1-r3", 100).await;
        ledger.reserve("r1-r3", 1).await;
        assert_eq!(ledger.reserved("r1-r3").await, 101);
    }

    #[tokio::test]
    async fn removal_clears_a_links_reservation() {
        let ledger = ReservationLedger::new();
        ledger.reserve("r1-r2", 10).await;
        ledger.remove("r1-r2").await;
        assert_eq!(ledger.reserved("r1-r2").await, 0);
    }
}
