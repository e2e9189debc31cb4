// Neighbor liveness table: last-HELLO timestamp per neighbor id.

use std::collections::HashMap;
use tokio::sync::Mutex;

#[derive(Default)]
pub struct NeighborTable {
    last_seen: Mutex<HashMap<String, u64>>,
}

impl NeighborTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stamps `neighbor_id`'s liveness timestamp to `now`, creating the
    /// entry on first HELLO.
    pub async fn mark_seen(&self, neighbor_id: &str, now: u64) {
        self.last_seen.lock().await.insert(neighbor_id.to_string(), now);
    }

    /// A neighbor is alive iff it has an entry within `NEIGHBOR_DEAD_INTERVAL_SEC`
    /// of `now`.
    pub async fn is_alive(&self, neighbor_id: &str, now: u64) -> bool {
        match self.last_seen.lock().await.get(neighbor_id) {
            Some(last) => now.saturating_sub(*last) <= crate::NEIGHBOR_DEAD_INTERVAL_SEC,
            None => false,
        }
    }

    /// Removes every entry that has timed out and returns the dead ids.
    pub async fn sweep_dead(&self, now: u64) -> Vec<String> {
        let mut guard = self.last_seen.lock().await;
        let dead: Vec<String> = guard
            .iter()
            .filter(|(_, last)| now.saturating_sub(**last) > crate::NEIGHBOR_DEAD_INTERVAL_SEC)
            .map(|(id, _)| id.clone())
            .collect();
        for id in &dead {
            guard.remove(id);
        }
        dead
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unheard_neighbor_is_not_alive() {
        let table = NeighborTable::new();
        assert!(!table.is_alive("r2", 100).await);
    }

    #[tokio::test]
    async fn neighbor_alive_within_dead_interval_then_swept_after() {
        let table = NeighborTable::new();
        table.mark_seen("r2", 0).await;
        assert!(table.is_alive("r2", crate::NEIGHBOR_DEAD_INTERVAL_SEC).await);
        assert!(table.sweep_dead(crate::NEIGHBOR_DEAD_INTERVAL_SEC).await.is_empty());

        assert!(!table.is_alive("r2", crate::NEIGHBOR_DEAD_INTERVAL_SEC + 1).await);
        let dead = table.sweep_dead(crate::NEIGHBOR_DEAD_INTERVAL_SEC + 1).await;
        assert_eq!(dead, vec!["r2".to_string()]);
        assert!(table.sweep_dead(crate::NEIGHBOR_DEAD_INTERVAL_SEC + 1).await.is_empty());
    }
}
