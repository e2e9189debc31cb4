// The link-state database: one entry per link id, replicated by flooding.
//
// Kept behind its own mutex (generalizing the teacher's single `topology`
// lock in `AppState`) and iterated via a `BTreeMap` so CSPF's graph
// construction sees a fixed, deterministic order regardless of LSA
// arrival order.

use std::collections::{BTreeMap, HashSet};
use std::net::IpAddr;
use tokio::sync::Mutex;

use crate::types::LinkRecord;

#[derive(Default)]
pub struct Lsdb {
    inner: Mutex<BTreeMap<String, LinkRecord>>,
}

impl Lsdb {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces `link` if absent or value-different. Returns
    /// whether the LSDB changed.
    pub async fn upsert(&self, link: LinkRecord) -> bool {
        let mut guard = self.inner.lock().await;
        match guard.get(&link.id) {
            Some(existing) if existing == &link => false,
            _ => {
                guard.insert(link.id.clone(), link);
                true
            }
        }
    }

    /// Removes every link record with `a` or `b` equal to `router_id`
    /// (the reference's dead-neighbor pruning). Returns the removed ids.
    pub async fn remove_involving(&self, router_id: &str) -> Vec<String> {
        let mut guard = self.inner.lock().await;
        let dead: Vec<String> = guard
            .iter()
            .filter(|(_, link)| link.a == router_id || link.b == router_id)
            .map(|(id, _)| id.clone())
            .collect();
        for id in &dead {
            guard.remove(id);
        }
        dead
    }

    /// A stable-ordered snapshot of all link records.
    pub async fn snapshot(&self) -> Vec<LinkRecord> {
        self.inner.lock().await.values().cloned().collect()
    }

    /// Resolves `dest_ip` to the router that owns the attached network it
    /// falls in, via a NET pseudo-link.
    pub async fn resolve_destination_router(&self, dest_ip: IpAddr) -> Option<String> {
        let guard = self.inner.lock().await;
        for link in guard.values() {
            if !link.is_net() {
                continue;
            }
            if let Some(network) = &link.network {
                if let Ok(net) = network.parse::<ipnetwork::IpNetwork>() {
                    if net.contains(dest_ip) {
                        return Some(link.a.clone());
                    }
                }
            }
        }
        None
    }

    /// The union of every NET pseudo-link's `network` field, used by the
    /// bootstrap re-install routine.
    pub async fn known_networks(&self) -> HashSet<String> {
        self.inner
            .lock()
            .await
            .values()
            .filter_map(|link| if link.is_net() { link.network.clone() } else { None })
            .collect()
    }

    /// Finds the adjacency link between `a` and `b`, in either direction.
    pub async fn find_adjacency(&self, a: &str, b: &str) -> Option<LinkRecord> {
        let guard = self.inner.lock().await;
        guard
            .values()
            .find(|link| !link.is_net() && ((link.a == a && link.b == b) || (link.a == b && link.b == a)))
            .cloned()
    }
}
