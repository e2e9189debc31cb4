// Constrained shortest path first: builds a weighted graph from the LSDB
// minus current reservations and runs Dijkstra from the local router.
//
// Generalizes the teacher's `dijkstra.rs` — the priority-queue-driven
// relaxation loop and its `Ord`-on-a-struct tie-breaking idiom survive,
// but the metric is now the spec's floating-point
// `cost + delay/100 + 1/available_bandwidth` instead of the teacher's
// integer "100 Mbps reference bandwidth" OSPF cost, and the graph is
// built straight from LSDB link records rather than from local interface
// config.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};
use std::net::IpAddr;

use crate::types::Hop;
use crate::AppState;

#[derive(Debug, Clone)]
struct Edge {
    to: String,
    metric: f64,
    link_id: String,
    next_hop_ip: String,
}

/// A node on the Dijkstra frontier. `BinaryHeap` is a max-heap, so
/// `Ord` is reversed on `metric` to make it pop the smallest cumulative
/// cost first (the teacher's `DijkstraNode` applies the same trick to an
/// integer cost).
#[derive(Debug, Clone)]
struct Frontier {
    router_id: String,
    metric: f64,
}

impl PartialEq for Frontier {
    fn eq(&self, other: &Self) -> bool {
        self.metric == other.metric
    }
}
impl Eq for Frontier {}

impl Ord for Frontier {
    fn cmp(&self, other: &Self) -> Ordering {
        other.metric.partial_cmp(&self.metric).unwrap_or(Ordering::Equal)
    }
}
impl PartialOrd for Frontier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

fn link_metric(capacity: u32, delay: u32, cost: u32, reserved: u32, bw_required: u32) -> Option<f64> {
    let available = capacity.saturating_sub(reserved);
    if available < bw_required {
        return None;
    }
    let inverse_bandwidth = 1.0 / (available.max(1) as f64);
    Some(cost as f64 + (delay as f64 / 100.0) + inverse_bandwidth)
}

/// Computes a constrained shortest path from `state`'s router to
/// `dest_ip`, honoring `bw_required` against current reservations.
/// Returns `None` ("no path") if the destination is unknown or
/// unreachable under the bandwidth constraint.
pub async fn compute_cspf(state: &AppState, dest_ip: &str, bw_required: u32) -> Option<Vec<Hop>> {
    let dest_addr: IpAddr = dest_ip.parse().ok()?;
    let self_id = state.router_id().to_string();

    let dest_router = match state.lsdb.resolve_destination_router(dest_addr).await {
        Some(router) => router,
        None => {
            let locally_attached = state.config.attached_networks.iter().any(|net| {
                net.parse::<ipnetwork::IpNetwork>()
                    .map(|n| n.contains(dest_addr))
                    .unwrap_or(false)
            });
            if locally_attached {
                self_id.clone()
            } else {
                return None;
            }
        }
    };

    if dest_router == self_id {
        return Some(vec![Hop {
            router: self_id,
            link_id: None,
            iface_ip: state.local_ip.clone(),
        }]);
    }

    let mut graph: HashMap<String, Vec<Edge>> = HashMap::new();
    for link in state.lsdb.snapshot().await {
        if link.is_net() {
            continue;
        }
        let (capacity, delay, cost, ip_a, ip_b) = match (link.capacity, link.delay, link.cost, &link.ip_a, &link.ip_b) {
            (Some(c), Some(d), Some(co), Some(a), Some(b)) => (c, d, co, a.clone(), b.clone()),
            _ => continue,
        };
        let reserved = state.reservations.reserved(&link.id).await;
        let metric = match link_metric(capacity, delay, cost, reserved, bw_required) {
            Some(m) => m,
            None => continue,
        };
        graph.entry(link.a.clone()).or_default().push(Edge {
            to: link.b.clone(),
            metric,
            link_id: link.id.clone(),
            next_hop_ip: ip_b,
        });
        graph.entry(link.b.clone()).or_default().push(Edge {
            to: link.a.clone(),
            metric,
            link_id: link.id.clone(),
            next_hop_ip: ip_a,
        });
    }

    let mut dist: HashMap<String, f64> = HashMap::new();
    // prev[v] = (u, link_id, ip_of_v_on_that_link)
    let mut prev: HashMap<String, (String, String, String)> = HashMap::new();
    let mut heap = BinaryHeap::new();

    dist.insert(self_id.clone(), 0.0);
    heap.push(Frontier {
        router_id: self_id.clone(),
        metric: 0.0,
    });

    while let Some(current) = heap.pop() {
        if current.router_id == dest_router {
            break;
        }
        if current.metric > *dist.get(&current.router_id).unwrap_or(&f64::INFINITY) {
            continue;
        }
        for edge in graph.get(&current.router_id).into_iter().flatten() {
            let candidate = current.metric + edge.metric;
            let best = *dist.get(&edge.to).unwrap_or(&f64::INFINITY);
            if candidate < best {
                dist.insert(edge.to.clone(), candidate);
                prev.insert(
                    edge.to.clone(),
                    (current.router_id.clone(), edge.link_id.clone(), edge.next_hop_ip.clone()),
                );
                heap.push(Frontier {
                    router_id: edge.to.clone(),
                    metric: candidate,
                });
            }
        }
    }

    if !prev.contains_key(&dest_router) {
        return None;
    }

    // Walk back from destination to source.
    let mut reversed = Vec::new();
    let mut cur = dest_router.clone();
    while cur != self_id {
        let (prev_router, link_id, iface_ip) = prev.get(&cur)?.clone();
        reversed.push(Hop {
            router: cur.clone(),
            link_id: Some(link_id),
            iface_ip,
        });
        cur = prev_router;
    }

    // Source's own interface IP towards the first hop.
    let first_hop_router = reversed.last().map(|h| h.router.clone());
    let source_iface_ip = match &first_hop_router {
        Some(first_hop) => state
            .lsdb
            .find_adjacency(&self_id, first_hop)
            .await
            .and_then(|link| {
                if link.a == self_id {
                    link.ip_a
                } else {
                    link.ip_b
                }
            })
            .unwrap_or_else(|| state.local_ip.clone()),
        None => state.local_ip.clone(),
    };
    reversed.push(Hop {
        router: self_id,
        link_id: None,
        iface_ip: source_iface_ip,
    });
    reversed.reverse();
    Some(reversed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::install::RecordingRouteInstaller;
    use crate::read_config::RouterConfig;

    fn config(router_id: &str, local_ip: &str, attached: &[&str]) -> RouterConfig {
        RouterConfig {
            router_id: router_id.to_string(),
            local_ip: Some(local_ip.to_string()),
            port: crate::PORT,
            attached_networks: attached.iter().map(|s| s.to_string()).collect(),
            neighbors: vec![],
        }
    }

    fn state(router_id: &str, local_ip: &str, attached: &[&str]) -> AppState {
        AppState::new(
            config(router_id, local_ip, attached),
            local_ip.to_string(),
            std::sync::Arc::new(RecordingRouteInstaller::default()),
        )
    }

    async fn seed_triangle(state: &AppState) {
        state
            .lsdb
            .upsert(crate::types::LinkRecord::adjacency("r1-r2".into(), "r1", "r2", 50, 20, 1, "10.0.12.1", "10.0.12.2"))
            .await;
        state
            .lsdb
            .upsert(crate::types::LinkRecord::adjacency("r2-r3".into(), "r2", "r3", 10, 20, 1, "10.0.23.2", "10.0.23.3"))
            .await;
        state
            .lsdb
            .upsert(crate::types::LinkRecord::adjacency("r1-r3".into(), "r1", "r3", 100, 1, 1, "10.0.13.1", "10.0.13.3"))
            .await;
        state
            .lsdb
            .upsert(crate::types::LinkRecord::net_pseudo("r1-net-10.0.1.0/24".into(), "r1", "10.0.1.0/24"))
            .await;
        state
            .lsdb
            .upsert(crate::types::LinkRecord::net_pseudo("r2-net-10.0.2.0/24".into(), "r2", "10.0.2.0/24"))
            .await;
        state
            .lsdb
            .upsert(crate::types::LinkRecord::net_pseudo("r3-net-10.0.3.0/24".into(), "r3", "10.0.3.0/24"))
            .await;
    }

    #[tokio::test]
    async fn direct_low_delay_link_beats_the_two_hop_detour() {
        let state = state("r1", "10.0.13.1", &["10.0.1.0/24"]);
        seed_triangle(&state).await;

        let path = compute_cspf(&state, "10.0.3.10", 0).await.unwrap();
        let routers: Vec<&str> = path.iter().map(|h| h.router.as_str()).collect();
        assert_eq!(routers, vec!["r1", "r3"]);
        assert_eq!(path.last().unwrap().iface_ip, "10.0.13.3");
    }

    #[tokio::test]
    async fn bandwidth_reservation_forces_a_detour() {
        let state = state("r1", "10.0.13.1", &["10.0.1.0/24"]);
        seed_triangle(&state).await;
        state.reservations.reserve("r1-r3", 100).await;

        let path = compute_cspf(&state, "10.0.3.10", 1).await.unwrap();
        let routers: Vec<&str> = path.iter().map(|h| h.router.as_str()).collect();
        assert_eq!(routers, vec!["r1", "r2", "r3"]);
    }

    #[tokio::test]
    async fn infeasible_bandwidth_returns_no_path() {
        let state = state("r1", "10.0.13.1", &["10.0.1.0/24"]);
        seed_triangle(&state).await;

        assert!(compute_cspf(&state, "10.0.3.10", 120).await.is_none());
    }

    #[tokio::test]
    async fn destination_inside_own_attached_network_is_trivial() {
        let state = state("r1", "10.0.13.1", &["10.0.1.0/24"]);
        seed_triangle(&state).await;

        let path = compute_cspf(&state, "10.0.1.50", 0).await.unwrap();
        assert_eq!(path.len(), 1);
        assert_eq!(path[0].router, "r1");
    }

    #[tokio::test]
    async fn unknown_destination_returns_no_path() {
        let state = state("r1", "10.0.13.1", &["10.0.1.0/24"]);
        seed_triangle(&state).await;

        assert!(compute_cspf(&state, "192.168.99.1", 0).await.is_none());
    }
}
