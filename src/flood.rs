// LSA construction and flooding: advertise this router's links, and
// re-flood others' LSAs to every neighbor except the one it arrived from
// (split horizon — generalizes the teacher's TTL-and-path-based
// `forward_lsa`, which this protocol replaces with a seen-set instead).

use std::net::IpAddr;
use std::sync::Arc;

use crate::error::Result;
use crate::types::{LinkRecord, Message};
use crate::AppState;

/// Sends `message` to every configured neighbor, skipping `exclude_ip`
/// (the sender we just received it from, to avoid bouncing it straight
/// back).
pub async fn flood_lsa(socket: &tokio::net::UdpSocket, state: &AppState, message: &Message, exclude_ip: Option<&str>) {
    for neighbor in &state.config.neighbors {
        if exclude_ip == Some(neighbor.ip.as_str()) {
            continue;
        }
        let addr = match crate::net_utils::resolve_addr(&neighbor.ip, neighbor.port) {
            Ok(addr) => addr,
            Err(e) => {
                log::warn!("flood: bad neighbor address {}: {}", neighbor.ip, e);
                continue;
            }
        };
        if let Err(e) = crate::net_utils::send_message(socket, &addr, message, "[FLOOD] LSA").await {
            log::warn!("flood to {} failed: {}", neighbor.ip, e);
        }
    }
}

/// Builds this router's own LSA from its alive neighbors and attached
/// networks and floods it. Neighbors not yet confirmed alive are left
/// out, so a cold-started router doesn't advertise links it hasn't
/// actually verified.
pub async fn advertise_links(socket: &tokio::net::UdpSocket, state: &AppState) -> Result<()> {
    let now = crate::now_seq() as u64;
    let mut links = Vec::new();

    for neighbor in &state.config.neighbors {
        if !state.neighbors.is_alive(&neighbor.id, now).await {
            continue;
        }
        let local_iface_ip = state.config.local_ip_towards(&neighbor.id).unwrap_or_else(|| state.local_ip.clone());
        links.push(LinkRecord::adjacency(
            format!("{}-{}", state.router_id(), neighbor.id),
            state.router_id(),
            &neighbor.id,
            neighbor.capacity,
            neighbor.delay_ms,
            neighbor.cost,
            &local_iface_ip,
            &neighbor.ip,
        ));
    }

    for network in &state.config.attached_networks {
        links.push(LinkRecord::net_pseudo(
            format!("{}-net-{}", state.router_id(), network),
            state.router_id(),
            network,
        ));
    }

    log::info!("advertising LSA (links={})", links.len());
    let lsa = Message::LsaLink {
        origin: state.router_id().to_string(),
        seq: crate::now_seq(),
        links,
    };
    flood_lsa(socket, state, &lsa, None).await;
    Ok(())
}

/// Handles an inbound `LSA_LINK`: updates the LSDB, re-floods unless
/// already seen, and reports whether anything changed (the caller
/// triggers a route recompute when it did).
pub async fn handle_lsa(
    socket: &tokio::net::UdpSocket,
    state: &Arc<AppState>,
    origin: &str,
    seq: u32,
    links: &[LinkRecord],
    sender_ip: IpAddr,
) -> bool {
    if !state.seen_lsas.insert_if_new((origin.to_string(), seq)).await {
        log::debug!("ignoring duplicate LSA from {} seq {}", origin, seq);
        return false;
    }

    let mut changed = false;
    for link in links {
        if state.lsdb.upsert(link.clone()).await {
            changed = true;
        }
    }
    log::debug!("LSDB updated from {} seq {} (changed={})", origin, seq, changed);

    let message = Message::LsaLink {
        origin: origin.to_string(),
        seq,
        links: links.to_vec(),
    };
    flood_lsa(socket, state, &message, Some(&sender_ip.to_string())).await;

    changed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::install::RecordingRouteInstaller;
    use crate::read_config::{NeighborConfig, RouterConfig};

    fn state_with_one_alive_neighbor() -> AppState {
        let config = RouterConfig {
            router_id: "r1".to_string(),
            local_ip: Some("10.0.12.1".to_string()),
            port: crate::PORT,
            attached_networks: vec!["10.0.1.0/24".to_string()],
            neighbors: vec![NeighborConfig {
                id: "r2".to_string(),
                ip: "10.0.12.2".to_string(),
                port: crate::PORT,
                local_ip: None,
                capacity: 50,
                delay_ms: 20,
                cost: 1,
            }],
        };
        AppState::new(config, "10.0.12.1".to_string(), Arc::new(RecordingRouteInstaller::default()))
    }

    #[tokio::test]
    async fn handle_lsa_deduplicates_by_origin_and_seq() {
        let socket = tokio::net::UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let state = Arc::new(state_with_one_alive_neighbor());
        let links = vec![LinkRecord::adjacency("r2-r3".into(), "r2", "r3", 10, 20, 1, "10.0.23.2", "10.0.23.3")];

        let changed = handle_lsa(&socket, &state, "r2", 7, &links, "10.0.12.2".parse().unwrap()).await;
        assert!(changed);

        let changed_again = handle_lsa(&socket, &state, "r2", 7, &links, "10.0.12.2".parse().unwrap()).await;
        assert!(!changed_again);
    }
}
