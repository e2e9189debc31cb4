// Background tasks: periodic HELLO emission, periodic LSA re-advertisement,
// neighbor-timeout sweeping, and the bootstrap/reconverge routine that
// reinstalls every known route after the topology changes.

use std::sync::Arc;

use crate::AppState;

/// Sends a HELLO to every configured neighbor and re-advertises this
/// router's own links, on a fixed interval.
pub fn spawn_hello_and_lsa_tasks(socket: Arc<tokio::net::UdpSocket>, state: Arc<AppState>) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(std::time::Duration::from_secs(crate::HELLO_INTERVAL_SEC));
        loop {
            interval.tick().await;
            for neighbor in &state.config.neighbors {
                let addr = match crate::net_utils::resolve_addr(&neighbor.ip, neighbor.port) {
                    Ok(addr) => addr,
                    Err(e) => {
                        log::warn!("hello: bad neighbor address {}: {}", neighbor.ip, e);
                        continue;
                    }
                };
                if let Err(e) = crate::hello::send_hello(&socket, &addr, state.router_id()).await {
                    log::error!("failed to send hello to {}: {}", addr, e);
                }
            }
            if let Err(e) = crate::flood::advertise_links(&socket, &state).await {
                log::error!("failed to advertise links: {}", e);
            }
        }
    });
}

/// Sweeps dead neighbors, prunes their links (and reservations) from the
/// LSDB, re-advertises and reconverges when a sweep actually changed
/// anything.
pub fn spawn_neighbor_timeout_task(socket: Arc<tokio::net::UdpSocket>, state: Arc<AppState>) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(std::time::Duration::from_secs(crate::HELLO_INTERVAL_SEC));
        loop {
            interval.tick().await;
            let now = crate::now_seq() as u64;
            let dead = state.neighbors.sweep_dead(now).await;
            if dead.is_empty() {
                continue;
            }
            log::info!("neighbors considered dead: {:?}", dead);

            let mut removed_any = false;
            for neighbor_id in &dead {
                let removed = state.lsdb.remove_involving(neighbor_id).await;
                for link_id in &removed {
                    state.reservations.remove(link_id).await;
                }
                removed_any |= !removed.is_empty();
            }

            if removed_any {
                if let Err(e) = crate::flood::advertise_links(&socket, &state).await {
                    log::error!("failed to advertise links after neighbor death: {}", e);
                }
                log::info!("recomputing all routes after neighbor death");
                reinstall_known_routes(&socket, &state).await;
            }
        }
    });
}

/// The first usable host address in `network` (`a.b.c.0/24` -> `a.b.c.1`),
/// used as a CSPF probe destination — the path, not the address, is what
/// gets installed.
fn first_host(network: &str) -> Option<String> {
    let net: ipnetwork::Ipv4Network = network.parse().ok()?;
    let base = u32::from(net.network());
    Some(std::net::Ipv4Addr::from(base.wrapping_add(1)).to_string())
}

/// Recomputes and reinstalls a path to every network known through the
/// LSDB (skipping this router's own attached networks), used at startup
/// and whenever the topology changes.
pub async fn reinstall_known_routes(socket: &tokio::net::UdpSocket, state: &Arc<AppState>) {
    let mut networks = state.lsdb.known_networks().await;
    for net in &state.config.attached_networks {
        networks.remove(net);
    }

    for network in networks {
        if state.config.attached_networks.contains(&network) {
            continue;
        }
        let candidate = match first_host(&network) {
            Some(ip) => ip,
            None => {
                log::warn!("cannot derive a probe host for network {}", network);
                continue;
            }
        };
        match crate::cspf::compute_cspf(state, &candidate, 0).await {
            Some(path) => {
                log::info!("reinstalling route to network {} via path {:?}", network, path);
                if let Err(e) = crate::route::install_path(socket, state, &path, &candidate, 0).await {
                    log::error!("failed to install route to {}: {}", network, e);
                }
            }
            None => log::debug!("no path to network {}", network),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_host_is_the_first_address_after_the_network_address() {
        assert_eq!(first_host("10.0.3.0/24").as_deref(), Some("10.0.3.1"));
    }
}
