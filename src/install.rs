// Kernel forwarding table installer: an injected abstraction so the core
// never depends on a real kernel being present. The production
// implementation shells a route through `net-route`'s netlink handle
// (the teacher's approach in `update_routing_table_safe`); tests use a
// recording stand-in instead.

use async_trait::async_trait;
use std::net::{IpAddr, Ipv4Addr};
use std::sync::Mutex;

use crate::error::{AppError, Result};

#[async_trait]
pub trait RouteInstaller: Send + Sync {
    async fn install(&self, dest_network: &str, next_hop: &str) -> Result<()>;
}

/// Installs routes via the kernel's routing table using `net-route`.
pub struct KernelRouteInstaller;

#[async_trait]
impl RouteInstaller for KernelRouteInstaller {
    async fn install(&self, dest_network: &str, next_hop: &str) -> Result<()> {
        let network: ipnetwork::Ipv4Network = dest_network
            .parse()
            .map_err(|e| AppError::RouteError(format!("invalid destination network {}: {}", dest_network, e)))?;
        let gateway: Ipv4Addr = next_hop
            .parse()
            .map_err(|e| AppError::RouteError(format!("invalid gateway ip {}: {}", next_hop, e)))?;

        let handle = net_route::Handle::new()
            .map_err(|e| AppError::RouteError(format!("cannot create routing handle (permissions?): {}", e)))?;

        let route = net_route::Route::new(IpAddr::V4(network.network()), network.prefix())
            .with_gateway(IpAddr::V4(gateway));

        match handle.add(&route).await {
            Ok(_) => {
                log::info!("route installed: {} via {}", dest_network, next_hop);
                Ok(())
            }
            Err(e) => {
                log::debug!("route add failed, trying replace: {}", e);
                let _ = handle.delete(&route).await;
                handle.add(&route).await.map_err(|e2| {
                    log::warn!("failed to add/replace route to {} via {}: {}", dest_network, next_hop, e2);
                    AppError::RouteError(format!("route install failed: {}", e2))
                })?;
                log::info!("route replaced: {} via {}", dest_network, next_hop);
                Ok(())
            }
        }
    }
}

/// Records installed routes instead of touching the host; used by tests
/// asserting invariant 6 (a router installs only routes it lies on).
#[derive(Default)]
pub struct RecordingRouteInstaller {
    pub installed: Mutex<Vec<(String, String)>>,
}

#[async_trait]
impl RouteInstaller for RecordingRouteInstaller {
    async fn install(&self, dest_network: &str, next_hop: &str) -> Result<()> {
        self.installed
            .lock()
            .unwrap()
            .push((dest_network.to_string(), next_hop.to_string()));
        Ok(())
    }
}
