// Library interface for the routing daemon: shared state, wire types and
// the constants every module ties its timing and defaults to.

pub mod cspf;
pub mod error;
pub mod flood;
pub mod hello;
pub mod init;
pub mod install;
pub mod lsdb;
pub mod neighbor;
pub mod net_utils;
pub mod packet_loop;
pub mod read_config;
pub mod reservation;
pub mod route;
pub mod seen;
pub mod tasks;
pub mod types;

pub use error::{AppError, Result};

/// UDP port the daemon listens and sends HELLO/LSA/route traffic on,
/// unless overridden per-router in the config file.
pub const PORT: u16 = 50000;
/// Interval between HELLO emissions and periodic LSA re-advertisement.
pub const HELLO_INTERVAL_SEC: u64 = 2;
/// A neighbor not heard from within this many seconds is declared dead.
pub const NEIGHBOR_DEAD_INTERVAL_SEC: u64 = HELLO_INTERVAL_SEC * 4;
/// Receive buffer for inbound UDP datagrams.
pub const BUFFER_SIZE: usize = 65535;

use std::sync::Arc;

use lsdb::Lsdb;
use neighbor::NeighborTable;
use read_config::RouterConfig;
use reservation::ReservationLedger;
use seen::SeenLsaSet;

/// All mutable state shared between the receive loop and the background
/// tasks. Each map guards itself with its own lock (generalizing the
/// teacher's single coarse `Mutex<Topology>`) so an LSA flood and a route
/// install never contend on an unrelated table.
pub struct AppState {
    pub config: RouterConfig,
    pub local_ip: String,
    pub lsdb: Lsdb,
    pub neighbors: NeighborTable,
    pub reservations: ReservationLedger,
    pub seen_lsas: SeenLsaSet,
    pub installer: Arc<dyn install::RouteInstaller>,
}

impl AppState {
    pub fn new(config: RouterConfig, local_ip: String, installer: Arc<dyn install::RouteInstaller>) -> Self {
        AppState {
            config,
            local_ip,
            lsdb: Lsdb::new(),
            neighbors: NeighborTable::new(),
            reservations: ReservationLedger::new(),
            seen_lsas: SeenLsaSet::new(),
            installer,
        }
    }

    pub fn router_id(&self) -> &str {
        &self.config.router_id
    }
}

/// Seconds since the Unix epoch, used as the LSA sequence number (a newer
/// advertisement from the same origin always compares greater).
pub fn now_seq() -> u32 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as u32
}
