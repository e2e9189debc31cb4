// Startup wiring: logging, the shared UDP socket, and the initial AppState.

use std::sync::Arc;

use crate::error::Result;
use crate::install::{KernelRouteInstaller, RouteInstaller};
use crate::read_config::RouterConfig;
use crate::AppState;

pub fn init_logging_and_env() {
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info");
    }
    env_logger::init();
}

pub async fn init_socket(port: u16) -> Result<Arc<tokio::net::UdpSocket>> {
    let socket = Arc::new(tokio::net::UdpSocket::bind(format!("0.0.0.0:{}", port)).await?);
    Ok(socket)
}

pub fn init_state(config: RouterConfig) -> Arc<AppState> {
    let local_ip = config.local_ip.clone().unwrap_or_else(|| "0.0.0.0".to_string());
    let installer: Arc<dyn RouteInstaller> = Arc::new(KernelRouteInstaller);
    Arc::new(AppState::new(config, local_ip, installer))
}
