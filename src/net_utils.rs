// Network helpers: address resolution and the generic "serialize as JSON,
// send on the shared socket" primitive every sender goes through.

use std::net::SocketAddr;

use crate::error::{AppError, Result};

/// Resolves a configured `(ip, port)` pair into a `SocketAddr`.
pub fn resolve_addr(ip: &str, port: u16) -> Result<SocketAddr> {
    format!("{}:{}", ip, port)
        .parse()
        .map_err(|e| AppError::NetworkError(format!("invalid address {}:{} ({})", ip, port, e)))
}

/// Serializes `message` as JSON and sends it on `socket`, logging the
/// send under `log_prefix` (e.g. `"[SEND] HELLO"`).
pub async fn send_message<T: serde::Serialize>(
    socket: &tokio::net::UdpSocket,
    addr: &SocketAddr,
    message: &T,
    log_prefix: &str,
) -> Result<()> {
    let serialized = serde_json::to_vec(message)?;
    socket
        .send_to(&serialized, addr)
        .await
        .map_err(|e| AppError::NetworkError(format!("failed to send message to {}: {}", addr, e)))?;
    log::debug!("{} sent to {}", log_prefix, addr);
    Ok(())
}
