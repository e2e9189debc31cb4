// Receive loop: decodes inbound datagrams into `Message`s and dispatches
// each to its handler. Generalizes the teacher's integer-tagged
// `message_type` match into a match over the internally-tagged `Message`
// enum, so serde does the dispatch-key parsing instead of hand-rolled
// `json.get("message_type")` lookups.

use std::net::SocketAddr;
use std::sync::Arc;

use crate::error::Result;
use crate::types::Message;
use crate::AppState;

pub async fn main_loop(socket: Arc<tokio::net::UdpSocket>, state: Arc<AppState>) -> Result<()> {
    let mut buf = vec![0u8; crate::BUFFER_SIZE];
    loop {
        let (len, src_addr) = socket.recv_from(&mut buf).await?;
        let message: Message = match serde_json::from_slice(&buf[..len]) {
            Ok(message) => message,
            Err(e) => {
                log::warn!("failed to parse message from {}: {}", src_addr, e);
                continue;
            }
        };
        if let Err(e) = handle_message(&socket, &state, message, src_addr).await {
            log::error!("error handling message from {}: {}", src_addr, e);
        }
    }
}

async fn handle_message(socket: &Arc<tokio::net::UdpSocket>, state: &Arc<AppState>, message: Message, src_addr: SocketAddr) -> Result<()> {
    match message {
        Message::Hello { from } => {
            log::info!("[RECV] HELLO from {} ({})", from, src_addr);
            let now = crate::now_seq() as u64;
            state.neighbors.mark_seen(&from, now).await;
            let ack = Message::HelloAck { from: state.router_id().to_string() };
            crate::net_utils::send_message(socket, &src_addr, &ack, "[SEND] HELLO_ACK").await?;
            crate::flood::advertise_links(socket, state).await?;
        }
        Message::HelloAck { from } => {
            log::debug!("[RECV] HELLO_ACK from {} ({})", from, src_addr);
        }
        Message::LsaLink { origin, seq, links } => {
            log::info!("[RECV] LSA_LINK from {} (origin {}, seq {})", src_addr, origin, seq);
            let changed = crate::flood::handle_lsa(socket, state, &origin, seq, &links, src_addr.ip()).await;
            if changed {
                log::info!("LSDB changed, reinstalling existing routes for optimality");
                let socket = socket.clone();
                let state = state.clone();
                tokio::spawn(async move { crate::tasks::reinstall_known_routes(&socket, &state).await });
            }
        }
        Message::RequestRoute { dest, bw } => {
            log::info!("[RECV] REQUEST_ROUTE from {} for {} (bw={})", src_addr, dest, bw);
            let path = crate::cspf::compute_cspf(state, &dest, bw).await;
            if let Some(path) = &path {
                crate::route::install_path(socket, state, path, &dest, bw).await?;
            }
            let reply = Message::RequestReply { path };
            crate::net_utils::send_message(socket, &src_addr, &reply, "[SEND] REQUEST_REPLY").await?;
        }
        Message::InstallRoute { dest, next } => {
            log::info!("[RECV] INSTALL_ROUTE from {}: install {} via {}", src_addr, dest, next);
            state.installer.install(&dest, &next).await?;
        }
        Message::RequestReply { path } => {
            log::info!("[RECV] REQUEST_REPLY from {}: {:?}", src_addr, path);
        }
    }
    Ok(())
}
