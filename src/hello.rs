// HELLO emission: liveness probing for one configured neighbor.

use std::net::SocketAddr;

use crate::error::Result;
use crate::types::Message;

pub async fn send_hello(socket: &tokio::net::UdpSocket, addr: &SocketAddr, from: &str) -> Result<()> {
    let message = Message::Hello { from: from.to_string() };
    crate::net_utils::send_message(socket, addr, &message, "[SEND] HELLO").await
}
