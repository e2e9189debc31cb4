// Wire records and LSDB value types shared across the daemon.

use serde::{Deserialize, Serialize};

/// One entry in an LSA's `links[]`. For a router-to-router adjacency every
/// field is populated; for a NET pseudo-link only `a`, `b="NET"` and
/// `network` carry meaning (the rest are skipped on the wire).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkRecord {
    pub id: String,
    pub a: String,
    pub b: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capacity: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delay: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip_a: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip_b: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network: Option<String>,
}

impl LinkRecord {
    pub fn is_net(&self) -> bool {
        self.b == "NET"
    }

    pub fn adjacency(id: String, a: &str, b: &str, capacity: u32, delay: u32, cost: u32, ip_a: &str, ip_b: &str) -> Self {
        LinkRecord {
            id,
            a: a.to_string(),
            b: b.to_string(),
            capacity: Some(capacity),
            delay: Some(delay),
            cost: Some(cost),
            ip_a: Some(ip_a.to_string()),
            ip_b: Some(ip_b.to_string()),
            network: None,
        }
    }

    pub fn net_pseudo(id: String, a: &str, network: &str) -> Self {
        LinkRecord {
            id,
            a: a.to_string(),
            b: "NET".to_string(),
            capacity: None,
            delay: None,
            cost: None,
            ip_a: None,
            ip_b: None,
            network: Some(network.to_string()),
        }
    }
}

/// A single hop in a computed path: the router at this hop, the link id
/// that was traversed to reach it from the previous hop (`None` for the
/// source), and this router's interface IP on that link.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hop {
    pub router: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link_id: Option<String>,
    pub iface_ip: String,
}

/// The six control messages the daemon speaks on its UDP port, tagged by
/// `type` on the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Message {
    #[serde(rename = "HELLO")]
    Hello { from: String },
    #[serde(rename = "HELLO_ACK")]
    HelloAck { from: String },
    #[serde(rename = "LSA_LINK")]
    LsaLink {
        origin: String,
        seq: u32,
        links: Vec<LinkRecord>,
    },
    #[serde(rename = "REQUEST_ROUTE")]
    RequestRoute { dest: String, bw: u32 },
    #[serde(rename = "INSTALL_ROUTE")]
    InstallRoute { dest: String, next: String },
    #[serde(rename = "REQUEST_REPLY")]
    RequestReply { path: Option<Vec<Hop>> },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hello_round_trips() {
        let msg = Message::Hello { from: "r1".to_string() };
        let encoded = serde_json::to_vec(&msg).unwrap();
        let decoded: Message = serde_json::from_slice(&encoded).unwrap();
        match decoded {
            Message::Hello { from } => assert_eq!(from, "r1"),
            other => panic!("unexpected decode: {:?}", other),
        }
    }

    #[test]
    fn lsa_round_trips_field_for_field() {
        let links = vec![
            LinkRecord::adjacency("r1-r2".into(), "r1", "r2", 50, 20, 1, "10.0.0.1", "10.0.0.2"),
            LinkRecord::net_pseudo("r1-net-10.0.1.0/24".into(), "r1", "10.0.1.0/24"),
        ];
        let msg = Message::LsaLink {
            origin: "r1".to_string(),
            seq: 42,
            links: links.clone(),
        };
        let encoded = serde_json::to_vec(&msg).unwrap();
        let decoded: Message = serde_json::from_slice(&encoded).unwrap();
        match decoded {
            Message::LsaLink { origin, seq, links: decoded_links } => {
                assert_eq!(origin, "r1");
                assert_eq!(seq, 42);
                assert_eq!(decoded_links, links);
            }
            other => panic!("unexpected decode: {:?}", other),
        }
    }

    #[test]
    fn request_reply_with_null_path_round_trips() {
        let msg = Message::RequestReply { path: None };
        let encoded = serde_json::to_vec(&msg).unwrap();
        let decoded: Message = serde_json::from_slice(&encoded).unwrap();
        match decoded {
            Message::RequestReply { path } => assert!(path.is_none()),
            other => panic!("unexpected decode: {:?}", other),
        }
    }
}
