// routingctl: a small interactive client that asks a running router to
// compute and install a path, then prints back what it resolved.

use std::io::{self, Write};
use std::net::UdpSocket;

use routingd::types::Message;

fn prompt(label: &str, default: &str) -> io::Result<String> {
    print!("{} [{}]: ", label, default);
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    let trimmed = line.trim();
    Ok(if trimmed.is_empty() { default.to_string() } else { trimmed.to_string() })
}

fn help() {
    println!("Enter a destination IP and a required bandwidth (0 for best-effort).");
    println!("Type 'exit' as the destination to quit.");
}

fn main() -> io::Result<()> {
    let router_ip = prompt("Router address", "127.0.0.1")?;
    let router_port: u16 = prompt("Router port", &routingd::PORT.to_string())?.parse().unwrap_or(routingd::PORT);
    let server_addr = format!("{}:{}", router_ip, router_port);

    let socket = UdpSocket::bind("0.0.0.0:0")?;
    println!("connected to {}", server_addr);
    help();

    loop {
        let dest = prompt("\nDestination", "exit")?;
        if dest == "exit" {
            println!("bye");
            break;
        }
        let bw: u32 = prompt("Required bandwidth", "0")?.parse().unwrap_or(0);

        let request = Message::RequestRoute { dest: dest.clone(), bw };
        let serialized = serde_json::to_vec(&request).expect("message always serializes");
        socket.send_to(&serialized, &server_addr)?;

        let mut buffer = [0u8; 65535];
        match socket.recv_from(&mut buffer) {
            Ok((size, _)) => match serde_json::from_slice::<Message>(&buffer[..size]) {
                Ok(Message::RequestReply { path: Some(path) }) => {
                    println!("path to {}:", dest);
                    for hop in path {
                        println!("  {} via {}", hop.router, hop.iface_ip);
                    }
                }
                Ok(Message::RequestReply { path: None }) => println!("no path to {}", dest),
                Ok(other) => println!("unexpected reply: {:?}", other),
                Err(e) => println!("failed to decode reply: {}", e),
            },
            Err(e) => println!("error receiving reply: {}", e),
        }
    }

    Ok(())
}
