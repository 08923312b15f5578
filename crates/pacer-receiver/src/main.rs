//! Receiver: reconstructs the sender's ordered sequence, acknowledging every
//! received data packet and delivering to the consumer exactly once in
//! strictly ascending order.

use clap::Parser;
use pacer_common::net::{bind_loopback, loopback_addr};
use pacer_receiver::ReceiverEngine;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Local UDP port to bind to
    bind_port: u16,

    /// Port to send acks toward (the emulator's ack-receiving socket)
    ack_dest_port: u16,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    println!("Task-pacer receiver starting");
    println!(
        "Binding {} -> acking toward {}",
        args.bind_port, args.ack_dest_port
    );

    let socket = bind_loopback(args.bind_port).map_err(|e| {
        eprintln!("[receiver] bind failed: {e}");
        e
    })?;
    let ack_dest = loopback_addr(args.ack_dest_port);

    let mut engine = ReceiverEngine::new(socket, ack_dest);
    let mut delivered = 0u64;
    engine.run(|id, payload| {
        delivered += 1;
        if id % 100 == 0 {
            println!(
                "[receiver] delivered id {id} ({} bytes, {delivered} total)",
                payload.len()
            );
        }
    })?;

    Ok(())
}
