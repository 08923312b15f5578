//! Emulator: forwards data forward and acks backward between a sender and
//! receiver, applying a selectable hazard that may drop or delay each
//! datagram.

use clap::Parser;
use mio::net::UdpSocket;
use pacer_common::net::loopback_addr;
use pacer_emulator::{EmulatorEngine, Hazard};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Port the sender transmits data to
    recv_bind: u16,

    /// Port the receiver transmits acks to
    ack_bind: u16,

    /// Port to forward (hazarded) data on to
    receiver_port: u16,

    /// Port to forward (hazarded) acks on to
    sender_port: u16,

    /// One of: random-loss, burst-loss, shallow-buffer, random-jitter
    hazard_name: String,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    println!("Task-pacer emulator starting");
    println!(
        "recv_bind={} ack_bind={} -> receiver={} sender={} hazard={}",
        args.recv_bind, args.ack_bind, args.receiver_port, args.sender_port, args.hazard_name
    );

    let hazard = Hazard::from_name(&args.hazard_name).map_err(|e| {
        eprintln!("[emulator] {e}");
        e
    })?;

    let data_socket = UdpSocket::bind(loopback_addr(args.recv_bind)).map_err(|e| {
        eprintln!("[emulator] bind failed on recv_bind: {e}");
        e
    })?;
    let ack_socket = UdpSocket::bind(loopback_addr(args.ack_bind)).map_err(|e| {
        eprintln!("[emulator] bind failed on ack_bind: {e}");
        e
    })?;

    let mut engine = EmulatorEngine::new(
        data_socket,
        ack_socket,
        loopback_addr(args.receiver_port),
        loopback_addr(args.sender_port),
        hazard,
    )?;

    engine.run()?;
    Ok(())
}
