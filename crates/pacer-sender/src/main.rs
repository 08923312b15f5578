//! Sender: transmits a finite, ordered sequence of application payloads to
//! a receiver, subject to loss, duplication, reordering, and delay imposed
//! by an emulator sitting between the two.

use clap::Parser;
use pacer_common::net::{bind_loopback, loopback_addr};
use pacer_sender::SenderEngine;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Local UDP port to bind to
    bind_port: u16,

    /// Destination port (the emulator's data-receiving socket)
    dest_port: u16,

    /// Enable token-bucket rate pacing
    #[arg(long)]
    paced: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    println!("Task-pacer sender starting");
    println!(
        "Binding {} -> forwarding to {} (paced={})",
        args.bind_port, args.dest_port, args.paced
    );

    let socket = bind_loopback(args.bind_port).map_err(|e| {
        eprintln!("[sender] bind failed: {e}");
        e
    })?;
    let dest = loopback_addr(args.dest_port);

    let mut engine = SenderEngine::new(socket, dest, args.paced)?;
    let metrics = engine.run()?;

    println!("Sender finished: {}", metrics.stats_line());
    Ok(())
}
