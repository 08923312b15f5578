//! Sender engine: admits a finite id sequence into the window, transmits
//! unacked slots each tick, and retires them as acks arrive. No per-packet
//! timer — the loop tick is the effective retransmission timeout.

use std::collections::HashSet;
use std::net::{SocketAddr, UdpSocket};
use std::time::Duration;

use pacer_common::metrics::SenderMetrics;
use pacer_common::{codec, display::Display, payload, PacketId};

use crate::pacer::TokenBucket;
use crate::window::{Window, WINDOW_CAPACITY};

pub const TOTAL_IDS: u32 = 2 << 10; // 2048
pub const PAYLOAD_BYTE_COUNT: usize = 8;
pub const TICK: Duration = Duration::from_millis(100);
pub const ACK_TIMEOUT: Duration = Duration::from_millis(2);

pub struct SenderEngine {
    socket: UdpSocket,
    dest: SocketAddr,
    window: Window,
    token_bucket: Option<TokenBucket>,
    last_admitted: Option<PacketId>,
    total_ids: u32,
    metrics: SenderMetrics,
    display: Display,
}

impl SenderEngine {
    pub fn new(socket: UdpSocket, dest: SocketAddr, paced: bool) -> std::io::Result<Self> {
        Self::with_total_ids(socket, dest, paced, TOTAL_IDS)
    }

    /// Like `new`, but overrides the number of ids to admit. Used by tests
    /// that want a short run instead of the full sequence.
    pub fn with_total_ids(
        socket: UdpSocket,
        dest: SocketAddr,
        paced: bool,
        total_ids: u32,
    ) -> std::io::Result<Self> {
        socket.set_read_timeout(Some(ACK_TIMEOUT))?;
        Ok(Self {
            socket,
            dest,
            window: Window::new(WINDOW_CAPACITY),
            token_bucket: paced.then(|| {
                TokenBucket::new(crate::pacer::DEFAULT_RATE, crate::pacer::DEFAULT_CAPACITY)
            }),
            last_admitted: None,
            total_ids,
            metrics: SenderMetrics::default(),
            display: Display::new(),
        })
    }

    fn all_admitted(&self) -> bool {
        match self.last_admitted {
            Some(id) => id + 1 >= self.total_ids,
            None => self.total_ids == 0,
        }
    }

    /// Runs until every id has been admitted and the window has drained.
    pub fn run(&mut self) -> std::io::Result<SenderMetrics> {
        loop {
            let acked = self.drain_acks();
            self.window.set_acks(&acked);
            self.window.compact();

            self.admit_new_packets();
            self.transmit_burst();

            self.display.render(
                "pacer sender",
                &format!(
                    "{} window={} unacked={}",
                    self.metrics.stats_line(),
                    self.window.len(),
                    self.window.unacked_count()
                ),
            );

            if self.all_admitted() && self.window.is_empty() {
                break;
            }

            std::thread::sleep(TICK);
        }
        Ok(self.metrics)
    }

    /// Drains all pending acks within a bounded wait, tolerating duplicate
    /// or late acks by simply re-inserting into the set.
    fn drain_acks(&mut self) -> HashSet<PacketId> {
        let mut ids = HashSet::new();
        let deadline = std::time::Instant::now() + ACK_TIMEOUT;
        let mut buf = [0u8; 64];
        loop {
            match self.socket.recv_from(&mut buf) {
                Ok((n, _)) => {
                    if let Ok(pacer_common::Packet::Ack { id }) = codec::decode_ack(&buf[..n]) {
                        ids.insert(id);
                    }
                }
                Err(e)
                    if e.kind() == std::io::ErrorKind::WouldBlock
                        || e.kind() == std::io::ErrorKind::TimedOut =>
                {
                    break;
                }
                Err(e) => {
                    eprintln!("[sender] ack recv error: {e}");
                    break;
                }
            }
            if std::time::Instant::now() >= deadline {
                break;
            }
        }
        ids
    }

    fn admit_new_packets(&mut self) {
        while !self.all_admitted() {
            let next_id = self.last_admitted.map_or(0, |id| id + 1);
            let body = payload::build_payload(next_id, PAYLOAD_BYTE_COUNT);
            if !self.window.add(next_id, body) {
                break;
            }
            self.last_admitted = Some(next_id);
        }
    }

    fn transmit_burst(&mut self) {
        for slot in self.window.iterate_unacked() {
            if let Some(bucket) = self.token_bucket.as_mut() {
                if !bucket.try_consume() {
                    break;
                }
            }
            let datagram = codec::encode_data(slot.id, &slot.payload);
            match self.socket.send_to(&datagram, self.dest) {
                Ok(_) => {
                    slot.transmissions += 1;
                    self.metrics.total_sent += 1;
                    if slot.transmissions == 1 {
                        self.metrics.unique_sent += 1;
                    }
                }
                Err(e) => {
                    eprintln!("[sender] send failed for id {}: {e}", slot.id);
                }
            }
        }
    }
}
