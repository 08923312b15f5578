//! Receiver engine: acknowledges every received data packet, buffers
//! out-of-order arrivals, and delivers strictly ascending contiguous ids to
//! the consumer exactly once.

use std::net::{SocketAddr, UdpSocket};

use pacer_common::metrics::ReceiverMetrics;
use pacer_common::{codec, display::Display, Packet, PacketId, MAX_PAYLOAD};

use crate::reassembly::ReassemblySet;

/// Header + byte_count + MAX_PAYLOAD, generous enough for any Data datagram
/// the codec can produce.
const RECV_BUF_LEN: usize = 16 + MAX_PAYLOAD;

pub struct ReceiverEngine {
    socket: UdpSocket,
    ack_dest: SocketAddr,
    reassembly: ReassemblySet,
    last_delivered: Option<PacketId>,
    metrics: ReceiverMetrics,
    display: Display,
}

impl ReceiverEngine {
    pub fn new(socket: UdpSocket, ack_dest: SocketAddr) -> Self {
        Self {
            socket,
            ack_dest,
            reassembly: ReassemblySet::new(),
            last_delivered: None,
            metrics: ReceiverMetrics::default(),
            display: Display::new(),
        }
    }

    fn next_expected(&self) -> PacketId {
        self.last_delivered.map_or(0, |id| id + 1)
    }

    /// Runs forever, delivering each id to `on_deliver` exactly once in
    /// strictly ascending order. Never returns on its own.
    pub fn run(&mut self, mut on_deliver: impl FnMut(PacketId, &[u8])) -> std::io::Result<()> {
        let mut buf = [0u8; RECV_BUF_LEN];
        loop {
            let n = match self.socket.recv(&mut buf) {
                Ok(n) => n,
                Err(e) => {
                    eprintln!("[receiver] recv error: {e}");
                    continue;
                }
            };

            let packet = match codec::decode(&buf[..n]) {
                Ok(Packet::Data { id, payload }) => (id, payload),
                Ok(Packet::Ack { .. }) | Err(_) => continue,
            };
            let (id, payload) = packet;
            self.metrics.total_received += 1;

            let is_new_or_future = match self.last_delivered {
                Some(delivered) => id > delivered,
                None => true,
            };
            if is_new_or_future {
                self.reassembly.insert(id, payload);
            }

            if let Err(e) = self.send_ack(id) {
                eprintln!("[receiver] ack send failed for id {id}: {e}");
            }

            while let Some((delivered_id, delivered_payload)) =
                self.reassembly.take_next(self.next_expected())
            {
                on_deliver(delivered_id, &delivered_payload);
                self.last_delivered = Some(delivered_id);
                self.metrics.unique_received += 1;
            }

            self.display.render(
                "pacer receiver",
                &format!(
                    "{} buffered={} next_expected={}",
                    self.metrics.stats_line(),
                    self.reassembly.len(),
                    self.next_expected()
                ),
            );
        }
    }

    fn send_ack(&self, id: PacketId) -> std::io::Result<usize> {
        let datagram = codec::encode_ack(id);
        self.socket.send_to(&datagram, self.ack_dest)
    }
}
