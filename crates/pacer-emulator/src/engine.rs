//! Emulator engine: polls two sockets, applies a hazard to each decoded
//! packet, and realises delay through a shared release-time-ordered queue.
//!
//! The two sockets are deliberately cross-wired: the socket that receives
//! Data from the sender is the one that forwards Acks back to it, and the
//! socket that receives Acks from the receiver is the one that forwards
//! Data on to it.

use std::net::SocketAddr;
use std::time::Duration;

use mio::net::UdpSocket;
use mio::{Events, Interest, Poll, Token};

use pacer_common::metrics::EmulatorMetrics;
use pacer_common::{codec, display::Display, time::now_ms, Packet, MAX_PAYLOAD};

use crate::delay_queue::{DelayEntry, DelayQueue};
use crate::hazard::{Direction, Hazard};

const DATA_TOKEN: Token = Token(0);
const ACK_TOKEN: Token = Token(1);
const POLL_TIMEOUT: Duration = Duration::from_millis(1);
const RECV_BUF_LEN: usize = 16 + MAX_PAYLOAD;

pub struct EmulatorEngine {
    data_socket: UdpSocket,
    ack_socket: UdpSocket,
    receiver_addr: SocketAddr,
    sender_addr: SocketAddr,
    hazard: Hazard,
    delay_queue: DelayQueue,
    metrics: EmulatorMetrics,
    display: Display,
    poll: Poll,
    events: Events,
}

impl EmulatorEngine {
    pub fn new(
        mut data_socket: UdpSocket,
        mut ack_socket: UdpSocket,
        receiver_addr: SocketAddr,
        sender_addr: SocketAddr,
        hazard: Hazard,
    ) -> std::io::Result<Self> {
        let poll = Poll::new()?;
        poll.registry()
            .register(&mut data_socket, DATA_TOKEN, Interest::READABLE)?;
        poll.registry()
            .register(&mut ack_socket, ACK_TOKEN, Interest::READABLE)?;

        Ok(Self {
            data_socket,
            ack_socket,
            receiver_addr,
            sender_addr,
            hazard,
            delay_queue: DelayQueue::new(),
            metrics: EmulatorMetrics::default(),
            display: Display::new(),
            poll,
            events: Events::with_capacity(128),
        })
    }

    /// Runs forever, forwarding data forward and acks backward while
    /// applying the configured hazard. Never terminates on its own.
    pub fn run(&mut self) -> std::io::Result<()> {
        loop {
            self.poll.poll(&mut self.events, Some(POLL_TIMEOUT))?;

            // Service both sockets every tick rather than an else-if chain,
            // so one direction never starves the other within a tick.
            let mut data_ready = false;
            let mut ack_ready = false;
            for event in self.events.iter() {
                match event.token() {
                    DATA_TOKEN if event.is_readable() => data_ready = true,
                    ACK_TOKEN if event.is_readable() => ack_ready = true,
                    _ => {}
                }
            }
            if data_ready {
                self.drain_data_socket();
            }
            if ack_ready {
                self.drain_ack_socket();
            }

            self.forward_ready();

            self.display
                .render("pacer emulator", &self.metrics.stats_line());
        }
    }

    fn drain_data_socket(&mut self) {
        let mut buf = [0u8; RECV_BUF_LEN];
        loop {
            match self.data_socket.recv_from(&mut buf) {
                Ok((n, _src)) => {
                    if let Ok(packet @ Packet::Data { .. }) = codec::decode_data(&buf[..n]) {
                        self.admit(Direction::ToReceiver, packet);
                    }
                }
                Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => break,
                Err(e) => {
                    eprintln!("[emulator] data socket recv error: {e}");
                    break;
                }
            }
        }
    }

    fn drain_ack_socket(&mut self) {
        let mut buf = [0u8; RECV_BUF_LEN];
        loop {
            match self.ack_socket.recv_from(&mut buf) {
                Ok((n, _src)) => {
                    if let Ok(packet @ Packet::Ack { .. }) = codec::decode_ack(&buf[..n]) {
                        self.admit(Direction::ToSender, packet);
                    }
                }
                Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => break,
                Err(e) => {
                    eprintln!("[emulator] ack socket recv error: {e}");
                    break;
                }
            }
        }
    }

    fn admit(&mut self, direction: Direction, packet: Packet) {
        let effects = self.hazard.get_effects(direction, packet.id());
        if effects.drop {
            self.metrics.dropped += 1;
            return;
        }
        self.delay_queue.push(DelayEntry {
            release_time_ms: now_ms() + effects.delay_ms,
            direction,
            packet,
        });
    }

    fn forward_ready(&mut self) {
        let now = now_ms();
        for entry in self.delay_queue.drain_ready(now) {
            let datagram = codec::encode(&entry.packet);
            let result = match entry.direction {
                Direction::ToReceiver => self.ack_socket.send_to(&datagram, self.receiver_addr),
                Direction::ToSender => self.data_socket.send_to(&datagram, self.sender_addr),
            };
            match result {
                Ok(_) => match entry.direction {
                    Direction::ToReceiver => self.metrics.fwd_data += 1,
                    Direction::ToSender => self.metrics.fwd_acks += 1,
                },
                Err(e) => eprintln!(
                    "[emulator] forward failed for id {}: {e}",
                    entry.packet.id()
                ),
            }
        }
    }
}
