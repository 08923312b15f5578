//! End-to-end checks that wire a real sender and receiver together over
//! loopback UDP, with no emulator between them (the no-hazard seed
//! scenario). Exercises the full admit/transmit/ack/reassemble path across
//! process-shaped boundaries within a single test binary.

use std::net::UdpSocket;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use pacer_receiver::ReceiverEngine;
use pacer_sender::SenderEngine;

#[test]
fn no_hazard_delivers_all_ids_in_order() {
    let sender_socket = UdpSocket::bind("127.0.0.1:0").unwrap();
    let receiver_socket = UdpSocket::bind("127.0.0.1:0").unwrap();
    let sender_addr = sender_socket.local_addr().unwrap();
    let receiver_addr = receiver_socket.local_addr().unwrap();

    let (tx, rx) = mpsc::channel();
    let receiver_handle = thread::spawn(move || {
        let mut engine = ReceiverEngine::new(receiver_socket, sender_addr);
        let _ = engine.run(|id, payload| {
            let _ = tx.send((id, payload.to_vec()));
        });
    });

    let mut sender = SenderEngine::with_total_ids(sender_socket, receiver_addr, false, 10).unwrap();
    let metrics = sender.run().unwrap();

    assert_eq!(metrics.total_sent, 10);
    assert_eq!(metrics.unique_sent, 10);

    let mut delivered = Vec::new();
    for _ in 0..10 {
        let (id, payload) = rx
            .recv_timeout(Duration::from_secs(2))
            .expect("receiver did not deliver all ten ids in time");
        delivered.push((id, payload));
    }

    for (expected_id, (id, payload)) in delivered.iter().enumerate() {
        assert_eq!(*id, expected_id as u32);
        assert!(payload.iter().all(|&b| b == (*id & 0xFF) as u8));
        assert_eq!(payload.len(), 8);
    }

    // Receiver thread blocks forever on the next recv; this test leaks it
    // deliberately rather than teach the engine a shutdown signal it has no
    // other use for.
    drop(receiver_handle);
}

#[test]
fn duplicate_acks_and_retransmissions_still_converge() {
    let sender_socket = UdpSocket::bind("127.0.0.1:0").unwrap();
    let receiver_socket = UdpSocket::bind("127.0.0.1:0").unwrap();
    let sender_addr = sender_socket.local_addr().unwrap();
    let receiver_addr = receiver_socket.local_addr().unwrap();

    let (tx, rx) = mpsc::channel();
    let _receiver_handle = thread::spawn(move || {
        let mut engine = ReceiverEngine::new(receiver_socket, sender_addr);
        let _ = engine.run(|id, payload| {
            let _ = tx.send((id, payload.to_vec()));
        });
    });

    let mut sender = SenderEngine::with_total_ids(sender_socket, receiver_addr, true, 5).unwrap();
    let metrics = sender.run().unwrap();

    assert_eq!(metrics.unique_sent, 5);
    assert!(metrics.total_sent >= metrics.unique_sent);

    let mut ids: Vec<u32> = (0..5)
        .map(|_| {
            rx.recv_timeout(Duration::from_secs(2))
                .expect("receiver did not deliver in time")
                .0
        })
        .collect();
    ids.sort_unstable();
    assert_eq!(ids, vec![0, 1, 2, 3, 4]);
}
