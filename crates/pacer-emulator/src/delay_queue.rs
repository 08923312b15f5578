//! Priority queue over (release_time, packet) realising per-packet delay.
//! Tied release times drain in id order.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use pacer_common::types::MsTime;
use pacer_common::Packet;

use crate::hazard::Direction;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DelayEntry {
    pub release_time_ms: MsTime,
    pub direction: Direction,
    pub packet: Packet,
}

// BinaryHeap is a max-heap; reverse the comparison so the earliest
// release_time (and, on a tie, the lowest id) sorts to the top.
impl Ord for DelayEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .release_time_ms
            .cmp(&self.release_time_ms)
            .then_with(|| other.packet.id().cmp(&self.packet.id()))
    }
}

impl PartialOrd for DelayEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[derive(Default)]
pub struct DelayQueue {
    heap: BinaryHeap<DelayEntry>,
}

impl DelayQueue {
    pub fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
        }
    }

    pub fn push(&mut self, entry: DelayEntry) {
        self.heap.push(entry);
    }

    /// Removes and returns every entry whose release_time has passed,
    /// earliest (and lowest id on ties) first.
    pub fn drain_ready(&mut self, now: MsTime) -> Vec<DelayEntry> {
        let mut ready = Vec::new();
        while matches!(self.heap.peek(), Some(e) if e.release_time_ms <= now) {
            ready.push(self.heap.pop().unwrap());
        }
        ready
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pacer_common::Packet;

    fn entry(release_time_ms: MsTime, id: u32) -> DelayEntry {
        DelayEntry {
            release_time_ms,
            direction: Direction::ToReceiver,
            packet: Packet::Data {
                id,
                payload: vec![],
            },
        }
    }

    #[test]
    fn drains_only_ready_entries() {
        let mut q = DelayQueue::new();
        q.push(entry(100, 0));
        q.push(entry(200, 1));
        let ready = q.drain_ready(150);
        assert_eq!(ready.len(), 1);
        assert_eq!(ready[0].packet.id(), 0);
        assert!(!q.is_empty());
    }

    #[test]
    fn ties_drain_in_ascending_id_order() {
        let mut q = DelayQueue::new();
        q.push(entry(100, 5));
        q.push(entry(100, 2));
        q.push(entry(100, 9));
        let ready = q.drain_ready(100);
        let ids: Vec<u32> = ready.iter().map(|e| e.packet.id()).collect();
        assert_eq!(ids, vec![2, 5, 9]);
    }
}
