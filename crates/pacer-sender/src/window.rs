//! Sender-side sliding window: a bounded, strictly-contiguous sequence of
//! outstanding packets.

use std::collections::{HashSet, VecDeque};

use pacer_common::PacketId;

pub const WINDOW_CAPACITY: usize = 10;

pub struct WindowSlot {
    pub id: PacketId,
    pub payload: Vec<u8>,
    pub acked: bool,
    pub transmissions: u64,
}

impl WindowSlot {
    fn new(id: PacketId, payload: Vec<u8>) -> Self {
        Self {
            id,
            payload,
            acked: false,
            transmissions: 0,
        }
    }
}

/// At most `capacity` slots in strict ascending id order. Compaction removes
/// only a contiguous acked prefix, so the first unacked slot always defines
/// the window base.
pub struct Window {
    slots: VecDeque<WindowSlot>,
    capacity: usize,
}

impl Window {
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Appends a slot for `id` iff the window isn't full. Returns whether it
    /// was admitted.
    pub fn add(&mut self, id: PacketId, payload: Vec<u8>) -> bool {
        if self.slots.len() >= self.capacity {
            return false;
        }
        self.slots.push_back(WindowSlot::new(id, payload));
        true
    }

    /// Marks every slot whose id is in `ids` as acked. Unknown ids are
    /// ignored, tolerating duplicate or late acks.
    pub fn set_acks(&mut self, ids: &HashSet<PacketId>) {
        for slot in self.slots.iter_mut() {
            if ids.contains(&slot.id) {
                slot.acked = true;
            }
        }
    }

    /// Removes the longest prefix of acked slots, returning how many were
    /// freed. Stops at the first unacked slot, preserving id contiguity.
    pub fn compact(&mut self) -> usize {
        let mut removed = 0;
        while matches!(self.slots.front(), Some(slot) if slot.acked) {
            self.slots.pop_front();
            removed += 1;
        }
        removed
    }

    pub fn unacked_count(&self) -> usize {
        self.slots.iter().filter(|s| !s.acked).count()
    }

    /// Unacked slots in id-ascending order, for the transmit burst.
    pub fn iterate_unacked(&mut self) -> impl Iterator<Item = &mut WindowSlot> {
        self.slots.iter_mut().filter(|s| !s.acked)
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(w: &mut Window) -> HashSet<PacketId> {
        w.iterate_unacked().map(|s| s.id).collect()
    }

    #[test]
    fn add_respects_capacity() {
        let mut w = Window::new(2);
        assert!(w.add(0, vec![]));
        assert!(w.add(1, vec![]));
        assert!(!w.add(2, vec![]));
        assert_eq!(w.len(), 2);
    }

    #[test]
    fn compact_removes_only_contiguous_acked_prefix() {
        let mut w = Window::new(4);
        w.add(0, vec![]);
        w.add(1, vec![]);
        w.add(2, vec![]);
        let mut acked = HashSet::new();
        acked.insert(0);
        acked.insert(2); // id 1 stays unacked, so 2 must not be compacted away
        w.set_acks(&acked);
        let removed = w.compact();
        assert_eq!(removed, 1);
        assert_eq!(ids(&mut w), HashSet::from([1, 2]));
    }

    #[test]
    fn double_compact_is_idempotent() {
        let mut w = Window::new(4);
        w.add(0, vec![]);
        let mut acked = HashSet::new();
        acked.insert(0);
        w.set_acks(&acked);
        assert_eq!(w.compact(), 1);
        assert_eq!(w.compact(), 0);
    }

    #[test]
    fn set_acks_is_idempotent() {
        let mut w = Window::new(4);
        w.add(0, vec![]);
        let mut acked = HashSet::new();
        acked.insert(0);
        w.set_acks(&acked);
        w.set_acks(&acked);
        assert_eq!(w.unacked_count(), 0);
    }

    #[test]
    fn unknown_ack_ids_are_ignored() {
        let mut w = Window::new(4);
        w.add(0, vec![]);
        let mut acked = HashSet::new();
        acked.insert(999);
        w.set_acks(&acked);
        assert_eq!(w.unacked_count(), 1);
    }
}
