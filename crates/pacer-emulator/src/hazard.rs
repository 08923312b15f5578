//! Hazard models: given a packet direction and id, decide whether to drop
//! it and how long to delay it. The set of hazards is closed and selected
//! once at startup, so this is a sum type with one arm per hazard rather
//! than a vtable over a narrow trait.

use std::error::Error;
use std::fmt;

use pacer_common::types::{MsTime, PacketId};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Data travelling sender -> receiver.
    ToReceiver,
    /// Ack travelling receiver -> sender.
    ToSender,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Effects {
    pub drop: bool,
    pub delay_ms: MsTime,
}

#[derive(Debug)]
pub struct UnknownHazard(pub String);

impl fmt::Display for UnknownHazard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown hazard name: {}", self.0)
    }
}

impl Error for UnknownHazard {}

pub struct IndependentLoss {
    p: f64,
    rng: StdRng,
}

impl IndependentLoss {
    pub fn new(p: f64) -> Self {
        Self {
            p,
            rng: StdRng::from_entropy(),
        }
    }

    fn get_effects(&mut self) -> Effects {
        Effects {
            drop: self.rng.gen_bool(self.p.clamp(0.0, 1.0)),
            delay_ms: 0,
        }
    }
}

pub struct BurstLoss {
    p_mark: f64,
    p_start: f64,
    drop_count: u64,
    dropping: bool,
    rng: StdRng,
}

impl BurstLoss {
    pub fn new(p_mark: f64, p_start: f64) -> Self {
        Self {
            p_mark,
            p_start,
            drop_count: 0,
            dropping: false,
            rng: StdRng::from_entropy(),
        }
    }

    fn get_effects(&mut self) -> Effects {
        if self.rng.gen_bool(self.p_mark.clamp(0.0, 1.0)) {
            self.drop_count += 1;
        }

        if !self.dropping && self.drop_count > 0 && self.rng.gen_bool(self.p_start.clamp(0.0, 1.0))
        {
            self.dropping = true;
        }

        let drop = if self.dropping {
            self.drop_count -= 1;
            if self.drop_count == 0 {
                self.dropping = false;
            }
            true
        } else {
            false
        };

        Effects { drop, delay_ms: 0 }
    }
}

pub struct ShallowBuffer {
    capacity: u64,
    drain_rate: f64,
    occupancy: u64,
    last_drain_ms: MsTime,
}

impl ShallowBuffer {
    pub fn new(capacity: u64, drain_rate: f64) -> Self {
        Self {
            capacity,
            drain_rate,
            occupancy: 0,
            last_drain_ms: pacer_common::time::now_ms(),
        }
    }

    /// Drains `floor(elapsed_sec * drain_rate)` slots, capped at occupancy,
    /// advancing `last_drain_ms` only by the time actually accounted for so
    /// fractional progress survives to the next call instead of resetting
    /// to zero every tick.
    fn drain(&mut self) {
        let now = pacer_common::time::now_ms();
        let elapsed_ms = now.saturating_sub(self.last_drain_ms);
        let elapsed_sec = elapsed_ms as f64 / 1000.0;
        let slots = (elapsed_sec * self.drain_rate).floor() as u64;
        let drained = slots.min(self.occupancy);
        self.occupancy -= drained;
        if drained > 0 {
            let consumed_ms = (drained as f64 / self.drain_rate * 1000.0) as u64;
            self.last_drain_ms += consumed_ms;
        }
    }

    fn get_effects(&mut self, direction: Direction) -> Effects {
        // Acks bypass the buffer entirely.
        if direction == Direction::ToSender {
            return Effects {
                drop: false,
                delay_ms: 0,
            };
        }

        self.drain();
        if self.occupancy >= self.capacity {
            Effects {
                drop: true,
                delay_ms: 0,
            }
        } else {
            self.occupancy += 1;
            Effects {
                drop: false,
                delay_ms: 0,
            }
        }
    }
}

pub struct Jitter {
    dist: Normal<f64>,
    rng: StdRng,
}

impl Jitter {
    pub fn new(mean_ms: f64, std_ms: f64) -> Self {
        Self {
            dist: Normal::new(mean_ms, std_ms).expect("valid normal distribution parameters"),
            rng: StdRng::from_entropy(),
        }
    }

    fn get_effects(&mut self) -> Effects {
        let sample = self.dist.sample(&mut self.rng);
        Effects {
            drop: false,
            delay_ms: sample.max(0.0) as MsTime,
        }
    }
}

pub enum Hazard {
    IndependentLoss(IndependentLoss),
    BurstLoss(BurstLoss),
    ShallowBuffer(ShallowBuffer),
    Jitter(Jitter),
}

impl Hazard {
    pub fn from_name(name: &str) -> Result<Self, UnknownHazard> {
        match name {
            "random-loss" => Ok(Hazard::IndependentLoss(IndependentLoss::new(0.05))),
            "burst-loss" => Ok(Hazard::BurstLoss(BurstLoss::new(0.05, 0.005))),
            "shallow-buffer" => Ok(Hazard::ShallowBuffer(ShallowBuffer::new(5, 60.0))),
            "random-jitter" => Ok(Hazard::Jitter(Jitter::new(100.0, 80.0))),
            other => Err(UnknownHazard(other.to_string())),
        }
    }

    pub fn get_effects(&mut self, direction: Direction, _id: PacketId) -> Effects {
        match self {
            Hazard::IndependentLoss(h) => h.get_effects(),
            Hazard::BurstLoss(h) => h.get_effects(),
            Hazard::ShallowBuffer(h) => h.get_effects(direction),
            Hazard::Jitter(h) => h.get_effects(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn independent_loss_zero_probability_never_drops() {
        let mut h = IndependentLoss::new(0.0);
        for _ in 0..100 {
            assert!(!h.get_effects().drop);
        }
    }

    #[test]
    fn independent_loss_full_probability_always_drops() {
        let mut h = IndependentLoss::new(1.0);
        for _ in 0..100 {
            assert!(h.get_effects().drop);
        }
    }

    #[test]
    fn burst_loss_exits_burst_after_drop_count_exhausted() {
        // p_mark=1 so every tick marks, p_start=1 so it bursts immediately.
        let mut h = BurstLoss::new(1.0, 1.0);
        let first = h.get_effects();
        assert!(first.drop);
        // drop_count was 1 (marked this tick before bursting), so the burst
        // must have ended already.
        assert!(!h.dropping);
    }

    #[test]
    fn shallow_buffer_drops_once_full() {
        let mut h = ShallowBuffer::new(2, 0.0); // no drain, so it fills permanently
        assert!(!h.get_effects(Direction::ToReceiver).drop);
        assert!(!h.get_effects(Direction::ToReceiver).drop);
        assert!(h.get_effects(Direction::ToReceiver).drop);
    }

    #[test]
    fn shallow_buffer_bypasses_acks() {
        let mut h = ShallowBuffer::new(0, 0.0);
        let e = h.get_effects(Direction::ToSender);
        assert!(!e.drop);
        assert_eq!(e.delay_ms, 0);
    }

    #[test]
    fn jitter_never_produces_negative_delay() {
        let mut h = Jitter::new(-1000.0, 1.0);
        for _ in 0..50 {
            assert!(h.get_effects().delay_ms >= 0);
        }
    }

    #[test]
    fn from_name_rejects_unknown_hazard() {
        assert!(Hazard::from_name("not-a-hazard").is_err());
    }
}
