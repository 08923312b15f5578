//! Monotonic clock helpers. All three engines measure elapsed time off a
//! single process-local epoch rather than wall-clock time, so behaviour is
//! unaffected by clock adjustments.

use std::sync::OnceLock;
use std::time::Instant;

use crate::types::MsTime;

static EPOCH: OnceLock<Instant> = OnceLock::new();

fn epoch() -> Instant {
    *EPOCH.get_or_init(Instant::now)
}

/// Milliseconds elapsed since this process's monotonic epoch.
pub fn now_ms() -> MsTime {
    epoch().elapsed().as_millis() as MsTime
}
