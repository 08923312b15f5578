//! Per-engine metrics, surfaced through the `Display` widget.

#[derive(Debug, Default, Clone, Copy)]
pub struct SenderMetrics {
    pub total_sent: u64,
    pub unique_sent: u64,
    pub mean_latency_ms: f64,
}

impl SenderMetrics {
    pub fn stats_line(&self) -> String {
        format!(
            "total_sent={} unique_sent={} mean_latency_ms={:.1}",
            self.total_sent, self.unique_sent, self.mean_latency_ms
        )
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ReceiverMetrics {
    pub total_received: u64,
    pub unique_received: u64,
}

impl ReceiverMetrics {
    pub fn stats_line(&self) -> String {
        format!(
            "total_received={} unique_received={}",
            self.total_received, self.unique_received
        )
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct EmulatorMetrics {
    pub fwd_data: u64,
    pub fwd_acks: u64,
    pub dropped: u64,
}

impl EmulatorMetrics {
    pub fn stats_line(&self) -> String {
        format!(
            "fwd_data={} fwd_acks={} dropped={}",
            self.fwd_data, self.fwd_acks, self.dropped
        )
    }
}
