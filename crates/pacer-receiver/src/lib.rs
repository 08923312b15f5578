pub mod engine;
pub mod reassembly;

pub use engine::ReceiverEngine;
