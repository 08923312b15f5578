pub mod delay_queue;
pub mod engine;
pub mod hazard;

pub use engine::EmulatorEngine;
pub use hazard::Hazard;
