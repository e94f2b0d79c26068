//! Motion alerts muted by home presence

pub mod motion;
pub mod ports;

pub use motion::{MotionAlert, MotionOutcome, MuteSource};
pub use ports::ScanLogReader;
