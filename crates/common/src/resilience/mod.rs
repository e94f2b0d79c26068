//! Resilience patterns for operations that complete out of band
//!
//! The dashboard API accepts some work (asynchronous action batches, camera
//! snapshots) and finishes it later. Callers observe completion by asking
//! again at a fixed interval with a hard cap on attempts, so a stuck
//! operation always turns into a reportable failure instead of a hang.

pub mod poll;

pub use poll::{poll_until, PollError, PollPolicy, PollResult, PollStep};
