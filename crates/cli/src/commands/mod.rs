//! Subcommand implementations

pub mod bot;
pub mod demo;
pub mod report;
pub mod sense;
