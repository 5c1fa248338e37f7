//! Chat relay to the completion router and the per-session console built on it.

pub mod artifacts;
pub mod client;
pub mod console;

pub use artifacts::{Artifact, detect_artifacts};
pub use client::{ChatRelay, relay_failure_message};
pub use console::{ChatTurn, ConsoleSession, ConsoleSnapshot, Role};
