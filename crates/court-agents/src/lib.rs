//! Runtime for the mock court: rig-backed counsel and clerk agents,
//! Wikipedia reference lookup, and environment configuration.
//!
//! The deterministic session logic lives in the `coordination` crate; this
//! crate only supplies the collaborators it is parameterized over.

pub mod agents;
pub mod config;
pub mod prompts;
pub mod retry;
pub mod tools;
