//! Worker thread that turns queued backend commands into HTTP calls.

pub mod commands;
pub mod runtime;
