//! Command handlers.
//!
//! Each handler performs one operation, reports the result through
//! `tracing` and returns it so callers (and tests) can inspect it.

pub mod profile;
pub mod webhook;
