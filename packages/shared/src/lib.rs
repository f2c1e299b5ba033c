//! Shared utilities for corpchat services.

pub mod logger;
pub mod time;
