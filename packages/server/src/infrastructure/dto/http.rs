//! HTTP API response DTOs.

use serde::{Deserialize, Serialize};

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthDto {
    pub status: String,
}

/// Live connection counters reported by the Hub
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HubStatsDto {
    pub connections: usize,
    pub users: usize,
}
