//! Infrastructure layer: wire DTOs, the connection Hub, and the
//! collaborator implementations.

pub mod dto;
pub mod hub;
pub mod identity;
pub mod repository;
