//! In-memory collaborator used by the binary and the tests.

mod chat;
mod seed;

pub use chat::InMemoryChatRepository;
pub use seed::{SeedData, SeedError, SeedMember, SeedUser};
