//! JSON seed file for the in-memory store.
//!
//! ```json
//! {
//!   "users":   [{"id": 1, "name": "Ivan Ivanov"}],
//!   "chats":   [{"id": 10, "type": 2, "workspace_id": 1}],
//!   "members": [{"chat_id": 10, "user_id": 1, "role": 2}]
//! }
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::domain::{Chat, ChatId, ChatRole, UserId};

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("failed to read seed file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid seed data: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeedUser {
    pub id: UserId,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeedMember {
    pub chat_id: ChatId,
    pub user_id: UserId,
    pub role: ChatRole,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SeedData {
    #[serde(default)]
    pub users: Vec<SeedUser>,
    #[serde(default)]
    pub chats: Vec<Chat>,
    #[serde(default)]
    pub members: Vec<SeedMember>,
}

impl SeedData {
    pub fn from_json_str(json: &str) -> Result<Self, SeedError> {
        Ok(serde_json::from_str(json)?)
    }

    pub async fn load(path: &Path) -> Result<Self, SeedError> {
        let json = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| SeedError::Read {
                path: path.to_path_buf(),
                source,
            })?;
        Self::from_json_str(&json)
    }
}
