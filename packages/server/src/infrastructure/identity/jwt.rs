//! HS256 access-token verification.
//!
//! Tokens are issued by the auth service with a shared secret. Only a token
//! whose signature, issuer and expiry all check out yields a user; refresh
//! tokens are refused.

use async_trait::async_trait;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};

use crate::domain::{IdentityError, IdentityResolver, UserId};

/// `iss` claim set by the auth service
pub const TOKEN_ISSUER: &str = "messenger-auth-service";

const REFRESH_TOKEN_TYPE: &str = "refresh";

/// Claims carried by auth-service tokens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessClaims {
    pub user_id: i64,
    #[serde(default)]
    pub role: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
    pub iss: String,
    pub exp: u64,
    #[serde(default)]
    pub iat: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,
}

impl From<jsonwebtoken::errors::Error> for IdentityError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        IdentityError::InvalidToken(err.to_string())
    }
}

pub struct JwtIdentityResolver {
    key: DecodingKey,
    validation: Validation,
}

impl JwtIdentityResolver {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[TOKEN_ISSUER]);
        validation.set_required_spec_claims(&["exp", "iss"]);

        Self {
            key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }
}

#[async_trait]
impl IdentityResolver for JwtIdentityResolver {
    async fn resolve_identity(&self, credential: &str) -> Result<UserId, IdentityError> {
        let data = decode::<AccessClaims>(credential, &self.key, &self.validation)?;

        if data.claims.token_type.as_deref() == Some(REFRESH_TOKEN_TYPE) {
            return Err(IdentityError::RefreshToken);
        }

        Ok(UserId::new(data.claims.user_id)?)
    }
}
