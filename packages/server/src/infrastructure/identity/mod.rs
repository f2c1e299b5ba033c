//! Identity resolution for WebSocket upgrades.

mod jwt;

pub use jwt::{AccessClaims, JwtIdentityResolver, TOKEN_ISSUER};
