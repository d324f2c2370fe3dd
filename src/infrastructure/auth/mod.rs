//! Authentication infrastructure

mod jwt;
mod password;

pub use jwt::{JwtClaims, JwtConfig, JwtService};
pub use password::{Argon2Hasher, PasswordHasher};
