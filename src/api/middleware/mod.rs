//! API middleware

mod auth;

pub use auth::{extract_jwt_token, RequireUser};
