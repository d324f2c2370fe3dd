//! API layer - HTTP endpoints and middleware

pub mod auth;
pub mod health;
pub mod middleware;
pub mod projects;
pub mod router;
pub mod sections;
pub mod state;
pub mod types;

pub use middleware::RequireUser;
pub use router::create_router;
pub use state::AppState;
