//! Storage implementations

mod in_memory;
mod postgres;

pub use in_memory::InMemoryStore;
pub use postgres::{PostgresConfig, PostgresStore};
