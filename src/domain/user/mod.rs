//! User domain types

mod entity;
mod repository;

pub use entity::{User, UserId};
pub use repository::UserRepository;
