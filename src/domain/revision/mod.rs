//! Revision domain types

mod entity;
mod repository;

pub use entity::{Revision, RevisionId};
pub use repository::RevisionRepository;
