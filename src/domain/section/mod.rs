//! Section domain types

mod entity;
mod repository;

pub use entity::{Section, SectionId, SectionStatus};
pub use repository::SectionRepository;
