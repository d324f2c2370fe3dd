//! Project domain types

mod entity;
mod repository;

pub use entity::{DocType, Project, ProjectId};
pub use repository::ProjectRepository;
