//! Text-generation capability boundary

mod capability;
mod error;

pub use capability::{
    Evaluation, SectionGenerator, NEUTRAL_IMPROVEMENT_FOCUS, NEUTRAL_SCORE,
};
pub use error::GenerationError;

#[cfg(test)]
pub use capability::scripted;
