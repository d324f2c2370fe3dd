//! Infrastructure layer: concrete backends for the domain's seams

pub mod auth;
pub mod export;
pub mod llm;
pub mod logging;
pub mod storage;
