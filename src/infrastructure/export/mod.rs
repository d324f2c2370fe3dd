//! Document exporters

mod markdown;

pub use markdown::MarkdownExporter;
