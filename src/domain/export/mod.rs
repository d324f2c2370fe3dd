//! Document export collaborator
//!
//! The core hands a finished title -> text mapping to an exporter and gets a
//! file path back; how the file is produced is not its concern.

use std::path::PathBuf;

use crate::domain::project::DocType;
use crate::domain::DomainError;

/// One titled block of exported content, in document order
#[derive(Debug, Clone)]
pub struct ExportSection {
    pub title: String,
    pub content: String,
}

/// Consumes a finished document and emits a file
pub trait DocumentExporter: Send + Sync + std::fmt::Debug {
    /// Write the document and return the path of the produced file
    fn export(
        &self,
        project_title: &str,
        doc_type: DocType,
        sections: &[ExportSection],
    ) -> Result<PathBuf, DomainError>;
}
