//! Markdown document exporter
//!
//! Stand-in writer behind the `DocumentExporter` seam: headings plus
//! paragraphs for reports, one `---`-separated slide per section for decks.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use tracing::info;

use crate::domain::export::{DocumentExporter, ExportSection};
use crate::domain::project::DocType;
use crate::domain::DomainError;

#[derive(Debug, Clone)]
pub struct MarkdownExporter {
    output_dir: PathBuf,
}

impl MarkdownExporter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    fn render(project_title: &str, doc_type: DocType, sections: &[ExportSection]) -> String {
        let mut out = format!("# {}\n", project_title);

        for section in sections {
            match doc_type {
                DocType::Docx => {
                    out.push_str(&format!("\n## {}\n\n{}\n", section.title, section.content));
                }
                DocType::Pptx => {
                    out.push_str(&format!(
                        "\n---\n\n## {}\n\n{}\n",
                        section.title, section.content
                    ));
                }
            }
        }

        out
    }

    fn output_path(&self, project_title: &str, doc_type: DocType) -> PathBuf {
        let timestamp = Utc::now().format("%Y%m%d%H%M%S");
        let safe_title: String = project_title
            .chars()
            .map(|c| if c.is_alphanumeric() { c } else { '_' })
            .collect();

        self.output_dir
            .join(format!("{}_{}.{}.md", safe_title, timestamp, doc_type))
    }
}

impl DocumentExporter for MarkdownExporter {
    fn export(
        &self,
        project_title: &str,
        doc_type: DocType,
        sections: &[ExportSection],
    ) -> Result<PathBuf, DomainError> {
        fs::create_dir_all(&self.output_dir)
            .map_err(|e| DomainError::internal(format!("Failed to create export dir: {}", e)))?;

        let path = self.output_path(project_title, doc_type);
        let rendered = Self::render(project_title, doc_type, sections);

        fs::write(&path, rendered)
            .map_err(|e| DomainError::internal(format!("Failed to write export file: {}", e)))?;

        info!(path = %path.display(), "exported document");
        Ok(path)
    }
}

impl MarkdownExporter {
    /// Exported file directory
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }
}
