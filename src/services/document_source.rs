use std::path::Path;

use async_trait::async_trait;

use crate::config::Config;
use crate::errors::AppResult;

const SUPPORTED_EXTENSIONS: [&str; 4] = ["txt", "md", "csv", "json"];

/// Turns document identifiers into plain text for prompts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DocumentSource: Send + Sync {
    async fn extract_text(&self, documents: &[String]) -> AppResult<String>;
}

/// Reads plain-text documents from disk.
pub struct FileDocumentSource {
    max_file_size: u64,
}

impl FileDocumentSource {
    pub fn new(max_file_size: u64) -> Self {
        Self { max_file_size }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.max_document_size_bytes())
    }

    fn is_supported(path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .is_some_and(|ext| SUPPORTED_EXTENSIONS.contains(&ext.as_str()))
    }

    async fn read_document(&self, document: &str) -> AppResult<Option<String>> {
        let path = Path::new(document);
        let metadata = match tokio::fs::metadata(path).await {
            Ok(metadata) => metadata,
            Err(_) => {
                log::warn!("Document not found: {}", document);
                return Ok(None);
            }
        };
        if metadata.len() > self.max_file_size {
            log::warn!("Document too large: {} ({} bytes)", document, metadata.len());
            return Ok(None);
        }
        if !Self::is_supported(path) {
            log::warn!("Unsupported document type: {}", document);
            return Ok(None);
        }

        let content = match tokio::fs::read_to_string(path).await {
            Ok(content) => content,
            Err(e) => {
                log::warn!("Could not read document {}: {}", document, e);
                return Ok(None);
            }
        };
        let content = content.trim();
        if content.is_empty() {
            return Ok(None);
        }

        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or(document);
        log::info!("Processed document: {}", file_name);
        Ok(Some(format!("=== Content from {} ===\n{}\n", file_name, content)))
    }
}

#[async_trait]
impl DocumentSource for FileDocumentSource {
    async fn extract_text(&self, documents: &[String]) -> AppResult<String> {
        let mut sections = Vec::new();
        for document in documents {
            if let Some(section) = self.read_document(document).await? {
                sections.push(section);
            }
        }
        Ok(sections.join("\n"))
    }
}
