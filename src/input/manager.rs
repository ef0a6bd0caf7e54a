//! Document loading with per-path caching

use crate::error::{JobFitError, Result};
use crate::input::file_detector::FileType;
use crate::input::text_extractor::{
    DocxExtractor, MarkdownExtractor, PdfExtractor, PlainTextExtractor, TextExtractor,
};
use crate::processing::analyzer::DocumentInput;
use log::{debug, info};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

pub struct InputManager {
    cache: HashMap<PathBuf, String>,
    enable_cache: bool,
}

impl Default for InputManager {
    fn default() -> Self {
        Self::new()
    }
}

impl InputManager {
    pub fn new() -> Self {
        Self {
            cache: HashMap::new(),
            enable_cache: true,
        }
    }

    pub fn with_cache(mut self, enable: bool) -> Self {
        self.enable_cache = enable;
        self
    }

    /// Extract a file's text and tag it with its path as the source.
    pub async fn load(&mut self, path: &Path) -> Result<DocumentInput> {
        let text = self.extract_text(path).await?;
        Ok(DocumentInput::new(text, path.display().to_string()))
    }

    /// Best-effort text of a PDF, DOCX, TXT or Markdown file, trimmed.
    pub async fn extract_text(&mut self, path: &Path) -> Result<String> {
        if self.enable_cache {
            if let Some(cached) = self.cache.get(path) {
                debug!("Using cached text for: {}", path.display());
                return Ok(cached.clone());
            }
        }

        if !path.is_file() {
            return Err(JobFitError::InvalidInput(format!(
                "File does not exist: {}",
                path.display()
            )));
        }

        let file_type = Self::detect_file_type(path)?;
        info!("Reading {:?} document: {}", file_type, path.display());

        let text = match file_type {
            FileType::Pdf => PdfExtractor.extract(path).await?,
            FileType::Docx => DocxExtractor.extract(path).await?,
            FileType::Text => PlainTextExtractor.extract(path).await?,
            FileType::Markdown => MarkdownExtractor.extract(path).await?,
            FileType::Unknown => {
                return Err(JobFitError::UnsupportedFormat(format!(
                    "Unsupported file type for: {}",
                    path.display()
                )));
            }
        };

        debug!("Extracted {} characters from {}", text.len(), path.display());

        if self.enable_cache {
            self.cache.insert(path.to_path_buf(), text.clone());
        }

        Ok(text)
    }

    fn detect_file_type(path: &Path) -> Result<FileType> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(FileType::from_extension)
            .ok_or_else(|| {
                JobFitError::InvalidInput(format!("File has no extension: {}", path.display()))
            })
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    pub fn cache_size(&self) -> usize {
        self.cache.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_load_tags_source_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("job.txt");
        std::fs::write(&path, "  Rust engineer wanted \n").unwrap();

        let mut manager = InputManager::new();
        let document = manager.load(&path).await.unwrap();
        assert_eq!(document.text, "Rust engineer wanted");
        assert_eq!(document.source, path.display().to_string());
    }

    #[tokio::test]
    async fn test_cache_can_be_disabled() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("resume.md");
        std::fs::write(&path, "# Jane\n\n*Rust*").unwrap();

        let mut manager = InputManager::new().with_cache(false);
        assert_eq!(manager.extract_text(&path).await.unwrap(), "Jane\nRust");
        assert_eq!(manager.cache_size(), 0);
    }

    #[tokio::test]
    async fn test_missing_extension_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("README");
        std::fs::write(&path, "text").unwrap();

        let result = InputManager::new().extract_text(&path).await;
        assert!(matches!(result, Err(JobFitError::InvalidInput(_))));
    }
}
