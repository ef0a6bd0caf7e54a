//! Text extraction from various file formats

use crate::error::{JobFitError, Result};
use anyhow::{anyhow, Context};
use pulldown_cmark::{Event, Parser, Tag};
use quick_xml::events::Event as XmlEvent;
use quick_xml::Reader;
use std::io::{Cursor, Read};
use std::path::Path;
use tokio::fs;

pub trait TextExtractor {
    fn extract(&self, path: &Path) -> impl std::future::Future<Output = Result<String>> + Send;
}

pub struct PdfExtractor;

impl TextExtractor for PdfExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        let bytes = fs::read(path).await?;

        let text = pdf_extract::extract_text_from_mem(&bytes).map_err(|e| {
            JobFitError::PdfExtraction(format!("Failed to extract text from PDF '{}': {}", path.display(), e))
        })?;
        Ok(text.trim().to_string())
    }
}

pub struct DocxExtractor;

impl TextExtractor for DocxExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        let bytes = fs::read(path).await?;

        extract_docx_text(&bytes).map_err(|e| match e {
            JobFitError::DocxExtraction(reason) => JobFitError::DocxExtraction(format!(
                "Failed to extract text from DOCX '{}': {}",
                path.display(),
                reason
            )),
            other => other,
        })
    }
}

/// Paragraph text of a DOCX container, one paragraph per line.
///
/// Only live `w:t` runs count. Tracked deletions and field codes are skipped.
pub fn extract_docx_text(bytes: &[u8]) -> Result<String> {
    let text = read_document_xml(bytes)
        .and_then(|xml| document_text(&xml))
        .map_err(|e| JobFitError::DocxExtraction(format!("{:#}", e)))?;

    Ok(collapse_lines(&text))
}

fn document_text(xml: &str) -> anyhow::Result<String> {
    let mut reader = Reader::from_str(xml);
    let mut text = String::new();
    let mut in_text_run = false;
    let mut deleted_depth = 0usize;

    loop {
        match reader.read_event() {
            Ok(XmlEvent::Start(e)) => match e.name().as_ref() {
                b"w:t" => in_text_run = true,
                b"w:del" => deleted_depth += 1,
                _ => {}
            },
            Ok(XmlEvent::End(e)) => match e.name().as_ref() {
                b"w:t" => in_text_run = false,
                b"w:del" => deleted_depth = deleted_depth.saturating_sub(1),
                b"w:p" => text.push('\n'),
                _ => {}
            },
            Ok(XmlEvent::Empty(e)) if deleted_depth == 0 => match e.name().as_ref() {
                b"w:tab" => text.push('\t'),
                b"w:br" | b"w:cr" => text.push('\n'),
                _ => {}
            },
            Ok(XmlEvent::Text(e)) if in_text_run && deleted_depth == 0 => {
                text.push_str(&e.unescape().context("bad character reference")?);
            }
            Ok(XmlEvent::Eof) => break,
            Err(e) => {
                return Err(anyhow!(
                    "XML parse error at position {}: {}",
                    reader.buffer_position(),
                    e
                ));
            }
            _ => {}
        }
    }

    Ok(text)
}

fn read_document_xml(bytes: &[u8]) -> anyhow::Result<String> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).context("not a zip container")?;
    let mut document = archive
        .by_name("word/document.xml")
        .context("missing word/document.xml")?;

    let mut xml = String::new();
    document
        .read_to_string(&mut xml)
        .context("word/document.xml is not valid UTF-8")?;
    Ok(xml)
}

pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        let content = fs::read_to_string(path).await?;
        Ok(content.trim().to_string())
    }
}

pub struct MarkdownExtractor;

impl TextExtractor for MarkdownExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        let markdown_content = fs::read_to_string(path).await?;
        Ok(markdown_to_text(&markdown_content))
    }
}

/// Plain text of a markdown document, one block per line.
pub fn markdown_to_text(markdown: &str) -> String {
    let mut text = String::new();

    for event in Parser::new(markdown) {
        match event {
            Event::Text(content) | Event::Code(content) => text.push_str(&content),
            Event::SoftBreak => text.push(' '),
            Event::HardBreak => text.push('\n'),
            Event::End(
                Tag::Paragraph | Tag::Heading(..) | Tag::Item | Tag::CodeBlock(_) | Tag::BlockQuote,
            ) => text.push('\n'),
            _ => {}
        }
    }

    collapse_lines(&text)
}

fn collapse_lines(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
