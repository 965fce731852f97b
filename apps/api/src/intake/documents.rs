//! Document text extraction for uploaded resumes (PDF, DOCX, plain text).
//!
//! Everything runs on in-memory buffers. A document that fails to parse is
//! logged and returned with empty text, so one bad file never sinks a batch.

use std::io::{Cursor, Read};
use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    Pdf,
    Docx,
    Txt,
    Unknown,
}

impl DocumentFormat {
    /// Extension first, then magic bytes. Unknown content is decoded as text.
    pub fn detect(file_name: &str, bytes: &[u8]) -> Self {
        let extension = file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "pdf" => DocumentFormat::Pdf,
            "docx" | "doc" => DocumentFormat::Docx,
            "txt" | "csv" | "md" => DocumentFormat::Txt,
            _ if bytes.starts_with(b"%PDF") => DocumentFormat::Pdf,
            _ if bytes.starts_with(b"PK\x03\x04") => DocumentFormat::Docx,
            _ => DocumentFormat::Unknown,
        }
    }
}

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("PDF parse error: {0}")]
    Pdf(String),

    #[error("PDF parser panicked")]
    PdfPanicked,

    #[error("DOCX archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("DOCX read error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtractedDocument {
    pub format: DocumentFormat,
    pub text: String,
}

pub fn extract_document(file_name: &str, bytes: &[u8]) -> ExtractedDocument {
    let format = DocumentFormat::detect(file_name, bytes);
    let text = match extract_text(format, bytes) {
        Ok(text) => text,
        Err(e) => {
            warn!(file_name, ?format, error = %e, "document extraction failed; using empty text");
            String::new()
        }
    };
    ExtractedDocument { format, text }
}

fn extract_text(format: DocumentFormat, bytes: &[u8]) -> Result<String, ExtractionError> {
    match format {
        DocumentFormat::Pdf => extract_pdf(bytes),
        DocumentFormat::Docx => extract_docx(bytes),
        DocumentFormat::Txt | DocumentFormat::Unknown => {
            Ok(String::from_utf8_lossy(bytes).into_owned())
        }
    }
}

fn extract_pdf(bytes: &[u8]) -> Result<String, ExtractionError> {
    // pdf-extract panics on some malformed inputs instead of returning Err.
    std::panic::catch_unwind(|| pdf_extract::extract_text_from_mem(bytes))
        .map_err(|_| ExtractionError::PdfPanicked)?
        .map_err(|e| ExtractionError::Pdf(format!("{e:?}")))
}

fn extract_docx(bytes: &[u8]) -> Result<String, ExtractionError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))?;
    let mut xml = String::new();
    archive
        .by_name("word/document.xml")?
        .read_to_string(&mut xml)?;
    Ok(docx_xml_to_text(&xml))
}

fn paragraph_end() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"</w:p>|<w:br\s*/>|<w:cr\s*/>").expect("valid regex"))
}

fn any_tag() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<[^>]*>").expect("valid regex"))
}

/// Flattens WordprocessingML into plain text: one line per paragraph.
fn docx_xml_to_text(xml: &str) -> String {
    let with_breaks = paragraph_end().replace_all(xml, "\n");
    let with_tabs = with_breaks.replace("<w:tab/>", "\t");
    let stripped = any_tag().replace_all(&with_tabs, "");
    decode_entities(&stripped).trim().to_string()
}

fn decode_entities(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}
