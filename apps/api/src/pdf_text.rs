//! PDF text extraction: uploaded resume bytes to the raw text the pipeline consumes.

use bytes::Bytes;
use thiserror::Error;
use tracing::info;

use crate::compiler::PDF_MAGIC;

#[derive(Debug, Error)]
pub enum PdfTextError {
    #[error("uploaded file is not a PDF")]
    NotPdf,

    #[error("failed to read PDF: {0}")]
    Parse(String),

    #[error("PDF contains no extractable text (scanned documents are not supported)")]
    NoText,

    #[error("PDF extraction task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Extracts the text layer of a PDF. Parsing is CPU-bound, so it runs on the
/// blocking pool.
pub async fn extract_text(pdf: Bytes) -> Result<String, PdfTextError> {
    if !pdf.starts_with(PDF_MAGIC) {
        return Err(PdfTextError::NotPdf);
    }

    let size = pdf.len();
    let text = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&pdf))
        .await?
        .map_err(|e| PdfTextError::Parse(e.to_string()))?;

    let text = collapse_blank_lines(&text);
    if text.is_empty() {
        return Err(PdfTextError::NoText);
    }

    info!("Extracted {} chars of text from {} byte PDF", text.len(), size);
    Ok(text)
}

/// Trims trailing whitespace per line and squeezes runs of blank lines to one.
fn collapse_blank_lines(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut previous_blank = true;
    for line in text.lines().map(str::trim_end) {
        let blank = line.trim().is_empty();
        if blank && previous_blank {
            continue;
        }
        out.push_str(line);
        out.push('\n');
        previous_blank = blank;
    }
    out.trim_end().to_string()
}
