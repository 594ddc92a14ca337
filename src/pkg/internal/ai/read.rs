use std::io::Cursor;

use standard_error::{Interpolate, StandardError};

use crate::prelude::Result;

pub fn extract_document(data: Vec<u8>, content_type: &str) -> Result<String> {
    match content_type {
        "application/pdf" => extract_text_from_pdf(&data),
        "text/plain" => Ok(String::from_utf8(data)
            .map_err(|e| StandardError::new("ERR-EXTRACT-001").interpolate_err(e.to_string()))?),
        _ => Err(StandardError::new("ERR-EXTRACT-002")),
    }
}

fn extract_text_from_pdf(data: &[u8]) -> Result<String> {
    use lopdf::Document;
    let cursor = Cursor::new(data);
    let doc = Document::load_from(cursor)
        .map_err(|e| StandardError::new("ERR-EXTRACT-001").interpolate_err(e.to_string()))?;

    let pages = doc.get_pages();
    let mut text = String::new();

    for page_num in pages.keys() {
        match doc.extract_text(&[*page_num]) {
            Ok(page_text) => {
                text.push_str(&page_text);
                text.push(' ');
            }
            Err(e) => {
                tracing::warn!("failed to extract text from page {}: {}", page_num, e);
            }
        }
    }

    if text.trim().is_empty() {
        return Err(StandardError::new("ERR-EXTRACT-001")
            .interpolate_err("no text extracted from pdf".to_string()));
    }
    Ok(text.trim().to_string())
}

#[cfg(test)]
mod tests {
    use tracing_test::traced_test;

    use super::*;

    #[test]
    #[traced_test]
    fn test_plain_text_passthrough() -> Result<()> {
        let text = extract_document(b"senior backend engineer, 7 yoe".to_vec(), "text/plain")?;
        assert_eq!(text, "senior backend engineer, 7 yoe");
        Ok(())
    }

    #[test]
    #[traced_test]
    fn test_plain_text_rejects_invalid_utf8() {
        assert!(extract_document(vec![0xff, 0xfe, 0x00], "text/plain").is_err());
    }

    #[test]
    #[traced_test]
    fn test_unsupported_content_type() {
        assert!(extract_document(b"{}".to_vec(), "application/json").is_err());
    }

    #[test]
    #[traced_test]
    fn test_garbage_pdf_fails() {
        assert!(extract_document(b"not a pdf at all".to_vec(), "application/pdf").is_err());
    }
}
