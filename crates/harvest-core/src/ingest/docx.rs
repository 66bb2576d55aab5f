use std::io::{Cursor, Read};

use quick_xml::events::Event;
use quick_xml::Reader;

use super::text::{DocumentFormat, TextError, TextExtractor, TextResult};

const DOCUMENT_PART: &str = "word/document.xml";

/// Reads the main document part of a WordprocessingML package.
#[derive(Debug, Default, Clone, Copy)]
pub struct DocxExtractor;

impl DocxExtractor {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait::async_trait]
impl TextExtractor for DocxExtractor {
    fn supported_formats(&self) -> &[DocumentFormat] {
        &[DocumentFormat::Docx]
    }

    async fn extract_bytes(&self, data: &[u8], _format: DocumentFormat) -> TextResult<String> {
        let xml = read_document_part(data)?;
        let text = document_text(&xml)?;
        tracing::debug!("DOCX extracted: {} chars", text.len());
        Ok(text)
    }
}

fn read_document_part(data: &[u8]) -> TextResult<String> {
    let mut archive =
        zip::ZipArchive::new(Cursor::new(data)).map_err(|e| TextError::Docx(e.to_string()))?;
    let mut part = archive
        .by_name(DOCUMENT_PART)
        .map_err(|e| TextError::Docx(format!("{DOCUMENT_PART}: {e}")))?;

    let mut xml = String::new();
    part.read_to_string(&mut xml)?;
    Ok(xml)
}

/// Paragraph text joined by newlines. Tabs and breaks inside a paragraph
/// are kept so line-anchored patterns still see them.
fn document_text(xml: &str) -> TextResult<String> {
    let mut reader = Reader::from_str(xml);
    let mut text = String::new();
    let mut in_text_run = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                if e.local_name().as_ref() == b"t" {
                    in_text_run = true;
                }
            }
            Ok(Event::Empty(e)) => match e.local_name().as_ref() {
                b"tab" => text.push('\t'),
                b"br" | b"cr" => text.push('\n'),
                _ => {}
            },
            Ok(Event::Text(t)) if in_text_run => {
                let value = t.unescape().map_err(|e| TextError::Docx(e.to_string()))?;
                text.push_str(&value);
            }
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"t" => in_text_run = false,
                b"p" => text.push('\n'),
                _ => {}
            },
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                return Err(TextError::Docx(format!(
                    "malformed XML at {}: {e}",
                    reader.buffer_position()
                )))
            }
        }
    }

    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    fn docx(document_xml: &str) -> Vec<u8> {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        writer
            .start_file(DOCUMENT_PART, SimpleFileOptions::default())
            .unwrap();
        writer.write_all(document_xml.as_bytes()).unwrap();
        writer.finish().unwrap().into_inner()
    }

    const BODY: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:body>
    <w:p><w:r><w:t>Jane Smith</w:t></w:r></w:p>
    <w:p><w:r><w:t xml:space="preserve">Skills: </w:t></w:r><w:r><w:t>Rust &amp; SQL</w:t></w:r></w:p>
    <w:p><w:r><w:t>Name</w:t><w:tab/><w:t>Value</w:t><w:br/><w:t>Next</w:t></w:r></w:p>
  </w:body>
</w:document>"#;

    #[tokio::test]
    async fn test_paragraphs_become_lines() {
        let text = DocxExtractor::new()
            .extract_bytes(&docx(BODY), DocumentFormat::Docx)
            .await
            .unwrap();

        assert_eq!(text, "Jane Smith\nSkills: Rust & SQL\nName\tValue\nNext\n");
    }

    #[tokio::test]
    async fn test_missing_document_part() {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        writer
            .start_file("word/styles.xml", SimpleFileOptions::default())
            .unwrap();
        let bytes = writer.finish().unwrap().into_inner();

        let result = DocxExtractor::new()
            .extract_bytes(&bytes, DocumentFormat::Docx)
            .await;

        assert!(matches!(result, Err(TextError::Docx(_))));
    }

    #[tokio::test]
    async fn test_not_a_zip() {
        let result = DocxExtractor::new()
            .extract_bytes(b"plain bytes", DocumentFormat::Docx)
            .await;

        assert!(matches!(result, Err(TextError::Docx(_))));
    }
}
