// Integration test utilities and common code
// WHY: Centralized utilities avoid duplication across integration tests

#![allow(dead_code)]

use std::fs;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

/// Test fixture helper for creating temporary directories with manuscript files
pub struct TestFixture {
    pub temp_dir: TempDir,
    pub root_path: PathBuf,
}

impl TestFixture {
    /// Create a new test fixture with temporary directory
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root_path = temp_dir.path().to_path_buf();

        Self {
            temp_dir,
            root_path,
        }
    }

    /// Create a file with raw bytes
    pub fn create_file<P: AsRef<Path>>(&self, relative_path: P, content: &[u8]) -> PathBuf {
        let file_path = self.root_path.join(relative_path);

        // Create parent directories if needed
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directories");
        }

        fs::write(&file_path, content).expect("Failed to write test file");
        file_path
    }

    /// Create a UTF-8 plain text manuscript
    pub fn create_text_file<P: AsRef<Path>>(&self, relative_path: P, content: &str) -> PathBuf {
        self.create_file(relative_path, content.as_bytes())
    }

    /// Create a DOCX manuscript with one body paragraph per entry
    pub fn create_docx_file<P: AsRef<Path>>(&self, relative_path: P, paragraphs: &[&str]) -> PathBuf {
        self.create_file(relative_path, &docx_bytes(paragraphs))
    }
}

/// Build a minimal DOCX package whose body holds the given paragraphs
pub fn docx_bytes(paragraphs: &[&str]) -> Vec<u8> {
    let body: String = paragraphs
        .iter()
        .map(|p| {
            let escaped = p.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;");
            format!("<w:p><w:r><w:t xml:space=\"preserve\">{escaped}</w:t></w:r></w:p>")
        })
        .collect();
    let xml = format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
         <w:document xmlns:w=\"http://schemas.openxmlformats.org/wordprocessingml/2006/main\">\
         <w:body>{body}<w:sectPr/></w:body></w:document>"
    );

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    zip.start_file("word/document.xml", SimpleFileOptions::default())
        .expect("Failed to start zip entry");
    zip.write_all(xml.as_bytes()).expect("Failed to write zip entry");
    zip.finish().expect("Failed to finish zip").into_inner()
}

/// Remove every quote-like character, leaving the rest of the text
pub fn strip_quotes(text: &str) -> String {
    text.chars()
        .filter(|c| !matches!(c, '"' | '\'' | '\u{201C}' | '\u{201D}' | '\u{2018}' | '\u{2019}'))
        .collect()
}

/// Manuscript-like samples covering the awkward cases
pub const SAMPLES: &[&str] = &[
    "",
    "hello world",
    "He said \"hi\" and 'bye'.",
    "\"a\" \"b",
    "\u{201C}already\u{201D} and \"new\"",
    "\"Don't,\" she said. 'It's James' book.'",
    "\u{201D}backwards\u{201C} \u{2019}too\u{2018}",
    "Line one \"opens\nand closes\" on line two.\r\n\r\n'Next paragraph'",
    "\"\"\"\"''''",
    "Unicode \"세계\" with 'émojis' \u{1F980}",
    "tabs\t\"in\"\tcolumns\t'x'",
];
