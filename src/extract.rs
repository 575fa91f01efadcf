// WHY: turns uploaded bytes into one text stream for counting and normalization
// Plain text decodes with a single legacy fallback; DOCX keeps only body paragraphs

use anyhow::{anyhow, bail, Context, Result};
use encoding_rs::{EUC_KR, UTF_8};
use quick_xml::events::Event;
use quick_xml::Reader;
use std::fmt;
use std::io::{Cursor, Read};
use std::path::Path;
use tracing::{debug, warn};
use zip::ZipArchive;

/// Separator placed between extracted DOCX paragraphs
pub const PARAGRAPH_SEPARATOR: &str = "\n\n";

const DOCUMENT_PART: &str = "word/document.xml";
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Upload formats accepted by the extractor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    PlainText,
    Docx,
}

impl DocumentFormat {
    /// Pick the format from a file name's extension (case-insensitive)
    pub fn from_name(name: &str) -> Result<Self> {
        Self::from_path(Path::new(name))
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());

        match extension.as_deref() {
            Some("txt") => Ok(Self::PlainText),
            Some("docx") => Ok(Self::Docx),
            Some(other) => bail!(
                "Unsupported file type '.{}' for {} (expected .txt or .docx)",
                other,
                path.display()
            ),
            None => bail!(
                "Cannot determine file type of {} (expected .txt or .docx)",
                path.display()
            ),
        }
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PlainText => f.write_str("txt"),
            Self::Docx => f.write_str("docx"),
        }
    }
}

/// Source encoding the text was recovered from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    Utf8,
    /// Legacy Korean code page, used when UTF-8 decoding fails
    Cp949,
    DocxXml,
}

/// Text recovered from an upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extracted {
    pub text: String,
    pub encoding: TextEncoding,
}

impl Extracted {
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Extract the text of an upload in the given format
pub fn extract_text(bytes: &[u8], format: DocumentFormat) -> Result<Extracted> {
    match format {
        DocumentFormat::PlainText => Ok(decode_plain_text(bytes)),
        DocumentFormat::Docx => {
            let text = extract_docx_text(bytes)?;
            Ok(Extracted { text, encoding: TextEncoding::DocxXml })
        }
    }
}

/// Decode plain text as UTF-8, falling back once to CP949
///
/// Undecodable CP949 sequences are dropped rather than replaced.
pub fn decode_plain_text(bytes: &[u8]) -> Extracted {
    let without_bom = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);

    if let Some(text) = UTF_8.decode_without_bom_handling_and_without_replacement(without_bom) {
        return Extracted { text: text.into_owned(), encoding: TextEncoding::Utf8 };
    }

    warn!("Input is not valid UTF-8, falling back to CP949");
    // WHY: encoding_rs EUC-KR is the WHATWG superset, i.e. windows-949
    let (text, had_errors) = EUC_KR.decode_without_bom_handling(without_bom);
    let text = if had_errors {
        debug!("Dropping undecodable CP949 sequences");
        text.replace('\u{FFFD}', "")
    } else {
        text.into_owned()
    };

    Extracted { text, encoding: TextEncoding::Cp949 }
}

/// Read the body paragraphs of a DOCX package, joined by blank lines
///
/// Only direct children of `w:body` count; tables, headers and text boxes are skipped.
/// Paragraphs that are blank after trimming are dropped.
pub fn extract_docx_text(bytes: &[u8]) -> Result<String> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))
        .context("Upload is not a valid DOCX (ZIP) package")?;

    let mut xml = String::new();
    archive
        .by_name(DOCUMENT_PART)
        .with_context(|| format!("DOCX package has no {DOCUMENT_PART}"))?
        .read_to_string(&mut xml)
        .with_context(|| format!("Failed to read {DOCUMENT_PART}"))?;

    let paragraphs = parse_body_paragraphs(&xml)?;
    debug!("Extracted {} paragraphs from DOCX", paragraphs.len());

    let kept: Vec<&str> = paragraphs
        .iter()
        .map(String::as_str)
        .filter(|p| !p.trim().is_empty())
        .collect();
    Ok(kept.join(PARAGRAPH_SEPARATOR))
}

/// Collect the text of every top-level `w:p` in a WordprocessingML body
fn parse_body_paragraphs(xml: &str) -> Result<Vec<String>> {
    let mut reader = Reader::from_reader(xml.as_bytes());
    reader.trim_text(false);

    let mut buf = Vec::new();
    // Local names of the currently open elements
    let mut stack: Vec<Vec<u8>> = Vec::new();
    let mut paragraphs = Vec::new();
    let mut current: Option<String> = None;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                let name = e.local_name().as_ref().to_vec();
                if name == b"p" && parent_is(&stack, b"body") {
                    current = Some(String::new());
                }
                stack.push(name);
            }
            Ok(Event::Empty(e)) => {
                let name = e.local_name();
                match name.as_ref() {
                    b"p" if parent_is(&stack, b"body") => paragraphs.push(String::new()),
                    b"tab" if in_top_level_run(&stack) => push_to(&mut current, '\t'),
                    b"br" | b"cr" if in_top_level_run(&stack) => push_to(&mut current, '\n'),
                    _ => {}
                }
            }
            Ok(Event::Text(t)) => {
                if in_run_text(&stack) {
                    if let Some(paragraph) = current.as_mut() {
                        let text = t.unescape().context("Malformed text in document.xml")?;
                        paragraph.push_str(&text);
                    }
                }
            }
            Ok(Event::End(_)) => {
                let closed = stack.pop();
                if closed.as_deref() == Some(b"p".as_slice()) && parent_is(&stack, b"body") {
                    if let Some(paragraph) = current.take() {
                        paragraphs.push(paragraph);
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(anyhow!(
                    "Malformed document.xml at byte {}: {}",
                    reader.buffer_position(),
                    e
                ));
            }
            _ => {}
        }
        buf.clear();
    }

    Ok(paragraphs)
}

fn parent_is(stack: &[Vec<u8>], name: &[u8]) -> bool {
    stack.last().is_some_and(|last| last.as_slice() == name)
}

fn paragraph_depth(stack: &[Vec<u8>]) -> usize {
    stack.iter().filter(|name| name.as_slice() == b"p").count()
}

fn in_top_level_run(stack: &[Vec<u8>]) -> bool {
    parent_is(stack, b"r") && paragraph_depth(stack) == 1
}

fn in_run_text(stack: &[Vec<u8>]) -> bool {
    let len = stack.len();
    len >= 2
        && stack[len - 1].as_slice() == b"t"
        && stack[len - 2].as_slice() == b"r"
        && paragraph_depth(stack) == 1
}

fn push_to(current: &mut Option<String>, ch: char) {
    if let Some(paragraph) = current.as_mut() {
        paragraph.push(ch);
    }
}
