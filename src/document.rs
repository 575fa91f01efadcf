// WHY: minimal WordprocessingML package for downloading converted text
// One paragraph per input line so blank-line structure survives the round trip

use anyhow::{bail, Context, Result};
use quick_xml::escape::escape;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::{debug, info};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Twips per inch (WordprocessingML length unit)
pub const TWIPS_PER_INCH: u32 = 1440;

const CONTENT_TYPES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/></Types>"#;

const ROOT_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/></Relationships>"#;

const DOCUMENT_XML_HEAD: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>"#;

/// Page geometry of generated documents, in twips
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLayout {
    /// Applied to all four sides
    pub margin_twips: u32,
    pub page_width_twips: u32,
    pub page_height_twips: u32,
}

impl Default for PageLayout {
    fn default() -> Self {
        Self {
            margin_twips: TWIPS_PER_INCH,
            // US Letter, 8.5in x 11in
            page_width_twips: 12240,
            page_height_twips: 15840,
        }
    }
}

/// Build a `.docx` package with one paragraph per line of `text`
///
/// Fails on characters XML 1.0 cannot carry (C0 controls such as form feed).
pub fn write_docx(text: &str, layout: &PageLayout) -> Result<Vec<u8>> {
    if let Some((offset, ch)) = text.char_indices().find(|(_, ch)| !is_xml_char(*ch)) {
        bail!(
            "Text contains character U+{:04X} at byte {} that cannot be stored in a Word document",
            ch as u32,
            offset
        );
    }

    let document_xml = render_document_xml(text, layout);

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    let parts = [
        ("[Content_Types].xml", CONTENT_TYPES_XML),
        ("_rels/.rels", ROOT_RELS_XML),
        ("word/document.xml", document_xml.as_str()),
    ];
    for (name, content) in parts {
        zip.start_file(name, options)
            .with_context(|| format!("Failed to start DOCX part {name}"))?;
        zip.write_all(content.as_bytes())
            .with_context(|| format!("Failed to write DOCX part {name}"))?;
    }

    let bytes = zip.finish().context("Failed to finalize DOCX package")?.into_inner();
    debug!("Built DOCX package: {} bytes", bytes.len());
    Ok(bytes)
}

/// Render `word/document.xml` for the given text and layout
pub fn render_document_xml(text: &str, layout: &PageLayout) -> String {
    let mut xml = String::with_capacity(DOCUMENT_XML_HEAD.len() + text.len() * 2 + 256);
    xml.push_str(DOCUMENT_XML_HEAD);

    for line in text.split('\n') {
        let line = line.strip_suffix('\r').unwrap_or(line);
        push_paragraph(&mut xml, line);
    }

    let margin = layout.margin_twips;
    xml.push_str(&format!(
        "<w:sectPr><w:pgSz w:w=\"{}\" w:h=\"{}\"/>\
         <w:pgMar w:top=\"{margin}\" w:right=\"{margin}\" w:bottom=\"{margin}\" w:left=\"{margin}\" \
         w:header=\"720\" w:footer=\"720\" w:gutter=\"0\"/></w:sectPr>",
        layout.page_width_twips, layout.page_height_twips,
    ));
    xml.push_str("</w:body></w:document>");
    xml
}

/// XML 1.0 `Char` production
fn is_xml_char(ch: char) -> bool {
    matches!(ch,
        '\t' | '\n' | '\r'
        | '\u{20}'..='\u{D7FF}'
        | '\u{E000}'..='\u{FFFD}'
        | '\u{10000}'..='\u{10FFFF}')
}

fn push_paragraph(xml: &mut String, line: &str) {
    // Whitespace-only lines become empty paragraphs
    if line.trim().is_empty() {
        xml.push_str("<w:p/>");
        return;
    }

    xml.push_str("<w:p><w:r>");
    for (i, segment) in line.split('\t').enumerate() {
        if i > 0 {
            xml.push_str("<w:tab/>");
        }
        if !segment.is_empty() {
            xml.push_str("<w:t xml:space=\"preserve\">");
            xml.push_str(&escape(segment));
            xml.push_str("</w:t>");
        }
    }
    xml.push_str("</w:r></w:p>");
}

/// Output file name for a converted source: `<stem>_curly.docx`
pub fn default_output_name(source: &Path) -> String {
    let stem = source
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("document");
    format!("{stem}_curly.docx")
}

/// Output path for a converted source, next to it or inside `output_dir`
pub fn output_path_for(source: &Path, output_dir: Option<&Path>) -> PathBuf {
    let name = default_output_name(source);
    match output_dir {
        Some(dir) => dir.join(name),
        None => source.with_file_name(name),
    }
}

/// Write document bytes to disk
pub async fn save_document(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }
    }

    let file = tokio::fs::File::create(path)
        .await
        .with_context(|| format!("Failed to create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    writer.write_all(bytes).await?;
    writer.flush().await?;

    info!("Wrote {} ({} bytes)", path.display(), bytes.len());
    Ok(())
}
