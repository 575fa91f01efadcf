// WHY: explicit per-user state for the upload -> report -> convert -> download flow
// Failures become notices; previously loaded text and results are never discarded

use std::fmt;
use tracing::{info, warn};

use crate::document::{write_docx, PageLayout};
use crate::extract::{extract_text, DocumentFormat};
use crate::quotes::{count_quotes, normalize_quotes, QuoteCategory};

/// Settings shared by every conversion in a session
#[derive(Debug, Clone, Default)]
pub struct SessionConfig {
    pub layout: PageLayout,
}

/// User-facing outcome of the last action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Success(String),
    Info(String),
    Warning(String),
    Error(String),
}

impl Notice {
    pub fn message(&self) -> &str {
        match self {
            Self::Success(m) | Self::Info(m) | Self::Warning(m) | Self::Error(m) => m,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = match self {
            Self::Success(_) => "ok",
            Self::Info(_) => "info",
            Self::Warning(_) => "warning",
            Self::Error(_) => "error",
        };
        write!(f, "{prefix}: {}", self.message())
    }
}

/// Result of converting the loaded text
#[derive(Debug, Clone)]
pub struct Conversion {
    pub normalized: String,
    /// Whether normalization changed anything
    pub changed: bool,
    /// DOCX bytes, present only when the text changed and writing succeeded
    pub document: Option<Vec<u8>>,
}

/// One user's working state
#[derive(Debug, Clone, Default)]
pub struct Session {
    config: SessionConfig,
    file_name: Option<String>,
    text: String,
    conversion: Option<Conversion>,
    notice: Option<Notice>,
}

impl Session {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    /// Load an upload, replacing the current text on success
    pub fn load_upload(&mut self, name: &str, bytes: &[u8]) -> &Notice {
        let extracted = DocumentFormat::from_name(name)
            .and_then(|format| extract_text(bytes, format));

        let notice = match extracted {
            Ok(extracted) => {
                let notice = if extracted.is_blank() {
                    Notice::Warning(format!("No text found in {name}"))
                } else {
                    Notice::Success(format!("Loaded {name}"))
                };
                info!(file = name, encoding = ?extracted.encoding, "Upload loaded");
                self.file_name = Some(name.to_string());
                self.text = extracted.text;
                self.conversion = None;
                notice
            }
            Err(e) => {
                warn!(file = name, error = %e, "Upload failed");
                Notice::Error(format!("Failed to read {name}: {e:#}"))
            }
        };

        self.notice.insert(notice)
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    /// Length of the loaded text in characters
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    /// Nonzero quote categories of the loaded text
    pub fn quote_report(&self) -> Vec<(QuoteCategory, u64)> {
        count_quotes(&self.text).nonzero_entries()
    }

    /// Normalize the loaded text and build the download document when it changed
    pub fn convert(&mut self) -> Option<&Conversion> {
        if self.text.trim().is_empty() {
            self.notice = Some(Notice::Warning("Upload a file first".to_string()));
            return None;
        }

        let normalized = normalize_quotes(&self.text);
        let changed = normalized != self.text;

        let (document, notice) = if !changed {
            (None, Notice::Info("No quotes to convert".to_string()))
        } else {
            match write_docx(&normalized, &self.config.layout) {
                Ok(bytes) => (Some(bytes), Notice::Success("Converted to curly quotes".to_string())),
                Err(e) => {
                    warn!(error = %e, "Document writing failed");
                    (None, Notice::Error(format!("Failed to build Word document: {e:#}")))
                }
            }
        };

        self.notice = Some(notice);
        self.conversion = Some(Conversion { normalized, changed, document });
        self.conversion.as_ref()
    }

    pub fn conversion(&self) -> Option<&Conversion> {
        self.conversion.as_ref()
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_and_convert_plain_text() {
        let mut session = Session::new(SessionConfig::default());

        let notice = session.load_upload("story.txt", b"He said \"hi\".").clone();
        assert_eq!(notice, Notice::Success("Loaded story.txt".to_string()));
        assert_eq!(session.file_name(), Some("story.txt"));
        assert_eq!(session.char_count(), 13);
        assert_eq!(session.quote_report(), vec![(QuoteCategory::StraightDouble, 2)]);

        let conversion = session.convert().expect("conversion should run").clone();
        assert!(conversion.changed);
        assert_eq!(conversion.normalized, "He said \u{201C}hi\u{201D}.");
        assert!(conversion.document.is_some());
        assert!(matches!(session.notice(), Some(Notice::Success(_))));
    }

    #[test]
    fn test_convert_without_upload_warns() {
        let mut session = Session::default();
        assert!(session.convert().is_none());
        assert_eq!(
            session.notice(),
            Some(&Notice::Warning("Upload a file first".to_string()))
        );
    }

    #[test]
    fn test_convert_unchanged_text() {
        let mut session = Session::default();
        session.load_upload("plain.txt", b"nothing quoted here");

        let conversion = session.convert().unwrap();
        assert!(!conversion.changed);
        assert!(conversion.document.is_none());
        assert_eq!(
            session.notice(),
            Some(&Notice::Info("No quotes to convert".to_string()))
        );
    }

    #[test]
    fn test_blank_upload_warns() {
        let mut session = Session::default();
        let notice = session.load_upload("blank.txt", b"  \n\n ");
        assert!(matches!(notice, Notice::Warning(_)));
    }

    #[test]
    fn test_failed_upload_keeps_prior_state() {
        let mut session = Session::default();
        session.load_upload("first.txt", b"'kept'");
        session.convert();

        let notice = session.load_upload("broken.docx", b"definitely not a zip").clone();
        assert!(notice.is_error());
        assert!(notice.message().contains("broken.docx"));

        assert_eq!(session.text(), "'kept'");
        assert_eq!(session.file_name(), Some("first.txt"));
        assert_eq!(
            session.conversion().map(|c| c.normalized.as_str()),
            Some("\u{2018}kept\u{2019}")
        );
    }

    #[test]
    fn test_unsupported_extension_is_error() {
        let mut session = Session::default();
        let notice = session.load_upload("scan.pdf", b"%PDF");
        assert!(notice.is_error());
        assert!(notice.to_string().starts_with("error: "));
        assert_eq!(session.text(), "");
    }

    #[test]
    fn test_new_upload_clears_previous_conversion() {
        let mut session = Session::default();
        session.load_upload("a.txt", b"\"a\"");
        session.convert();
        assert!(session.conversion().is_some());

        session.load_upload("b.txt", b"\"b\"");
        assert!(session.conversion().is_none());
        assert_eq!(session.text(), "\"b\"");
    }

    #[test]
    fn test_unwritable_text_reports_error() {
        let mut session = Session::default();
        session.load_upload("ff.txt", b"\"Chapter one\"\x0c'Chapter two'");

        let conversion = session.convert().expect("conversion should run").clone();
        assert!(conversion.changed);
        assert!(conversion.document.is_none());
        // Normalized text stays available for display
        assert_eq!(
            conversion.normalized,
            "\u{201C}Chapter one\u{201D}\u{0C}\u{2018}Chapter two\u{2019}"
        );

        let notice = session.notice().expect("notice should be set");
        assert!(notice.is_error(), "expected error notice, got {notice}");
        assert!(notice.message().contains("U+000C"));
    }
}
