pub mod quotes;
pub mod extract;
pub mod document;
pub mod reader;
pub mod session;
pub mod stats;

// Re-export the core quote operations
pub use quotes::{
    count_quotes, normalize_quotes, normalize_quotes_into,
    QuoteCategory, QuoteClass, QuoteTally
};

// Re-export document plumbing used by the CLI and tests
pub use extract::{extract_text, DocumentFormat, Extracted, TextEncoding};
pub use document::{write_docx, PageLayout};
pub use session::{Conversion, Notice, Session, SessionConfig};
