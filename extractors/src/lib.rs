//! Extractors Crate
//!
//! Pulls calendar dates out of free text such as an email subject and body.
//!
//! # Architecture
//!
//! - **Types**: API types (entities, calendar payloads) live in the `shared-types` crate
//! - **Capabilities**: the entity recognizer and the date parser are traits, injected
//!   into the extractor at construction time
//!
//! # Example
//!
//! ```rust,ignore
//! use extractors::{DateExtractor, NoopRecognizer};
//! use std::sync::Arc;
//!
//! let extractor = DateExtractor::with_default_parser(Arc::new(NoopRecognizer));
//! let dates = extractor.extract_dates("Meeting on 2024-03-15").await;
//! ```

pub mod date_extraction;

// Re-export commonly used types
pub use date_extraction::{
    DateExtractor, DateOrder, DateParser, EntityRecognizer, Locale, LocaleDateParser,
    NoopRecognizer, RecognizerError,
};
