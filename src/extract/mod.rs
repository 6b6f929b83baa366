//! Natural-language-to-event extraction: the completion API client and the
//! tolerant parser for its output.

mod client;
mod parse;

pub use client::{ExtractionClient, Extractor};
pub use parse::{ExtractedEvent, extract_json_span, parse_extracted};
