pub mod config;
pub mod issue;
pub mod logging;
pub mod render;

// Re-export all public types from issue module at crate root for convenience
pub use issue::{DEFAULT_MAX_DOCUMENT_BYTES, Fault, ParseContext, ParseError, ParseOptions, ParsedDocument, Position, Properties, SEPARATOR_CHARS};

/// Name used for documents that did not come from a file.
pub const ANONYMOUS_SOURCE: &str = "<input>";

/// Parse an issue document with the default options.
pub fn parse(input: &str) -> Result<ParsedDocument, ParseError> {
	parse_with(input, &ParseOptions::default())
}

pub fn parse_with(input: &str, options: &ParseOptions) -> Result<ParsedDocument, ParseError> {
	ParsedDocument::parse(&ParseContext::new(input.to_owned(), ANONYMOUS_SOURCE), options)
}
