//! Error types for parsing issue files.
//!
//! Uses miette for rich diagnostics with source code spans.

#![allow(unused_assignments)] // Fields are read by miette's derive macro via attributes

use miette::{Diagnostic, NamedSource, SourceSpan};
use serde::Serialize;

use super::builder::Fault;

/// 1-based line and column (in characters) of a byte offset.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, derive_more::Display, derive_new::new)]
#[display("{line}:{column}")]
pub struct Position {
	pub line: usize,
	pub column: usize,
}

/// Which part of the grammar a failed parse gave up in.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FailureKind {
	MalformedTitle,
	MalformedPropertyBlock,
	MalformedPropertyLine,
	UnexpectedEndOfInput,
	TrailingContent,
	EmptyBody,
}

/// Error type for issue file parsing.
/// Positional variants point at the furthest place the parser got to.
#[derive(Debug, Diagnostic, thiserror::Error)]
pub enum ParseError {
	#[error("malformed title at {position}")]
	#[diagnostic(
		code(pit::parse::malformed_title),
		help("a document starts with a title line, a rule of at least four separator characters (\"'`~:-_=+*^#<>) and a blank line")
	)]
	MalformedTitle {
		#[source_code]
		src: NamedSource<String>,
		#[label("title block breaks here")]
		span: SourceSpan,
		position: Position,
	},

	#[error("malformed property block at {position}")]
	#[diagnostic(code(pit::parse::malformed_property_block), help("a property block needs at least one 'key: value' line between its table separators"))]
	MalformedPropertyBlock {
		#[source_code]
		src: NamedSource<String>,
		#[label("expected a property line")]
		span: SourceSpan,
		position: Position,
	},

	#[error("malformed property line at {position}")]
	#[diagnostic(code(pit::parse::malformed_property_line), help("property lines look like 'Key: value', and neither side may be blank"))]
	MalformedPropertyLine {
		#[source_code]
		src: NamedSource<String>,
		#[label("expected 'key: value'")]
		span: SourceSpan,
		position: Position,
	},

	#[error("unexpected end of input at {position}")]
	#[diagnostic(code(pit::parse::unexpected_eof))]
	UnexpectedEndOfInput {
		#[source_code]
		src: NamedSource<String>,
		#[label("document ends here")]
		span: SourceSpan,
		position: Position,
	},

	#[error("unexpected content after the property block at {position}")]
	#[diagnostic(code(pit::parse::trailing_content), help("the property block must be the last thing in the document"))]
	TrailingContent {
		#[source_code]
		src: NamedSource<String>,
		#[label("nothing but whitespace may follow the block")]
		span: SourceSpan,
		position: Position,
	},

	#[error("document has no body at {position}")]
	#[diagnostic(code(pit::parse::empty_body), help("empty bodies are disabled by `parser.allow_empty_body = false`"))]
	EmptyBody {
		#[source_code]
		src: NamedSource<String>,
		#[label("body expected here")]
		span: SourceSpan,
		position: Position,
	},

	#[error("document is {len} bytes, over the {limit} byte limit")]
	#[diagnostic(code(pit::parse::too_large), help("raise `parser.max_document_bytes`, or set it to 0 to disable the limit"))]
	DocumentTooLarge { len: usize, limit: usize },

	#[error("internal parser fault: {0}")]
	#[diagnostic(code(pit::parse::internal))]
	Internal(#[from] Fault),
}

impl ParseError {
	pub(crate) fn at(kind: FailureKind, ctx: &ParseContext, offset: usize) -> Self {
		let src = ctx.named_source();
		let span = ctx.span_at(offset);
		let position = ctx.position(offset);
		match kind {
			FailureKind::MalformedTitle => Self::MalformedTitle { src, span, position },
			FailureKind::MalformedPropertyBlock => Self::MalformedPropertyBlock { src, span, position },
			FailureKind::MalformedPropertyLine => Self::MalformedPropertyLine { src, span, position },
			FailureKind::UnexpectedEndOfInput => Self::UnexpectedEndOfInput { src, span, position },
			FailureKind::TrailingContent => Self::TrailingContent { src, span, position },
			FailureKind::EmptyBody => Self::EmptyBody { src, span, position },
		}
	}

	/// Where in the document the parse failed, for positional errors.
	pub fn position(&self) -> Option<Position> {
		match self {
			Self::MalformedTitle { position, .. }
			| Self::MalformedPropertyBlock { position, .. }
			| Self::MalformedPropertyLine { position, .. }
			| Self::UnexpectedEndOfInput { position, .. }
			| Self::TrailingContent { position, .. }
			| Self::EmptyBody { position, .. } => Some(*position),
			Self::DocumentTooLarge { .. } | Self::Internal(_) => None,
		}
	}
}

/// Holds source content and filename for error reporting.
#[derive(Clone, Debug)]
pub struct ParseContext {
	pub content: String,
	pub filename: String,
}

impl ParseContext {
	pub fn new(content: String, filename: impl Into<String>) -> Self {
		Self { content, filename: filename.into() }
	}

	/// Create a NamedSource for miette diagnostics.
	pub fn named_source(&self) -> NamedSource<String> {
		NamedSource::new(&self.filename, self.content.clone())
	}

	/// Line and column of a byte offset. Offsets past the end map to just after the last character.
	pub fn position(&self, offset: usize) -> Position {
		let offset = self.clamp(offset);
		let before = &self.content[..offset];
		let line_start = before.rfind('\n').map_or(0, |nl| nl + 1);
		let line = before.matches('\n').count() + 1;
		let column = before[line_start..].chars().count() + 1;
		Position::new(line, column)
	}

	/// Span of the character at `offset`, or an empty span at the end of input.
	pub fn span_at(&self, offset: usize) -> SourceSpan {
		let offset = self.clamp(offset);
		let len = self.content[offset..].chars().next().map_or(0, char::len_utf8);
		(offset, len).into()
	}

	fn clamp(&self, offset: usize) -> usize {
		let mut offset = offset.min(self.content.len());
		while !self.content.is_char_boundary(offset) {
			offset -= 1;
		}
		offset
	}
}
