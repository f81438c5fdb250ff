//! Parsed issue document and the knobs of the parser.

use serde::Serialize;
use smart_default::SmartDefault;

use super::{
	builder::{Fault, Frame, Value},
	error::{ParseContext, ParseError},
	grammar::{self, BODY_KEY, PROPERTIES_KEY, Parsed, TITLE_KEY},
	properties::Properties,
};

/// Default upper bound on document size.
pub const DEFAULT_MAX_DOCUMENT_BYTES: usize = 256 * 1024;

#[derive(Clone, Debug, Eq, PartialEq, SmartDefault)]
pub struct ParseOptions {
	/// Accept a document whose title block is followed by nothing (or directly by the property block).
	#[default(true)]
	pub allow_empty_body: bool,
	/// `None` disables the limit.
	#[default(Some(DEFAULT_MAX_DOCUMENT_BYTES))]
	pub max_document_bytes: Option<usize>,
}

/// A successfully parsed issue file.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct ParsedDocument {
	title: String,
	body: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	properties: Option<Properties>,
}

impl ParsedDocument {
	/// Parse a whole document. All-or-nothing: any error means no part of the document is returned.
	pub fn parse(ctx: &ParseContext, options: &ParseOptions) -> Result<Self, ParseError> {
		let input = ctx.content.as_str();
		if let Some(limit) = options.max_document_bytes.filter(|&limit| input.len() > limit) {
			return Err(ParseError::DocumentTooLarge { len: input.len(), limit });
		}

		tracing::debug!(document = %ctx.filename, bytes = input.len(), "[parse] start");
		match grammar::run(input, options) {
			Parsed::Matched(frame) => {
				let doc = Self::from_frame(frame)?;
				tracing::debug!(
					document = %ctx.filename,
					title = %doc.title,
					body_bytes = doc.body.len(),
					properties = doc.properties.as_ref().map_or(0, Properties::len),
					"[parse] finished"
				);
				Ok(doc)
			}
			Parsed::Failed(failure) => {
				let kind = failure.kind(input.len());
				tracing::debug!(document = %ctx.filename, pos = failure.pos, ?kind, "[parse] failed");
				Err(ParseError::at(kind, ctx, failure.pos))
			}
			Parsed::Fault(fault) => {
				tracing::error!(document = %ctx.filename, %fault, "[parse] builder fault");
				Err(fault.into())
			}
		}
	}

	fn from_frame(mut frame: Frame) -> Result<Self, Fault> {
		let title = frame.take_text(TITLE_KEY)?;
		let body = frame.take_text(BODY_KEY)?;
		let properties = match frame.take(PROPERTIES_KEY) {
			None => None,
			Some(Value::Frame(props)) => Some(
				props
					.into_entries()
					.map(|(key, value)| match value {
						Value::Text(text) => Ok((key, text)),
						other => Err(Fault::UnexpectedValue {
							key,
							expected: "text",
							found: other.kind(),
						}),
					})
					.collect::<Result<Properties, Fault>>()?,
			),
			Some(other) => {
				return Err(Fault::UnexpectedValue {
					key: PROPERTIES_KEY.to_owned(),
					expected: "frame",
					found: other.kind(),
				});
			}
		};
		Ok(Self { title, body, properties })
	}

	pub fn title(&self) -> &str {
		&self.title
	}

	/// Everything between the title block and the property block, verbatim.
	pub fn body(&self) -> &str {
		&self.body
	}

	/// `None` when the document has no property block.
	pub fn properties(&self) -> Option<&Properties> {
		self.properties.as_ref()
	}

	pub fn property(&self, key: &str) -> Option<&str> {
		self.properties.as_ref()?.get(key)
	}
}
