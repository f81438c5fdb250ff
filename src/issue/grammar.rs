//! Grammar of issue documents and the semantic actions attached to it.
//!
//! ```text
//! Document           <- Title Body PropertyBlock? Trailing
//! Title              <- NOT_EOL+ EOL HorizontalRule EOL SPACE* EOL
//! Body               <- (!PropertyBlock .)+
//! PropertyBlock      <- HorizontalRule EOL+ TableSeparator EOL PropertyDefinition+ TableSeparator
//! PropertyDefinition <- PropertyKey ':' PropertyValue EOL
//! PropertyKey        <- (!':' NOT_EOL)+
//! PropertyValue      <- NOT_EOL+
//! Trailing           <- (SPACE / EOL)* !.
//! ```
//!
//! `Body` re-runs the whole `PropertyBlock` rule at every character that starts a separator run, so
//! text that merely resembles a block stays in the body. A block whose rule line and both table
//! separators are present but whose contents are malformed is an error rather than body text; see
//! [`committed_block_start`].

use super::{
	builder::{Fault, Frame},
	engine::{Fail, Failure, ParseState, Span, Step},
	error::FailureKind,
	lexical::{COLON, EOL, blank, eol, horizontal_rule, is_separator, not_eol, space, table_separator},
	types::ParseOptions,
};

pub const TITLE_KEY: &str = "title";
pub const BODY_KEY: &str = "body";
pub const PROPERTIES_KEY: &str = "properties";

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, derive_more::Display)]
pub enum Rule {
	Document,
	Title,
	Body,
	PropertyBlock,
	PropertyDefinition,
	PropertyKey,
	PropertyValue,
	HorizontalRule,
	TableSeparator,
	Trailing,
}

pub fn document(p: &mut ParseState, options: &ParseOptions) -> Step {
	p.rule(Rule::Document, |p| {
		p.builder().open_frame();
		title(p)?;
		let body_span = body(p, options)?;

		p.optional(property_block)?;
		if let Some(start) = committed_block_start(p, body_span)? {
			let failure = p.diagnose_at(start, property_block)?.unwrap_or_else(|| Failure {
				pos: start,
				context: vec![Rule::Document, Rule::PropertyBlock],
			});
			tracing::warn!(block_start = start, failure_pos = failure.pos, "[parse] property block is malformed");
			return p.adopt(failure);
		}

		p.rule(Rule::Trailing, |p| {
			blank(p)?;
			match p.at_end() {
				true => Ok(()),
				false => p.reject(),
			}
		})
	})
}

pub fn title(p: &mut ParseState) -> Step {
	p.rule(Rule::Title, |p| {
		let text = p.one_or_more(not_eol)?;
		let text = p.slice(text);
		p.builder().set(TITLE_KEY, text)?;
		eol(p)?;
		horizontal_rule(p)?;
		eol(p)?;
		p.zero_or_more(space)?;
		eol(p)
	})
}

pub fn body(p: &mut ParseState, options: &ParseOptions) -> Step {
	p.rule(Rule::Body, |p| {
		let span = match options.allow_empty_body {
			true => p.zero_or_more(body_char)?,
			false => p.one_or_more(body_char)?,
		};
		let text = p.slice(span);
		p.builder().set(BODY_KEY, text)?;
		Ok(())
	})
}

fn body_char(p: &mut ParseState) -> Step {
	p.sequence(|p| {
		// right after a separator either no rule starts here or the run's start already tried the same one
		if !p.preceded_by(is_separator) {
			p.test_not(property_block)?;
		}
		p.any()
	})
}

pub fn property_block(p: &mut ParseState) -> Step {
	p.rule(Rule::PropertyBlock, |p| {
		p.builder().open_frame();
		horizontal_rule(p)?;
		p.one_or_more(eol)?;
		table_separator(p)?;
		eol(p)?;
		if p.optional(|p| p.one_or_more(property_definition))?.is_none() {
			let pos = p.pos();
			// an empty block, as opposed to a bad first line
			if p.matches_at(pos, table_separator)? {
				return p.reject();
			}
			return p.mismatch();
		}
		table_separator(p)?;
		p.builder().close_frame(PROPERTIES_KEY)?;
		Ok(())
	})
}

pub fn property_definition(p: &mut ParseState) -> Step {
	p.rule(Rule::PropertyDefinition, |p| {
		let key = p.rule(Rule::PropertyKey, |p| p.one_or_more(|p| p.satisfy(|c| c != COLON && c != EOL)))?;
		p.literal(COLON)?;
		let value = p.rule(Rule::PropertyValue, |p| p.one_or_more(not_eol))?;
		eol(p)?;

		let (key_text, value_text) = (p.slice(key).trim(), p.slice(value).trim());
		if key_text.is_empty() {
			return p.reject_at(key.start);
		}
		if value_text.is_empty() {
			return p.reject_at(value.start);
		}
		p.builder().set(key_text, value_text)?;
		Ok(())
	})
}

/// A property block by its delimiters alone: a rule line, a table separator, any lines, and the
/// next line that starts with a table separator.
fn block_frame(p: &mut ParseState) -> Step {
	p.sequence(|p| {
		horizontal_rule(p)?;
		p.one_or_more(eol)?;
		table_separator(p)?;
		eol(p)?;
		p.zero_or_more(|p| {
			p.test_not(table_separator)?;
			p.zero_or_more(not_eol)?;
			eol(p)
		})?;
		table_separator(p)
	})
}

/// Start of the last delimited property block in `body`.
///
/// A well-formed block ends the body, so any frame found here is a block that failed to parse.
/// Frames only start at the first character of a separator run.
fn committed_block_start(p: &mut ParseState, body: Span) -> Step<Option<usize>> {
	let mut prev = None;
	let starts: Vec<usize> = p
		.slice(body)
		.char_indices()
		.filter_map(|(offset, c)| {
			let run_start = is_separator(c) && !prev.is_some_and(is_separator);
			prev = Some(c);
			run_start.then_some(body.start + offset)
		})
		.collect();
	for pos in starts.into_iter().rev() {
		if p.matches_at(pos, block_frame)? {
			return Ok(Some(pos));
		}
	}
	Ok(None)
}

impl Failure {
	/// Classify by the innermost rule that was active. Running out of input wins over everything.
	pub fn kind(&self, input_len: usize) -> FailureKind {
		if self.pos >= input_len {
			return FailureKind::UnexpectedEndOfInput;
		}
		self.context
			.iter()
			.rev()
			.find_map(|rule| match rule {
				Rule::PropertyDefinition | Rule::PropertyKey | Rule::PropertyValue => Some(FailureKind::MalformedPropertyLine),
				Rule::PropertyBlock => Some(FailureKind::MalformedPropertyBlock),
				Rule::Title => Some(FailureKind::MalformedTitle),
				Rule::Body => Some(FailureKind::EmptyBody),
				Rule::Trailing => Some(FailureKind::TrailingContent),
				Rule::Document | Rule::HorizontalRule | Rule::TableSeparator => None,
			})
			.unwrap_or(FailureKind::MalformedTitle)
	}
}

/// Outcome of running [`document`] over a whole input.
pub enum Parsed {
	Matched(Frame),
	Failed(Failure),
	Fault(Fault),
}

pub fn run(input: &str, options: &ParseOptions) -> Parsed {
	let mut state = ParseState::new(input);
	match document(&mut state, options) {
		Ok(_) => match state.finish() {
			Ok(frame) => Parsed::Matched(frame),
			Err(fault) => Parsed::Fault(fault),
		},
		Err(Fail::Backtrack) => Parsed::Failed(state.failure()),
		Err(Fail::Fatal(fault)) => Parsed::Fault(fault),
	}
}
