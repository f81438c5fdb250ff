//! Backtracking PEG evaluator the issue grammar runs on.
//!
//! Rules are plain functions from a [`ParseState`] to a [`Step`]. A rule either matches, moving the
//! cursor past the consumed text, or fails with [`Fail::Backtrack`], leaving the cursor and the
//! builder exactly where they were. [`Fail::Fatal`] carries builder faults and cuts through every
//! choice point.
//!
//! The cursor is a byte offset into the input and always sits on a char boundary.

use super::{
	builder::{Builder, Fault, Frame, Mark},
	grammar::Rule,
};

/// Byte range of matched input.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, derive_new::new)]
pub struct Span {
	pub start: usize,
	pub end: usize,
}

#[cfg(test)]
impl Span {
	pub fn len(&self) -> usize {
		self.end - self.start
	}

	pub fn is_empty(&self) -> bool {
		self.start == self.end
	}
}

#[derive(Debug)]
pub enum Fail {
	/// Ordinary mismatch. The caller may try something else.
	Backtrack,
	/// Broken builder state. Aborts the whole parse.
	Fatal(Fault),
}

impl From<Fault> for Fail {
	fn from(fault: Fault) -> Self {
		Fail::Fatal(fault)
	}
}

pub type Step<T = Span> = Result<T, Fail>;

/// Where committed parsing gave up, and which rules were active there (outermost first).
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Failure {
	pub pos: usize,
	pub context: Vec<Rule>,
}

#[derive(Clone, Copy, Debug)]
struct Checkpoint {
	pos: usize,
	mark: Mark,
}

/// Cursor, builder and diagnostics of one parse. Never shared between parses.
#[derive(Debug)]
pub struct ParseState<'src> {
	input: &'src str,
	pos: usize,
	builder: Builder,
	rules: Vec<Rule>,
	/// Nesting depth of lookaheads. Failures inside a lookahead are expected and never reported.
	lookahead: usize,
	furthest: Option<Failure>,
}

impl<'src> ParseState<'src> {
	pub fn new(input: &'src str) -> Self {
		Self {
			input,
			pos: 0,
			builder: Builder::default(),
			rules: Vec::new(),
			lookahead: 0,
			furthest: None,
		}
	}

	pub fn pos(&self) -> usize {
		self.pos
	}

	pub fn at_end(&self) -> bool {
		self.pos >= self.input.len()
	}

	pub fn slice(&self, span: Span) -> &'src str {
		&self.input[span.start..span.end]
	}

	/// Whether the character just before the cursor satisfies `pred`. False at the start of input.
	pub fn preceded_by(&self, pred: impl FnOnce(char) -> bool) -> bool {
		self.input[..self.pos].chars().next_back().is_some_and(pred)
	}

	pub fn builder(&mut self) -> &mut Builder {
		&mut self.builder
	}

	fn checkpoint(&self) -> Checkpoint {
		Checkpoint {
			pos: self.pos,
			mark: self.builder.mark(),
		}
	}

	fn restore(&mut self, checkpoint: Checkpoint) {
		self.pos = checkpoint.pos;
		self.builder.rollback(checkpoint.mark);
	}

	/// Fail at the cursor, remembering it if it is the furthest point committed parsing has reached.
	pub fn mismatch<T>(&mut self) -> Step<T> {
		if self.lookahead == 0 && self.furthest.as_ref().is_none_or(|f| self.pos > f.pos) {
			self.furthest = Some(Failure {
				pos: self.pos,
				context: self.rules.clone(),
			});
		}
		Err(Fail::Backtrack)
	}

	/// Fail and report `pos` as the failure point, regardless of how far parsing got elsewhere.
	pub fn reject_at<T>(&mut self, pos: usize) -> Step<T> {
		if self.lookahead == 0 {
			self.furthest = Some(Failure {
				pos,
				context: self.rules.clone(),
			});
		}
		Err(Fail::Backtrack)
	}

	pub fn reject<T>(&mut self) -> Step<T> {
		self.reject_at(self.pos)
	}

	/// Fail with a diagnostic obtained elsewhere (see [`Self::diagnose_at`]).
	pub fn adopt<T>(&mut self, failure: Failure) -> Step<T> {
		if self.lookahead == 0 {
			self.furthest = Some(failure);
		}
		Err(Fail::Backtrack)
	}

	/// The furthest committed failure, or the cursor if nothing has failed yet.
	pub fn failure(&self) -> Failure {
		self.furthest.clone().unwrap_or_else(|| Failure {
			pos: self.pos,
			context: self.rules.clone(),
		})
	}

	/// Hand back the root frame built by a successful parse.
	pub fn finish(self) -> Result<Frame, Fault> {
		self.builder.finish()
	}

	// Primitives

	pub fn satisfy(&mut self, pred: impl FnOnce(char) -> bool) -> Step {
		match self.input[self.pos..].chars().next() {
			Some(c) if pred(c) => {
				let start = self.pos;
				self.pos += c.len_utf8();
				Ok(Span::new(start, self.pos))
			}
			_ => self.mismatch(),
		}
	}

	pub fn any(&mut self) -> Step {
		self.satisfy(|_| true)
	}

	pub fn literal(&mut self, expected: char) -> Step {
		self.satisfy(|c| c == expected)
	}

	pub fn any_of(&mut self, set: &str) -> Step {
		self.satisfy(|c| set.contains(c))
	}

	pub fn end_of_input(&mut self) -> Step {
		match self.at_end() {
			true => Ok(Span::new(self.pos, self.pos)),
			false => self.mismatch(),
		}
	}

	// Combinators

	/// Run `f` atomically: if it backtracks, cursor and builder are restored.
	pub fn sequence<T>(&mut self, f: impl FnOnce(&mut Self) -> Step<T>) -> Step<T> {
		let checkpoint = self.checkpoint();
		let result = f(self);
		if matches!(result, Err(Fail::Backtrack)) {
			self.restore(checkpoint);
		}
		result
	}

	/// [`Self::sequence`], returning the consumed span.
	pub fn capture<T>(&mut self, f: impl FnOnce(&mut Self) -> Step<T>) -> Step {
		let start = self.pos;
		self.sequence(f)?;
		Ok(Span::new(start, self.pos))
	}

	/// Named [`Self::capture`]. The name shows up in traces and diagnostics.
	pub fn rule<T>(&mut self, rule: Rule, f: impl FnOnce(&mut Self) -> Step<T>) -> Step {
		if self.lookahead == 0 {
			tracing::trace!(%rule, pos = self.pos, "[parse] enter rule");
		}
		self.rules.push(rule);
		let result = self.capture(f);
		self.rules.pop();
		result
	}

	/// Ordered choice: `second` is only tried if `first` backtracks.
	pub fn first_of<T>(&mut self, first: impl FnOnce(&mut Self) -> Step<T>, second: impl FnOnce(&mut Self) -> Step<T>) -> Step<T> {
		match self.sequence(first) {
			Err(Fail::Backtrack) => self.sequence(second),
			other => other,
		}
	}

	pub fn zero_or_more<T>(&mut self, f: impl FnMut(&mut Self) -> Step<T>) -> Step {
		self.repeat(0, f)
	}

	pub fn one_or_more<T>(&mut self, f: impl FnMut(&mut Self) -> Step<T>) -> Step {
		self.repeat(1, f)
	}

	fn repeat<T>(&mut self, min: usize, mut f: impl FnMut(&mut Self) -> Step<T>) -> Step {
		let start = self.checkpoint();
		let mut count = 0;
		loop {
			let before = self.pos;
			match self.sequence(&mut f) {
				Ok(_) => {
					count += 1;
					// a zero-width match would repeat forever
					if self.pos == before {
						break;
					}
				}
				Err(Fail::Backtrack) => break,
				Err(fatal) => return Err(fatal),
			}
		}
		if count < min {
			self.restore(start);
			return Err(Fail::Backtrack);
		}
		Ok(Span::new(start.pos, self.pos))
	}

	pub fn optional<T>(&mut self, f: impl FnOnce(&mut Self) -> Step<T>) -> Step<Option<T>> {
		match self.sequence(f) {
			Ok(value) => Ok(Some(value)),
			Err(Fail::Backtrack) => Ok(None),
			Err(fatal) => Err(fatal),
		}
	}

	/// Zero-width negative lookahead. Never consumes input and never keeps builder mutations.
	pub fn test_not<T>(&mut self, f: impl FnOnce(&mut Self) -> Step<T>) -> Step<()> {
		let checkpoint = self.checkpoint();
		self.lookahead += 1;
		let result = f(self);
		self.lookahead -= 1;
		self.restore(checkpoint);
		match result {
			Ok(_) => self.mismatch(),
			Err(Fail::Backtrack) => Ok(()),
			Err(fatal) => Err(fatal),
		}
	}

	/// Zero-width test of `f` at an arbitrary position.
	pub fn matches_at<T>(&mut self, pos: usize, f: impl FnOnce(&mut Self) -> Step<T>) -> Step<bool> {
		debug_assert!(self.input.is_char_boundary(pos));
		let checkpoint = self.checkpoint();
		self.pos = pos;
		self.lookahead += 1;
		let result = f(self);
		self.lookahead -= 1;
		self.restore(checkpoint);
		match result {
			Ok(_) => Ok(true),
			Err(Fail::Backtrack) => Ok(false),
			Err(fatal) => Err(fatal),
		}
	}

	/// Run `f` as committed parsing on a scratch state at `pos` and return where it failed, if it did.
	/// This state is left untouched.
	pub fn diagnose_at<T>(&self, pos: usize, f: impl FnOnce(&mut ParseState<'src>) -> Step<T>) -> Step<Option<Failure>> {
		let mut scout = ParseState {
			input: self.input,
			pos,
			builder: Builder::with_root(),
			rules: self.rules.clone(),
			lookahead: 0,
			furthest: None,
		};
		match f(&mut scout) {
			Ok(_) => Ok(None),
			Err(Fail::Backtrack) => Ok(Some(scout.failure())),
			Err(fatal) => Err(fatal),
		}
	}
}
