//! Semantic-action builder for the issue grammar.
//!
//! Rules record what they matched into an append-only journal of frame operations. Nothing is
//! materialized while parsing: a checkpoint is just the journal length, so rolling back a failed
//! rule drops every mutation it made together with the cursor. The journal is replayed into
//! nested [`Frame`]s once the document rule has succeeded.

use indexmap::IndexMap;

/// Invariant violations in the builder. These are bugs in the grammar, not problems with the input.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum Fault {
	#[error("no frame is open to receive `{key}`")]
	NoOpenFrame { key: String },
	#[error("frame `{key}` has no parent to merge into")]
	NoParentFrame { key: String },
	#[error("expected exactly one root frame after parsing, found {open}")]
	UnbalancedFrames { open: usize },
	#[error("document frame is missing `{0}`")]
	MissingField(&'static str),
	#[error("`{key}` holds a {found} where a {expected} was expected")]
	UnexpectedValue { key: String, expected: &'static str, found: &'static str },
}

/// A value stored in a frame.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Value {
	Text(String),
	Frame(Frame),
}

impl Value {
	pub fn kind(&self) -> &'static str {
		match self {
			Value::Text(_) => "text",
			Value::Frame(_) => "frame",
		}
	}
}

/// Key/value accumulator. Insertion order is kept; re-inserting a key overwrites in place.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Frame {
	entries: IndexMap<String, Value>,
}

impl Frame {
	pub fn insert(&mut self, key: String, value: Value) -> Option<Value> {
		self.entries.insert(key, value)
	}

	#[cfg(test)]
	pub fn get(&self, key: &str) -> Option<&Value> {
		self.entries.get(key)
	}

	/// Remove `key`, returning its value.
	pub fn take(&mut self, key: &str) -> Option<Value> {
		self.entries.shift_remove(key)
	}

	/// Remove a text value, failing if it is absent or not text.
	pub fn take_text(&mut self, key: &'static str) -> Result<String, Fault> {
		match self.take(key) {
			Some(Value::Text(text)) => Ok(text),
			Some(other) => Err(Fault::UnexpectedValue {
				key: key.to_owned(),
				expected: "text",
				found: other.kind(),
			}),
			None => Err(Fault::MissingField(key)),
		}
	}

	#[cfg(test)]
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	#[cfg(test)]
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	pub fn into_entries(self) -> impl Iterator<Item = (String, Value)> {
		self.entries.into_iter()
	}
}

#[derive(Clone, Debug, Eq, PartialEq)]
enum Op {
	Open,
	Set { key: String, value: String },
	Close { key: String },
}

/// Position in the journal to roll back to.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Mark {
	len: usize,
	depth: usize,
}

#[derive(Clone, Debug, Default)]
pub struct Builder {
	journal: Vec<Op>,
	depth: usize,
}

impl Builder {
	/// A builder that already has a root frame open.
	pub fn with_root() -> Self {
		let mut builder = Self::default();
		builder.open_frame();
		builder
	}

	pub fn mark(&self) -> Mark {
		Mark {
			len: self.journal.len(),
			depth: self.depth,
		}
	}

	pub fn rollback(&mut self, mark: Mark) {
		self.journal.truncate(mark.len);
		self.depth = mark.depth;
	}

	#[cfg(test)]
	pub fn depth(&self) -> usize {
		self.depth
	}

	pub fn open_frame(&mut self) {
		self.journal.push(Op::Open);
		self.depth += 1;
	}

	pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) -> Result<(), Fault> {
		let key = key.into();
		if self.depth == 0 {
			return Err(Fault::NoOpenFrame { key });
		}
		self.journal.push(Op::Set { key, value: value.into() });
		Ok(())
	}

	/// Close the innermost frame and merge it into its parent under `key`.
	pub fn close_frame(&mut self, key: impl Into<String>) -> Result<(), Fault> {
		let key = key.into();
		if self.depth < 2 {
			return Err(Fault::NoParentFrame { key });
		}
		self.journal.push(Op::Close { key });
		self.depth -= 1;
		Ok(())
	}

	/// Replay the journal into the root frame.
	pub fn finish(self) -> Result<Frame, Fault> {
		let mut stack: Vec<Frame> = Vec::with_capacity(2);
		for op in self.journal {
			match op {
				Op::Open => stack.push(Frame::default()),
				Op::Set { key, value } => {
					let Some(frame) = stack.last_mut() else {
						return Err(Fault::NoOpenFrame { key });
					};
					frame.insert(key, Value::Text(value));
				}
				Op::Close { key } => {
					let (Some(child), Some(parent)) = (stack.pop(), stack.last_mut()) else {
						return Err(Fault::NoParentFrame { key });
					};
					parent.insert(key, Value::Frame(child));
				}
			}
		}

		match stack.len() {
			1 => Ok(stack.pop().unwrap_or_default()),
			open => Err(Fault::UnbalancedFrames { open }),
		}
	}
}
