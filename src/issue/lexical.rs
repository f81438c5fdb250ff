//! Character-level primitives of the issue format.

use super::{
	engine::{ParseState, Step},
	grammar::Rule,
};

pub const EOL: char = '\n';
pub const COLON: char = ':';
/// Characters rule lines and table separators are drawn with.
pub const SEPARATOR_CHARS: &str = "\"'`~:-_=+*^#<>";
pub const SPACE_CHARS: &str = " \t";
/// Optional frame around a table separator, as in `|----  ----|`.
pub const TABLE_BORDER: char = '|';
/// Minimum length of a horizontal rule.
pub const RULE_MIN_LEN: usize = 4;

pub fn eol(p: &mut ParseState) -> Step {
	p.literal(EOL)
}

pub fn not_eol(p: &mut ParseState) -> Step {
	p.satisfy(|c| c != EOL)
}

pub fn is_separator(c: char) -> bool {
	SEPARATOR_CHARS.contains(c)
}

pub fn separator_char(p: &mut ParseState) -> Step {
	p.satisfy(is_separator)
}

pub fn space(p: &mut ParseState) -> Step {
	p.any_of(SPACE_CHARS)
}

/// At least [`RULE_MIN_LEN`] separator characters, in any mixture.
pub fn horizontal_rule(p: &mut ParseState) -> Step {
	p.rule(Rule::HorizontalRule, |p| {
		for _ in 1..RULE_MIN_LEN {
			separator_char(p)?;
		}
		p.one_or_more(separator_char)
	})
}

/// `----  ----`: a separator run, a space run, a separator run, all on one line.
pub fn table_separator(p: &mut ParseState) -> Step {
	p.rule(Rule::TableSeparator, |p| {
		p.optional(|p| p.literal(TABLE_BORDER))?;
		p.one_or_more(separator_char)?;
		p.one_or_more(space)?;
		p.one_or_more(separator_char)?;
		p.optional(|p| p.literal(TABLE_BORDER))
	})
}

/// Whitespace-only tail of the document, newlines included.
pub fn blank(p: &mut ParseState) -> Step {
	p.zero_or_more(|p| p.first_of(space, eol))
}
