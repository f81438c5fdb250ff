//! Issue file format.
//!
//! An issue file is a title line underlined by a rule, a free-form body, and optionally a block of
//! extended properties at the end:
//!
//! ```text
//! Fix login bug
//! -------------
//!
//! Users cannot log in when the password contains unicode characters.
//!
//! -------------
//! |----------  ----------|
//! Priority: High
//! Assignee: jdoe
//! |----------  ----------|
//! ```
//!
//! Parsing is all-or-nothing and never touches the filesystem.

mod builder;
pub use builder::Fault;

mod engine;

mod error;
pub use error::{ParseContext, ParseError, Position};

mod grammar;

mod lexical;
pub use lexical::SEPARATOR_CHARS;

mod properties;
pub use properties::Properties;

mod types;
pub use types::{DEFAULT_MAX_DOCUMENT_BYTES, ParseOptions, ParsedDocument};
