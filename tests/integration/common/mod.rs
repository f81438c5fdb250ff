//! Shared test infrastructure for integration tests.
//!
//! Provides `TestContext`, which handles:
//! - a private `XDG_CONFIG_HOME` so the user's own `pit` config never leaks in
//! - writing documents and config files into a temp directory
//! - running the compiled binary, optionally with a JSON trace file
//!
//! # Example
//!
//! ```ignore
//! let ctx = TestContext::new();
//! let doc = ctx.write("bug.issue", "Title\n----\n\nbody\n");
//! let (status, stdout, stderr) = ctx.run(&["check", doc.to_str().unwrap()]);
//! assert!(status.success());
//! ```

use std::{
	fs,
	io::Write,
	path::{Path, PathBuf},
	process::{Command, ExitStatus, Stdio},
};

use rstest::fixture;
use tempfile::TempDir;

pub const EXAMPLE_DOCUMENT: &str = "Fix login bug
-------------

Users cannot log in when the password contains unicode characters.
Observed in production since v2.3.

-------------
|----------  ----------|
Priority: High
Assignee: jdoe
|----------  ----------|
";

pub struct TestContext {
	dir: TempDir,
	/// Where the binary writes JSON traces, when run with [`TestContext::run_traced`]
	pub trace_file: PathBuf,
}

#[fixture]
pub fn ctx() -> TestContext {
	TestContext::new()
}

impl TestContext {
	pub fn new() -> Self {
		let dir = tempfile::tempdir().unwrap();
		let trace_file = dir.path().join("trace.jsonl");
		Self { dir, trace_file }
	}

	pub fn root(&self) -> &Path {
		self.dir.path()
	}

	/// Write a file relative to the temp root, creating parent directories.
	pub fn write(&self, relative_path: &str, content: &str) -> PathBuf {
		let path = self.root().join(relative_path);
		fs::create_dir_all(path.parent().unwrap()).unwrap();
		fs::write(&path, content).unwrap();
		path
	}

	/// Write the config file `pit` picks up from `$XDG_CONFIG_HOME`.
	pub fn write_config(&self, toml: &str) -> PathBuf {
		self.write("config/pit/config.toml", toml)
	}

	/// The binary with an isolated environment, for tests that need to add to it.
	pub fn command(&self, args: &[&str]) -> Command {
		let mut cmd = Command::new(env!("CARGO_BIN_EXE_pit"));
		cmd.args(args)
			.current_dir(self.root())
			.env("XDG_CONFIG_HOME", self.root().join("config"))
			.env_remove("RUST_LOG")
			.env_remove("PIT_TRACE_FILE")
			.env("NO_COLOR", "1");
		cmd
	}

	/// Run a command. Returns (exit_status, stdout, stderr) for easy assertions.
	pub fn run(&self, args: &[&str]) -> (ExitStatus, String, String) {
		let output = self.command(args).output().unwrap();
		(
			output.status,
			String::from_utf8_lossy(&output.stdout).into_owned(),
			String::from_utf8_lossy(&output.stderr).into_owned(),
		)
	}

	/// Run a command with `stdin` piped in.
	pub fn run_with_stdin(&self, args: &[&str], stdin: &str) -> (ExitStatus, String, String) {
		let mut child = self.command(args).stdin(Stdio::piped()).stdout(Stdio::piped()).stderr(Stdio::piped()).spawn().unwrap();
		child.stdin.take().unwrap().write_all(stdin.as_bytes()).unwrap();
		let output = child.wait_with_output().unwrap();
		(
			output.status,
			String::from_utf8_lossy(&output.stdout).into_owned(),
			String::from_utf8_lossy(&output.stderr).into_owned(),
		)
	}

	/// Run a command with `PIT_TRACE_FILE` pointing at [`TestContext::trace_file`].
	pub fn run_traced(&self, args: &[&str]) -> (ExitStatus, String, String) {
		let output = self.command(args).env("PIT_TRACE_FILE", &self.trace_file).output().unwrap();
		(
			output.status,
			String::from_utf8_lossy(&output.stdout).into_owned(),
			String::from_utf8_lossy(&output.stderr).into_owned(),
		)
	}
}
