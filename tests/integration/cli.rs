//! The `pit` binary end to end.

use rstest::rstest;

use crate::common::{EXAMPLE_DOCUMENT, TestContext, ctx};

#[rstest]
fn test_parse_prints_json(ctx: TestContext) {
	let doc = ctx.write("login.issue", EXAMPLE_DOCUMENT);
	let (status, stdout, stderr) = ctx.run(&["parse", doc.to_str().unwrap()]);
	assert!(status.success(), "stderr: {stderr}");
	insta::assert_snapshot!(stdout.trim_end(), @r#"
	{
	  "title": "Fix login bug",
	  "body": "Users cannot log in when the password contains unicode characters.\nObserved in production since v2.3.\n\n",
	  "properties": {
	    "Priority": "High",
	    "Assignee": "jdoe"
	  }
	}
	"#);
}

#[rstest]
fn test_parse_reads_stdin(ctx: TestContext) {
	let (status, stdout, _) = ctx.run_with_stdin(&["parse", "--format", "summary"], EXAMPLE_DOCUMENT);
	assert!(status.success());
	insta::assert_snapshot!(stdout.trim_end(), @r"
	title: Fix login bug
	body: 103 bytes, 3 lines
	properties: 2
	  Priority: High
	  Assignee: jdoe
	");

	let (status, explicit, _) = ctx.run_with_stdin(&["parse", "-", "--format", "summary"], EXAMPLE_DOCUMENT);
	assert!(status.success());
	assert_eq!(explicit, stdout);
}

#[rstest]
fn test_parse_failure_reports_position(ctx: TestContext) {
	let doc = ctx.write("broken.issue", "Title\n---\n\nbody\n");
	let (status, stdout, stderr) = ctx.run(&["parse", doc.to_str().unwrap()]);
	assert_eq!(status.code(), Some(1));
	assert!(stdout.is_empty());
	assert!(stderr.contains("malformed title at 2:4"), "stderr: {stderr}");
	assert!(stderr.contains("pit::parse::malformed_title"), "stderr: {stderr}");
}

#[rstest]
fn test_check_reports_every_file(ctx: TestContext) {
	let good = ctx.write("good.issue", EXAMPLE_DOCUMENT);
	let bad = ctx.write("bad.issue", "T\n----\n\nbody\n----\n-- --\nPriority High\n-- --\n");
	let also_good = ctx.write("nested/plain.issue", "T\n----\n\nJust prose.\n");

	let (status, stdout, stderr) = ctx.run(&["check", good.to_str().unwrap(), bad.to_str().unwrap(), also_good.to_str().unwrap()]);
	assert_eq!(status.code(), Some(1));
	assert_eq!(stdout, format!("ok {}\nok {}\n", good.display(), also_good.display()));
	assert!(stderr.contains("malformed property line at 7:14"), "stderr: {stderr}");

	let (status, _, _) = ctx.run(&["check", good.to_str().unwrap()]);
	assert!(status.success());
}

#[rstest]
fn test_missing_file_is_an_error(ctx: TestContext) {
	let (status, _, stderr) = ctx.run(&["check", "does-not-exist.issue"]);
	assert!(!status.success());
	assert!(stderr.contains("does-not-exist.issue"), "stderr: {stderr}");
}

#[rstest]
fn test_config_file_controls_parser_and_output(ctx: TestContext) {
	let doc = ctx.write("empty.issue", "T\n----\n\n----\n-- --\nk: v\n-- --\n");

	let (status, stdout, _) = ctx.run(&["parse", doc.to_str().unwrap()]);
	assert!(status.success());
	assert!(stdout.contains(r#""body": """#), "stdout: {stdout}");

	ctx.write_config("[parser]\nallow_empty_body = false\n");
	let (status, _, stderr) = ctx.run(&["parse", doc.to_str().unwrap()]);
	assert_eq!(status.code(), Some(1));
	assert!(stderr.contains("document has no body at 4:1"), "stderr: {stderr}");

	ctx.write_config("[output]\nformat = \"summary\"\n");
	let (status, stdout, _) = ctx.run(&["parse", doc.to_str().unwrap()]);
	assert!(status.success());
	assert!(stdout.starts_with("title: T\nbody: 0 bytes"), "stdout: {stdout}");
}

#[rstest]
fn test_explicit_config_flag(ctx: TestContext) {
	let doc = ctx.write("doc.issue", "T\n----\n\nbody\n");
	let config = ctx.write("elsewhere.toml", "[parser]\nmax_document_bytes = 4\n");

	let (status, _, stderr) = ctx.run(&["--config", config.to_str().unwrap(), "parse", doc.to_str().unwrap()]);
	assert_eq!(status.code(), Some(1));
	assert!(stderr.contains("over the 4 byte limit"), "stderr: {stderr}");

	let (status, _, stderr) = ctx.run(&["parse", doc.to_str().unwrap(), "--config", "missing.toml"]);
	assert!(!status.success());
	assert!(stderr.contains("Failed to read settings"), "stderr: {stderr}");
}

#[rstest]
fn test_completions(ctx: TestContext) {
	let (status, stdout, _) = ctx.run(&["completions", "bash"]);
	assert!(status.success());
	assert!(stdout.contains("pit"));
	assert!(stdout.contains("check"));
}

#[rstest]
fn test_env_overrides_config_file(ctx: TestContext) {
	let doc = ctx.write("doc.issue", "T\n----\n\nbody\n");
	ctx.write_config("[output]\nformat = \"summary\"\n");

	let output = ctx.command(&["parse", doc.to_str().unwrap()]).env("PIT__OUTPUT__FORMAT", "debug").output().unwrap();
	assert!(output.status.success());
	let stdout = String::from_utf8_lossy(&output.stdout);
	assert!(stdout.starts_with("ParsedDocument {"), "stdout: {stdout}");

	let output = ctx.command(&["parse", doc.to_str().unwrap()]).env("PIT__PARSER__MAX_DOCUMENT_BYTES", "3").output().unwrap();
	assert_eq!(output.status.code(), Some(1));
}
