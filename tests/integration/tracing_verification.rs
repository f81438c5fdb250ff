//! Integration tests that verify parser behavior via tracing output.
//!
//! These tests spawn the binary with PIT_TRACE_FILE set, run a command,
//! then check the JSON trace log for the expected events.

use rstest::rstest;

use crate::{
	assert_traced,
	common::{EXAMPLE_DOCUMENT, TestContext, ctx},
	tracing_utils::TraceLog,
};

#[rstest]
fn test_successful_parse_is_traced(ctx: TestContext) {
	let doc = ctx.write("login.issue", EXAMPLE_DOCUMENT);
	let (status, _, stderr) = ctx.run_traced(&["parse", doc.to_str().unwrap()]);
	assert!(status.success(), "stderr: {stderr}");

	let trace = TraceLog::from_file(&ctx.trace_file);
	assert_traced!(trace, "[parse] start");
	assert_traced!(trace, "[parse] finished");

	let finished = trace.with_message("[parse] finished");
	let event = finished[0];
	assert_eq!(event.level, "DEBUG");
	assert_eq!(event.target, "pit::issue::types");
	assert_eq!(event.fields.document.as_deref(), doc.to_str());
	assert_eq!(event.fields.title.as_deref(), Some("Fix login bug"));
	assert_eq!(event.fields.properties, Some(2));
	assert!(!trace.has_message("[parse] failed"));
}

#[rstest]
fn test_failed_parse_traces_position_and_kind(ctx: TestContext) {
	let doc = ctx.write("bad.issue", "T\n----\n\nbody\n----\n-- --\nPriority High\n-- --\n");
	let (status, _, _) = ctx.run_traced(&["parse", doc.to_str().unwrap()]);
	assert_eq!(status.code(), Some(1));

	let trace = TraceLog::from_file(&ctx.trace_file);
	assert_traced!(trace, "[parse] property block is malformed");
	let malformed = trace.with_message("[parse] property block is malformed");
	assert_eq!(malformed[0].level, "WARN");
	assert_eq!(malformed[0].fields.block_start, Some(13));

	let failed = trace.with_message("[parse] failed");
	assert_eq!(failed.len(), 1);
	assert_eq!(failed[0].fields.pos, Some(37));
	assert_eq!(failed[0].fields.kind.as_deref(), Some("MalformedPropertyLine"));
	assert!(!trace.has_message("[parse] finished"));
}

#[rstest]
fn test_check_traces_summary(ctx: TestContext) {
	let good = ctx.write("good.issue", EXAMPLE_DOCUMENT);
	let bad = ctx.write("bad.issue", "Title\n---\n\nbody\n");
	let (status, _, _) = ctx.run_traced(&["check", good.to_str().unwrap(), bad.to_str().unwrap()]);
	assert!(!status.success());

	let trace = TraceLog::from_file(&ctx.trace_file);
	assert_eq!(trace.with_message("[parse] start").len(), 2);
	let done = trace.with_message("[check] done");
	assert_eq!(done.len(), 1);
	assert_eq!(done[0].level, "INFO");
	assert_eq!((done[0].fields.checked, done[0].fields.failed), (Some(2), Some(1)));
}

#[rstest]
fn test_no_trace_file_without_env(ctx: TestContext) {
	let doc = ctx.write("login.issue", EXAMPLE_DOCUMENT);
	let (status, _, stderr) = ctx.run(&["parse", doc.to_str().unwrap()]);
	assert!(status.success());
	assert!(!ctx.trace_file.exists());
	// default filter is `warn`, so a clean parse prints nothing on stderr
	assert!(stderr.is_empty(), "stderr: {stderr}");
}
