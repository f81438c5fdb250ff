//! Tracing setup for the `pit` binary.
//!
//! Human-readable events go to stderr, filtered by `RUST_LOG` (or the directives embedded at build
//! time from `.cargo/log_directives`, or `warn`). When `PIT_TRACE_FILE` is set, every event at
//! DEBUG and above is also written to that file as JSON lines.

use std::{fs::File, path::Path, sync::Mutex};

use color_eyre::eyre::{Result, WrapErr};
use tracing_subscriber::{EnvFilter, Layer, filter::LevelFilter, layer::SubscriberExt, util::SubscriberInitExt};

pub const TRACE_FILE_ENV: &str = "PIT_TRACE_FILE";

const DEFAULT_DIRECTIVES: &str = "warn";

pub fn init() -> Result<()> {
	let stderr_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr).with_target(false).with_filter(env_filter());

	let json_layer = match std::env::var_os(TRACE_FILE_ENV) {
		Some(path) => {
			let file = create_trace_file(Path::new(&path))?;
			Some(tracing_subscriber::fmt::layer().json().with_writer(Mutex::new(file)).with_filter(LevelFilter::DEBUG))
		}
		None => None,
	};

	tracing_subscriber::registry()
		.with(stderr_layer)
		.with(json_layer)
		.try_init()
		.wrap_err("Failed to install the tracing subscriber")
}

fn env_filter() -> EnvFilter {
	EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(option_env!("LOG_DIRECTIVES").unwrap_or(DEFAULT_DIRECTIVES)))
}

fn create_trace_file(path: &Path) -> Result<File> {
	File::create(path).wrap_err_with(|| format!("Failed to create trace file {}", path.display()))
}
