//! Application settings.
//!
//! Layered with the `config` crate: built-in defaults, then the config file
//! (`$XDG_CONFIG_HOME/pit/config.toml` or `--config`), then `PIT__SECTION__KEY` environment variables.

use std::path::{Path, PathBuf};

use clap::{Args, ValueEnum};
use color_eyre::eyre::{Result, WrapErr};
use serde::Deserialize;
use smart_default::SmartDefault;

use crate::issue::{DEFAULT_MAX_DOCUMENT_BYTES, ParseOptions};

pub const APP_NAME: &str = "pit";
pub const CONFIG_FILENAME: &str = "config.toml";
pub const ENV_PREFIX: &str = "PIT";

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
	pub parser: ParserSettings,
	pub output: OutputSettings,
}

#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct ParserSettings {
	#[default(true)]
	pub allow_empty_body: bool,
	/// 0 disables the limit
	#[default(DEFAULT_MAX_DOCUMENT_BYTES)]
	pub max_document_bytes: usize,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
	pub format: OutputFormat,
}

/// How `pit parse` prints a document.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, ValueEnum, derive_more::Display)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
	#[default]
	#[display("json")]
	Json,
	#[display("debug")]
	Debug,
	#[display("summary")]
	Summary,
}

/// Command-line overrides for settings.
#[derive(Args, Clone, Debug, Default)]
pub struct SettingsFlags {
	/// Read settings from this file instead of the XDG config location
	#[arg(long, global = true)]
	pub config: Option<PathBuf>,
}

impl AppConfig {
	pub fn load(flags: &SettingsFlags) -> Result<Self> {
		let file = match &flags.config {
			Some(path) => Some((path.clone(), true)),
			None => default_config_path().map(|path| (path, false)),
		};
		Self::load_from(file.as_ref().map(|(path, required)| (path.as_path(), *required)))
	}

	/// `file` is the config file to layer in and whether it must exist.
	pub fn load_from(file: Option<(&Path, bool)>) -> Result<Self> {
		let mut builder = config::Config::builder();
		if let Some((path, required)) = file {
			tracing::debug!(path = %path.display(), required, "[config] loading");
			builder = builder.add_source(config::File::from(path).required(required));
		}
		builder = builder.add_source(config::Environment::with_prefix(ENV_PREFIX).prefix_separator("__").separator("__").try_parsing(true));

		let settings = builder.build().wrap_err("Failed to read settings")?;
		settings
			.try_deserialize()
			.wrap_err("The config file is not correctly formatted TOML\nand/or\n has fields of the wrong type")
	}

	pub fn parse_options(&self) -> ParseOptions {
		ParseOptions {
			allow_empty_body: self.parser.allow_empty_body,
			max_document_bytes: match self.parser.max_document_bytes {
				0 => None,
				limit => Some(limit),
			},
		}
	}
}

fn default_config_path() -> Option<PathBuf> {
	xdg::BaseDirectories::with_prefix(APP_NAME).find_config_file(CONFIG_FILENAME)
}
