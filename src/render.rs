//! Printing parsed documents in the formats `pit parse` offers.

use color_eyre::eyre::{Result, WrapErr};

use crate::{config::OutputFormat, issue::ParsedDocument};

pub fn render(doc: &ParsedDocument, format: OutputFormat) -> Result<String> {
	match format {
		OutputFormat::Json => serde_json::to_string_pretty(doc).wrap_err("Failed to serialize document"),
		OutputFormat::Debug => Ok(format!("{doc:#?}")),
		OutputFormat::Summary => Ok(summary(doc)),
	}
}

fn summary(doc: &ParsedDocument) -> String {
	let mut out = format!("title: {}\n", doc.title());
	let lines = doc.body().lines().count();
	out.push_str(&format!("body: {} bytes, {lines} lines\n", doc.body().len()));
	match doc.properties() {
		None => out.push_str("properties: none\n"),
		Some(props) => {
			out.push_str(&format!("properties: {}\n", props.len()));
			for (key, value) in props.iter() {
				out.push_str(&format!("  {key}: {value}\n"));
			}
		}
	}
	out
}
