use std::{
	io::Read,
	path::{Path, PathBuf},
	process::ExitCode,
};

use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use color_eyre::eyre::{Result, WrapErr};
use pit::{
	ParseContext, ParsedDocument,
	config::{AppConfig, OutputFormat, SettingsFlags},
	render,
};

static EXE_NAME: &str = "pit";
const STDIN_PATH: &str = "-";

#[derive(Parser)]
#[command(author, version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("GIT_HASH"), ")"), about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
	#[command(subcommand)]
	command: Commands,
	#[clap(flatten)]
	settings: SettingsFlags,
}

#[derive(Subcommand)]
enum Commands {
	/// Parse one issue document and print it
	Parse(ParseArgs),
	/// Validate issue documents, reporting every failure
	Check(CheckArgs),
	/// Print shell completions
	Completions(CompletionsArgs),
}

#[derive(Args)]
struct ParseArgs {
	/// File to read; stdin when absent or `-`
	path: Option<PathBuf>,
	/// Overrides `output.format` from the config
	#[arg(long, short)]
	format: Option<OutputFormat>,
}

#[derive(Args)]
struct CheckArgs {
	#[arg(required = true)]
	paths: Vec<PathBuf>,
}

#[derive(Args)]
struct CompletionsArgs {
	shell: Shell,
}

fn main() -> Result<ExitCode> {
	color_eyre::install()?;
	pit::logging::init()?;

	let cli = Cli::parse();
	let config = AppConfig::load(&cli.settings)?;
	tracing::debug!(?config, "[main] loaded config");

	match cli.command {
		Commands::Parse(args) => parse(&config, args),
		Commands::Check(args) => check(&config, args),
		Commands::Completions(args) => {
			clap_complete::generate(args.shell, &mut Cli::command(), EXE_NAME, &mut std::io::stdout());
			Ok(ExitCode::SUCCESS)
		}
	}
}

fn parse(config: &AppConfig, args: ParseArgs) -> Result<ExitCode> {
	let ctx = read_source(args.path.as_deref())?;
	match ParsedDocument::parse(&ctx, &config.parse_options()) {
		Ok(doc) => {
			let format = args.format.unwrap_or(config.output.format);
			println!("{}", render::render(&doc, format)?.trim_end());
			Ok(ExitCode::SUCCESS)
		}
		Err(e) => {
			eprintln!("{:?}", miette::Report::new(e));
			Ok(ExitCode::FAILURE)
		}
	}
}

fn check(config: &AppConfig, args: CheckArgs) -> Result<ExitCode> {
	let options = config.parse_options();
	let mut failed = 0;
	for path in &args.paths {
		let ctx = read_source(Some(path.as_path()))?;
		match ParsedDocument::parse(&ctx, &options) {
			Ok(_) => println!("ok {}", ctx.filename),
			Err(e) => {
				failed += 1;
				eprintln!("{:?}", miette::Report::new(e));
			}
		}
	}
	tracing::info!(checked = args.paths.len(), failed, "[check] done");
	Ok(match failed {
		0 => ExitCode::SUCCESS,
		_ => ExitCode::FAILURE,
	})
}

fn read_source(path: Option<&Path>) -> Result<ParseContext> {
	match path {
		None => read_stdin(),
		Some(path) if path == Path::new(STDIN_PATH) => read_stdin(),
		Some(path) => {
			let content = std::fs::read_to_string(path).wrap_err_with(|| format!("Failed to read {}", path.display()))?;
			Ok(ParseContext::new(content, path.display().to_string()))
		}
	}
}

fn read_stdin() -> Result<ParseContext> {
	let mut content = String::new();
	std::io::stdin().read_to_string(&mut content).wrap_err("Failed to read stdin")?;
	Ok(ParseContext::new(content, pit::ANONYMOUS_SOURCE))
}
