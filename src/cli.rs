use clap::{builder::Styles, Args, Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;

use crate::config;

fn parse_positive_u32(s: &str) -> Result<u32, String> {
	let val: u32 = s.parse().map_err(|_| format!("'{}' is not a valid number", s))?;
	if val == 0 {
		Err("must be at least 1".to_string())
	} else {
		Ok(val)
	}
}

fn parse_positive_usize(s: &str) -> Result<usize, String> {
	let val: usize = s.parse().map_err(|_| format!("'{}' is not a valid number", s))?;
	if val == 0 {
		Err("must be at least 1".to_string())
	} else {
		Ok(val)
	}
}

fn styles() -> Styles {
	use clap::builder::styling::{AnsiColor, Color, Style};

	Styles::styled()
		.header(Style::new().bold().fg_color(Some(Color::Ansi(AnsiColor::Blue))))
		.usage(Style::new().bold().fg_color(Some(Color::Ansi(AnsiColor::Blue))))
		.literal(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Blue))))
		.placeholder(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Yellow))))
		.valid(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Blue))))
		.invalid(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Red))))
}

#[derive(Parser, Debug)]
#[command(
	name = "primer",
	author,
	version,
	about = "Warmup and provisioning orchestrator for a local Ollama daemon",
	styles = styles(),
	disable_help_subcommand = true,
	after_help = format!(
		"{title}
  {primer} {up}   {up_args}   {up_desc}
  {primer} {warm} {warm_args}        {warm_desc}
  {primer} {pull} {pull_args}          {pull_desc}
  {primer} {help} {help_args}                              {help_desc}",
		title = "Examples:".bright_blue().bold(),
		primer = "primer".bright_blue(),
		up = "up".yellow(),
		up_args = "-m llama3,qwen2 --embed-model nomic-embed-text",
		up_desc = "Full pipeline".dimmed(),
		warm = "warm".yellow(),
		warm_args = "-m llama3 --reps 5 --json",
		warm_desc = "Warm a running daemon".dimmed(),
		pull = "pull".yellow(),
		pull_args = "-m llama3,qwen2:7b",
		pull_desc = "Fetch missing models".dimmed(),
		help = "help".yellow(),
		help_args = "up",
		help_desc = "Show help for up".dimmed(),
	),
)]
pub struct Cli {
	/// Enable verbose debug output
	#[arg(short = 'v', long = "verbose", global = true)]
	pub verbose: bool,

	#[command(subcommand)]
	pub command: Command,
}

/// Daemon location and readiness-poll bounds
#[derive(Args, Debug)]
pub struct ServeOpts {
	/// Daemon base URL
	#[arg(long = "host", env = "PRIMER_HOST", default_value = config::DEFAULT_HOST, value_name = "URL")]
	pub host: String,

	/// Max readiness poll attempts before giving up
	#[arg(long = "max-attempts", env = "PRIMER_MAX_ATTEMPTS", default_value_t = config::DEFAULT_MAX_ATTEMPTS, value_parser = parse_positive_u32)]
	pub max_attempts: u32,

	/// Readiness poll interval in milliseconds
	#[arg(long = "interval-ms", env = "PRIMER_INTERVAL_MS", default_value_t = config::DEFAULT_INTERVAL_MS, value_name = "MS")]
	pub interval_ms: u64,

	/// File capturing the spawned daemon's output
	#[arg(long = "log-file", env = "PRIMER_LOG_FILE", default_value = config::DEFAULT_LOG_FILE, value_name = "PATH")]
	pub log_file: PathBuf,
}

/// Which models the run covers
#[derive(Args, Debug)]
pub struct ModelOpts {
	/// Comma-separated generation models
	#[arg(short = 'm', long = "models", env = "PRIMER_MODELS", value_name = "LIST")]
	pub models: String,

	/// Embedding model (optional)
	#[arg(long = "embed-model", env = "PRIMER_EMBED_MODEL", value_name = "NAME")]
	pub embed_model: Option<String>,
}

/// Warmup request shaping
#[derive(Args, Debug)]
pub struct WarmOpts {
	/// Prompt file seeding completion warmups
	#[arg(long = "prompt-file", env = "PRIMER_PROMPT_FILE", default_value = config::DEFAULT_PROMPT_FILE, value_name = "PATH")]
	pub prompt_file: PathBuf,

	/// Completion repetitions per model
	#[arg(long = "reps", env = "PRIMER_REPS", default_value_t = config::DEFAULT_REPS, value_parser = parse_positive_u32)]
	pub reps: u32,

	/// Max warmup requests in flight at once
	#[arg(long = "concurrency", env = "PRIMER_CONCURRENCY", default_value_t = config::DEFAULT_CONCURRENCY, value_parser = parse_positive_usize)]
	pub concurrency: usize,

	/// Force JSON-formatted warmup requests
	#[arg(long = "json", conflicts_with = "no_json")]
	pub json: bool,

	/// Suppress JSON-formatted warmup requests
	#[arg(long = "no-json")]
	pub no_json: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
	/// Run the full pipeline: install, serve, pull, warm
	Up {
		#[command(flatten)]
		serve: ServeOpts,

		#[command(flatten)]
		model: ModelOpts,

		#[command(flatten)]
		warm: WarmOpts,
	},

	/// Ensure the serving binary is installed
	Install,

	/// Ensure the daemon is running and healthy
	Serve {
		#[command(flatten)]
		serve: ServeOpts,
	},

	/// Fetch models missing from the local inventory
	Pull {
		#[command(flatten)]
		serve: ServeOpts,

		#[command(flatten)]
		model: ModelOpts,
	},

	/// Pre-warm models on an already-healthy daemon
	Warm {
		#[command(flatten)]
		serve: ServeOpts,

		#[command(flatten)]
		model: ModelOpts,

		#[command(flatten)]
		warm: WarmOpts,
	},

	/// Show help for a subcommand
	Help {
		/// Subcommand name
		subcommand: Option<String>,
	},
}
