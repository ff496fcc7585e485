//! Primer - warmup and provisioning orchestrator for a local Ollama daemon
//!
//! Runs a sequential pipeline: ensure the serving binary is installed,
//! ensure the daemon is running and healthy, pull any missing models, then
//! pre-warm them with representative requests. The first three stages are
//! fail-fast with distinct exit codes; warmup failures never fail the run.

use clap::{CommandFactory, Parser};
use colored::Colorize;
use std::time::Instant;

use primer::api::Client;
use primer::cli::{Cli, Command};
use primer::config::{Config, REQUIRED_TOOL};
use primer::logger::{self, log, Level};
use primer::{daemon, installer, provision, warmup};

// Exit codes for the mandatory stages (clap itself exits 2 on usage errors)
const EXIT_INSTALL: i32 = 3;
const EXIT_NOT_READY: i32 = 4;
const EXIT_PROVISION: i32 = 5;

fn main() {
	let cli = Cli::parse();

	logger::set_verbose(cli.verbose);

	let code = match cli.command {
		Command::Up { serve, model, warm } => {
			let config = Config::new(&serve, Some(&model), Some(&warm));
			run_up(&config)
		}
		Command::Install => run_install(),
		Command::Serve { serve } => {
			let config = Config::new(&serve, None, None);
			run_serve(&config)
		}
		Command::Pull { serve, model } => {
			let config = Config::new(&serve, Some(&model), None);
			run_pull(&config)
		}
		Command::Warm { serve, model, warm } => {
			let config = Config::new(&serve, Some(&model), Some(&warm));
			run_warm(&config)
		}
		Command::Help { subcommand } => {
			let mut cmd = Cli::command();
			if let Some(sub) = subcommand {
				if let Some(sub_cmd) = cmd.find_subcommand_mut(&sub) {
					sub_cmd.print_help().unwrap();
				} else {
					eprintln!("Unknown subcommand: {}", sub);
					cmd.print_help().unwrap();
				}
			} else {
				cmd.print_help().unwrap();
			}
			0
		}
	};

	std::process::exit(code);
}

fn run_up(config: &Config) -> i32 {
	print_header();

	logger::header("Install");
	if let Err(e) = installer::ensure_tool(REQUIRED_TOOL) {
		log(Level::Error, &format!("{:#}", e));
		return EXIT_INSTALL;
	}

	logger::header("Serve");
	let client = Client::new(&config.host);
	let daemon = match daemon::ensure_running(&client, config) {
		Ok(d) => d,
		Err(e) => {
			log(Level::Error, &format!("{:#}", e));
			return EXIT_NOT_READY;
		}
	};

	logger::header("Provision");
	if let Err(e) = provision::ensure_models(&client, config) {
		log(Level::Error, &format!("{:#}", e));
		return EXIT_PROVISION;
	}

	logger::header("Warmup");
	run_warmup_stage(&client, config);

	if daemon.spawned() {
		log(Level::Info, "Daemon left running for later use");
	}
	0
}

fn run_install() -> i32 {
	print_header();
	logger::header("Install");
	match installer::ensure_tool(REQUIRED_TOOL) {
		Ok(_) => 0,
		Err(e) => {
			log(Level::Error, &format!("{:#}", e));
			EXIT_INSTALL
		}
	}
}

fn run_serve(config: &Config) -> i32 {
	print_header();
	logger::header("Serve");
	let client = Client::new(&config.host);
	match daemon::ensure_running(&client, config) {
		Ok(_) => 0,
		Err(e) => {
			log(Level::Error, &format!("{:#}", e));
			EXIT_NOT_READY
		}
	}
}

fn run_pull(config: &Config) -> i32 {
	print_header();
	let client = Client::new(&config.host);
	if !require_healthy(&client) {
		return EXIT_NOT_READY;
	}

	logger::header("Provision");
	match provision::ensure_models(&client, config) {
		Ok(()) => 0,
		Err(e) => {
			log(Level::Error, &format!("{:#}", e));
			EXIT_PROVISION
		}
	}
}

fn run_warm(config: &Config) -> i32 {
	print_header();
	let client = Client::new(&config.host);
	if !require_healthy(&client) {
		return EXIT_NOT_READY;
	}

	logger::header("Warmup");
	run_warmup_stage(&client, config);
	0
}

/// Warmup is best-effort: failures are reported through the stats and the
/// exit code stays 0.
fn run_warmup_stage(client: &Client, config: &Config) {
	let start = Instant::now();
	match warmup::run(client, config) {
		Ok(stats) => {
			if stats.errors > 0 {
				log(Level::Warning, &format!("Warmup finished with {} failed requests", stats.errors));
			}
			logger::summary(&stats, start.elapsed().as_secs_f32());
		}
		Err(e) => log(Level::Warning, &format!("Warmup skipped: {:#}", e)),
	}
}

fn require_healthy(client: &Client) -> bool {
	if client.ping() {
		return true;
	}
	log(
		Level::Error,
		&format!("No healthy daemon at {} (run `primer serve` first)", client.host()),
	);
	false
}

fn print_header() {
	println!();
	println!(
		"{}",
		format!("─── Primer v{} ───", env!("CARGO_PKG_VERSION"))
			.bright_blue()
			.bold()
	);
}
