//! Daemon supervision: reuse a healthy daemon or start and wait for one

use anyhow::{bail, Context, Result};
use std::fs::{self, File};
use std::path::Path;
use std::process::{Child, Command, Stdio};

use crate::api::Client;
use crate::config::{Config, REQUIRED_TOOL};
use crate::logger::{log, Level};
use crate::readiness::wait_for;

const LOG_TAIL_LINES: usize = 20;

/// Handle to the serving daemon. `child` is None when a daemon was already
/// running before this process; a spawned daemon is deliberately left running
/// on success so later invocations and the caller can reuse it.
#[derive(Debug)]
pub struct Daemon {
	child: Option<Child>,
}

impl Daemon {
	/// True when this run spawned the daemon rather than finding one.
	pub fn spawned(&self) -> bool {
		self.child.is_some()
	}
}

/// Ensures a healthy daemon is listening at the configured host. Probes
/// first so an already-running daemon is never duplicated; otherwise spawns
/// `ollama serve` detached with output captured to the log file, then polls
/// until ready or the attempt budget runs out. On timeout the spawned child
/// is killed and the log tail surfaced.
pub fn ensure_running(client: &Client, config: &Config) -> Result<Daemon> {
	ensure_running_with(REQUIRED_TOOL, client, config)
}

fn ensure_running_with(tool: &str, client: &Client, config: &Config) -> Result<Daemon> {
	if client.ping() {
		log(Level::Success, &format!("Daemon already running at {}", client.host()));
		return Ok(Daemon { child: None });
	}

	log(
		Level::Info,
		&format!("Starting {} serve (log: {})", tool, config.log_file.display()),
	);

	let stdout = File::create(&config.log_file)
		.with_context(|| format!("Failed to create log file {}", config.log_file.display()))?;
	let stderr = stdout.try_clone().context("Failed to clone log file handle")?;

	let mut child = Command::new(tool)
		.arg("serve")
		.stdin(Stdio::null())
		.stdout(Stdio::from(stdout))
		.stderr(Stdio::from(stderr))
		.spawn()
		.with_context(|| format!("Failed to start {} serve", tool))?;

	let ready = wait_for(|| client.ping(), config.interval, config.max_attempts);
	if !ready {
		log(Level::Error, "Daemon did not become ready; recent log output:");
		for line in log_tail(&config.log_file, LOG_TAIL_LINES) {
			eprintln!("  {}", line);
		}
		// Best-effort cleanup of the process we started
		let _ = child.kill();
		let _ = child.wait();
		bail!(
			"Daemon not ready after {} attempts ({} ms interval)",
			config.max_attempts,
			config.interval.as_millis()
		);
	}

	log(Level::Success, "Daemon ready");
	Ok(Daemon { child: Some(child) })
}

/// Last `count` lines of the daemon log, for timeout diagnostics.
pub(crate) fn log_tail(path: &Path, count: usize) -> Vec<String> {
	let Ok(contents) = fs::read_to_string(path) else {
		return Vec::new();
	};
	let lines: Vec<&str> = contents.lines().collect();
	let start = lines.len().saturating_sub(count);
	lines[start..].iter().map(|l| l.to_string()).collect()
}
