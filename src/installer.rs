//! Idempotent installation of the serving binary

use anyhow::{bail, Context, Result};
use std::env;
use std::process::Command;

use crate::logger::{log, Level};

/// Package managers probed in priority order, with their install arguments.
/// The tool name is appended as the final argument.
const MANAGERS: &[(&str, &[&str])] = &[
	("brew", &["install"]),
	("pacman", &["-S", "--noconfirm"]),
	("dnf", &["install", "-y"]),
	("apt-get", &["install", "-y"]),
];

/// What `ensure_tool` actually did, so callers can assert idempotence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallOutcome {
	AlreadyPresent,
	Installed,
}

/// Checks the search path for an executable with the given name.
pub fn is_on_path(tool: &str) -> bool {
	let Some(paths) = env::var_os("PATH") else {
		return false;
	};
	env::split_paths(&paths).any(|dir| {
		let candidate = dir.join(tool);
		candidate.is_file() || candidate.with_extension("exe").is_file()
	})
}

/// Ensures `tool` is installed, running the first available package manager
/// if it is missing. A second call with the tool present is a no-op.
pub fn ensure_tool(tool: &str) -> Result<InstallOutcome> {
	if is_on_path(tool) {
		log(Level::Success, &format!("{} already installed", tool));
		return Ok(InstallOutcome::AlreadyPresent);
	}

	let Some((manager, args)) = MANAGERS.iter().find(|(m, _)| is_on_path(m)) else {
		bail!(
			"{} is not installed and no supported package manager was found (tried: {})",
			tool,
			MANAGERS.iter().map(|(m, _)| *m).collect::<Vec<_>>().join(", ")
		);
	};

	log(Level::Info, &format!("Installing {} via {}", tool, manager));
	let status = Command::new(manager)
		.args(*args)
		.arg(tool)
		.status()
		.with_context(|| format!("Failed to run {}", manager))?;

	if !status.success() {
		bail!("{} install of {} failed ({})", manager, tool, status);
	}

	log(Level::Success, &format!("{} installed", tool));
	Ok(InstallOutcome::Installed)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	#[cfg(unix)]
	fn present_tool_is_a_noop() {
		// sh is guaranteed on any unix PATH; no install may be attempted
		assert!(is_on_path("sh"));
		let outcome = ensure_tool("sh").unwrap();
		assert_eq!(outcome, InstallOutcome::AlreadyPresent);
	}

	#[test]
	fn absent_tool_is_detected() {
		assert!(!is_on_path("definitely-not-a-real-binary-name"));
	}
}
