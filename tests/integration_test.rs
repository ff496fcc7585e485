// Integration tests for Primer

use std::net::TcpListener;
use std::process::Command;

/// A localhost URL nothing is listening on: bind port 0, take the assigned
/// port, drop the listener.
fn dead_host() -> String {
	let port = TcpListener::bind("127.0.0.1:0")
		.expect("Failed to bind probe listener")
		.local_addr()
		.expect("Failed to read local addr")
		.port();
	format!("http://127.0.0.1:{}", port)
}

fn primer(args: &[&str]) -> std::process::Output {
	Command::new("cargo")
		.args(["run", "--quiet", "--"])
		.args(args)
		.output()
		.expect("Failed to run primer")
}

#[test]
fn test_version_display() {
	let output = primer(&["--version"]);

	assert!(output.status.success(), "Version command failed");

	let stdout = String::from_utf8_lossy(&output.stdout);
	assert!(stdout.contains("primer"), "Expected 'primer' in version output");
}

#[test]
fn test_help_display() {
	let output = primer(&["--help"]);

	assert!(output.status.success(), "Help command failed");

	let stdout = String::from_utf8_lossy(&output.stdout);
	assert!(
		stdout.contains("up") && stdout.contains("warm") && stdout.contains("pull"),
		"Expected subcommands in help output"
	);
}

#[test]
fn test_unknown_flag_is_usage_error() {
	let output = primer(&["up", "-m", "m1", "--bogus"]);

	assert!(!output.status.success(), "Unknown flag should fail");
	assert_eq!(output.status.code(), Some(2), "Usage errors exit 2");
}

#[test]
fn test_json_flags_conflict() {
	let output = primer(&["warm", "-m", "m1", "--json", "--no-json"]);

	assert!(!output.status.success(), "Conflicting JSON flags should fail");
	assert_eq!(output.status.code(), Some(2), "Usage errors exit 2");
}

#[test]
fn test_zero_reps_rejected() {
	let output = primer(&["warm", "-m", "m1", "--reps", "0"]);

	assert!(!output.status.success(), "Zero reps should fail validation");
	assert_eq!(output.status.code(), Some(2), "Usage errors exit 2");
}

#[test]
fn test_warm_requires_healthy_daemon() {
	// Nothing listens on this host; warm must refuse with the readiness code
	let output = primer(&["warm", "-m", "m1", "--host", &dead_host()]);

	assert_eq!(output.status.code(), Some(4), "Expected readiness exit code");
}

#[test]
fn test_pull_requires_healthy_daemon() {
	let output = primer(&["pull", "-m", "m1", "--host", &dead_host()]);

	assert_eq!(output.status.code(), Some(4), "Expected readiness exit code");
}
