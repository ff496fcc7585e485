//! Run configuration and defaults

use std::path::PathBuf;
use std::time::Duration;

use crate::cli::{ModelOpts, ServeOpts, WarmOpts};

// === Service Defaults ===
pub const DEFAULT_HOST: &str = "http://127.0.0.1:11434";
pub const DEFAULT_LOG_FILE: &str = "ollama-serve.log";

/// Binary the pipeline depends on
pub const REQUIRED_TOOL: &str = "ollama";

// === Readiness Poll ===
pub const DEFAULT_MAX_ATTEMPTS: u32 = 300;
pub const DEFAULT_INTERVAL_MS: u64 = 100;

// === Warmup Defaults ===
pub const DEFAULT_PROMPT_FILE: &str = "prompts/warmup.txt";
pub const DEFAULT_REPS: u32 = 3;
pub const DEFAULT_CONCURRENCY: usize = 2;
pub const PROMPT_MAX_CHARS: usize = 4000;
pub const FALLBACK_PROMPT: &str = "You are a helpful assistant. Reply briefly to confirm readiness.";

/// Requested model residency after a warmup call
pub const KEEP_ALIVE: &str = "10m";

/// Whether JSON-formatted warmup requests are issued
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonMode {
	/// Enable when the prompt looks like it primes a JSON/tool path
	#[default]
	Auto,
	/// Always issue the JSON-formatted shape
	On,
	/// Never issue the JSON-formatted shape
	Off,
}

impl JsonMode {
	/// Resolves the tri-state from the flag pair and the `PRIMER_JSON`
	/// environment value. Flags win over the environment.
	pub fn resolve(force_on: bool, force_off: bool, env: Option<&str>) -> Self {
		if force_on {
			return JsonMode::On;
		}
		if force_off {
			return JsonMode::Off;
		}
		match env.map(|v| v.trim().to_ascii_lowercase()).as_deref() {
			Some("true") | Some("on") | Some("1") => JsonMode::On,
			Some("false") | Some("off") | Some("0") => JsonMode::Off,
			_ => JsonMode::Auto,
		}
	}
}

/// Resolved options for one run, threaded through every stage.
#[derive(Debug, Clone)]
pub struct Config {
	pub host: String,
	pub models: Vec<String>,
	pub embed_model: Option<String>,
	pub prompt_file: PathBuf,
	pub reps: u32,
	pub concurrency: usize,
	pub json_mode: JsonMode,
	pub max_attempts: u32,
	pub interval: Duration,
	pub log_file: PathBuf,
}

impl Config {
	/// Builds a config from whichever option groups the subcommand carries.
	/// Absent groups fall back to the defaults above.
	pub fn new(serve: &ServeOpts, model: Option<&ModelOpts>, warm: Option<&WarmOpts>) -> Self {
		let json_mode = warm
			.map(|w| JsonMode::resolve(w.json, w.no_json, std::env::var("PRIMER_JSON").ok().as_deref()))
			.unwrap_or_default();

		Self {
			host: serve.host.trim_end_matches('/').to_string(),
			models: model.map(|m| parse_models(&m.models)).unwrap_or_default(),
			embed_model: model
				.and_then(|m| m.embed_model.clone())
				.filter(|name| !name.trim().is_empty()),
			prompt_file: warm
				.map(|w| w.prompt_file.clone())
				.unwrap_or_else(|| PathBuf::from(DEFAULT_PROMPT_FILE)),
			reps: warm.map(|w| w.reps).unwrap_or(DEFAULT_REPS),
			concurrency: warm.map(|w| w.concurrency).unwrap_or(DEFAULT_CONCURRENCY),
			json_mode,
			max_attempts: serve.max_attempts,
			interval: Duration::from_millis(serve.interval_ms),
			log_file: serve.log_file.clone(),
		}
	}
}

/// Splits a comma-separated model list, trimming whitespace and dropping
/// empty segments.
pub fn parse_models(list: &str) -> Vec<String> {
	list.split(',')
		.map(str::trim)
		.filter(|m| !m.is_empty())
		.map(str::to_string)
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parse_models_trims_and_drops_empty() {
		assert_eq!(parse_models("llama3, qwen2 ,,"), vec!["llama3", "qwen2"]);
		assert_eq!(parse_models(""), Vec::<String>::new());
		assert_eq!(parse_models(" , "), Vec::<String>::new());
	}

	#[test]
	fn json_mode_flags_win_over_env() {
		assert_eq!(JsonMode::resolve(true, false, Some("false")), JsonMode::On);
		assert_eq!(JsonMode::resolve(false, true, Some("true")), JsonMode::Off);
	}

	#[test]
	fn json_mode_env_fallback() {
		assert_eq!(JsonMode::resolve(false, false, Some("true")), JsonMode::On);
		assert_eq!(JsonMode::resolve(false, false, Some("FALSE")), JsonMode::Off);
		assert_eq!(JsonMode::resolve(false, false, Some("auto")), JsonMode::Auto);
		assert_eq!(JsonMode::resolve(false, false, None), JsonMode::Auto);
		assert_eq!(JsonMode::resolve(false, false, Some("garbage")), JsonMode::Auto);
	}
}
