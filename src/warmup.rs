//! Warmup driver: best-effort cache population
//!
//! Issues repeated completion requests (and optionally JSON-formatted and
//! embedding shapes) so model weights, tokenizer state, and KV-cache paths
//! are resident before real traffic arrives. Individual request failures are
//! counted and logged but never fail the run.

use anyhow::{Context, Result};
use rayon::prelude::*;
use std::fs;
use std::path::Path;

use crate::api::Client;
use crate::config::{Config, JsonMode, FALLBACK_PROMPT, PROMPT_MAX_CHARS};
use crate::logger::{log, Level};

/// Prompt substrings that switch JsonMode::Auto on.
const JSON_HINTS: &[&str] = &["json", "tool", "function", "schema"];

/// Outcome of a warmup pass: per-model completion timings in seconds,
/// request order within a model, plus the optional embedding timing.
pub struct WarmupStats {
	pub timings: Vec<(String, Vec<f64>)>,
	pub errors: usize,
	pub embed_timing: Option<f64>,
}

/// Reads the warmup prompt, truncated to keep requests cheap. A missing
/// file falls back to a generic warm prompt rather than failing the stage.
pub fn read_prompt(path: &Path) -> String {
	match fs::read_to_string(path) {
		Ok(text) => text.chars().take(PROMPT_MAX_CHARS).collect(),
		Err(_) => FALLBACK_PROMPT.to_string(),
	}
}

/// Resolves the tri-state JSON flag against the actual prompt. Auto mode
/// enables the JSON shape only when the prompt looks like it primes a
/// JSON/tool path.
pub fn json_enabled(mode: JsonMode, prompt: &str) -> bool {
	match mode {
		JsonMode::On => true,
		JsonMode::Off => false,
		JsonMode::Auto => {
			let lowered = prompt.to_lowercase();
			JSON_HINTS.iter().any(|hint| lowered.contains(hint))
		}
	}
}

/// Runs `reps` repetition batches over `runner`. Each batch holds one plain
/// request per model, plus one JSON-shaped request per model when enabled,
/// executed with at most `concurrency` in flight; the whole batch is joined
/// before the next repetition starts. Failures are counted, never raised.
pub fn drive<F>(
	models: &[String],
	reps: u32,
	concurrency: usize,
	with_json: bool,
	runner: F,
) -> Result<WarmupStats>
where
	F: Fn(&str, bool) -> Result<f64> + Sync,
{
	let pool = rayon::ThreadPoolBuilder::new()
		.num_threads(concurrency)
		.build()
		.context("Failed to build warmup thread pool")?;

	let mut stats = WarmupStats {
		timings: models.iter().map(|m| (m.clone(), Vec::new())).collect(),
		errors: 0,
		embed_timing: None,
	};

	// (model index, json shape) pairs making up one repetition batch
	let mut batch: Vec<(usize, bool)> = (0..models.len()).map(|i| (i, false)).collect();
	if with_json {
		batch.extend((0..models.len()).map(|i| (i, true)));
	}

	for rep in 1..=reps {
		log(Level::Debug, &format!("Warmup batch {}/{} ({} requests)", rep, reps, batch.len()));

		let results: Vec<(usize, Result<f64>)> = pool.install(|| {
			batch
				.par_iter()
				.map(|&(index, json_format)| (index, runner(&models[index], json_format)))
				.collect()
		});

		for (index, result) in results {
			match result {
				Ok(dt) => {
					log(Level::Debug, &format!("{}: {:.2}s", models[index], dt));
					stats.timings[index].1.push(dt);
				}
				Err(e) => {
					log(Level::Warning, &format!("Warmup request failed for {}: {:#}", models[index], e));
					stats.errors += 1;
				}
			}
		}
	}

	Ok(stats)
}

/// The full warmup stage: completion batches for every model, then one
/// embedding request when an embedding model is configured.
pub fn run(client: &Client, config: &Config) -> Result<WarmupStats> {
	if config.models.is_empty() {
		log(Level::Warning, "No models to warm");
	}

	let prompt = read_prompt(&config.prompt_file);
	log(
		Level::Info,
		&format!("Prompt from {} ({} chars)", config.prompt_file.display(), prompt.chars().count()),
	);

	let with_json = json_enabled(config.json_mode, &prompt);
	log(Level::Info, &format!("JSON warmup: {}", if with_json { "on" } else { "off" }));

	let mut stats = drive(
		&config.models,
		config.reps,
		config.concurrency,
		with_json,
		|model, json_format| client.generate(model, &prompt, json_format),
	)?;

	if let Some(embed) = &config.embed_model {
		match client.embed(embed) {
			Ok(dt) => {
				log(Level::Success, &format!("Embedding warm for {} ({:.2}s)", embed, dt));
				stats.embed_timing = Some(dt);
			}
			Err(e) => {
				log(Level::Warning, &format!("Embedding warmup failed for {}: {:#}", embed, e));
				stats.errors += 1;
			}
		}
	}

	Ok(stats)
}

#[cfg(test)]
mod tests {
	use super::*;
	use anyhow::anyhow;
	use std::io::Write;
	use std::sync::atomic::{AtomicUsize, Ordering};

	fn models(names: &[&str]) -> Vec<String> {
		names.iter().map(|n| n.to_string()).collect()
	}

	#[test]
	fn auto_mode_reads_the_prompt() {
		assert!(json_enabled(JsonMode::Auto, "Respond with a JSON object"));
		assert!(json_enabled(JsonMode::Auto, "call the search tool"));
		assert!(!json_enabled(JsonMode::Auto, "Say hello briefly"));
	}

	#[test]
	fn forced_modes_ignore_the_prompt() {
		assert!(json_enabled(JsonMode::On, "Say hello briefly"));
		assert!(!json_enabled(JsonMode::Off, "Respond with a JSON object"));
	}

	#[test]
	fn missing_prompt_file_falls_back() {
		let prompt = read_prompt(Path::new("no/such/prompt.txt"));
		assert_eq!(prompt, FALLBACK_PROMPT);
	}

	#[test]
	fn long_prompts_are_truncated() {
		let path = std::env::temp_dir().join("primer-prompt-truncate-test.txt");
		let mut file = fs::File::create(&path).unwrap();
		write!(file, "{}", "x".repeat(PROMPT_MAX_CHARS + 500)).unwrap();
		let prompt = read_prompt(&path);
		assert_eq!(prompt.chars().count(), PROMPT_MAX_CHARS);
		let _ = fs::remove_file(&path);
	}

	#[test]
	fn one_failure_does_not_stop_the_batch() {
		let attempts = AtomicUsize::new(0);
		let stats = drive(&models(&["good", "bad"]), 1, 2, false, |model, _| {
			attempts.fetch_add(1, Ordering::SeqCst);
			if model == "bad" {
				Err(anyhow!("connection reset"))
			} else {
				Ok(0.1)
			}
		})
		.unwrap();

		assert_eq!(attempts.load(Ordering::SeqCst), 2);
		assert_eq!(stats.errors, 1);
		assert_eq!(stats.timings[0].1.len(), 1);
		assert!(stats.timings[1].1.is_empty());
	}

	#[test]
	fn reps_issue_one_attempt_per_model_per_batch() {
		let attempts = AtomicUsize::new(0);
		let stats = drive(&models(&["m1", "m2"]), 2, 1, false, |_, _| {
			attempts.fetch_add(1, Ordering::SeqCst);
			Ok(0.05)
		})
		.unwrap();

		assert_eq!(attempts.load(Ordering::SeqCst), 4);
		assert_eq!(stats.timings[0].1.len(), 2);
		assert_eq!(stats.timings[1].1.len(), 2);
		assert_eq!(stats.errors, 0);
	}

	#[test]
	fn json_shape_doubles_the_batch() {
		let plain = AtomicUsize::new(0);
		let json = AtomicUsize::new(0);
		drive(&models(&["m1"]), 3, 2, true, |_, json_format| {
			if json_format {
				json.fetch_add(1, Ordering::SeqCst);
			} else {
				plain.fetch_add(1, Ordering::SeqCst);
			}
			Ok(0.05)
		})
		.unwrap();

		assert_eq!(plain.load(Ordering::SeqCst), 3);
		assert_eq!(json.load(Ordering::SeqCst), 3);
	}
}
