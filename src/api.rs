//! HTTP client for the local Ollama API
//!
//! The endpoint contracts are Ollama's, consumed as-is: /api/version for
//! readiness, /api/tags for the local inventory, /api/pull to fetch a model,
//! /api/generate and /api/embeddings for warmup traffic.

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::json;
use std::time::{Duration, Instant};

use crate::config::KEEP_ALIVE;

/// Probe timeout; every other request blocks until the daemon answers.
const PING_TIMEOUT: Duration = Duration::from_secs(2);

/// Appended to the prompt in JSON mode to nudge a fast, valid object.
const JSON_NUDGE: &str =
	"Return a minimal valid JSON object summarizing your intent, e.g. {\"status\":\"ready\"}";

const EMBED_INPUT: &str = "warmup embedding path; short text";

pub struct Client {
	host: String,
	agent: ureq::Agent,
}

impl Client {
	pub fn new(host: &str) -> Self {
		Self {
			host: host.trim_end_matches('/').to_string(),
			agent: ureq::AgentBuilder::new().build(),
		}
	}

	pub fn host(&self) -> &str {
		&self.host
	}

	/// Readiness probe. Reachable and answering means healthy.
	pub fn ping(&self) -> bool {
		self.agent
			.get(&format!("{}/api/version", self.host))
			.timeout(PING_TIMEOUT)
			.call()
			.is_ok()
	}

	/// Names of models already present locally.
	pub fn list_models(&self) -> Result<Vec<String>> {
		let tags: TagsResponse = self
			.agent
			.get(&format!("{}/api/tags", self.host))
			.call()
			.context("Failed to query model inventory")?
			.into_json()
			.context("Invalid inventory response")?;
		Ok(tags.models.into_iter().map(|m| m.name).collect())
	}

	/// Fetches a model, blocking until the pull completes.
	pub fn pull(&self, name: &str) -> Result<()> {
		self.agent
			.post(&format!("{}/api/pull", self.host))
			.send_json(json!({ "name": name, "stream": false }))
			.with_context(|| format!("Failed to pull {}", name))?;
		Ok(())
	}

	/// Issues one completion warmup request; returns wall time in seconds.
	/// Options are pinned small and deterministic so the call is cheap while
	/// still loading weights, tokenizer, and KV-cache paths.
	pub fn generate(&self, model: &str, prompt: &str, json_format: bool) -> Result<f64> {
		let mut payload = json!({
			"model": model,
			"prompt": prompt,
			"stream": false,
			"options": {
				"temperature": 0.0,
				"top_k": 1,
				"num_predict": 32,
			},
			"keep_alive": KEEP_ALIVE,
		});
		if json_format {
			payload["format"] = json!("json");
			payload["prompt"] = json!(format!("{}\n\n{}", prompt, JSON_NUDGE));
		}

		let start = Instant::now();
		let response: GenerateResponse = self
			.agent
			.post(&format!("{}/api/generate", self.host))
			.send_json(payload)
			.with_context(|| format!("Completion request failed for {}", model))?
			.into_json()
			.context("Invalid completion response")?;
		let _ = response.response;
		Ok(start.elapsed().as_secs_f64())
	}

	/// Issues one embedding warmup request; returns wall time in seconds.
	pub fn embed(&self, model: &str) -> Result<f64> {
		let start = Instant::now();
		self.agent
			.post(&format!("{}/api/embeddings", self.host))
			.send_json(json!({
				"model": model,
				"input": EMBED_INPUT,
				"keep_alive": KEEP_ALIVE,
			}))
			.with_context(|| format!("Embedding request failed for {}", model))?;
		Ok(start.elapsed().as_secs_f64())
	}
}

#[derive(Deserialize)]
struct TagsResponse {
	#[serde(default)]
	models: Vec<ModelTag>,
}

#[derive(Deserialize)]
struct ModelTag {
	name: String,
}

#[derive(Deserialize)]
struct GenerateResponse {
	#[serde(default)]
	response: String,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn host_is_normalized() {
		let client = Client::new("http://localhost:11434/");
		assert_eq!(client.host(), "http://localhost:11434");
	}
}
