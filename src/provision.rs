//! Model provisioning: pull whatever the inventory is missing

use anyhow::Result;

use crate::api::Client;
use crate::config::Config;
use crate::logger::{log, Level};

/// True when `name` is already present locally. Ollama stores untagged
/// names under the implicit `:latest` tag, so `m` matches inventory entry
/// `m:latest`.
fn has_model(inventory: &[String], name: &str) -> bool {
	inventory
		.iter()
		.any(|have| have == name || have.strip_suffix(":latest") == Some(name))
}

/// Requested models absent from the inventory, in request order and
/// deduplicated.
pub fn missing_models<'a>(wanted: &[&'a str], inventory: &[String]) -> Vec<&'a str> {
	let mut missing: Vec<&str> = Vec::new();
	for name in wanted {
		if !has_model(inventory, name) && !missing.contains(name) {
			missing.push(name);
		}
	}
	missing
}

/// Ensures every configured model is present locally: generation models in
/// list order, then the embedding model. The first pull failure aborts the
/// run; already-present models are skipped without any fetch.
pub fn ensure_models(client: &Client, config: &Config) -> Result<()> {
	let inventory = client.list_models()?;
	log(Level::Debug, &format!("Inventory: {} models", inventory.len()));

	let mut wanted: Vec<&str> = config.models.iter().map(String::as_str).collect();
	if let Some(embed) = &config.embed_model {
		wanted.push(embed);
	}

	for name in &wanted {
		if has_model(&inventory, name) {
			log(Level::Info, &format!("{} already present", name));
		}
	}

	let missing = missing_models(&wanted, &inventory);
	if missing.is_empty() {
		log(Level::Success, "All models present");
		return Ok(());
	}

	for name in missing {
		log(Level::Info, &format!("Pulling {}...", name));
		client.pull(name)?;
		log(Level::Success, &format!("Pulled {}", name));
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;

	fn inventory(names: &[&str]) -> Vec<String> {
		names.iter().map(|n| n.to_string()).collect()
	}

	#[test]
	fn present_models_are_skipped() {
		let have = inventory(&["m1:latest", "m2:7b"]);
		assert!(missing_models(&["m1", "m2:7b"], &have).is_empty());
	}

	#[test]
	fn absent_models_are_reported_in_order() {
		let have = inventory(&["m1:latest"]);
		assert_eq!(missing_models(&["m1", "m2", "m3"], &have), vec!["m2", "m3"]);
	}

	#[test]
	fn latest_tag_is_implicit() {
		let have = inventory(&["llama3:latest"]);
		assert!(missing_models(&["llama3"], &have).is_empty());
		// An explicit non-latest tag is a different artifact
		assert_eq!(missing_models(&["llama3:8b"], &have), vec!["llama3:8b"]);
	}

	#[test]
	fn duplicates_are_pulled_once() {
		let have = inventory(&[]);
		assert_eq!(missing_models(&["m1", "m1"], &have), vec!["m1"]);
	}
}
