use std::{collections::HashSet, time::Duration};

use tracing::warn;

use crate::AisleService;

impl AisleService {
	/// Proposes alternative queries for a search that matched nothing.
	///
	/// Never fails: a disabled capability, an upstream error, unusable output, or a timeout
	/// all yield an empty list.
	pub async fn suggest(&self, original_query: &str) -> Vec<String> {
		let query = original_query.trim();
		let cfg = &self.cfg.suggestions;

		if query.is_empty() || !cfg.enabled {
			return Vec::new();
		}

		let timeout = Duration::from_millis(cfg.timeout_ms);

		match tokio::time::timeout(timeout, self.providers.suggestions.suggest(cfg, query)).await {
			Ok(Ok(candidates)) => {
				normalize_suggestions(query, candidates, cfg.max_suggestions as usize)
			},
			Ok(Err(err)) => {
				warn!(error = %err, provider_id = %cfg.provider_id, "Suggestion request failed.");

				Vec::new()
			},
			Err(_) => {
				warn!(
					timeout_ms = cfg.timeout_ms,
					provider_id = %cfg.provider_id,
					"Suggestion request timed out."
				);

				Vec::new()
			},
		}
	}
}

/// Trims candidates and drops blanks, repeats, and echoes of the original query.
pub fn normalize_suggestions(original: &str, candidates: Vec<String>, max: usize) -> Vec<String> {
	let mut seen: HashSet<String> = HashSet::new();

	seen.insert(original.trim().to_lowercase());

	candidates
		.into_iter()
		.filter_map(|candidate| {
			let candidate = candidate.trim();

			if candidate.is_empty() || !seen.insert(candidate.to_lowercase()) {
				return None;
			}

			Some(candidate.to_string())
		})
		.take(max)
		.collect()
}
