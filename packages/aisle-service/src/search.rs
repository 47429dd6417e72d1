use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use aisle_domain::SearchQuery;
use aisle_providers::typesense::{CredentialKind, SearchClient, SearchParams};

use crate::{AisleService, Error, Result};

/// A matched index document projected onto the display fields.
///
/// Field values pass through exactly as the index stored them. Missing or null fields stay
/// `None` and are omitted from JSON; the hit is kept.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
	#[serde(skip_serializing_if = "Option::is_none")]
	pub id: Option<Value>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub title: Option<Value>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub handle: Option<Value>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub vendor: Option<Value>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub price: Option<Value>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub image: Option<Value>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub url: Option<Value>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub available: Option<Value>,
}
impl SearchHit {
	pub fn from_document(document: &Map<String, Value>) -> Self {
		let field = |name: &str| document.get(name).filter(|value| !value.is_null()).cloned();

		Self {
			id: field("id"),
			title: field("title"),
			handle: field("handle"),
			vendor: field("vendor"),
			price: field("price"),
			image: field("image"),
			url: field("url"),
			available: field("available"),
		}
	}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
	pub hits: Vec<SearchHit>,
	/// Total matches in the index, independent of `hits.len()`.
	pub found: u64,
	pub page: u32,
	pub per_page: u32,
}
impl SearchResult {
	pub fn empty(query: &SearchQuery) -> Self {
		Self { hits: Vec::new(), found: 0, page: query.page, per_page: query.per_page }
	}
}

impl AisleService {
	/// Runs one ranked search. Empty text short-circuits without touching the index.
	pub async fn search(&self, query: &SearchQuery) -> Result<SearchResult> {
		if query.is_empty() {
			return Ok(SearchResult::empty(query));
		}

		let client = SearchClient::build(
			CredentialKind::SearchOnly,
			&self.env,
			self.cfg.search.connection_timeout_secs,
		)
		.map_err(|err| {
			if err.is_config() {
				Error::from(err)
			} else {
				tracing::error!(error = %err, "Failed to build search client.");

				Error::SearchFailed
			}
		})?;
		let query_by = [self.cfg.search.query_by[0].as_str(), self.cfg.search.query_by[1].as_str()];
		let params = SearchParams::ranked(query_by, &query.text, query.page, query.per_page);
		let raw = self
			.providers
			.search
			.search(&client, &self.cfg.search.collection, &params)
			.await
			.map_err(|err| {
				tracing::error!(error = %err, query = %query.text, "Search request failed.");

				Error::SearchFailed
			})?;
		let hits = raw.hits.iter().map(|hit| SearchHit::from_document(&hit.document)).collect();

		Ok(SearchResult { hits, found: raw.found, page: query.page, per_page: query.per_page })
	}
}
