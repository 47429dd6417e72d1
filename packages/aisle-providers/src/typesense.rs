use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use aisle_config::{
	Env,
	env::{
		TYPESENSE_ADMIN_API_KEY, TYPESENSE_HOST, TYPESENSE_PORT, TYPESENSE_PROTOCOL,
		TYPESENSE_SEARCH_ONLY_API_KEY,
	},
};

use crate::{Error, Result};

pub const API_KEY_HEADER: &str = "X-TYPESENSE-API-KEY";
pub const PRIMARY_FIELD_WEIGHT: u32 = 8;
pub const SECONDARY_FIELD_WEIGHT: u32 = 2;

const DEFAULT_PORT: u16 = 443;
const DEFAULT_PROTOCOL: &str = "https";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialKind {
	/// Read/write key. Required for collection administration.
	Admin,
	/// Read-only key, falling back to the admin key when no dedicated key is configured.
	SearchOnly,
}

#[derive(Clone, PartialEq, Eq)]
pub struct SearchCredentials {
	pub host: String,
	pub port: u16,
	pub protocol: String,
	pub api_key: String,
	pub timeout_secs: u64,
}
impl SearchCredentials {
	pub fn resolve(kind: CredentialKind, env: &Env, timeout_secs: u64) -> Result<Self> {
		let host = env.require(TYPESENSE_HOST)?.to_string();
		let api_key = match kind {
			CredentialKind::Admin => env.require(TYPESENSE_ADMIN_API_KEY)?,
			CredentialKind::SearchOnly => match env.get(TYPESENSE_SEARCH_ONLY_API_KEY) {
				Some(key) => key,
				None => env.require(TYPESENSE_ADMIN_API_KEY).map_err(|_| {
					aisle_config::Error::Missing { key: TYPESENSE_SEARCH_ONLY_API_KEY }
				})?,
			},
		}
		.to_string();
		let port = match env.get(TYPESENSE_PORT) {
			Some(raw) => raw.parse::<u16>().map_err(|_| Error::InvalidConfig {
				message: format!("{TYPESENSE_PORT} must be a port number, got {raw:?}."),
			})?,
			None => DEFAULT_PORT,
		};
		let protocol = env.get(TYPESENSE_PROTOCOL).unwrap_or(DEFAULT_PROTOCOL).to_ascii_lowercase();

		if !matches!(protocol.as_str(), "http" | "https") {
			return Err(Error::InvalidConfig {
				message: format!("{TYPESENSE_PROTOCOL} must be http or https, got {protocol:?}."),
			});
		}

		Ok(Self { host, port, protocol, api_key, timeout_secs })
	}

	pub fn base_url(&self) -> String {
		format!("{}://{}:{}", self.protocol, self.host, self.port)
	}
}

impl std::fmt::Debug for SearchCredentials {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("SearchCredentials")
			.field("host", &self.host)
			.field("port", &self.port)
			.field("protocol", &self.protocol)
			.field("api_key", &"<redacted>")
			.field("timeout_secs", &self.timeout_secs)
			.finish()
	}
}

/// Query parameters of one ranked search request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchParams {
	pub q: String,
	pub query_by: String,
	pub query_by_weights: String,
	pub infix: String,
	pub num_typos: u32,
	pub min_len_1typo: u32,
	pub min_len_2typo: u32,
	pub enable_typos_for_numerical_tokens: bool,
	pub enable_typos_for_alpha_numerical_tokens: bool,
	pub drop_tokens_threshold: u32,
	pub exhaustive_search: bool,
	pub prioritize_exact_match: bool,
	pub prioritize_token_position: bool,
	pub prioritize_num_matching_fields: bool,
	pub text_match_type: String,
	pub page: u32,
	pub per_page: u32,
}
impl SearchParams {
	/// Builds the tuned ranking request over a primary and a secondary field.
	///
	/// Codes and SKUs must match verbatim, so typo correction is off for numeric and
	/// alphanumeric tokens. Zero drop-token threshold keeps multi-word queries all-or-nothing.
	pub fn ranked(query_by: [&str; 2], q: &str, page: u32, per_page: u32) -> Self {
		Self {
			q: q.to_string(),
			query_by: query_by.join(","),
			query_by_weights: format!("{PRIMARY_FIELD_WEIGHT},{SECONDARY_FIELD_WEIGHT}"),
			infix: "always,always".to_string(),
			num_typos: 2,
			min_len_1typo: 4,
			min_len_2typo: 7,
			enable_typos_for_numerical_tokens: false,
			enable_typos_for_alpha_numerical_tokens: false,
			drop_tokens_threshold: 0,
			exhaustive_search: true,
			prioritize_exact_match: true,
			prioritize_token_position: true,
			prioritize_num_matching_fields: true,
			text_match_type: "max_score".to_string(),
			page,
			per_page,
		}
	}
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawSearchResponse {
	#[serde(default)]
	pub found: u64,
	#[serde(default)]
	pub hits: Vec<RawHit>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawHit {
	#[serde(default)]
	pub document: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionInfo {
	pub name: String,
	#[serde(default)]
	pub num_documents: u64,
}

pub struct SearchClient {
	credentials: SearchCredentials,
	http: Client,
}
impl SearchClient {
	pub fn build(kind: CredentialKind, env: &Env, timeout_secs: u64) -> Result<Self> {
		Self::from_credentials(SearchCredentials::resolve(kind, env, timeout_secs)?)
	}

	pub fn from_credentials(credentials: SearchCredentials) -> Result<Self> {
		// Bounds connection setup only.
		let http = Client::builder()
			.connect_timeout(Duration::from_secs(credentials.timeout_secs))
			.build()?;

		Ok(Self { credentials, http })
	}

	pub fn credentials(&self) -> &SearchCredentials {
		&self.credentials
	}

	pub async fn search(
		&self,
		collection: &str,
		params: &SearchParams,
	) -> Result<RawSearchResponse> {
		let url = format!(
			"{}/collections/{collection}/documents/search",
			self.credentials.base_url()
		);
		let res = self
			.http
			.get(url)
			.header(API_KEY_HEADER, &self.credentials.api_key)
			.query(params)
			.send()
			.await?;
		let json: Value = res.error_for_status()?.json().await?;

		parse_search_response(json)
	}

	pub async fn collection(&self, collection: &str) -> Result<CollectionInfo> {
		let url = format!("{}/collections/{collection}", self.credentials.base_url());
		let res = self.http.get(url).header(API_KEY_HEADER, &self.credentials.api_key).send().await?;

		Ok(res.error_for_status()?.json().await?)
	}
}

fn parse_search_response(json: Value) -> Result<RawSearchResponse> {
	if !json.get("hits").map(Value::is_array).unwrap_or(false) {
		return Err(Error::InvalidResponse {
			message: "Search response is missing hits array.".to_string(),
		});
	}

	Ok(serde_json::from_value(json)?)
}
