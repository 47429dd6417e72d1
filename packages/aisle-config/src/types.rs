use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
	pub service: Service,
	pub search: Search,
	pub suggestions: Suggestions,
	pub catalog: Catalog,
	pub history: History,
	#[serde(default)]
	pub security: Security,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Service {
	pub http_bind: String,
	pub admin_bind: String,
	pub log_level: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Search {
	pub collection: String,
	/// Primary field first, secondary field second.
	pub query_by: Vec<String>,
	#[serde(default = "default_connection_timeout_secs")]
	pub connection_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Suggestions {
	pub enabled: bool,
	pub provider_id: String,
	pub api_base: String,
	pub api_key: String,
	pub path: String,
	pub model: String,
	pub temperature: f32,
	pub timeout_ms: u64,
	#[serde(default = "default_max_suggestions")]
	pub max_suggestions: u32,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Catalog {
	pub api_version: String,
	pub timeout_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct History {
	#[serde(default = "default_cookie_name")]
	pub cookie_name: String,
	pub token_secret: String,
	#[serde(default = "default_max_age_days")]
	pub max_age_days: u32,
	#[serde(default = "default_secure_cookie")]
	pub secure_cookie: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Security {
	pub bind_localhost_only: bool,
}
impl Default for Security {
	fn default() -> Self {
		Self { bind_localhost_only: true }
	}
}

fn default_connection_timeout_secs() -> u64 {
	2
}

fn default_max_suggestions() -> u32 {
	5
}

fn default_cookie_name() -> String {
	"recently_viewed".to_string()
}

fn default_max_age_days() -> u32 {
	30
}

fn default_secure_cookie() -> bool {
	true
}
