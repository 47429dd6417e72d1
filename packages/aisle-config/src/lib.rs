pub mod env;

mod error;
mod types;

pub use env::Env;
pub use error::{Error, Result};
pub use types::{Catalog, Config, History, Search, Security, Service, Suggestions};

use std::{fs, path::Path};

const MIN_TOKEN_SECRET_CHARS: usize = 32;
const MAX_SUGGESTIONS: u32 = 20;

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	for (label, value) in [
		("service.http_bind", &cfg.service.http_bind),
		("service.admin_bind", &cfg.service.admin_bind),
		("search.collection", &cfg.search.collection),
		("catalog.api_version", &cfg.catalog.api_version),
	] {
		if value.trim().is_empty() {
			return Err(Error::Validation { message: format!("{label} must be non-empty.") });
		}
	}

	if cfg.search.query_by.len() != 2 {
		return Err(Error::Validation {
			message: "search.query_by must list exactly two fields: primary, then secondary."
				.to_string(),
		});
	}
	if cfg.search.query_by.iter().any(|field| field.trim().is_empty() || field.contains(',')) {
		return Err(Error::Validation {
			message: "search.query_by fields must be non-empty and must not contain commas."
				.to_string(),
		});
	}
	if cfg.search.query_by[0] == cfg.search.query_by[1] {
		return Err(Error::Validation {
			message: "search.query_by fields must be distinct.".to_string(),
		});
	}
	if cfg.search.connection_timeout_secs == 0 {
		return Err(Error::Validation {
			message: "search.connection_timeout_secs must be greater than zero.".to_string(),
		});
	}
	if cfg.suggestions.timeout_ms == 0 {
		return Err(Error::Validation {
			message: "suggestions.timeout_ms must be greater than zero.".to_string(),
		});
	}
	if !(1..=MAX_SUGGESTIONS).contains(&cfg.suggestions.max_suggestions) {
		return Err(Error::Validation {
			message: format!("suggestions.max_suggestions must be in the range 1-{MAX_SUGGESTIONS}."),
		});
	}
	if !cfg.suggestions.temperature.is_finite() || cfg.suggestions.temperature < 0.0 {
		return Err(Error::Validation {
			message: "suggestions.temperature must be a finite number, zero or greater."
				.to_string(),
		});
	}
	if cfg.suggestions.enabled && cfg.suggestions.api_key.trim().is_empty() {
		return Err(Error::Validation {
			message: "suggestions.api_key must be non-empty when suggestions are enabled."
				.to_string(),
		});
	}
	if cfg.suggestions.default_headers.values().any(|value| !value.is_string()) {
		return Err(Error::Validation {
			message: "suggestions.default_headers values must be strings.".to_string(),
		});
	}
	if cfg.catalog.timeout_ms == 0 {
		return Err(Error::Validation {
			message: "catalog.timeout_ms must be greater than zero.".to_string(),
		});
	}

	let cookie_name = cfg.history.cookie_name.as_str();

	if cookie_name.is_empty()
		|| cookie_name.chars().any(|c| c.is_whitespace() || matches!(c, ';' | ',' | '='))
	{
		return Err(Error::Validation {
			message: "history.cookie_name must be non-empty and must not contain whitespace, ';', ',' or '='."
				.to_string(),
		});
	}
	if cfg.history.token_secret.chars().count() < MIN_TOKEN_SECRET_CHARS {
		return Err(Error::Validation {
			message: format!(
				"history.token_secret must be at least {MIN_TOKEN_SECRET_CHARS} characters."
			),
		});
	}
	if cfg.history.max_age_days == 0 {
		return Err(Error::Validation {
			message: "history.max_age_days must be greater than zero.".to_string(),
		});
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	for field in &mut cfg.search.query_by {
		*field = field.trim().to_string();
	}

	cfg.history.cookie_name = cfg.history.cookie_name.trim().to_string();
	cfg.suggestions.api_base = cfg.suggestions.api_base.trim_end_matches('/').to_string();
}
