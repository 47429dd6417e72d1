use std::collections::HashMap;

use crate::{Error, Result};

pub const TYPESENSE_HOST: &str = "TYPESENSE_HOST";
pub const TYPESENSE_PORT: &str = "TYPESENSE_PORT";
pub const TYPESENSE_PROTOCOL: &str = "TYPESENSE_PROTOCOL";
pub const TYPESENSE_ADMIN_API_KEY: &str = "TYPESENSE_ADMIN_API_KEY";
pub const TYPESENSE_SEARCH_ONLY_API_KEY: &str = "TYPESENSE_SEARCH_ONLY_API_KEY";
pub const SHOPIFY_STORE_DOMAIN: &str = "SHOPIFY_STORE_DOMAIN";
pub const SHOPIFY_STOREFRONT_ACCESS_TOKEN: &str = "SHOPIFY_STOREFRONT_ACCESS_TOKEN";

/// Immutable snapshot of environment-style configuration keys.
///
/// Captured once at startup and shared read-only. Blank values read as absent.
#[derive(Debug, Clone, Default)]
pub struct Env {
	vars: HashMap<String, String>,
}
impl Env {
	pub fn from_process() -> Self {
		std::env::vars_os()
			.filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?)))
			.collect()
	}

	pub fn get(&self, key: &str) -> Option<&str> {
		self.vars.get(key).map(|value| value.trim()).filter(|value| !value.is_empty())
	}

	pub fn require(&self, key: &'static str) -> Result<&str> {
		self.get(key).ok_or(Error::Missing { key })
	}

	/// Keys whose absence will fail a request path at first use.
	pub fn missing_required(&self) -> Vec<&'static str> {
		let mut missing = Vec::new();

		for key in [TYPESENSE_HOST, SHOPIFY_STORE_DOMAIN, SHOPIFY_STOREFRONT_ACCESS_TOKEN] {
			if self.get(key).is_none() {
				missing.push(key);
			}
		}
		if self.get(TYPESENSE_ADMIN_API_KEY).is_none()
			&& self.get(TYPESENSE_SEARCH_ONLY_API_KEY).is_none()
		{
			missing.push(TYPESENSE_SEARCH_ONLY_API_KEY);
		}

		missing
	}
}

impl<K, V> FromIterator<(K, V)> for Env
where
	K: Into<String>,
	V: Into<String>,
{
	fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
		Self { vars: iter.into_iter().map(|(key, value)| (key.into(), value.into())).collect() }
	}
}
