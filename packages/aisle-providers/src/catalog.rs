use std::time::Duration;

use reqwest::Client;
use serde_json::{Map, Value};

use aisle_config::{
	Env,
	env::{SHOPIFY_STORE_DOMAIN, SHOPIFY_STOREFRONT_ACCESS_TOKEN},
};

use crate::{Error, Result};

pub const ACCESS_TOKEN_HEADER: &str = "X-Shopify-Storefront-Access-Token";

/// Fields resolved for every product in a batched lookup.
pub const PRODUCT_FIELDS: &str = "\
fragment ExpandedProductFields on Product {
	id
	handle
	title
	featuredImage { url altText width height }
	priceRange { minVariantPrice { amount currencyCode } }
}";

pub fn alias(index: usize) -> String {
	format!("p{index}")
}

/// One GraphQL document with an aliased `product(handle:)` selection per handle.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchQuery {
	pub document: String,
	pub variables: Map<String, Value>,
}
impl BatchQuery {
	/// Handles travel as variables; aliases follow input order (`p0`, `p1`, ...).
	pub fn for_handles(handles: &[String]) -> Self {
		let mut params = Vec::with_capacity(handles.len());
		let mut selections = String::new();
		let mut variables = Map::new();

		for (index, handle) in handles.iter().enumerate() {
			params.push(format!("$h{index}: String!"));
			selections.push_str(&format!(
				"\t{}: product(handle: $h{index}) {{ ...ExpandedProductFields }}\n",
				alias(index)
			));
			variables.insert(format!("h{index}"), Value::String(handle.clone()));
		}

		let document = format!(
			"query RecentlyViewed({}) {{\n{selections}}}\n{PRODUCT_FIELDS}",
			params.join(", ")
		);

		Self { document, variables }
	}
}

#[derive(Clone, PartialEq, Eq)]
pub struct CatalogCredentials {
	pub store_domain: String,
	pub access_token: String,
}
impl CatalogCredentials {
	pub fn resolve(env: &Env) -> Result<Self> {
		Ok(Self {
			store_domain: env.require(SHOPIFY_STORE_DOMAIN)?.trim_end_matches('/').to_string(),
			access_token: env.require(SHOPIFY_STOREFRONT_ACCESS_TOKEN)?.to_string(),
		})
	}

	/// A bare domain gets `https://`; an explicit scheme is kept.
	pub fn endpoint(&self, api_version: &str) -> String {
		let origin = if self.store_domain.contains("://") {
			self.store_domain.clone()
		} else {
			format!("https://{}", self.store_domain)
		};

		format!("{origin}/api/{api_version}/graphql.json")
	}
}

impl std::fmt::Debug for CatalogCredentials {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("CatalogCredentials")
			.field("store_domain", &self.store_domain)
			.field("access_token", &"<redacted>")
			.finish()
	}
}

pub struct CatalogClient {
	credentials: CatalogCredentials,
	endpoint: String,
	http: Client,
}
impl CatalogClient {
	pub fn build(env: &Env, api_version: &str, timeout_ms: u64) -> Result<Self> {
		let credentials = CatalogCredentials::resolve(env)?;
		let endpoint = credentials.endpoint(api_version);
		let http = Client::builder().timeout(Duration::from_millis(timeout_ms)).build()?;

		Ok(Self { credentials, endpoint, http })
	}

	pub fn endpoint(&self) -> &str {
		&self.endpoint
	}

	/// Runs the batch in one round trip and returns `data` keyed by alias.
	///
	/// Unresolved aliases come back as `null`; the caller decides what to skip.
	pub async fn lookup(&self, query: &BatchQuery) -> Result<Map<String, Value>> {
		let body = serde_json::json!({
			"query": query.document,
			"variables": query.variables,
		});
		let res = self
			.http
			.post(&self.endpoint)
			.header(ACCESS_TOKEN_HEADER, &self.credentials.access_token)
			.json(&body)
			.send()
			.await?;
		let json: Value = res.error_for_status()?.json().await?;

		parse_lookup_response(json)
	}
}

fn parse_lookup_response(json: Value) -> Result<Map<String, Value>> {
	match json.get("data") {
		Some(Value::Object(data)) => Ok(data.clone()),
		_ => {
			let message = json
				.get("errors")
				.and_then(|v| v.as_array())
				.and_then(|errors| errors.first())
				.and_then(|error| error.get("message"))
				.and_then(|m| m.as_str())
				.unwrap_or("Catalog response is missing data.");

			Err(Error::InvalidResponse { message: message.to_string() })
		},
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn builds_one_aliased_selection_per_handle() {
		let handles = vec!["red-shoe".to_string(), "blue \"hat\"".to_string()];
		let query = BatchQuery::for_handles(&handles);

		assert!(query.document.starts_with("query RecentlyViewed($h0: String!, $h1: String!) {"));
		assert!(query.document.contains("p0: product(handle: $h0)"));
		assert!(query.document.contains("p1: product(handle: $h1)"));
		assert!(query.document.contains("fragment ExpandedProductFields on Product"));
		assert!(!query.document.contains("red-shoe"));
		assert_eq!(query.variables["h0"], "red-shoe");
		assert_eq!(query.variables["h1"], "blue \"hat\"");
		assert_eq!(query.document.matches("product(handle:").count(), 2);
	}

	#[test]
	fn builds_endpoint_from_domain() {
		let creds = CatalogCredentials {
			store_domain: "shop.example.com".to_string(),
			access_token: "t".to_string(),
		};

		assert_eq!(creds.endpoint("2024-10"), "https://shop.example.com/api/2024-10/graphql.json");

		let local = CatalogCredentials {
			store_domain: "http://127.0.0.1:9000".to_string(),
			access_token: "t".to_string(),
		};

		assert_eq!(local.endpoint("2024-10"), "http://127.0.0.1:9000/api/2024-10/graphql.json");
	}

	#[test]
	fn keeps_null_aliases_in_data() {
		let json = serde_json::json!({
			"data": { "p0": { "handle": "a" }, "p1": null }
		});
		let data = parse_lookup_response(json).expect("parse failed");

		assert_eq!(data.len(), 2);
		assert!(data["p1"].is_null());
	}

	#[test]
	fn surfaces_graphql_errors_without_data() {
		let json = serde_json::json!({
			"errors": [{ "message": "Access denied." }]
		});
		let err = parse_lookup_response(json).expect_err("errors without data must fail");

		assert_eq!(err.to_string(), "Access denied.");
	}
}
