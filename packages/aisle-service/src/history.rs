use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use aisle_domain::ViewedHandles;
use aisle_providers::catalog::{self, BatchQuery, CatalogClient};

use crate::{AisleService, Error, Result};

/// Upper bound on a rendered `Set-Cookie` value, under the 4096-byte per-cookie browser limit.
pub const MAX_SET_COOKIE_BYTES: usize = 4_000;

const SECONDS_PER_DAY: u64 = 86_400;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpandedProduct {
	pub id: String,
	pub handle: String,
	pub title: String,
	#[serde(default)]
	pub featured_image: Option<ProductImage>,
	pub price_range: PriceRange,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductImage {
	pub url: String,
	#[serde(default)]
	pub alt_text: Option<String>,
	#[serde(default)]
	pub width: Option<u32>,
	#[serde(default)]
	pub height: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceRange {
	pub min_variant_price: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Money {
	pub amount: String,
	pub currency_code: String,
}

impl AisleService {
	/// Reads the client-held token. Absent, malformed, or forged tokens read as no history.
	pub fn decode_history(&self, token: Option<&str>) -> Option<ViewedHandles> {
		let token = token?;

		match self.tokens.decode(token) {
			Ok(handles) => Some(ViewedHandles::from_untrusted(handles)),
			Err(err) => {
				debug!(error = %err, "Ignoring unreadable history token.");

				None
			},
		}
	}

	pub fn encode_history(&self, handles: &ViewedHandles) -> Result<String> {
		Ok(self.tokens.encode(handles.as_slice())?)
	}

	/// Renders the `Set-Cookie` value storing `handles`.
	///
	/// Evicts the oldest entries until the value fits in [`MAX_SET_COOKIE_BYTES`], so `handles`
	/// ends up holding exactly what the cookie stores. The newest handle is never evicted.
	pub fn history_cookie(&self, handles: &mut ViewedHandles) -> Result<String> {
		let mut evicted = 0_usize;

		loop {
			let cookie = self.render_history_cookie(&self.encode_history(handles)?);

			if cookie.len() <= MAX_SET_COOKIE_BYTES || handles.len() <= 1 {
				if evicted > 0 {
					debug!(evicted, kept = handles.len(), "Trimmed history to fit the cookie.");
				}

				return Ok(cookie);
			}

			handles.evict_oldest();

			evicted += 1;
		}
	}

	pub fn render_history_cookie(&self, token: &str) -> String {
		let cfg = &self.cfg.history;
		let max_age = u64::from(cfg.max_age_days) * SECONDS_PER_DAY;
		let mut cookie = format!(
			"{}={token}; Path=/; Max-Age={max_age}; HttpOnly; SameSite=Lax",
			cfg.cookie_name
		);

		if cfg.secure_cookie {
			cookie.push_str("; Secure");
		}

		cookie
	}

	pub fn record_view(
		&self,
		current: Option<ViewedHandles>,
		handle: &str,
	) -> Result<ViewedHandles> {
		Ok(aisle_domain::record_view(current, handle)?)
	}

	pub fn list_history(&self, current: Option<&ViewedHandles>, limit: usize) -> ViewedHandles {
		aisle_domain::list_history(current, limit)
	}

	/// Resolves the newest handles into product records in one catalog round trip.
	///
	/// Output order is a subsequence of input order. Handles the catalog no longer knows are
	/// omitted. A transport failure fails the whole expansion.
	pub async fn expand_history(&self, handles: &ViewedHandles) -> Result<Vec<ExpandedProduct>> {
		let batch = handles.expandable();

		if batch.is_empty() {
			return Ok(Vec::new());
		}

		let cfg = &self.cfg.catalog;
		let client = CatalogClient::build(&self.env, &cfg.api_version, cfg.timeout_ms)?;
		let query = BatchQuery::for_handles(batch);
		let timeout = Duration::from_millis(cfg.timeout_ms);
		let data = match tokio::time::timeout(timeout, self.providers.catalog.lookup(&client, &query))
			.await
		{
			Ok(result) => result?,
			Err(_) => {
				return Err(Error::Upstream {
					message: format!("Catalog lookup timed out after {} ms.", cfg.timeout_ms),
				});
			},
		};

		Ok(resolve_in_order(batch, &data))
	}
}

/// Walks `handles` in order and keeps each alias that resolved to a usable record.
pub fn resolve_in_order(handles: &[String], data: &Map<String, Value>) -> Vec<ExpandedProduct> {
	let mut products = Vec::with_capacity(handles.len());

	for (index, handle) in handles.iter().enumerate() {
		let Some(record) = data.get(&catalog::alias(index)).filter(|value| !value.is_null()) else {
			continue;
		};

		match serde_json::from_value::<ExpandedProduct>(record.clone()) {
			Ok(product) => products.push(product),
			Err(err) => warn!(error = %err, %handle, "Skipping catalog record with unexpected shape."),
		}
	}

	products
}
