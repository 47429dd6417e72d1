pub mod admin;
pub mod history;
pub mod search;
pub mod suggest;

mod error;

pub use admin::IndexInfo;
pub use error::{Error, Result};
pub use history::{ExpandedProduct, MAX_SET_COOKIE_BYTES, Money, PriceRange, ProductImage};
pub use search::{SearchHit, SearchResult};

use std::{future::Future, pin::Pin, sync::Arc};

use serde_json::{Map, Value};

use aisle_config::{Config, Env, Suggestions};
use aisle_domain::TokenCodec;
use aisle_providers::{
	catalog::{BatchQuery, CatalogClient},
	suggestions,
	typesense::{CollectionInfo, RawSearchResponse, SearchClient, SearchParams},
};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

pub trait SearchProvider
where
	Self: Send + Sync,
{
	fn search<'a>(
		&'a self,
		client: &'a SearchClient,
		collection: &'a str,
		params: &'a SearchParams,
	) -> BoxFuture<'a, aisle_providers::Result<RawSearchResponse>>;

	fn collection<'a>(
		&'a self,
		client: &'a SearchClient,
		collection: &'a str,
	) -> BoxFuture<'a, aisle_providers::Result<CollectionInfo>>;
}

pub trait CatalogProvider
where
	Self: Send + Sync,
{
	fn lookup<'a>(
		&'a self,
		client: &'a CatalogClient,
		query: &'a BatchQuery,
	) -> BoxFuture<'a, aisle_providers::Result<Map<String, Value>>>;
}

/// Opaque text-generation capability: a query in, zero or more candidate queries out.
pub trait SuggestionProvider
where
	Self: Send + Sync,
{
	fn suggest<'a>(
		&'a self,
		cfg: &'a Suggestions,
		query: &'a str,
	) -> BoxFuture<'a, aisle_providers::Result<Vec<String>>>;
}

#[derive(Clone)]
pub struct Providers {
	pub search: Arc<dyn SearchProvider>,
	pub catalog: Arc<dyn CatalogProvider>,
	pub suggestions: Arc<dyn SuggestionProvider>,
}
impl Providers {
	pub fn new(
		search: Arc<dyn SearchProvider>,
		catalog: Arc<dyn CatalogProvider>,
		suggestions: Arc<dyn SuggestionProvider>,
	) -> Self {
		Self { search, catalog, suggestions }
	}
}

impl Default for Providers {
	fn default() -> Self {
		let provider = Arc::new(DefaultProviders);

		Self { search: provider.clone(), catalog: provider.clone(), suggestions: provider }
	}
}

struct DefaultProviders;

impl SearchProvider for DefaultProviders {
	fn search<'a>(
		&'a self,
		client: &'a SearchClient,
		collection: &'a str,
		params: &'a SearchParams,
	) -> BoxFuture<'a, aisle_providers::Result<RawSearchResponse>> {
		Box::pin(client.search(collection, params))
	}

	fn collection<'a>(
		&'a self,
		client: &'a SearchClient,
		collection: &'a str,
	) -> BoxFuture<'a, aisle_providers::Result<CollectionInfo>> {
		Box::pin(client.collection(collection))
	}
}

impl CatalogProvider for DefaultProviders {
	fn lookup<'a>(
		&'a self,
		client: &'a CatalogClient,
		query: &'a BatchQuery,
	) -> BoxFuture<'a, aisle_providers::Result<Map<String, Value>>> {
		Box::pin(client.lookup(query))
	}
}

impl SuggestionProvider for DefaultProviders {
	fn suggest<'a>(
		&'a self,
		cfg: &'a Suggestions,
		query: &'a str,
	) -> BoxFuture<'a, aisle_providers::Result<Vec<String>>> {
		Box::pin(suggestions::suggest(cfg, query))
	}
}

/// Request-scoped operations over immutable configuration.
///
/// Holds no mutable state; one instance is shared by every concurrent request.
pub struct AisleService {
	pub cfg: Config,
	pub env: Env,
	pub providers: Providers,
	tokens: TokenCodec,
}
impl AisleService {
	pub fn new(cfg: Config, env: Env) -> Self {
		Self::with_providers(cfg, env, Providers::default())
	}

	pub fn with_providers(cfg: Config, env: Env, providers: Providers) -> Self {
		let tokens = TokenCodec::new(&cfg.history.token_secret);

		Self { cfg, env, providers, tokens }
	}
}
