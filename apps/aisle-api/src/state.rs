use std::sync::Arc;

use aisle_config::{Config, Env};
use aisle_service::AisleService;

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<AisleService>,
}
impl AppState {
	pub fn new(config: Config, env: Env) -> Self {
		Self::from_service(AisleService::new(config, env))
	}

	pub fn from_service(service: AisleService) -> Self {
		Self { service: Arc::new(service) }
	}
}
