use serde::{Deserialize, Serialize};

use aisle_providers::typesense::{CredentialKind, SearchClient};

use crate::{AisleService, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexInfo {
	pub collection: String,
	pub num_documents: u64,
}

impl AisleService {
	/// Reads collection metadata with the privileged key.
	pub async fn index_info(&self) -> Result<IndexInfo> {
		let client = SearchClient::build(
			CredentialKind::Admin,
			&self.env,
			self.cfg.search.connection_timeout_secs,
		)?;
		let info =
			self.providers.search.collection(&client, &self.cfg.search.collection).await?;

		Ok(IndexInfo { collection: info.name, num_documents: info.num_documents })
	}
}
