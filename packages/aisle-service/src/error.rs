pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	/// A required credential or setting is missing. Never retried.
	#[error("{message}")]
	Configuration { message: String },
	#[error("{message}")]
	Validation { field: &'static str, message: String },
	/// The primary search path failed. Carries no partial results.
	#[error("search failed")]
	SearchFailed,
	#[error("Upstream error: {message}")]
	Upstream { message: String },
	#[error("{message}")]
	Internal { message: String },
}
impl From<aisle_providers::Error> for Error {
	fn from(err: aisle_providers::Error) -> Self {
		if err.is_config() {
			Self::Configuration { message: err.to_string() }
		} else {
			Self::Upstream { message: err.to_string() }
		}
	}
}

impl From<aisle_domain::HistoryError> for Error {
	fn from(err: aisle_domain::HistoryError) -> Self {
		Self::Validation { field: err.field(), message: err.to_string() }
	}
}

impl From<aisle_domain::TokenError> for Error {
	fn from(err: aisle_domain::TokenError) -> Self {
		Self::Internal { message: format!("Failed to encode history token: {err}") }
	}
}
