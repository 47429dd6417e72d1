pub mod history;
pub mod query;
pub mod token;

pub use history::{
	HistoryError, MAX_EXPANDED, MAX_HANDLE_BYTES, MAX_VIEWED, ViewedHandles, clamp_limit,
	list_history, record_view,
};
pub use query::SearchQuery;
pub use token::{TokenCodec, TokenError};
