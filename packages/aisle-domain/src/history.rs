use serde::{Deserialize, Serialize};

use crate::query::parse_integer;

/// Upper bound on remembered handles.
pub const MAX_VIEWED: usize = 60;
/// Upper bound on handles resolved in one catalog round trip.
pub const MAX_EXPANDED: usize = 25;
/// Longest handle accepted, in bytes. Matches the catalog's own handle limit.
pub const MAX_HANDLE_BYTES: usize = 255;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum HistoryError {
	#[error("Missing handle")]
	MissingHandle,
	#[error("Handle exceeds {MAX_HANDLE_BYTES} bytes")]
	HandleTooLong,
}
impl HistoryError {
	pub fn field(&self) -> &'static str {
		match self {
			Self::MissingHandle | Self::HandleTooLong => "handle",
		}
	}
}

/// Recently viewed item handles, newest first.
///
/// Invariants: no handle repeats, no blank handle, no handle over [`MAX_HANDLE_BYTES`], at most
/// [`MAX_VIEWED`] entries. Every constructor and mutator restores them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct ViewedHandles(Vec<String>);
impl ViewedHandles {
	pub fn new() -> Self {
		Self::default()
	}

	/// Normalizes a list of unknown provenance, keeping the first occurrence of each handle.
	pub fn from_untrusted<I, S>(handles: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		let mut out: Vec<String> = Vec::new();

		for handle in handles {
			let handle = handle.into();
			let handle = handle.trim();

			if handle.is_empty()
				|| handle.len() > MAX_HANDLE_BYTES
				|| out.iter().any(|existing| existing == handle)
			{
				continue;
			}

			out.push(handle.to_string());

			if out.len() == MAX_VIEWED {
				break;
			}
		}

		Self(out)
	}

	/// Moves `handle` to the front, evicting the oldest entry past the bound.
	pub fn record(&mut self, handle: &str) -> Result<(), HistoryError> {
		let handle = handle.trim();

		if handle.is_empty() {
			return Err(HistoryError::MissingHandle);
		}
		if handle.len() > MAX_HANDLE_BYTES {
			return Err(HistoryError::HandleTooLong);
		}

		self.0.retain(|existing| existing != handle);
		self.0.insert(0, handle.to_string());
		self.0.truncate(MAX_VIEWED);

		Ok(())
	}

	/// Returns the newest `limit` handles, with `limit` clamped to `1..=MAX_VIEWED`.
	pub fn list(&self, limit: usize) -> Self {
		let limit = limit.clamp(1, MAX_VIEWED);

		Self(self.0.iter().take(limit).cloned().collect())
	}

	/// Drops the least recently viewed handle.
	pub fn evict_oldest(&mut self) -> Option<String> {
		self.0.pop()
	}

	/// The prefix eligible for catalog expansion.
	pub fn expandable(&self) -> &[String] {
		&self.0[..self.0.len().min(MAX_EXPANDED)]
	}

	pub fn as_slice(&self) -> &[String] {
		&self.0
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	pub fn into_vec(self) -> Vec<String> {
		self.0
	}
}

impl From<Vec<String>> for ViewedHandles {
	fn from(handles: Vec<String>) -> Self {
		Self::from_untrusted(handles)
	}
}

impl From<ViewedHandles> for Vec<String> {
	fn from(handles: ViewedHandles) -> Self {
		handles.0
	}
}

pub fn record_view(
	current: Option<ViewedHandles>,
	new_handle: &str,
) -> Result<ViewedHandles, HistoryError> {
	let mut handles = current.unwrap_or_default();

	handles.record(new_handle)?;

	Ok(handles)
}

pub fn list_history(current: Option<&ViewedHandles>, limit: usize) -> ViewedHandles {
	current.map(|handles| handles.list(limit)).unwrap_or_default()
}

/// Parses a caller-supplied limit. Non-numeric input means "everything".
pub fn clamp_limit(raw: Option<&str>) -> usize {
	match parse_integer(raw) {
		Some(value) => value.clamp(1, MAX_VIEWED as i64) as usize,
		None => MAX_VIEWED,
	}
}
