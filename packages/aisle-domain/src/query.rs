use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_PER_PAGE: u32 = 10;
pub const MAX_PER_PAGE: u32 = 100;

/// A free-text query with clamped pagination.
///
/// Caller input is never rejected: non-numeric values fall back to the defaults and numeric
/// values are clamped into range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
	pub text: String,
	pub page: u32,
	pub per_page: u32,
}
impl SearchQuery {
	pub fn new(text: impl AsRef<str>, page: u32, per_page: u32) -> Self {
		Self {
			text: text.as_ref().trim().to_string(),
			page: page.max(1),
			per_page: per_page.clamp(1, MAX_PER_PAGE),
		}
	}

	pub fn from_raw(text: Option<&str>, page: Option<&str>, per_page: Option<&str>) -> Self {
		Self {
			text: text.unwrap_or_default().trim().to_string(),
			page: clamp_page(page),
			per_page: clamp_per_page(per_page),
		}
	}

	pub fn is_empty(&self) -> bool {
		self.text.is_empty()
	}
}

pub fn clamp_page(raw: Option<&str>) -> u32 {
	match parse_integer(raw) {
		Some(value) => value.clamp(1, i64::from(u32::MAX)) as u32,
		None => DEFAULT_PAGE,
	}
}

pub fn clamp_per_page(raw: Option<&str>) -> u32 {
	match parse_integer(raw) {
		Some(value) => value.clamp(1, i64::from(MAX_PER_PAGE)) as u32,
		None => DEFAULT_PER_PAGE,
	}
}

pub(crate) fn parse_integer(raw: Option<&str>) -> Option<i64> {
	raw.and_then(|value| value.trim().parse::<i64>().ok())
}
