use axum::http::{HeaderMap, header::COOKIE};

/// Returns the first value for `name` across every `Cookie` header.
pub fn read(headers: &HeaderMap, name: &str) -> Option<String> {
	headers
		.get_all(COOKIE)
		.iter()
		.filter_map(|value| value.to_str().ok())
		.flat_map(|value| value.split(';'))
		.filter_map(|pair| pair.trim().split_once('='))
		.find(|(key, _)| *key == name)
		.map(|(_, value)| value.trim().trim_matches('"').to_string())
}
