use std::time::Duration;

use reqwest::Client;
use serde_json::Value;

use crate::{Error, Result};

const SYSTEM_PROMPT: &str = "You help shoppers whose storefront search returned no products. \
Given the shopper's query, propose alternative search queries with the same intent: fix \
misspellings, use common product names, or broaden overly specific wording. Reply with a JSON \
object of the form {\"suggestions\": [\"...\"]} and nothing else.";

pub async fn suggest(cfg: &aisle_config::Suggestions, query: &str) -> Result<Vec<String>> {
	let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;
	let url = format!("{}{}", cfg.api_base, cfg.path);
	let body = serde_json::json!({
		"model": cfg.model,
		"temperature": cfg.temperature,
		"response_format": { "type": "json_object" },
		"messages": messages(query, cfg.max_suggestions),
	});
	let res = client
		.post(url)
		.headers(crate::auth_headers(&cfg.api_key, &cfg.default_headers)?)
		.json(&body)
		.send()
		.await?;
	let json: Value = res.error_for_status()?.json().await?;

	parse_suggestions(json)
}

fn messages(query: &str, max_suggestions: u32) -> Vec<Value> {
	vec![
		serde_json::json!({ "role": "system", "content": SYSTEM_PROMPT }),
		serde_json::json!({
			"role": "user",
			"content": format!("Query: {query}\nReturn at most {max_suggestions} suggestions."),
		}),
	]
}

/// Accepts the chat-completion envelope or a bare `{"suggestions": [...]}` object.
fn parse_suggestions(json: Value) -> Result<Vec<String>> {
	let payload: Value = match json
		.get("choices")
		.and_then(|v| v.as_array())
		.and_then(|arr| arr.first())
		.and_then(|choice| choice.get("message"))
		.and_then(|msg| msg.get("content"))
		.and_then(|c| c.as_str())
	{
		Some(content) => serde_json::from_str(content).map_err(|_| Error::InvalidResponse {
			message: "Suggestion content is not valid JSON.".to_string(),
		})?,
		None => json,
	};
	let items = payload.get("suggestions").and_then(|v| v.as_array()).ok_or_else(|| {
		Error::InvalidResponse { message: "Suggestion response is missing suggestions.".to_string() }
	})?;

	Ok(items.iter().filter_map(|item| item.as_str()).map(str::to_string).collect())
}
