use std::{
	env, fs,
	path::PathBuf,
	sync::atomic::{AtomicU64, Ordering},
	time::{SystemTime, UNIX_EPOCH},
};

use toml::Value;

use aisle_config::{Config, Env, Error};

const SAMPLE_CONFIG_TOML: &str = include_str!("fixtures/sample_config.toml");

static COUNTER: AtomicU64 = AtomicU64::new(0);

fn sample_with(section: &str, key: &str, value: Value) -> String {
	let mut root: Value = toml::from_str(SAMPLE_CONFIG_TOML).expect("Failed to parse sample config.");
	let table = root
		.as_table_mut()
		.and_then(|root| root.get_mut(section))
		.and_then(Value::as_table_mut)
		.expect("Sample config must include the requested section.");

	table.insert(key.to_string(), value);

	toml::to_string(&root).expect("Failed to render sample config.")
}

fn write_temp_config(payload: &str) -> PathBuf {
	let nanos = SystemTime::now()
		.duration_since(UNIX_EPOCH)
		.expect("System time must be after the Unix epoch.")
		.as_nanos();
	let seq = COUNTER.fetch_add(1, Ordering::SeqCst);
	let path = env::temp_dir().join(format!("aisle_config_{nanos}_{seq}.toml"));

	fs::write(&path, payload).expect("Failed to write test config.");

	path
}

fn load_str(payload: &str) -> aisle_config::Result<Config> {
	let path = write_temp_config(payload);
	let result = aisle_config::load(&path);

	fs::remove_file(&path).expect("Failed to remove test config.");

	result
}

fn validation_message(result: aisle_config::Result<Config>) -> String {
	match result {
		Err(Error::Validation { message }) => message,
		other => panic!("Expected validation error, got {other:?}."),
	}
}

#[test]
fn loads_sample_config() {
	let cfg = load_str(SAMPLE_CONFIG_TOML).expect("Sample config must load.");

	assert_eq!(cfg.search.collection, "products");
	assert_eq!(cfg.search.query_by, vec!["title".to_string(), "tags".to_string()]);
	assert_eq!(cfg.search.connection_timeout_secs, 2);
	assert_eq!(cfg.suggestions.max_suggestions, 5);
	assert_eq!(cfg.history.cookie_name, "recently_viewed");
	assert!(cfg.security.bind_localhost_only);
}

#[test]
fn applies_defaults_for_optional_keys() {
	let mut root: Value = toml::from_str(SAMPLE_CONFIG_TOML).expect("Failed to parse sample config.");
	let tables = root.as_table_mut().expect("Sample config must be a table.");

	for (section, key) in [
		("search", "connection_timeout_secs"),
		("suggestions", "max_suggestions"),
		("history", "cookie_name"),
		("history", "max_age_days"),
	] {
		tables
			.get_mut(section)
			.and_then(Value::as_table_mut)
			.expect("Sample config must include the section.")
			.remove(key);
	}

	tables.remove("security");

	let payload = toml::to_string(&root).expect("Failed to render config.");
	let cfg = load_str(&payload).expect("Config with defaults must load.");

	assert_eq!(cfg.search.connection_timeout_secs, 2);
	assert_eq!(cfg.suggestions.max_suggestions, 5);
	assert_eq!(cfg.history.cookie_name, "recently_viewed");
	assert_eq!(cfg.history.max_age_days, 30);
	assert!(cfg.security.bind_localhost_only);
}

#[test]
fn reports_missing_file() {
	let path = env::temp_dir().join("aisle_config_does_not_exist.toml");
	let result = aisle_config::load(&path);

	assert!(matches!(result, Err(Error::ReadConfig { .. })));
}

#[test]
fn reports_unparsable_file() {
	let result = load_str("[service\nhttp_bind = ");

	assert!(matches!(result, Err(Error::ParseConfig { .. })));
}

#[test]
fn rejects_single_query_by_field() {
	let payload = sample_with(
		"search",
		"query_by",
		Value::Array(vec![Value::String("title".to_string())]),
	);
	let message = validation_message(load_str(&payload));

	assert!(message.contains("exactly two fields"), "Unexpected message: {message}");
}

#[test]
fn rejects_duplicate_query_by_fields() {
	let payload = sample_with(
		"search",
		"query_by",
		Value::Array(vec![Value::String("title".to_string()), Value::String(" title ".to_string())]),
	);
	let message = validation_message(load_str(&payload));

	assert_eq!(message, "search.query_by fields must be distinct.");
}

#[test]
fn rejects_short_token_secret() {
	let payload = sample_with("history", "token_secret", Value::String("too-short".to_string()));
	let message = validation_message(load_str(&payload));

	assert!(message.starts_with("history.token_secret"), "Unexpected message: {message}");
}

#[test]
fn rejects_cookie_name_with_separators() {
	let payload = sample_with("history", "cookie_name", Value::String("a;b".to_string()));
	let message = validation_message(load_str(&payload));

	assert!(message.starts_with("history.cookie_name"), "Unexpected message: {message}");
}

#[test]
fn rejects_zero_suggestions() {
	let payload = sample_with("suggestions", "max_suggestions", Value::Integer(0));
	let message = validation_message(load_str(&payload));

	assert_eq!(message, "suggestions.max_suggestions must be in the range 1-20.");
}

#[test]
fn requires_api_key_only_when_suggestions_enabled() {
	let payload = sample_with("suggestions", "api_key", Value::String(String::new()));
	let message = validation_message(load_str(&payload));

	assert!(message.starts_with("suggestions.api_key"), "Unexpected message: {message}");

	let mut root: Value = toml::from_str(&payload).expect("Failed to parse config.");

	root.as_table_mut()
		.and_then(|root| root.get_mut("suggestions"))
		.and_then(Value::as_table_mut)
		.expect("Config must include [suggestions].")
		.insert("enabled".to_string(), Value::Boolean(false));

	let payload = toml::to_string(&root).expect("Failed to render config.");

	load_str(&payload).expect("Disabled suggestions must not require an api key.");
}

#[test]
fn rejects_zero_catalog_timeout() {
	let payload = sample_with("catalog", "timeout_ms", Value::Integer(0));
	let message = validation_message(load_str(&payload));

	assert_eq!(message, "catalog.timeout_ms must be greater than zero.");
}

#[test]
fn env_treats_blank_values_as_absent() {
	let env: Env = [("TYPESENSE_HOST", "  "), ("TYPESENSE_PORT", " 8108 ")].into_iter().collect();

	assert_eq!(env.get("TYPESENSE_HOST"), None);
	assert_eq!(env.get("TYPESENSE_PORT"), Some("8108"));
	assert!(matches!(
		env.require(aisle_config::env::TYPESENSE_HOST),
		Err(Error::Missing { key: "TYPESENSE_HOST" })
	));
}

#[test]
fn env_lists_missing_required_keys() {
	let env: Env = [
		("TYPESENSE_HOST", "search.internal"),
		("TYPESENSE_ADMIN_API_KEY", "admin"),
		("SHOPIFY_STORE_DOMAIN", "shop.example.com"),
	]
	.into_iter()
	.collect();

	assert_eq!(env.missing_required(), vec!["SHOPIFY_STOREFRONT_ACCESS_TOKEN"]);

	let empty = Env::default();

	assert_eq!(
		empty.missing_required(),
		vec![
			"TYPESENSE_HOST",
			"SHOPIFY_STORE_DOMAIN",
			"SHOPIFY_STOREFRONT_ACCESS_TOKEN",
			"TYPESENSE_SEARCH_ONLY_API_KEY",
		]
	);
}
