use std::sync::OnceLock;

use clap::builder::{
	Styles,
	styling::{AnsiColor, Effects},
};
use tracing_subscriber::EnvFilter;

pub const VERSION: &str = concat!(
	env!("CARGO_PKG_VERSION"),
	"-",
	env!("VERGEN_GIT_SHA"),
	"-",
	env!("VERGEN_CARGO_TARGET_TRIPLE"),
);

static TRACING: OnceLock<()> = OnceLock::new();

pub fn styles() -> Styles {
	Styles::styled()
		.header(AnsiColor::Yellow.on_default() | Effects::BOLD)
		.usage(AnsiColor::Yellow.on_default() | Effects::BOLD)
		.literal(AnsiColor::Cyan.on_default() | Effects::BOLD)
		.placeholder(AnsiColor::Green.on_default())
}

/// Installs the global fmt subscriber once per process.
///
/// `log_level` is an `EnvFilter` directive. An unparsable directive falls back to `info` instead
/// of failing startup. Later calls are no-ops, including calls with a different level.
pub fn init_tracing(log_level: &str) {
	TRACING.get_or_init(|| {
		let filter = EnvFilter::try_new(log_level).unwrap_or_else(|_| EnvFilter::new("info"));

		// A subscriber installed by an embedding process wins.
		let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
	});
}
