//! Logging bootstrap

use timetable_conf::Settings;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt as _;
use tracing_subscriber::util::SubscriberInitExt as _;

/// Install a global fmt subscriber filtered by `settings.log_filter`
///
/// `RUST_LOG` wins over the configured filter when set. An unparsable
/// filter falls back to `info`. Returns `false` when a global subscriber
/// was already installed, which leaves that subscriber in place.
pub fn init(settings: &Settings) -> bool {
	let filter = EnvFilter::try_from_default_env()
		.or_else(|_| EnvFilter::try_new(&settings.log_filter))
		.unwrap_or_else(|_| EnvFilter::new("info"));

	tracing_subscriber::registry()
		.with(tracing_subscriber::fmt::layer())
		.with(filter)
		.try_init()
		.is_ok()
}
