//! Typed application settings

use crate::sources::{ConfigSource, DefaultSource, EnvSource, SourceError, TomlFileSource};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;
use std::time::Duration;
use url::Url;

/// Prefix of environment variables read by [`Settings::load`]
pub const ENV_PREFIX: &str = "TIMETABLE_";

/// Errors raised while assembling [`Settings`]
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
	#[error("Failed to load {source_name}: {error}")]
	Source {
		source_name: String,
		#[source]
		error: SourceError,
	},

	#[error("Invalid settings: {0}")]
	Deserialize(#[from] serde_json::Error),

	#[error("Invalid value for '{key}': {reason}")]
	Invalid { key: &'static str, reason: String },
}

/// Runtime settings of the admin front end
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
	/// Base URL of the REST backend, without trailing slash
	pub api_url: String,
	/// Per-request timeout of the resource client
	pub request_timeout_secs: u64,
	/// Default lifetime of a notification toast
	pub notification_duration_ms: u64,
	/// Initial page size of list pages
	pub page_size: u64,
	/// Quiet period of the table filter before it applies
	pub filter_debounce_ms: u64,
	/// `tracing-subscriber` filter directive
	pub log_filter: String,
}

impl Default for Settings {
	fn default() -> Self {
		Self {
			api_url: "http://127.0.0.1:5000/api".to_string(),
			request_timeout_secs: 30,
			notification_duration_ms: 5000,
			page_size: 10,
			filter_debounce_ms: 300,
			log_filter: "info".to_string(),
		}
	}
}

impl Settings {
	/// Load defaults, then `toml_path` if given, then `TIMETABLE_*` variables.
	///
	/// # Errors
	///
	/// Fails when a source cannot be read or the merged values are invalid.
	pub fn load(toml_path: Option<&Path>) -> Result<Self, SettingsError> {
		let mut builder = SettingsBuilder::new();
		if let Some(path) = toml_path {
			builder = builder.add_source(TomlFileSource::new(path));
		}
		builder
			.add_source(EnvSource::new().with_prefix(ENV_PREFIX))
			.build()
	}

	pub fn request_timeout(&self) -> Duration {
		Duration::from_secs(self.request_timeout_secs)
	}

	pub fn notification_duration(&self) -> Duration {
		Duration::from_millis(self.notification_duration_ms)
	}

	pub fn filter_debounce(&self) -> Duration {
		Duration::from_millis(self.filter_debounce_ms)
	}

	/// Check cross-field constraints that serde cannot express.
	///
	/// # Errors
	///
	/// Returns [`SettingsError::Invalid`] naming the first offending key.
	pub fn validate(&self) -> Result<(), SettingsError> {
		let url = Url::parse(&self.api_url).map_err(|e| SettingsError::Invalid {
			key: "api_url",
			reason: e.to_string(),
		})?;
		if !matches!(url.scheme(), "http" | "https") {
			return Err(SettingsError::Invalid {
				key: "api_url",
				reason: format!("unsupported scheme '{}'", url.scheme()),
			});
		}
		if self.page_size == 0 {
			return Err(SettingsError::Invalid {
				key: "page_size",
				reason: "must be greater than zero".to_string(),
			});
		}
		if self.request_timeout_secs == 0 {
			return Err(SettingsError::Invalid {
				key: "request_timeout_secs",
				reason: "must be greater than zero".to_string(),
			});
		}
		Ok(())
	}
}

/// Merges configuration sources into [`Settings`].
///
/// [`Settings::default`] is always the lowest layer.
pub struct SettingsBuilder {
	sources: Vec<Box<dyn ConfigSource>>,
}

impl SettingsBuilder {
	pub fn new() -> Self {
		Self {
			sources: Vec::new(),
		}
	}

	/// Add a source; sources are applied by priority, not insertion order
	pub fn add_source(mut self, source: impl ConfigSource + 'static) -> Self {
		self.sources.push(Box::new(source));
		self
	}

	/// Merge every source over the defaults and deserialize the result.
	///
	/// # Errors
	///
	/// Fails when a source cannot be loaded, when the merged map does not
	/// match [`Settings`], or when [`Settings::validate`] rejects it.
	pub fn build(mut self) -> Result<Settings, SettingsError> {
		let defaults = DefaultSource::from_serializable(&Settings::default())
			.and_then(|d| d.load())
			.map_err(|error| SettingsError::Source {
				source_name: "Default values".to_string(),
				error,
			})?;
		// Stable sort keeps insertion order among equal priorities
		self.sources.sort_by_key(|s| s.priority());

		let mut merged = defaults.clone();
		for source in &self.sources {
			let values = source.load().map_err(|error| SettingsError::Source {
				source_name: source.description(),
				error,
			})?;
			tracing::debug!(
				source = %source.description(),
				keys = values.len(),
				"loaded configuration source"
			);
			merged.extend(values);
		}

		// Environment sources without a prefix carry unrelated keys
		merged.retain(|key, _| defaults.contains_key(key));

		let settings: Settings =
			serde_json::from_value(Value::Object(merged.into_iter().collect()))?;
		settings.validate()?;
		Ok(settings)
	}
}

impl Default for SettingsBuilder {
	fn default() -> Self {
		Self::new()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use indexmap::IndexMap;
	use rstest::rstest;
	use serial_test::serial;
	use std::env;
	use tempfile::TempDir;

	#[rstest]
	fn test_defaults() {
		let settings = SettingsBuilder::new().build().unwrap();

		assert_eq!(settings, Settings::default());
		assert_eq!(settings.api_url, "http://127.0.0.1:5000/api");
		assert_eq!(settings.notification_duration(), Duration::from_millis(5000));
	}

	#[rstest]
	#[serial(env)]
	fn test_env_overrides_toml_overrides_defaults() {
		// Arrange
		let temp_dir = TempDir::new().unwrap();
		let path = temp_dir.path().join("timetable.toml");
		std::fs::write(
			&path,
			"api_url = \"http://toml.test/api\"\npage_size = 25\nfilter_debounce_ms = 150\n",
		)
		.unwrap();
		// SAFETY: Mutating environment variables is unsafe in multi-threaded programs.
		// This test uses #[serial] to ensure exclusive access to environment variables.
		unsafe {
			env::set_var("TIMETABLE_PAGE_SIZE", "50");
		}

		// Act
		let settings = Settings::load(Some(&path)).unwrap();

		// Assert
		assert_eq!(settings.api_url, "http://toml.test/api");
		assert_eq!(settings.page_size, 50);
		assert_eq!(settings.filter_debounce_ms, 150);
		assert_eq!(settings.request_timeout_secs, 30);

		// SAFETY: See above.
		unsafe {
			env::remove_var("TIMETABLE_PAGE_SIZE");
		}
	}

	#[rstest]
	#[case("ftp://host/api", "api_url")]
	#[case("not a url", "api_url")]
	fn test_invalid_api_url(#[case] api_url: &str, #[case] key: &str) {
		let result = SettingsBuilder::new()
			.add_source(DefaultSource::new().with_value("api_url", Value::String(api_url.into())))
			.build();

		assert!(matches!(result, Err(SettingsError::Invalid { key: k, .. }) if k == key));
	}

	#[rstest]
	fn test_zero_page_size_rejected() {
		let settings = Settings {
			page_size: 0,
			..Settings::default()
		};

		assert!(matches!(
			settings.validate(),
			Err(SettingsError::Invalid { key: "page_size", .. })
		));
	}

	#[rstest]
	fn test_wrong_type_is_deserialize_error() {
		let result = SettingsBuilder::new()
			.add_source(
				TestSource(IndexMap::from([(
					"page_size".to_string(),
					Value::String("many".to_string()),
				)])),
			)
			.build();

		assert!(matches!(result, Err(SettingsError::Deserialize(_))));
	}

	struct TestSource(IndexMap<String, Value>);

	impl ConfigSource for TestSource {
		fn load(&self) -> Result<IndexMap<String, Value>, SourceError> {
			Ok(self.0.clone())
		}

		fn priority(&self) -> u8 {
			50
		}

		fn description(&self) -> String {
			"test".to_string()
		}
	}
}
