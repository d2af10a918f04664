//! Settings for the timetable admin
//!
//! Settings are assembled from layered sources, merged in priority order
//! (environment variables > TOML file > defaults):
//!
//! ```no_run
//! use timetable_conf::{EnvSource, Settings, SettingsBuilder, TomlFileSource};
//!
//! let settings = SettingsBuilder::new()
//!     .add_source(TomlFileSource::new("timetable.toml"))
//!     .add_source(EnvSource::new().with_prefix("TIMETABLE_"))
//!     .build()
//!     .unwrap();
//! println!("backend at {}", settings.api_url);
//! ```

pub mod settings;
pub mod sources;

pub use settings::{ENV_PREFIX, Settings, SettingsBuilder, SettingsError};
pub use sources::{ConfigSource, DefaultSource, EnvSource, SourceError, TomlFileSource};
