//! # Timetable Admin
//!
//! Administrative front-end state for managing subjects, professors, classes
//! and their weekly timetables through a REST backend.
//!
//! The workspace is split into focused crates, re-exported here:
//!
//! - [`types`]: entity models, pages and the normalised API error
//! - [`conf`]: layered settings (defaults, TOML file, environment)
//! - [`client`]: the resource client and an in-memory resource
//! - [`pages`]: navigation, sidebar, breadcrumb, notifications, page
//!   controllers and component state
//!
//! [`AdminApp`] wires them together around the admin route table.
//!
//! ## Feature Flags
//!
//! - `full` (default): everything below
//! - `minimal`: application wiring only
//! - `logging`: [`logging::init`] installing a `tracing-subscriber` fmt
//!   subscriber
//!
//! ## Quick Example
//!
//! ```no_run
//! use timetable_admin::{AdminApp, Settings};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let settings = Settings::load(None)?;
//! let app = AdminApp::new(settings)?;
//! app.start()?;
//!
//! let dashboard = app.dashboard();
//! let counts = dashboard.load().await?;
//! println!("{} subjects, {} professors", counts.subjects, counts.professors);
//! # Ok(())
//! # }
//! ```

pub mod app;
#[cfg(feature = "logging")]
pub mod logging;
pub mod routes;

pub use app::{AdminApp, AppError, Resources};
pub use routes::admin_routes;

pub use timetable_client as client;
pub use timetable_conf as conf;
pub use timetable_pages as pages;
pub use timetable_types as types;

pub use timetable_conf::Settings;
pub use timetable_types::{Entity, Professor, Schedule, SchoolClass, Subject, Weekday};

pub mod prelude {
	pub use crate::app::{AdminApp, AppError, Resources};
	pub use timetable_client::{ApiClient, DynResource, MemoryResource, Resource};
	pub use timetable_conf::Settings;
	pub use timetable_pages::controllers::{
		CreateController, DashboardController, EditController, ListChange, ListController,
		PageContext, PageError, PageResult, ViewController,
	};
	pub use timetable_pages::editors::{ClassScheduleEditor, ProfessorEditor};
	pub use timetable_pages::{
		ConfirmAction, ConfirmDialog, Navigator, NotificationEngine, NotificationKind,
	};
	pub use timetable_types::{
		ApiError, Entity, ListQuery, Page, Professor, Schedule, SchoolClass, Subject, Weekday,
	};
}
