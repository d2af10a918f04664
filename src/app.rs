//! Application wiring
//!
//! [`AdminApp`] owns the services shared by every page (navigator,
//! notifications, confirm dialog), keeps the sidebar and breadcrumb trail
//! attached to the navigator, and builds page controllers over the entity
//! resources.

use crate::routes::admin_routes;
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use timetable_client::{ApiClient, ClientError, DynResource, MemoryResource};
use timetable_conf::{Settings, SettingsError};
use timetable_pages::components::TableFilter;
use timetable_pages::controllers::{
	CreateController, DashboardController, EditController, ListController, PageContext,
	ViewController,
};
use timetable_pages::editors::{ClassScheduleEditor, ProfessorEditor};
use timetable_pages::navigation::{ListenerId, NavigationError, Navigator};
use timetable_pages::{BreadcrumbState, ConfirmDialog, NotificationEngine, SidebarState};
use timetable_types::{Entity, Professor, Schedule, SchoolClass, Subject};
use tokio::runtime::Handle;

/// Application start-up errors
#[derive(Debug, Error)]
pub enum AppError {
	#[error("Configuration error: {0}")]
	Settings(#[from] SettingsError),

	#[error("Client error: {0}")]
	Client(#[from] ClientError),

	#[error("Navigation error: {0}")]
	Navigation(#[from] NavigationError),
}

/// One resource handle per managed entity
#[derive(Clone)]
pub struct Resources {
	pub subjects: DynResource<Subject>,
	pub professors: DynResource<Professor>,
	pub classes: DynResource<SchoolClass>,
	pub schedules: DynResource<Schedule>,
}

impl Resources {
	/// HTTP resources sharing the connection pool of `api`
	pub fn http(api: &ApiClient) -> Self {
		Self {
			subjects: Arc::new(api.resource::<Subject>()),
			professors: Arc::new(api.resource::<Professor>()),
			classes: Arc::new(api.resource::<SchoolClass>()),
			schedules: Arc::new(api.resource::<Schedule>()),
		}
	}

	/// Empty in-process stores
	pub fn in_memory() -> Self {
		Self {
			subjects: Arc::new(MemoryResource::<Subject>::new()),
			professors: Arc::new(MemoryResource::<Professor>::new()),
			classes: Arc::new(MemoryResource::<SchoolClass>::new()),
			schedules: Arc::new(MemoryResource::<Schedule>::new()),
		}
	}
}

/// The assembled admin front end
pub struct AdminApp {
	settings: Settings,
	resources: Resources,
	ctx: PageContext,
	sidebar: Arc<SidebarState>,
	breadcrumb: Arc<BreadcrumbState>,
	listeners: Vec<ListenerId>,
}

impl AdminApp {
	/// Wire the application against the HTTP backend named in `settings`
	///
	/// # Errors
	///
	/// Fails on invalid settings or when the HTTP client cannot be built.
	pub fn new(settings: Settings) -> Result<Self, AppError> {
		settings.validate()?;
		let api = ApiClient::from_settings(&settings)?;
		tracing::info!(api_url = api.base_url(), "timetable admin configured");
		Ok(Self::with_resources(settings, Resources::http(&api)))
	}

	/// Wire the application against the given resources
	pub fn with_resources(settings: Settings, resources: Resources) -> Self {
		let navigator = Arc::new(Navigator::new(admin_routes()));
		let notifications = NotificationEngine::with_duration(
			Handle::try_current().ok(),
			settings.notification_duration(),
		);
		let ctx = PageContext::new(
			Arc::clone(&navigator),
			notifications,
			Arc::new(ConfirmDialog::new()),
		);

		let sidebar = Arc::new(SidebarState::new(navigator.routes()));
		let breadcrumb = Arc::new(BreadcrumbState::new(navigator.routes_arc()));
		let listeners = vec![sidebar.attach(&navigator), breadcrumb.attach(&navigator)];

		Self {
			settings,
			resources,
			ctx,
			sidebar,
			breadcrumb,
			listeners,
		}
	}

	/// Navigate to the root URL, which lands on the dashboard
	pub fn start(&self) -> Result<(), AppError> {
		self.ctx.navigator.navigate_to("/")?;
		tracing::debug!(url = %self.ctx.navigator.current_url(), "admin started");
		Ok(())
	}

	pub fn settings(&self) -> &Settings {
		&self.settings
	}

	pub fn resources(&self) -> &Resources {
		&self.resources
	}

	pub fn context(&self) -> &PageContext {
		&self.ctx
	}

	pub fn navigator(&self) -> &Arc<Navigator> {
		&self.ctx.navigator
	}

	pub fn notifications(&self) -> &NotificationEngine {
		&self.ctx.notifications
	}

	pub fn confirm(&self) -> &Arc<ConfirmDialog> {
		&self.ctx.confirm
	}

	pub fn sidebar(&self) -> &Arc<SidebarState> {
		&self.sidebar
	}

	pub fn breadcrumb(&self) -> &Arc<BreadcrumbState> {
		&self.breadcrumb
	}

	pub fn dashboard(&self) -> DashboardController {
		DashboardController::new(
			Arc::clone(&self.resources.subjects),
			Arc::clone(&self.resources.professors),
			Arc::clone(&self.resources.classes),
			self.ctx.clone(),
		)
	}

	/// List page over `resource`, sized by the configured page size
	pub fn list_page<T: Entity>(&self, resource: DynResource<T>) -> ListController<T> {
		ListController::new(resource, self.ctx.clone()).with_page_size(self.settings.page_size)
	}

	pub fn create_page<T: Entity>(&self, resource: DynResource<T>) -> CreateController<T> {
		CreateController::new(resource, self.ctx.clone())
	}

	pub fn view_page<T: Entity>(&self, resource: DynResource<T>) -> ViewController<T> {
		ViewController::new(resource, self.ctx.clone())
	}

	pub fn edit_page<T: Entity>(&self, resource: DynResource<T>) -> EditController<T> {
		EditController::new(resource, self.ctx.clone())
	}

	pub fn professor_editor(&self) -> ProfessorEditor {
		ProfessorEditor::new(
			Arc::clone(&self.resources.professors),
			Arc::clone(&self.resources.subjects),
			self.ctx.clone(),
		)
	}

	pub fn class_editor(&self) -> ClassScheduleEditor {
		ClassScheduleEditor::new(
			Arc::clone(&self.resources.classes),
			Arc::clone(&self.resources.subjects),
			Arc::clone(&self.resources.professors),
			self.ctx.clone(),
		)
	}

	/// Table filter over `properties` with the configured debounce
	pub fn table_filter<T>(&self, properties: &[&str]) -> TableFilter<T>
	where
		T: Serialize + Clone + Send + Sync + 'static,
	{
		TableFilter::with_debounce(properties.iter().copied(), self.settings.filter_debounce())
	}

	/// Stop notification countdowns and detach the sidebar and breadcrumb
	///
	/// The application is not usable for navigation afterwards.
	pub fn shutdown(&mut self) {
		self.ctx.notifications.shutdown();
		for id in self.listeners.drain(..) {
			self.ctx.navigator.remove_listener(id);
		}
		tracing::info!("timetable admin shut down");
	}
}
