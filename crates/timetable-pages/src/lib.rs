//! # Timetable Pages
//!
//! Frontend state for the timetable administration pages: routing and
//! navigation, the sidebar menu and breadcrumb trail, toast notifications,
//! the confirmation dialog, generic list/create/view/edit page controllers
//! and the state behind the presentation components.
//!
//! Everything here is renderer-agnostic. State lives in `futures-signals`
//! [`Mutable`](futures_signals::signal::Mutable)s that a view layer can
//! subscribe to; user input enters through plain method calls.
//!
//! ## Modules
//!
//! - [`routing`]: route table and path patterns
//! - [`navigation`]: current location, parameters and navigation-end events
//! - [`sidebar`]: grouped menu derived from the route table
//! - [`breadcrumb`]: trail for the current URL
//! - [`notification`]: queued, self-expiring toasts
//! - [`confirm`]: yes/no dialog answered through a oneshot channel
//! - [`controllers`]: page controllers and their shared context
//! - [`editors`]: edit pages with extra option lists
//! - [`components`]: table, pagination, filter, form and calendar state

pub mod breadcrumb;
pub mod components;
pub mod confirm;
pub mod controllers;
pub mod editors;
pub mod navigation;
pub mod notification;
pub mod routing;
pub mod sidebar;

pub use breadcrumb::{BreadcrumbItem, BreadcrumbState, build_breadcrumbs};
pub use confirm::{ConfirmAction, ConfirmDialog};
pub use controllers::{
	CreateController, DashboardController, EditController, ListController, PageContext,
	PageError, PageResult, PageScope, ViewController,
};
pub use editors::{ClassScheduleEditor, ProfessorEditor};
pub use navigation::{NavigationEnd, NavigationError, Navigator};
pub use notification::{Notification, NotificationEngine, NotificationKind};
pub use routing::{BreadcrumbConfig, RouteData, RouteDefinition, SidebarConfig};
pub use sidebar::{SidebarItem, SidebarState, build_sidebar};
