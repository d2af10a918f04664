//! Route table of the admin
//!
//! Each managed entity gets a list page at its endpoint plus `create`,
//! `view/:id` and `edit/:id` pages. The list and create pages appear in the
//! sidebar under the entity's group; every entity page links back to its
//! list in the breadcrumb trail, which starts at the dashboard.

use timetable_pages::routing::{BreadcrumbConfig, RouteData, RouteDefinition, SidebarConfig};
use timetable_types::{Entity, Professor, SchoolClass, Subject};

/// Path the empty route redirects to
pub const HOME_PATH: &str = "/dashboard";

struct EntityPages {
	endpoint: &'static str,
	group: &'static str,
	icon: &'static str,
	singular: &'static str,
	plural: &'static str,
}

impl EntityPages {
	fn routes(&self) -> [RouteDefinition; 4] {
		let endpoint = self.endpoint;
		let back_to_list = || BreadcrumbConfig::with_paths([endpoint]);
		[
			RouteDefinition::new(endpoint).with_data(
				RouteData::new(format!("Browse {}", self.plural))
					.with_icon(self.icon)
					.with_sidebar(SidebarConfig::grouped(self.group))
					.with_breadcrumb(BreadcrumbConfig::default()),
			),
			RouteDefinition::new(format!("{endpoint}/create")).with_data(
				RouteData::new(format!("Create {}", self.singular))
					.with_icon("add")
					.with_sidebar(SidebarConfig::grouped(self.group))
					.with_breadcrumb(back_to_list()),
			),
			RouteDefinition::new(format!("{endpoint}/view/:id")).with_data(
				RouteData::new(format!("View {}", self.singular)).with_breadcrumb(back_to_list()),
			),
			RouteDefinition::new(format!("{endpoint}/edit/:id")).with_data(
				RouteData::new(format!("Edit {}", self.singular)).with_breadcrumb(back_to_list()),
			),
		]
	}
}

const ENTITY_PAGES: [EntityPages; 3] = [
	EntityPages {
		endpoint: Subject::ENDPOINT,
		group: "Subject",
		icon: "menu_book",
		singular: "subject",
		plural: "subjects",
	},
	EntityPages {
		endpoint: Professor::ENDPOINT,
		group: "Professor",
		icon: "person",
		singular: "professor",
		plural: "professors",
	},
	EntityPages {
		endpoint: SchoolClass::ENDPOINT,
		group: "Class",
		icon: "groups",
		singular: "class",
		plural: "classes",
	},
];

/// The complete route table
pub fn admin_routes() -> Vec<RouteDefinition> {
	let mut routes = vec![
		RouteDefinition::redirect("", HOME_PATH),
		RouteDefinition::new("dashboard").with_data(
			RouteData::new("Dashboard")
				.with_icon("dashboard")
				.with_sidebar(SidebarConfig::shown())
				.with_breadcrumb(BreadcrumbConfig::main()),
		),
	];
	routes.extend(ENTITY_PAGES.iter().flat_map(EntityPages::routes));
	routes
}
