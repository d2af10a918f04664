//! Breadcrumb trail
//!
//! The trail for a URL is the main route, then for every route matching the
//! URL its declared ancestors followed by the route itself. A URL appears at
//! most once; the first occurrence wins.

use crate::navigation::{ListenerId, Navigator};
use crate::routing::{RouteDefinition, normalize_path};
use futures_signals::signal::{Mutable, MutableSignalCloned};
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;

/// One step of the trail
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BreadcrumbItem {
	pub label: String,
	pub url: String,
}

impl BreadcrumbItem {
	fn from_route(route: &RouteDefinition) -> Option<Self> {
		Some(Self {
			label: route.label()?.to_string(),
			url: route.url(),
		})
	}
}

fn find_main(routes: &[RouteDefinition]) -> Option<&RouteDefinition> {
	routes
		.iter()
		.find(|route| route.breadcrumb().is_some_and(|b| b.is_main))
}

fn find_by_path<'a>(routes: &'a [RouteDefinition], path: &str) -> Option<&'a RouteDefinition> {
	let path = path.trim_matches('/');
	routes.iter().find(|route| route.path == path)
}

/// Compute the deduplicated trail for `current_url`
///
/// # Examples
///
/// ```
/// use timetable_pages::breadcrumb::build_breadcrumbs;
/// use timetable_pages::routing::{BreadcrumbConfig, RouteData, RouteDefinition};
///
/// let routes = vec![
///     RouteDefinition::new("dashboard")
///         .with_data(RouteData::new("Dashboard").with_breadcrumb(BreadcrumbConfig::main())),
///     RouteDefinition::new("materia")
///         .with_data(RouteData::new("Subjects").with_breadcrumb(BreadcrumbConfig::with_paths(["dashboard"]))),
/// ];
///
/// let trail = build_breadcrumbs(&routes, "/materia");
/// let urls: Vec<_> = trail.iter().map(|i| i.url.as_str()).collect();
/// assert_eq!(urls, ["/dashboard", "/materia"]);
/// ```
pub fn build_breadcrumbs(routes: &[RouteDefinition], current_url: &str) -> Vec<BreadcrumbItem> {
	let path = normalize_path(current_url);
	let main = find_main(routes);
	let main_suppressed = main
		.and_then(RouteDefinition::breadcrumb)
		.is_some_and(|b| b.no_use_main);

	let matched: Vec<(&RouteDefinition, &str)> = routes
		.iter()
		.filter(|route| route.redirect_to.is_none())
		.filter_map(|route| Some((route, route.label()?)))
		.filter(|(route, _)| route.pattern().matches(&path).is_some())
		.collect();
	let skip_main = main_suppressed
		|| matched
			.iter()
			.any(|(route, _)| route.breadcrumb().is_some_and(|b| b.no_use_main));

	let mut trail = Vec::new();
	if !skip_main {
		trail.extend(main.and_then(BreadcrumbItem::from_route));
	}
	for (route, label) in matched {
		let ancestors = route.breadcrumb().map(|b| b.paths.as_slice()).unwrap_or_default();
		for ancestor in ancestors {
			trail.extend(find_by_path(routes, ancestor).and_then(BreadcrumbItem::from_route));
		}
		trail.push(BreadcrumbItem {
			label: label.to_string(),
			url: path.clone(),
		});
	}

	dedup_by_url(trail)
}

fn dedup_by_url(trail: Vec<BreadcrumbItem>) -> Vec<BreadcrumbItem> {
	let mut seen = HashSet::new();
	trail
		.into_iter()
		.filter(|item| seen.insert(item.url.clone()))
		.collect()
}

/// Trail kept in sync with a [`Navigator`]
pub struct BreadcrumbState {
	routes: Arc<[RouteDefinition]>,
	items: Mutable<Vec<BreadcrumbItem>>,
}

impl BreadcrumbState {
	pub fn new(routes: Arc<[RouteDefinition]>) -> Self {
		Self {
			routes,
			items: Mutable::new(Vec::new()),
		}
	}

	pub fn attach(self: &Arc<Self>, navigator: &Navigator) -> ListenerId {
		let state = Arc::downgrade(self);
		let id = navigator.on_navigation_end(move |event| {
			if let Some(state) = state.upgrade() {
				state.update(&event.url);
			}
		});
		self.update(&navigator.current_url());
		id
	}

	pub fn update(&self, current_url: &str) {
		let trail = build_breadcrumbs(&self.routes, current_url);
		tracing::debug!(url = current_url, len = trail.len(), "breadcrumb trail updated");
		self.items.set(trail);
	}

	pub fn items(&self) -> Vec<BreadcrumbItem> {
		self.items.get_cloned()
	}

	pub fn signal(&self) -> MutableSignalCloned<Vec<BreadcrumbItem>> {
		self.items.signal_cloned()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::routing::{BreadcrumbConfig, RouteData};
	use rstest::{fixture, rstest};

	#[fixture]
	fn routes() -> Vec<RouteDefinition> {
		vec![
			RouteDefinition::redirect("", "/dashboard"),
			RouteDefinition::new("dashboard")
				.with_data(RouteData::new("Dashboard").with_breadcrumb(BreadcrumbConfig::main())),
			RouteDefinition::new("materia").with_data(
				RouteData::new("Subjects").with_breadcrumb(BreadcrumbConfig::with_paths(["dashboard"])),
			),
			RouteDefinition::new("materia/view/:id").with_data(
				RouteData::new("View subject").with_breadcrumb(BreadcrumbConfig::with_paths(["materia"])),
			),
			RouteDefinition::new("about").with_data(
				RouteData::new("About")
					.with_breadcrumb(BreadcrumbConfig::with_paths(["missing"]).without_main()),
			),
		]
	}

	fn urls(trail: &[BreadcrumbItem]) -> Vec<&str> {
		trail.iter().map(|i| i.url.as_str()).collect()
	}

	#[rstest]
	fn test_main_listed_as_ancestor_appears_once(routes: Vec<RouteDefinition>) {
		// Act
		let trail = build_breadcrumbs(&routes, "/materia");

		// Assert
		assert_eq!(urls(&trail), vec!["/dashboard", "/materia"]);
		assert_eq!(trail[1].label, "Subjects");
	}

	#[rstest]
	fn test_parameterised_route_uses_concrete_url(routes: Vec<RouteDefinition>) {
		let trail = build_breadcrumbs(&routes, "/materia/view/12?tab=1");

		assert_eq!(urls(&trail), vec!["/dashboard", "/materia", "/materia/view/12"]);
		assert_eq!(trail[2].label, "View subject");
	}

	#[rstest]
	fn test_main_route_alone(routes: Vec<RouteDefinition>) {
		let trail = build_breadcrumbs(&routes, "/dashboard");

		assert_eq!(urls(&trail), vec!["/dashboard"]);
	}

	#[rstest]
	fn test_no_use_main_and_unknown_ancestor(routes: Vec<RouteDefinition>) {
		let trail = build_breadcrumbs(&routes, "/about");

		assert_eq!(urls(&trail), vec!["/about"]);
	}

	#[rstest]
	#[case("/nowhere")]
	#[case("/")]
	fn test_unmatched_url_keeps_main(routes: Vec<RouteDefinition>, #[case] url: &str) {
		let trail = build_breadcrumbs(&routes, url);

		assert_eq!(urls(&trail), vec!["/dashboard"]);
	}

	#[rstest]
	fn test_main_route_opting_out_leaves_unmatched_empty() {
		let routes = vec![RouteDefinition::new("dashboard").with_data(
			RouteData::new("Dashboard").with_breadcrumb(BreadcrumbConfig::main().without_main()),
		)];

		assert!(build_breadcrumbs(&routes, "/nowhere").is_empty());
	}

	#[rstest]
	fn test_state_follows_navigation(routes: Vec<RouteDefinition>) {
		// Arrange
		let navigator = Navigator::new(routes);
		let state = Arc::new(BreadcrumbState::new(navigator.routes_arc()));
		state.attach(&navigator);

		// Act
		navigator.navigate_to("/materia/view/3").unwrap();

		// Assert
		assert_eq!(
			urls(&state.items()),
			vec!["/dashboard", "/materia", "/materia/view/3"]
		);
	}
}
