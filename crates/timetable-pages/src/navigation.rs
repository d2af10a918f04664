//! Navigation state
//!
//! [`Navigator`] owns the route table and the current location. Every
//! completed navigation publishes the new URL on a signal and invokes the
//! registered navigation-end listeners, which is how the sidebar and the
//! breadcrumb trail stay in sync with the page being shown.

use crate::routing::{RouteDefinition, normalize_path};
use futures_signals::signal::{Mutable, MutableSignalCloned};
use indexmap::IndexMap;
use parking_lot::{Mutex, RwLock};
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

const MAX_REDIRECTS: usize = 10;

/// Locations kept for [`Navigator::back`]; the oldest entry is dropped first
pub const MAX_HISTORY: usize = 50;

/// Identifier returned when registering a navigation-end listener
pub type ListenerId = u64;

type Listener = Arc<dyn Fn(&NavigationEnd) + Send + Sync>;

/// Navigation errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NavigationError {
	/// `navigate_to` was called with an empty path
	#[error("Navigation path must not be empty")]
	EmptyPath,

	/// No route matches the path
	#[error("Route not found: {0}")]
	NotFound(String),

	/// Redirects did not settle on a concrete route
	#[error("Too many redirects while resolving {0}")]
	RedirectLoop(String),
}

/// Emitted after a navigation has completed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationEnd {
	/// Sequence number of the navigation
	pub id: u64,
	/// Full URL, path plus query string
	pub url: String,
	/// Normalised path
	pub path: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Location {
	path: String,
	query: IndexMap<String, String>,
}

impl Location {
	fn root() -> Self {
		Self {
			path: "/".to_string(),
			query: IndexMap::new(),
		}
	}

	fn url(&self) -> String {
		if self.query.is_empty() {
			return self.path.clone();
		}
		let pairs: Vec<(&str, &str)> = self
			.query
			.iter()
			.map(|(k, v)| (k.as_str(), v.as_str()))
			.collect();
		match serde_urlencoded::to_string(pairs) {
			Ok(query) => format!("{}?{}", self.path, query),
			Err(_) => self.path.clone(),
		}
	}
}

struct NavState {
	current: Location,
	params: HashMap<String, String>,
	history: VecDeque<Location>,
	navigation_id: u64,
}

/// Router-facing utility shared by every page.
///
/// # Examples
///
/// ```
/// use timetable_pages::navigation::Navigator;
/// use timetable_pages::routing::RouteDefinition;
///
/// let navigator = Navigator::new(vec![
///     RouteDefinition::redirect("", "/dashboard"),
///     RouteDefinition::new("dashboard"),
///     RouteDefinition::new("materia/edit/:id"),
/// ]);
///
/// navigator.navigate_to("/").unwrap();
/// assert_eq!(navigator.current_url(), "/dashboard");
///
/// navigator.navigate_to("materia/edit/12").unwrap();
/// assert_eq!(navigator.number_param("id"), Some(12));
/// ```
pub struct Navigator {
	routes: Arc<[RouteDefinition]>,
	state: RwLock<NavState>,
	listeners: Mutex<Vec<(ListenerId, Listener)>>,
	next_listener_id: AtomicU64,
	url: Mutable<String>,
}

impl Navigator {
	/// Create a navigator positioned at `/` without performing a navigation
	pub fn new(routes: Vec<RouteDefinition>) -> Self {
		Self {
			routes: routes.into(),
			state: RwLock::new(NavState {
				current: Location::root(),
				params: HashMap::new(),
				history: VecDeque::new(),
				navigation_id: 0,
			}),
			listeners: Mutex::new(Vec::new()),
			next_listener_id: AtomicU64::new(1),
			url: Mutable::new("/".to_string()),
		}
	}

	/// The route table, in declaration order
	pub fn routes(&self) -> &[RouteDefinition] {
		&self.routes
	}

	/// Shared handle to the route table
	pub fn routes_arc(&self) -> Arc<[RouteDefinition]> {
		Arc::clone(&self.routes)
	}

	/// Current URL including the query string
	pub fn current_url(&self) -> String {
		self.state.read().current.url()
	}

	/// Current path without the query string
	pub fn current_path(&self) -> String {
		self.state.read().current.path.clone()
	}

	/// Signal of the current URL
	pub fn url_signal(&self) -> MutableSignalCloned<String> {
		self.url.signal_cloned()
	}

	/// Path parameter of the current route
	pub fn param(&self, name: &str) -> Option<String> {
		self.state.read().params.get(name).cloned()
	}

	/// Path parameter parsed as an integer; `None` if missing or not numeric
	pub fn number_param(&self, name: &str) -> Option<i64> {
		self.param(name).and_then(|v| v.trim().parse::<i64>().ok())
	}

	/// Query-string parameter of the current URL
	pub fn query_param(&self, name: &str) -> Option<String> {
		self.state.read().current.query.get(name).cloned()
	}

	/// Navigate to `path`, which may carry its own query string.
	///
	/// # Errors
	///
	/// [`NavigationError::EmptyPath`] for a blank path,
	/// [`NavigationError::NotFound`] when no route matches.
	pub fn navigate_to(&self, path: &str) -> Result<(), NavigationError> {
		self.navigate_with_query(path, std::iter::empty::<(String, String)>())
	}

	/// Navigate to `path` with the given query parameters appended.
	///
	/// # Errors
	///
	/// See [`Navigator::navigate_to`].
	pub fn navigate_with_query<I, K, V>(&self, path: &str, query: I) -> Result<(), NavigationError>
	where
		I: IntoIterator<Item = (K, V)>,
		K: Into<String>,
		V: Into<String>,
	{
		if path.trim().is_empty() {
			return Err(NavigationError::EmptyPath);
		}

		let mut params = parse_query(path);
		params.extend(query.into_iter().map(|(k, v)| (k.into(), v.into())));
		let (resolved, route_params) = self.resolve(path)?;
		self.commit(
			Location {
				path: resolved,
				query: params,
			},
			route_params,
			true,
		);
		Ok(())
	}

	/// Merge `params` into the current query string
	pub fn update_url_params<I, K, V>(&self, params: I)
	where
		I: IntoIterator<Item = (K, V)>,
		K: Into<String>,
		V: Into<String>,
	{
		let (mut location, route_params) = {
			let state = self.state.read();
			(state.current.clone(), state.params.clone())
		};
		location
			.query
			.extend(params.into_iter().map(|(k, v)| (k.into(), v.into())));
		self.commit(location, route_params, true);
	}

	/// Remove one query parameter; no navigation happens if it was absent
	pub fn remove_url_param(&self, name: &str) {
		let (mut location, route_params) = {
			let state = self.state.read();
			(state.current.clone(), state.params.clone())
		};
		if location.query.shift_remove(name).is_none() {
			return;
		}
		self.commit(location, route_params, true);
	}

	/// Go back to the previous location. Returns `false` when there is none.
	pub fn back(&self) -> bool {
		let previous = self.state.write().history.pop_back();
		let Some(location) = previous else {
			return false;
		};
		let params = self
			.match_route(&location.path)
			.map(|(_, params)| params)
			.unwrap_or_default();
		self.commit(location, params, false);
		true
	}

	/// Whether `url` is the current location.
	///
	/// With `normalize`, query strings and trailing slashes are ignored on
	/// both sides; otherwise the full URL must match exactly.
	pub fn is_url_active(&self, url: &str, normalize: bool) -> bool {
		let current = self.current_url();
		if normalize {
			normalize_path(url) == normalize_path(&current)
		} else {
			url == current
		}
	}

	/// Register a callback invoked after every completed navigation
	pub fn on_navigation_end<F>(&self, callback: F) -> ListenerId
	where
		F: Fn(&NavigationEnd) + Send + Sync + 'static,
	{
		let id = self.next_listener_id.fetch_add(1, Ordering::Relaxed);
		self.listeners.lock().push((id, Arc::new(callback)));
		id
	}

	/// Unregister a listener. Returns `false` if the id was unknown.
	pub fn remove_listener(&self, id: ListenerId) -> bool {
		let mut listeners = self.listeners.lock();
		let before = listeners.len();
		listeners.retain(|(listener_id, _)| *listener_id != id);
		listeners.len() != before
	}

	fn match_route(&self, path: &str) -> Option<(&RouteDefinition, HashMap<String, String>)> {
		self.routes
			.iter()
			.find_map(|route| route.pattern().matches(path).map(|params| (route, params)))
	}

	/// Follow redirects until a concrete route matches
	fn resolve(&self, path: &str) -> Result<(String, HashMap<String, String>), NavigationError> {
		let mut target = normalize_path(path);
		for _ in 0..MAX_REDIRECTS {
			let (route, params) = self
				.match_route(&target)
				.ok_or_else(|| NavigationError::NotFound(target.clone()))?;
			match &route.redirect_to {
				Some(redirect) => {
					tracing::debug!(from = %target, to = %redirect, "following redirect");
					target = normalize_path(redirect);
				}
				None => return Ok((target, params)),
			}
		}
		Err(NavigationError::RedirectLoop(normalize_path(path)))
	}

	fn commit(&self, location: Location, params: HashMap<String, String>, push_history: bool) {
		let event = {
			let mut state = self.state.write();
			if push_history {
				let previous = std::mem::replace(&mut state.current, location);
				if state.history.len() == MAX_HISTORY {
					state.history.pop_front();
				}
				state.history.push_back(previous);
			} else {
				state.current = location;
			}
			state.params = params;
			state.navigation_id += 1;
			let event = NavigationEnd {
				id: state.navigation_id,
				url: state.current.url(),
				path: state.current.path.clone(),
			};
			self.url.set(event.url.clone());
			event
		};
		tracing::debug!(url = %event.url, id = event.id, "navigation end");

		// Listeners may navigate again, so they run without any lock held
		let listeners: Vec<Listener> = self
			.listeners
			.lock()
			.iter()
			.map(|(_, listener)| Arc::clone(listener))
			.collect();
		for listener in listeners {
			listener(&event);
		}
	}
}

fn parse_query(url: &str) -> IndexMap<String, String> {
	let Some((_, rest)) = url.split_once('?') else {
		return IndexMap::new();
	};
	let query = rest.split('#').next().unwrap_or_default();
	serde_urlencoded::from_str::<Vec<(String, String)>>(query)
		.map(|pairs| pairs.into_iter().collect())
		.unwrap_or_default()
}
