//! Sidebar menu
//!
//! [`build_sidebar`] turns the flat route table into a tree: every route with
//! a visible sidebar descriptor becomes a leaf, nested under the groups named
//! by its slash-delimited `group` path. Groups are created on first use and
//! reused by label afterwards.
//!
//! Top-level ordering puts "Dashboard" first and sorts the rest by label,
//! ignoring case and accents. Children keep route-table order.
//!
//! [`SidebarState`] holds the built tree, reopens the groups containing the
//! active route after every navigation, and tracks the user's toggles.

use crate::navigation::{ListenerId, Navigator};
use crate::routing::{RouteDefinition, normalize_path};
use futures_signals::signal::{Mutable, MutableSignalCloned};
use serde::Serialize;
use std::cmp::Ordering;
use std::sync::Arc;

/// Viewport width at or below which the sidebar collapses
pub const COLLAPSE_WIDTH: u32 = 500;

const DASHBOARD_LABEL: &str = "dashboard";

/// A node of the sidebar tree: a navigable leaf or a group of nodes
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SidebarItem {
	pub label: String,
	/// Set on leaves only
	pub url: Option<String>,
	pub icon: Option<String>,
	/// Group path of a leaf, or the key of a group
	pub group: Option<String>,
	pub is_open: bool,
	pub has_children: bool,
	pub children: Vec<SidebarItem>,
}

impl SidebarItem {
	fn leaf(label: &str, url: String, icon: Option<String>, group: Option<String>) -> Self {
		Self {
			label: label.to_string(),
			url: Some(url),
			icon,
			group,
			is_open: false,
			has_children: false,
			children: Vec::new(),
		}
	}

	fn group(key: &str) -> Self {
		Self {
			label: key.to_string(),
			url: None,
			icon: None,
			group: Some(key.to_string()),
			is_open: false,
			has_children: false,
			children: Vec::new(),
		}
	}

	pub fn is_group(&self) -> bool {
		self.url.is_none()
	}

	/// Whether this leaf, or any leaf below this group, points at `path`
	fn contains_url(&self, path: &str) -> bool {
		match &self.url {
			Some(url) => url == path,
			None => self.children.iter().any(|child| child.contains_url(path)),
		}
	}

	fn find_group_mut<'a>(
		items: &'a mut [SidebarItem],
		label_path: &[&str],
	) -> Option<&'a mut SidebarItem> {
		let (first, rest) = label_path.split_first()?;
		let item = items
			.iter_mut()
			.find(|item| item.is_group() && item.label == *first)?;
		if rest.is_empty() {
			Some(item)
		} else {
			Self::find_group_mut(&mut item.children, rest)
		}
	}
}

/// Split a group descriptor into its keys, dropping blank segments.
///
/// `"X/"`, `"/X"` and `" X "` all name the single group `X`; a descriptor
/// with no non-blank segment places the leaf at top level.
pub fn group_keys(group: &str) -> Vec<String> {
	group
		.split('/')
		.map(str::trim)
		.filter(|key| !key.is_empty())
		.map(str::to_string)
		.collect()
}

/// Build the sidebar tree from the route table
///
/// # Examples
///
/// ```
/// use timetable_pages::routing::{RouteData, RouteDefinition, SidebarConfig};
/// use timetable_pages::sidebar::build_sidebar;
///
/// let routes = vec![
///     RouteDefinition::new("a").with_data(RouteData::new("A").with_sidebar(SidebarConfig::grouped("X"))),
///     RouteDefinition::new("b").with_data(RouteData::new("B").with_sidebar(SidebarConfig::grouped("X/Y"))),
/// ];
/// let tree = build_sidebar(&routes);
///
/// assert_eq!(tree.len(), 1);
/// assert_eq!(tree[0].label, "X");
/// assert_eq!(tree[0].children[0].label, "A");
/// assert_eq!(tree[0].children[1].children[0].label, "B");
/// ```
pub fn build_sidebar(routes: &[RouteDefinition]) -> Vec<SidebarItem> {
	let mut items = Vec::new();

	for route in routes {
		let Some(data) = &route.data else {
			continue;
		};
		let Some(sidebar) = data.sidebar.as_ref().filter(|s| s.show) else {
			continue;
		};

		let leaf = SidebarItem::leaf(
			&data.label,
			route.url(),
			data.icon.clone(),
			sidebar.group.clone(),
		);
		let keys = sidebar.group.as_deref().map(group_keys).unwrap_or_default();
		insert(&mut items, &keys, leaf);
	}

	sort_top_level(items)
}

fn insert(level: &mut Vec<SidebarItem>, keys: &[String], leaf: SidebarItem) {
	let Some((key, rest)) = keys.split_first() else {
		level.push(leaf);
		return;
	};

	let pos = match level
		.iter()
		.position(|item| item.is_group() && item.label == *key)
	{
		Some(pos) => pos,
		None => {
			level.push(SidebarItem::group(key));
			level.len() - 1
		}
	};
	let group = &mut level[pos];
	group.has_children = true;
	insert(&mut group.children, rest, leaf);
}

fn sort_top_level(items: Vec<SidebarItem>) -> Vec<SidebarItem> {
	let (mut ordered, mut others): (Vec<_>, Vec<_>) = items
		.into_iter()
		.partition(|item| item.label.to_lowercase() == DASHBOARD_LABEL);
	others.sort_by(|a, b| locale_compare(&a.label, &b.label));
	ordered.extend(others);
	ordered
}

fn fold_char(c: char) -> char {
	match c {
		'á' | 'à' | 'â' | 'ã' | 'ä' | 'å' => 'a',
		'é' | 'è' | 'ê' | 'ë' => 'e',
		'í' | 'ì' | 'î' | 'ï' => 'i',
		'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
		'ú' | 'ù' | 'û' | 'ü' => 'u',
		'ç' => 'c',
		'ñ' => 'n',
		'ý' | 'ÿ' => 'y',
		other => other,
	}
}

fn collation_key(s: &str) -> Vec<char> {
	s.chars().flat_map(char::to_lowercase).map(fold_char).collect()
}

/// Label ordering: case and accents are ignored first, then accents decide,
/// then lowercase sorts before uppercase.
pub fn locale_compare(a: &str, b: &str) -> Ordering {
	collation_key(a)
		.cmp(&collation_key(b))
		.then_with(|| a.to_lowercase().cmp(&b.to_lowercase()))
		.then_with(|| b.cmp(a))
}

fn refresh_open_state(items: &mut [SidebarItem], path: &str) {
	for item in items.iter_mut().filter(|item| item.is_group()) {
		refresh_open_state(&mut item.children, path);
		item.is_open = item.contains_url(path);
	}
}

/// Live sidebar: the menu tree plus the whole-sidebar collapse flag
pub struct SidebarState {
	items: Mutable<Vec<SidebarItem>>,
	collapsed: Mutable<bool>,
}

impl SidebarState {
	pub fn new(routes: &[RouteDefinition]) -> Self {
		Self {
			items: Mutable::new(build_sidebar(routes)),
			collapsed: Mutable::new(false),
		}
	}

	/// Follow `navigator`: open state is recomputed now and after every navigation
	pub fn attach(self: &Arc<Self>, navigator: &Navigator) -> ListenerId {
		let sidebar = Arc::downgrade(self);
		let id = navigator.on_navigation_end(move |event| {
			if let Some(sidebar) = sidebar.upgrade() {
				sidebar.update_active(&event.path);
			}
		});
		self.update_active(&navigator.current_path());
		id
	}

	pub fn items(&self) -> Vec<SidebarItem> {
		self.items.get_cloned()
	}

	pub fn signal(&self) -> MutableSignalCloned<Vec<SidebarItem>> {
		self.items.signal_cloned()
	}

	/// Open exactly the groups that contain `url`
	pub fn update_active(&self, url: &str) {
		let path = normalize_path(url);
		refresh_open_state(&mut self.items.lock_mut(), &path);
	}

	/// Flip the group reached by following `label_path`; returns its new state
	pub fn toggle_group(&self, label_path: &[&str]) -> Option<bool> {
		let mut items = self.items.lock_mut();
		let group = SidebarItem::find_group_mut(&mut items, label_path)?;
		group.is_open = !group.is_open;
		Some(group.is_open)
	}

	pub fn is_collapsed(&self) -> bool {
		self.collapsed.get()
	}

	pub fn collapsed_signal(&self) -> MutableSignalCloned<bool> {
		self.collapsed.signal_cloned()
	}

	pub fn toggle_sidebar(&self) -> bool {
		let collapsed = !self.collapsed.get();
		self.collapsed.set(collapsed);
		collapsed
	}

	/// Collapse on narrow viewports, expand on wide ones
	pub fn on_resize(&self, width: u32) {
		self.collapsed.set_neq(width <= COLLAPSE_WIDTH);
	}
}
