//! Route table types
//!
//! A route table is a flat list of [`RouteDefinition`]s. Besides the path,
//! each route can carry presentation metadata ([`RouteData`]) that the
//! sidebar and breadcrumb builders derive their structures from.
//!
//! Paths are written without a leading slash and may contain `:name`
//! parameter segments:
//!
//! ```
//! use timetable_pages::routing::{BreadcrumbConfig, RouteData, RouteDefinition, SidebarConfig};
//!
//! let route = RouteDefinition::new("professor/edit/:id").with_data(
//!     RouteData::new("Edit professor")
//!         .with_breadcrumb(BreadcrumbConfig::with_paths(["professor"])),
//! );
//! let params = route.pattern().matches("/professor/edit/7").unwrap();
//! assert_eq!(params["id"], "7");
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Sidebar placement of a route
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SidebarConfig {
	#[serde(default)]
	pub show: bool,
	/// Slash-delimited group path, e.g. `"Registry/Subject"`
	#[serde(default)]
	pub group: Option<String>,
}

impl SidebarConfig {
	/// Shown at top level
	pub fn shown() -> Self {
		Self {
			show: true,
			group: None,
		}
	}

	/// Shown inside the group chain `group`
	pub fn grouped(group: impl Into<String>) -> Self {
		Self {
			show: true,
			group: Some(group.into()),
		}
	}

	pub fn hidden() -> Self {
		Self::default()
	}
}

/// Breadcrumb behaviour of a route
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BreadcrumbConfig {
	/// The route every trail starts from
	#[serde(default)]
	pub is_main: bool,
	/// Leave the main route out of trails involving this route
	#[serde(default)]
	pub no_use_main: bool,
	/// Ancestor route paths, outermost first
	#[serde(default)]
	pub paths: Vec<String>,
}

impl BreadcrumbConfig {
	pub fn main() -> Self {
		Self {
			is_main: true,
			..Default::default()
		}
	}

	pub fn with_paths<I, S>(paths: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self {
			paths: paths.into_iter().map(Into::into).collect(),
			..Default::default()
		}
	}

	pub fn without_main(mut self) -> Self {
		self.no_use_main = true;
		self
	}
}

/// Presentation metadata of a route
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteData {
	pub label: String,
	#[serde(default)]
	pub icon: Option<String>,
	#[serde(default)]
	pub sidebar: Option<SidebarConfig>,
	#[serde(default)]
	pub breadcrumb: Option<BreadcrumbConfig>,
}

impl RouteData {
	pub fn new(label: impl Into<String>) -> Self {
		Self {
			label: label.into(),
			icon: None,
			sidebar: None,
			breadcrumb: None,
		}
	}

	pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
		self.icon = Some(icon.into());
		self
	}

	pub fn with_sidebar(mut self, sidebar: SidebarConfig) -> Self {
		self.sidebar = Some(sidebar);
		self
	}

	pub fn with_breadcrumb(mut self, breadcrumb: BreadcrumbConfig) -> Self {
		self.breadcrumb = Some(breadcrumb);
		self
	}
}

/// One entry of the route table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteDefinition {
	/// Path without leading slash; may contain `:name` segments
	pub path: String,
	/// Target of a redirect route
	#[serde(default)]
	pub redirect_to: Option<String>,
	#[serde(default)]
	pub data: Option<RouteData>,
}

impl RouteDefinition {
	pub fn new(path: impl Into<String>) -> Self {
		Self {
			path: path.into(),
			redirect_to: None,
			data: None,
		}
	}

	/// A route that forwards to `target`
	pub fn redirect(path: impl Into<String>, target: impl Into<String>) -> Self {
		Self {
			path: path.into(),
			redirect_to: Some(target.into()),
			data: None,
		}
	}

	pub fn with_data(mut self, data: RouteData) -> Self {
		self.data = Some(data);
		self
	}

	/// Absolute URL of the route, `"/" + path`
	pub fn url(&self) -> String {
		format!("/{}", self.path.trim_start_matches('/'))
	}

	pub fn label(&self) -> Option<&str> {
		self.data.as_ref().map(|d| d.label.as_str())
	}

	pub fn sidebar(&self) -> Option<&SidebarConfig> {
		self.data.as_ref().and_then(|d| d.sidebar.as_ref())
	}

	pub fn breadcrumb(&self) -> Option<&BreadcrumbConfig> {
		self.data.as_ref().and_then(|d| d.breadcrumb.as_ref())
	}

	pub fn pattern(&self) -> RoutePattern {
		RoutePattern::parse(&self.path)
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
	Static(String),
	Param(String),
}

/// Compiled route path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutePattern {
	segments: Vec<Segment>,
}

impl RoutePattern {
	pub fn parse(pattern: &str) -> Self {
		let segments = split_segments(pattern)
			.map(|s| match s.strip_prefix(':') {
				Some(name) => Segment::Param(name.to_string()),
				None => Segment::Static(s.to_string()),
			})
			.collect();
		Self { segments }
	}

	/// Match a URL path (query string ignored) and extract its parameters
	pub fn matches(&self, url: &str) -> Option<HashMap<String, String>> {
		let path = normalize_path(url);
		let parts: Vec<&str> = split_segments(&path).collect();
		if parts.len() != self.segments.len() {
			return None;
		}

		let mut params = HashMap::new();
		for (segment, part) in self.segments.iter().zip(parts) {
			match segment {
				Segment::Static(expected) if expected == part => {}
				Segment::Static(_) => return None,
				Segment::Param(name) => {
					params.insert(name.clone(), part.to_string());
				}
			}
		}
		Some(params)
	}

	/// Build a concrete path; `None` when a parameter is missing
	pub fn reverse(&self, params: &HashMap<String, String>) -> Option<String> {
		let mut parts = Vec::with_capacity(self.segments.len());
		for segment in &self.segments {
			match segment {
				Segment::Static(s) => parts.push(s.as_str()),
				Segment::Param(name) => parts.push(params.get(name)?.as_str()),
			}
		}
		Some(format!("/{}", parts.join("/")))
	}

	/// Whether the pattern has no parameter segments
	pub fn is_static(&self) -> bool {
		self.segments
			.iter()
			.all(|s| matches!(s, Segment::Static(_)))
	}
}

fn split_segments(path: &str) -> impl Iterator<Item = &str> {
	path.split('/').filter(|s| !s.is_empty())
}

/// Drop query string and fragment, force a leading slash and strip trailing ones.
///
/// # Examples
///
/// ```
/// use timetable_pages::routing::normalize_path;
///
/// assert_eq!(normalize_path("materia/?page=2"), "/materia");
/// assert_eq!(normalize_path(""), "/");
/// ```
pub fn normalize_path(url: &str) -> String {
	let end = url.find(|c: char| c == '?' || c == '#').unwrap_or(url.len());
	let trimmed = url[..end].trim_matches('/');
	format!("/{}", trimmed)
}
