//! Data table state
//!
//! The table renders any serialisable entity: each item is turned into a
//! JSON object and its keys become the columns, minus those hidden in the
//! column map. Paging and filter setters report a [`ListChange`] only when
//! the value actually changed.

use crate::components::text::title_label;
use crate::controllers::ListChange;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use timetable_types::{DEFAULT_PAGE_SIZE, Page};

/// Row actions the page wired up
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TableActions {
	pub view: bool,
	pub edit: bool,
	pub delete: bool,
}

impl TableActions {
	pub fn all() -> Self {
		Self {
			view: true,
			edit: true,
			delete: true,
		}
	}

	pub fn any(&self) -> bool {
		self.view || self.edit || self.delete
	}
}

/// One rendered row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
	pub id: Option<i64>,
	/// `(column key, cell text)` in column order
	pub cells: Vec<(String, String)>,
}

#[derive(Debug, Clone)]
pub struct DataTable {
	page_number: u64,
	page_size: u64,
	filter: String,
	show_columns: HashMap<String, bool>,
	actions: TableActions,
}

impl DataTable {
	pub fn new(actions: TableActions) -> Self {
		Self {
			page_number: 1,
			page_size: DEFAULT_PAGE_SIZE,
			filter: String::new(),
			show_columns: HashMap::new(),
			actions,
		}
	}

	/// Hide (`false`) or force (`true`) a column; unlisted columns are shown
	pub fn with_column(mut self, key: impl Into<String>, show: bool) -> Self {
		self.show_columns.insert(key.into(), show);
		self
	}

	pub fn actions(&self) -> TableActions {
		self.actions
	}

	pub fn page_number(&self) -> u64 {
		self.page_number
	}

	pub fn page_size(&self) -> u64 {
		self.page_size
	}

	pub fn filter(&self) -> &str {
		&self.filter
	}

	pub fn set_page_number(&mut self, page_number: u64) -> Option<ListChange> {
		if self.page_number == page_number {
			return None;
		}
		self.page_number = page_number;
		Some(ListChange::page(page_number))
	}

	pub fn set_page_size(&mut self, page_size: u64) -> Option<ListChange> {
		if self.page_size == page_size {
			return None;
		}
		self.page_size = page_size;
		Some(ListChange::page_size(page_size))
	}

	pub fn set_filter(&mut self, filter: impl Into<String>) -> Option<ListChange> {
		let filter = filter.into();
		if self.filter == filter {
			return None;
		}
		self.filter = filter.clone();
		Some(ListChange::filter(filter))
	}

	/// Keep the setters in step with what the controller loaded
	pub fn sync<T>(&mut self, page: &Page<T>) {
		self.page_number = page.page_number;
		self.page_size = page.page_size;
	}

	/// The action column is shown when there are rows and any action is wired
	pub fn show_action_column<T>(&self, data: Option<&Page<T>>) -> bool {
		data.is_some_and(|page| !page.items.is_empty()) && self.actions.any()
	}

	fn is_visible(&self, key: &str) -> bool {
		self.show_columns.get(key).copied().unwrap_or(true)
	}

	/// Visible column keys of one item
	pub fn keys(&self, item: &Value) -> Vec<String> {
		item.as_object()
			.map(|object| {
				object
					.keys()
					.filter(|key| self.is_visible(key))
					.cloned()
					.collect()
			})
			.unwrap_or_default()
	}

	/// Header labels taken from the first item of `page`
	pub fn headers<T: Serialize>(&self, page: &Page<T>) -> Vec<String> {
		page.items
			.first()
			.and_then(|item| serde_json::to_value(item).ok())
			.map(|item| self.keys(&item).iter().map(|k| title_label(k)).collect())
			.unwrap_or_default()
	}

	pub fn rows<T: Serialize>(&self, page: &Page<T>) -> Vec<TableRow> {
		page.items
			.iter()
			.filter_map(|item| serde_json::to_value(item).ok())
			.map(|item| TableRow {
				id: item.get("id").and_then(Value::as_i64),
				cells: self
					.keys(&item)
					.into_iter()
					.map(|key| {
						let text = cell_text(&item[&key]);
						(key, text)
					})
					.collect(),
			})
			.collect()
	}
}

impl Default for DataTable {
	fn default() -> Self {
		Self::new(TableActions::default())
	}
}

/// Display text of a cell; related records show their names
pub fn cell_text(value: &Value) -> String {
	match value {
		Value::Null => String::new(),
		Value::String(s) => s.clone(),
		Value::Array(items) => items
			.iter()
			.map(cell_text)
			.filter(|text| !text.is_empty())
			.collect::<Vec<_>>()
			.join(", "),
		Value::Object(object) => object
			.get("nome")
			.map(cell_text)
			.unwrap_or_else(|| value.to_string()),
		other => other.to_string(),
	}
}
