//! Pagination shapes

use serde::{Deserialize, Serialize};

/// Default page size of list pages
pub const DEFAULT_PAGE_SIZE: u64 = 10;

/// One paginated result set as returned by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
	pub page_number: u64,
	pub page_size: u64,
	pub total_items: u64,
	#[serde(default = "Vec::new")]
	pub items: Vec<T>,
}

impl<T> Page<T> {
	/// Number of pages needed for `total_items`, zero when the page size is zero
	pub fn total_pages(&self) -> u64 {
		if self.page_size == 0 {
			return 0;
		}
		self.total_items.div_ceil(self.page_size)
	}

	pub fn is_empty(&self) -> bool {
		self.items.is_empty()
	}

	/// Convert the items while keeping the paging metadata
	pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
		Page {
			page_number: self.page_number,
			page_size: self.page_size,
			total_items: self.total_items,
			items: self.items.into_iter().map(f).collect(),
		}
	}
}

impl<T> Default for Page<T> {
	fn default() -> Self {
		Self {
			page_number: 1,
			page_size: DEFAULT_PAGE_SIZE,
			total_items: 0,
			items: Vec::new(),
		}
	}
}

/// Query-string parameters of a paginated list request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListQuery {
	pub page_number: u64,
	pub page_size: u64,
	pub filter: String,
}

impl ListQuery {
	pub fn new(page_number: u64, page_size: u64, filter: impl Into<String>) -> Self {
		Self {
			page_number,
			page_size,
			filter: filter.into(),
		}
	}
}

impl Default for ListQuery {
	fn default() -> Self {
		Self::new(1, DEFAULT_PAGE_SIZE, "")
	}
}

/// Body of the `count` endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TotalCount {
	pub total_count: u64,
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case(0, 10, 0)]
	#[case(1, 10, 1)]
	#[case(10, 10, 1)]
	#[case(11, 10, 2)]
	#[case(99, 25, 4)]
	#[case(5, 0, 0)]
	fn test_total_pages(#[case] total_items: u64, #[case] page_size: u64, #[case] expected: u64) {
		let page: Page<()> = Page {
			page_number: 1,
			page_size,
			total_items,
			items: Vec::new(),
		};

		assert_eq!(page.total_pages(), expected);
	}

	#[rstest]
	fn test_default_query() {
		let query = ListQuery::default();

		assert_eq!(query, ListQuery::new(1, 10, ""));
	}

	#[rstest]
	fn test_page_deserializes_without_items() {
		let page: Page<u32> =
			serde_json::from_str(r#"{"page_number":2,"page_size":5,"total_items":7}"#).unwrap();

		assert_eq!(page.page_number, 2);
		assert!(page.is_empty());
	}
}
