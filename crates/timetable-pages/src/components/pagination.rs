//! Pagination bar state

use crate::controllers::ListChange;
use timetable_types::{DEFAULT_PAGE_SIZE, Page};

/// Page sizes offered in the page-size selector
pub const PAGE_SIZE_OPTIONS: [u64; 5] = [5, 10, 25, 50, 100];

/// Pagination state of a list
///
/// Page moves and size changes return the [`ListChange`] to hand to the
/// list controller; moves outside the page range return `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pagination {
	/// Current page number (1-indexed)
	pub page_number: u64,
	pub page_size: u64,
	pub total_items: u64,
}

impl Pagination {
	pub fn new(page_size: u64) -> Self {
		Self {
			page_number: 1,
			page_size,
			total_items: 0,
		}
	}

	/// Mirror the paging metadata of a loaded page
	pub fn from_page<T>(page: &Page<T>) -> Self {
		Self {
			page_number: page.page_number,
			page_size: page.page_size,
			total_items: page.total_items,
		}
	}

	pub fn options(&self) -> &'static [u64] {
		&PAGE_SIZE_OPTIONS
	}

	pub fn total_pages(&self) -> u64 {
		if self.page_size == 0 {
			0
		} else {
			self.total_items.div_ceil(self.page_size)
		}
	}

	/// Index of the first item on the current page (0-indexed)
	pub fn start_index(&self) -> u64 {
		self.page_number.saturating_sub(1) * self.page_size
	}

	/// Index one past the last item on the current page
	pub fn end_index(&self) -> u64 {
		(self.start_index() + self.page_size).min(self.total_items)
	}

	pub fn go_to(&mut self, page: u64) -> Option<ListChange> {
		if page < 1 || page > self.total_pages() {
			return None;
		}
		self.page_number = page;
		Some(ListChange::page(page))
	}

	pub fn next_page(&mut self) -> Option<ListChange> {
		self.go_to(self.page_number + 1)
	}

	pub fn prev_page(&mut self) -> Option<ListChange> {
		self.go_to(self.page_number.saturating_sub(1))
	}

	pub fn set_page_size(&mut self, page_size: u64) -> ListChange {
		self.page_size = page_size;
		ListChange::page_size(page_size)
	}
}

impl Default for Pagination {
	fn default() -> Self {
		Self::new(DEFAULT_PAGE_SIZE)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	fn pagination(total_items: u64) -> Pagination {
		Pagination {
			total_items,
			..Pagination::default()
		}
	}

	#[rstest]
	#[case(0, 0)]
	#[case(1, 1)]
	#[case(10, 1)]
	#[case(11, 2)]
	#[case(95, 10)]
	fn test_total_pages(#[case] total: u64, #[case] pages: u64) {
		assert_eq!(pagination(total).total_pages(), pages);
	}

	#[rstest]
	#[case(0, None)]
	#[case(1, Some(ListChange::page(1)))]
	#[case(3, Some(ListChange::page(3)))]
	#[case(4, None)]
	fn test_go_to_stays_in_range(#[case] page: u64, #[case] expected: Option<ListChange>) {
		let mut pagination = pagination(25);

		assert_eq!(pagination.go_to(page), expected);
	}

	#[rstest]
	fn test_next_and_prev() {
		// Arrange
		let mut pagination = pagination(15);

		// Act & Assert
		assert_eq!(pagination.prev_page(), None);
		assert_eq!(pagination.next_page(), Some(ListChange::page(2)));
		assert_eq!(pagination.next_page(), None);
		assert_eq!(pagination.page_number, 2);
		assert_eq!((pagination.start_index(), pagination.end_index()), (10, 15));
	}

	#[rstest]
	fn test_page_size_change() {
		let mut pagination = pagination(40);

		let change = pagination.set_page_size(25);

		assert_eq!(change, ListChange::page_size(25));
		assert_eq!(pagination.total_pages(), 2);
		assert!(pagination.options().contains(&25));
	}

	#[rstest]
	fn test_from_page() {
		let page: Page<()> = Page {
			page_number: 2,
			page_size: 5,
			total_items: 12,
			items: vec![(); 5],
		};

		let pagination = Pagination::from_page(&page);

		assert_eq!(pagination.total_pages(), 3);
		assert_eq!(pagination.page_number, 2);
	}
}
