//! Month calendar widget state

use chrono::{Datelike, Local, Months, NaiveDate};
use futures_signals::signal::{Mutable, MutableSignalCloned};
use serde::Serialize;

pub const WEEKDAY_NAMES: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

pub const MONTH_NAMES: [&str; 12] = [
	"January",
	"February",
	"March",
	"April",
	"May",
	"June",
	"July",
	"August",
	"September",
	"October",
	"November",
	"December",
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CalendarSize {
	ExtraSmall,
	Small,
	#[default]
	Medium,
	Large,
	ExtraLarge,
}

impl CalendarSize {
	pub fn css_class(&self) -> &'static str {
		match self {
			Self::ExtraSmall => "extra-small",
			Self::Small => "small",
			Self::Medium => "medium",
			Self::Large => "large",
			Self::ExtraLarge => "extra-large",
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CalendarDay {
	pub day: u32,
	pub is_today: bool,
}

/// A month grid that can be paged back and forth, with today marked
pub struct CalendarState {
	today: NaiveDate,
	/// First day of the displayed month
	month: Mutable<NaiveDate>,
	size: CalendarSize,
}

impl CalendarState {
	/// Calendar showing the current month in local time
	pub fn today() -> Self {
		Self::for_date(Local::now().date_naive())
	}

	pub fn for_date(today: NaiveDate) -> Self {
		Self {
			today,
			month: Mutable::new(first_of_month(today)),
			size: CalendarSize::default(),
		}
	}

	pub fn with_size(mut self, size: CalendarSize) -> Self {
		self.size = size;
		self
	}

	pub fn size(&self) -> CalendarSize {
		self.size
	}

	pub fn year(&self) -> i32 {
		self.month.get().year()
	}

	/// Displayed month, 1 to 12
	pub fn month(&self) -> u32 {
		self.month.get().month()
	}

	pub fn month_name(&self) -> &'static str {
		MONTH_NAMES[self.month.get().month0() as usize]
	}

	pub fn month_signal(&self) -> MutableSignalCloned<NaiveDate> {
		self.month.signal_cloned()
	}

	/// Empty cells before day 1 in a Sunday-first grid
	pub fn leading_blanks(&self) -> u32 {
		self.month.get().weekday().num_days_from_sunday()
	}

	pub fn days(&self) -> Vec<CalendarDay> {
		let first = self.month.get();
		(1..=days_in_month(first))
			.map(|day| CalendarDay {
				day,
				is_today: first.with_day(day) == Some(self.today),
			})
			.collect()
	}

	pub fn previous_month(&self) {
		let mut month = self.month.lock_mut();
		if let Some(previous) = month.checked_sub_months(Months::new(1)) {
			*month = previous;
		}
	}

	pub fn next_month(&self) {
		let mut month = self.month.lock_mut();
		if let Some(next) = month.checked_add_months(Months::new(1)) {
			*month = next;
		}
	}
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
	date.with_day(1).unwrap_or(date)
}

fn days_in_month(first: NaiveDate) -> u32 {
	first
		.checked_add_months(Months::new(1))
		.map(|next| (next - first).num_days() as u32)
		.unwrap_or(31)
}
