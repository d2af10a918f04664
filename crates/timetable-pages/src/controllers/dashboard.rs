//! Dashboard page: record counts and a month calendar

use super::{LOAD_ERROR_MESSAGE, PageContext, PageResult, PageScope};
use crate::components::calendar::CalendarState;
use futures::future::try_join3;
use futures_signals::signal::{Mutable, MutableSignalCloned};
use serde::Serialize;
use timetable_client::DynResource;
use timetable_types::{Professor, SchoolClass, Subject};

/// Totals shown on the dashboard cards
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DashboardCounts {
	pub subjects: u64,
	pub professors: u64,
	pub classes: u64,
}

pub struct DashboardController {
	subjects: DynResource<Subject>,
	professors: DynResource<Professor>,
	classes: DynResource<SchoolClass>,
	ctx: PageContext,
	scope: PageScope,
	counts: Mutable<DashboardCounts>,
	calendar: CalendarState,
}

impl DashboardController {
	pub fn new(
		subjects: DynResource<Subject>,
		professors: DynResource<Professor>,
		classes: DynResource<SchoolClass>,
		ctx: PageContext,
	) -> Self {
		Self {
			subjects,
			professors,
			classes,
			ctx,
			scope: PageScope::new(),
			counts: Mutable::new(DashboardCounts::default()),
			calendar: CalendarState::today(),
		}
	}

	pub fn counts(&self) -> DashboardCounts {
		self.counts.get()
	}

	pub fn counts_signal(&self) -> MutableSignalCloned<DashboardCounts> {
		self.counts.signal_cloned()
	}

	pub fn calendar(&self) -> &CalendarState {
		&self.calendar
	}

	/// Fetch the three counts concurrently
	///
	/// The counts are only replaced when all three requests succeed; any
	/// failure produces a single notification.
	pub async fn load(&self) -> PageResult<DashboardCounts> {
		let counts = try_join3(
			self.subjects.count(),
			self.professors.count(),
			self.classes.count(),
		);
		match self.scope.call(counts).await {
			Ok((subjects, professors, classes)) => {
				let counts = DashboardCounts {
					subjects,
					professors,
					classes,
				};
				tracing::debug!(?counts, "dashboard counts loaded");
				self.counts.set(counts);
				Ok(counts)
			}
			Err(error) => self.ctx.fail(error, Some(LOAD_ERROR_MESSAGE)),
		}
	}

	pub fn destroy(&self) {
		self.scope.cancel();
	}
}
