//! Class edit page with its weekly schedule rows

use crate::components::text::mask_time;
use crate::controllers::{EditController, PageContext, PageError, PageResult};
use futures_signals::signal::{Mutable, MutableSignalCloned};
use timetable_client::DynResource;
use timetable_types::{
	Professor, Schedule, SchoolClass, Subject, ValidationError, Weekday, is_valid_time,
};

const SUBJECTS_ERROR_MESSAGE: &str = "Error loading subjects.";
const PROFESSORS_ERROR_MESSAGE: &str = "Error loading professors.";

/// One editable line of a class timetable
///
/// Every value starts out empty; all four are required on submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScheduleRow {
	pub id: Option<i64>,
	pub weekday: Option<Weekday>,
	pub time: String,
	pub professor_id: Option<i64>,
	pub subject_id: Option<i64>,
}

impl ScheduleRow {
	pub fn from_schedule(schedule: &Schedule) -> Self {
		Self {
			id: schedule.id,
			weekday: Some(schedule.weekday),
			time: schedule.time.clone(),
			professor_id: schedule.professor.as_ref().and_then(|p| p.id),
			subject_id: schedule.subject.as_ref().and_then(|s| s.id),
		}
	}
}

/// Edits a class: its name plus a list of schedule rows
///
/// Each row picks a professor, then one of the subjects that professor
/// teaches. Rows are sent as `{id, weekday, time, professor: {id},
/// subject: {id}}`.
pub struct ClassScheduleEditor {
	page: EditController<SchoolClass>,
	subjects: DynResource<Subject>,
	professors: DynResource<Professor>,
	subject_options: Mutable<Vec<Subject>>,
	professor_options: Mutable<Vec<Professor>>,
	name: Mutable<String>,
	rows: Mutable<Vec<ScheduleRow>>,
}

impl ClassScheduleEditor {
	pub fn new(
		classes: DynResource<SchoolClass>,
		subjects: DynResource<Subject>,
		professors: DynResource<Professor>,
		ctx: PageContext,
	) -> Self {
		Self {
			page: EditController::new(classes, ctx),
			subjects,
			professors,
			subject_options: Mutable::new(Vec::new()),
			professor_options: Mutable::new(Vec::new()),
			name: Mutable::new(String::new()),
			rows: Mutable::new(Vec::new()),
		}
	}

	pub fn page(&self) -> &EditController<SchoolClass> {
		&self.page
	}

	/// Load the class named in the URL, then both option lists
	///
	/// The two option lists load concurrently and each failure is notified
	/// with its own message; the first one is returned.
	pub async fn init(&self) -> PageResult<()> {
		let class = self.page.init().await?;
		self.name.set(class.name.clone());
		self.rows
			.set(class.schedules.iter().map(ScheduleRow::from_schedule).collect());

		let ctx = self.page.context();
		let scope = self.page.scope();
		let (subjects, professors) = tokio::join!(
			scope.call(self.subjects.fetch_all()),
			scope.call(self.professors.fetch_all()),
		);

		let subjects = subjects
			.map(|items| self.subject_options.set(items))
			.or_else(|error| ctx.fail(error, Some(SUBJECTS_ERROR_MESSAGE)));
		let professors = professors
			.map(|items| self.professor_options.set(items))
			.or_else(|error| ctx.fail(error, Some(PROFESSORS_ERROR_MESSAGE)));
		subjects.and(professors)
	}

	pub fn name(&self) -> String {
		self.name.get_cloned()
	}

	pub fn set_name(&self, name: impl Into<String>) {
		self.name.set(name.into());
	}

	pub fn subject_options(&self) -> Vec<Subject> {
		self.subject_options.get_cloned()
	}

	pub fn professor_options(&self) -> Vec<Professor> {
		self.professor_options.get_cloned()
	}

	pub fn rows(&self) -> Vec<ScheduleRow> {
		self.rows.get_cloned()
	}

	pub fn rows_signal(&self) -> MutableSignalCloned<Vec<ScheduleRow>> {
		self.rows.signal_cloned()
	}

	/// Append an empty row; returns its index
	pub fn add_row(&self) -> usize {
		let mut rows = self.rows.lock_mut();
		rows.push(ScheduleRow::default());
		rows.len() - 1
	}

	pub fn remove_row(&self, index: usize) -> Option<ScheduleRow> {
		let mut rows = self.rows.lock_mut();
		(index < rows.len()).then(|| rows.remove(index))
	}

	fn update_row(&self, index: usize, f: impl FnOnce(&mut ScheduleRow)) -> bool {
		let mut rows = self.rows.lock_mut();
		match rows.get_mut(index) {
			Some(row) => {
				f(row);
				true
			}
			None => false,
		}
	}

	pub fn set_weekday(&self, index: usize, weekday: Option<Weekday>) -> bool {
		self.update_row(index, |row| row.weekday = weekday)
	}

	/// Store typed time input, masked as `HH:MM`
	pub fn set_time(&self, index: usize, raw: &str) -> bool {
		let time = mask_time(raw);
		self.update_row(index, |row| row.time = time)
	}

	/// Pick the row's professor
	///
	/// The subject is cleared when no professor is chosen or the chosen one
	/// has no registered subjects.
	pub fn set_professor(&self, index: usize, professor_id: Option<i64>) -> bool {
		let has_subjects = !self.subjects_for_professor(professor_id).is_empty();
		self.update_row(index, |row| {
			row.professor_id = professor_id;
			if !has_subjects {
				row.subject_id = None;
			}
		})
	}

	pub fn set_subject(&self, index: usize, subject_id: Option<i64>) -> bool {
		self.update_row(index, |row| row.subject_id = subject_id)
	}

	/// Subjects the given professor teaches, as listed in the options
	pub fn subjects_for_professor(&self, professor_id: Option<i64>) -> Vec<Subject> {
		let Some(professor_id) = professor_id else {
			return Vec::new();
		};
		self.professor_options
			.lock_ref()
			.iter()
			.find(|p| p.id == Some(professor_id))
			.map(|p| p.subjects.clone())
			.unwrap_or_default()
	}

	/// Subjects selectable in row `index`
	pub fn subjects_for_row(&self, index: usize) -> Vec<Subject> {
		let professor_id = self.rows.lock_ref().get(index).and_then(|r| r.professor_id);
		self.subjects_for_professor(professor_id)
	}

	/// The class as it would be submitted now
	///
	/// # Errors
	///
	/// [`PageError::IncompleteForm`] when a row misses a value, a
	/// [`ValidationError`] for a malformed time or for a subject the row's
	/// professor does not teach. Errors are notified.
	pub fn build(&self) -> PageResult<SchoolClass> {
		let ctx = self.page.context();
		let rows = self.rows.get_cloned();
		let mut schedules = Vec::with_capacity(rows.len());

		for row in &rows {
			let (Some(weekday), Some(professor_id), Some(subject_id)) =
				(row.weekday, row.professor_id, row.subject_id)
			else {
				return ctx.fail(PageError::IncompleteForm, None);
			};
			if row.time.trim().is_empty() {
				return ctx.fail(PageError::IncompleteForm, None);
			}
			if !is_valid_time(&row.time) {
				return ctx.fail(ValidationError::invalid("hora", "expected HH:MM").into(), None);
			}
			if let Some(message) = self.subject_mismatch(professor_id, subject_id) {
				let error = ValidationError::invalid("materia", message.clone());
				return ctx.fail(error.into(), Some(&message));
			}

			schedules.push(Schedule {
				id: row.id,
				weekday,
				time: row.time.clone(),
				professor: Some(Box::new(Professor {
					id: Some(professor_id),
					..Default::default()
				})),
				subject: Some(Box::new(Subject {
					id: Some(subject_id),
					..Default::default()
				})),
				class: None,
			});
		}

		Ok(SchoolClass {
			id: self.page.id(),
			name: self.name.get_cloned(),
			schedules,
		})
	}

	/// Message for a subject outside the professor's list
	///
	/// A professor missing from the options, or one without subjects, accepts
	/// any subject.
	fn subject_mismatch(&self, professor_id: i64, subject_id: i64) -> Option<String> {
		let options = self.professor_options.lock_ref();
		let professor = options.iter().find(|p| p.id == Some(professor_id))?;
		if professor.subjects.is_empty() || professor.teaches(subject_id) {
			return None;
		}
		Some(format!("Invalid subject selected for professor {}", professor.name))
	}

	pub async fn submit(&self) -> PageResult<SchoolClass> {
		let class = self.build()?;
		self.page.submit(Some(class)).await
	}

	pub fn cancel(&self) -> bool {
		self.page.cancel()
	}

	pub fn destroy(&self) {
		self.page.destroy();
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::controllers::testing::{context, messages};
	use rstest::rstest;
	use std::sync::Arc;
	use timetable_client::MemoryResource;
	use timetable_types::ApiError;

	struct Fixture {
		classes: Arc<MemoryResource<SchoolClass>>,
		subjects: Arc<MemoryResource<Subject>>,
		professors: Arc<MemoryResource<Professor>>,
		ctx: PageContext,
	}

	fn fixture() -> Fixture {
		let subjects = Arc::new(MemoryResource::with_items([
			Subject::new("Algebra"),
			Subject::new("Biology"),
		]));
		let mut ada = Professor::new("Ada");
		ada.subjects = vec![Subject::reference(1, "Algebra")];
		let grace = Professor::new("Grace");
		let professors = Arc::new(MemoryResource::with_items([ada, grace]));

		let mut class = SchoolClass::new("1A");
		class.schedules.push(Schedule {
			id: Some(10),
			weekday: Weekday::Tuesday,
			time: "08:00".to_string(),
			professor: Some(Box::new(Professor::reference(1, "Ada"))),
			subject: Some(Box::new(Subject::reference(1, "Algebra"))),
			class: None,
		});
		let classes = Arc::new(MemoryResource::with_items([class]));

		let ctx = context("turma");
		ctx.navigator.navigate_to("/turma/edit/1").unwrap();
		Fixture {
			classes,
			subjects,
			professors,
			ctx,
		}
	}

	fn editor(f: &Fixture) -> ClassScheduleEditor {
		ClassScheduleEditor::new(
			f.classes.clone(),
			f.subjects.clone(),
			f.professors.clone(),
			f.ctx.clone(),
		)
	}

	#[rstest]
	#[tokio::test]
	async fn test_init_loads_rows_and_options() {
		// Arrange
		let f = fixture();
		let editor = editor(&f);

		// Act
		editor.init().await.unwrap();

		// Assert
		assert_eq!(editor.name(), "1A");
		assert_eq!(
			editor.rows(),
			vec![ScheduleRow {
				id: Some(10),
				weekday: Some(Weekday::Tuesday),
				time: "08:00".to_string(),
				professor_id: Some(1),
				subject_id: Some(1),
			}]
		);
		assert_eq!(editor.subject_options().len(), 2);
		assert_eq!(editor.professor_options().len(), 2);
		assert_eq!(editor.subjects_for_row(0), vec![Subject::reference(1, "Algebra")]);
	}

	#[rstest]
	#[tokio::test]
	async fn test_each_option_failure_has_its_message() {
		let f = fixture();
		f.subjects.set_failure(Some(ApiError::unknown()));
		f.professors.set_failure(Some(ApiError::connection()));
		let editor = editor(&f);

		let result = editor.init().await;

		assert_eq!(result, Err(PageError::Api(ApiError::unknown())));
		assert_eq!(
			messages(&f.ctx),
			vec![SUBJECTS_ERROR_MESSAGE, PROFESSORS_ERROR_MESSAGE]
		);
	}

	#[rstest]
	#[tokio::test]
	async fn test_professor_without_subjects_clears_subject() {
		// Arrange
		let f = fixture();
		let editor = editor(&f);
		editor.init().await.unwrap();

		// Act
		assert!(editor.set_professor(0, Some(2)));

		// Assert
		let row = &editor.rows()[0];
		assert_eq!(row.professor_id, Some(2));
		assert_eq!(row.subject_id, None);
		assert!(editor.subjects_for_row(0).is_empty());

		editor.set_subject(0, Some(2));
		editor.set_professor(0, Some(1));
		assert_eq!(editor.rows()[0].subject_id, Some(2));
		editor.set_professor(0, None);
		assert_eq!(editor.rows()[0].subject_id, None);
	}

	#[rstest]
	#[tokio::test]
	async fn test_row_editing() {
		let f = fixture();
		let editor = editor(&f);
		editor.init().await.unwrap();

		let index = editor.add_row();
		assert_eq!(index, 1);
		assert!(editor.set_time(index, "0930"));
		assert_eq!(editor.rows()[index].time, "09:30");
		assert!(!editor.set_weekday(5, Some(Weekday::Friday)));

		let removed = editor.remove_row(0).unwrap();
		assert_eq!(removed.id, Some(10));
		assert_eq!(editor.rows().len(), 1);
		assert_eq!(editor.remove_row(3), None);
	}

	#[rstest]
	#[tokio::test]
	async fn test_submit_sends_id_references() {
		// Arrange
		let f = fixture();
		let editor = editor(&f);
		editor.init().await.unwrap();
		let index = editor.add_row();
		editor.set_weekday(index, Some(Weekday::Friday));
		editor.set_time(index, "14:15");
		editor.set_professor(index, Some(2));
		editor.set_subject(index, Some(2));

		// Act
		editor.submit().await.unwrap();

		// Assert
		let saved = &f.classes.items()[0];
		assert_eq!(saved.schedules.len(), 2);
		let added = &saved.schedules[1];
		assert_eq!(added.id, None);
		assert_eq!(added.weekday, Weekday::Friday);
		assert_eq!(added.professor.as_deref(), Some(&Professor {
			id: Some(2),
			..Default::default()
		}));
		assert_eq!(added.subject.as_ref().and_then(|s| s.id), Some(2));
		assert_eq!(f.ctx.navigator.current_path(), "/turma");
	}

	#[rstest]
	#[tokio::test]
	async fn test_incomplete_row_is_rejected() {
		let f = fixture();
		let editor = editor(&f);
		editor.init().await.unwrap();
		editor.add_row();

		let result = editor.submit().await;

		assert_eq!(result, Err(PageError::IncompleteForm));
		assert_eq!(messages(&f.ctx), vec!["Please fill in the required fields."]);
		assert!(!f.classes.calls().contains(&"update"));
	}

	#[rstest]
	#[tokio::test]
	async fn test_subject_outside_professor_list_is_rejected() {
		// Arrange
		let f = fixture();
		let editor = editor(&f);
		editor.init().await.unwrap();

		// Act
		editor.set_subject(0, Some(2));
		let result = editor.submit().await;

		// Assert
		assert!(matches!(
			result,
			Err(PageError::Validation(ValidationError::Invalid { ref field, .. })) if field == "materia"
		));
		assert_eq!(
			messages(&f.ctx),
			vec!["Invalid subject selected for professor Ada"]
		);
	}

	#[rstest]
	#[tokio::test]
	async fn test_malformed_time_is_rejected() {
		let f = fixture();
		let editor = editor(&f);
		editor.init().await.unwrap();

		editor.set_time(0, "99");

		assert!(matches!(editor.build(), Err(PageError::Validation(_))));
	}
}
