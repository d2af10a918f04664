//! Professor edit page with subject selection

use crate::controllers::{EditController, PageContext, PageResult};
use futures_signals::signal::{Mutable, MutableSignalCloned};
use timetable_client::DynResource;
use timetable_types::{Professor, Subject};

const SUBJECTS_ERROR_MESSAGE: &str = "Error loading subjects.";

/// Edits a professor's name and the subjects they teach
///
/// The subject picker holds ids; on submission they are resolved against
/// the loaded subject options and sent as `{id, name}` references.
pub struct ProfessorEditor {
	page: EditController<Professor>,
	subjects: DynResource<Subject>,
	options: Mutable<Vec<Subject>>,
	name: Mutable<String>,
	selected: Mutable<Vec<i64>>,
}

impl ProfessorEditor {
	pub fn new(
		professors: DynResource<Professor>,
		subjects: DynResource<Subject>,
		ctx: PageContext,
	) -> Self {
		Self {
			page: EditController::new(professors, ctx),
			subjects,
			options: Mutable::new(Vec::new()),
			name: Mutable::new(String::new()),
			selected: Mutable::new(Vec::new()),
		}
	}

	pub fn page(&self) -> &EditController<Professor> {
		&self.page
	}

	/// Load the professor named in the URL, then the subject options
	pub async fn init(&self) -> PageResult<()> {
		let professor = self.page.init().await?;
		self.name.set(professor.name.clone());
		self.selected
			.set(professor.subjects.iter().filter_map(|s| s.id).collect());

		let ctx = self.page.context();
		match self.page.scope().call(self.subjects.fetch_all()).await {
			Ok(subjects) => {
				self.options.set(subjects);
				Ok(())
			}
			Err(error) => ctx.fail(error, Some(SUBJECTS_ERROR_MESSAGE)),
		}
	}

	pub fn options(&self) -> Vec<Subject> {
		self.options.get_cloned()
	}

	pub fn name(&self) -> String {
		self.name.get_cloned()
	}

	pub fn set_name(&self, name: impl Into<String>) {
		self.name.set(name.into());
	}

	pub fn selected(&self) -> Vec<i64> {
		self.selected.get_cloned()
	}

	pub fn selected_signal(&self) -> MutableSignalCloned<Vec<i64>> {
		self.selected.signal_cloned()
	}

	/// Select or deselect a subject; returns whether it is now selected
	pub fn toggle_subject(&self, subject_id: i64) -> bool {
		let mut selected = self.selected.lock_mut();
		match selected.iter().position(|id| *id == subject_id) {
			Some(pos) => {
				selected.remove(pos);
				false
			}
			None => {
				selected.push(subject_id);
				true
			}
		}
	}

	/// The professor as it would be submitted now
	///
	/// Selected ids missing from the options are dropped.
	pub fn build(&self) -> Professor {
		let selected = self.selected.lock_ref();
		let subjects = self
			.options
			.lock_ref()
			.iter()
			.filter_map(|s| s.id.filter(|id| selected.contains(id)).map(|id| (id, &s.name)))
			.map(|(id, name)| Subject::reference(id, name.clone()))
			.collect();

		Professor {
			id: self.page.id(),
			name: self.name.get_cloned(),
			subjects,
			..Default::default()
		}
	}

	pub async fn submit(&self) -> PageResult<Professor> {
		self.page.submit(Some(self.build())).await
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
	use crate::controllers::PageError;
	use crate::controllers::testing::{context, messages};
	use rstest::rstest;
	use std::sync::Arc;
	use timetable_client::MemoryResource;
	use timetable_types::ApiError;

	struct Fixture {
		professors: Arc<MemoryResource<Professor>>,
		subjects: Arc<MemoryResource<Subject>>,
		ctx: PageContext,
	}

	fn fixture() -> Fixture {
		let subjects = Arc::new(MemoryResource::with_items([
			Subject::new("Algebra"),
			Subject::new("Biology"),
			Subject::new("Chemistry"),
		]));
		let mut ada = Professor::new("Ada");
		ada.subjects = vec![Subject::reference(1, "Algebra")];
		let professors = Arc::new(MemoryResource::with_items([ada]));
		let ctx = context("professor");
		ctx.navigator.navigate_to("/professor/edit/1").unwrap();
		Fixture {
			professors,
			subjects,
			ctx,
		}
	}

	fn editor(f: &Fixture) -> ProfessorEditor {
		ProfessorEditor::new(f.professors.clone(), f.subjects.clone(), f.ctx.clone())
	}

	#[rstest]
	#[tokio::test]
	async fn test_init_selects_current_subjects() {
		let f = fixture();
		let editor = editor(&f);

		editor.init().await.unwrap();

		assert_eq!(editor.name(), "Ada");
		assert_eq!(editor.selected(), vec![1]);
		assert_eq!(editor.options().len(), 3);
	}

	#[rstest]
	#[tokio::test]
	async fn test_submit_sends_subject_references() {
		// Arrange
		let f = fixture();
		let editor = editor(&f);
		editor.init().await.unwrap();

		// Act
		assert!(!editor.toggle_subject(1));
		assert!(editor.toggle_subject(3));
		assert!(editor.toggle_subject(2));
		editor.set_name("Ada Lovelace");
		editor.submit().await.unwrap();

		// Assert
		let saved = &f.professors.items()[0];
		assert_eq!(saved.name, "Ada Lovelace");
		assert_eq!(
			saved.subjects,
			vec![Subject::reference(2, "Biology"), Subject::reference(3, "Chemistry")]
		);
		assert_eq!(f.ctx.navigator.current_path(), "/professor");
	}

	#[rstest]
	#[tokio::test]
	async fn test_option_failure_notifies() {
		let f = fixture();
		f.subjects.set_failure(Some(ApiError::unknown()));
		let editor = editor(&f);

		let result = editor.init().await;

		assert_eq!(result, Err(PageError::Api(ApiError::unknown())));
		assert_eq!(editor.name(), "Ada");
		assert_eq!(messages(&f.ctx), vec![SUBJECTS_ERROR_MESSAGE]);
	}

	#[rstest]
	#[tokio::test]
	async fn test_invalid_id_loads_nothing() {
		let f = fixture();
		f.ctx.navigator.navigate_to("/professor/edit/none").unwrap();
		let editor = editor(&f);

		assert_eq!(editor.init().await, Err(PageError::InvalidId));
		assert!(f.subjects.calls().is_empty());
		assert!(f.professors.calls().is_empty());
	}
}
