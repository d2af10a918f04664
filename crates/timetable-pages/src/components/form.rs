//! Dynamic data form
//!
//! A [`DataForm`] is built from a JSON object (usually a serialised entity):
//! every key becomes a field holding its value. The mode decides whether
//! fields are editable and what the submit button says. Some fields are kept
//! in the form but never shown: identifiers, time values and lists of related
//! records, which have dedicated editors.

use crate::components::text::{contains_hour, title_label};
use indexmap::IndexMap;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use timetable_types::is_valid_time;

pub const REQUIRED_MESSAGE: &str = "Required field.";
pub const GENERIC_ERROR_MESSAGE: &str = "An error occurred.";

/// Form errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
	#[error("Field '{0}' does not exist")]
	UnknownField(String),

	#[error("The form is read-only")]
	ReadOnly,

	/// At least one field fails its rules
	#[error("Please fill in the required fields.")]
	Invalid,

	/// The data cannot be read as an object or as the target type
	#[error("Invalid form data: {0}")]
	Decode(String),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FormMode {
	#[default]
	Create,
	View,
	Edit,
}

impl FormMode {
	pub fn is_read_only(&self) -> bool {
		matches!(self, Self::View)
	}

	pub fn button_text(&self) -> &'static str {
		match self {
			Self::Create => "Create new",
			Self::View => "",
			Self::Edit => "Save changes",
		}
	}
}

/// Validation rule attached to a field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldRule {
	Required,
	/// `HH:MM`, 00:00 to 23:59
	Time,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FormField {
	pub key: String,
	pub value: Value,
	pub disabled: bool,
	pub touched: bool,
	pub rules: Vec<FieldRule>,
}

impl FormField {
	pub fn label(&self) -> String {
		title_label(&self.key)
	}

	fn is_blank(&self) -> bool {
		match &self.value {
			Value::Null => true,
			Value::String(s) => s.trim().is_empty(),
			_ => false,
		}
	}

	/// First broken rule, if any
	fn broken_rule(&self) -> Option<FieldRule> {
		self.rules.iter().copied().find(|rule| match rule {
			FieldRule::Required => self.is_blank(),
			FieldRule::Time => !self.is_blank() && !self.value.as_str().is_some_and(is_valid_time),
		})
	}

	pub fn is_valid(&self) -> bool {
		self.broken_rule().is_none()
	}

	/// Message shown under the field once the user has touched it
	pub fn error(&self) -> Option<&'static str> {
		if !self.touched {
			return None;
		}
		self.broken_rule().map(|rule| match rule {
			FieldRule::Required => REQUIRED_MESSAGE,
			FieldRule::Time => GENERIC_ERROR_MESSAGE,
		})
	}

	fn is_displayed(&self) -> bool {
		!contains_hour(&self.key) && !self.key.starts_with("id") && !self.value.is_array()
	}
}

#[derive(Debug, Clone, Default)]
pub struct DataForm {
	mode: FormMode,
	header: Option<String>,
	fields: IndexMap<String, FormField>,
}

impl DataForm {
	pub fn new(mode: FormMode) -> Self {
		Self {
			mode,
			..Default::default()
		}
	}

	/// Build the fields from the keys of a JSON object
	///
	/// # Errors
	///
	/// Returns [`FormError::Decode`] when `data` is not an object.
	pub fn from_value(mode: FormMode, data: &Value) -> Result<Self, FormError> {
		let object = data
			.as_object()
			.ok_or_else(|| FormError::Decode("expected a JSON object".to_string()))?;
		let mut form = Self::new(mode);
		form.fields = object
			.iter()
			.map(|(key, value)| {
				let field = FormField {
					key: key.clone(),
					value: value.clone(),
					disabled: mode.is_read_only(),
					touched: false,
					rules: Vec::new(),
				};
				(key.clone(), field)
			})
			.collect();
		Ok(form)
	}

	/// Build the fields from a serialisable record
	pub fn from_entity<T: Serialize>(mode: FormMode, entity: &T) -> Result<Self, FormError> {
		let value = serde_json::to_value(entity).map_err(|e| FormError::Decode(e.to_string()))?;
		Self::from_value(mode, &value)
	}

	pub fn with_header(mut self, header: impl Into<String>) -> Self {
		self.header = Some(header.into());
		self
	}

	/// Attach `rule` to the field `key`, creating an empty field if needed
	pub fn with_rule(mut self, key: &str, rule: FieldRule) -> Self {
		let field = self.fields.entry(key.to_string()).or_insert_with(|| FormField {
			key: key.to_string(),
			value: Value::Null,
			disabled: self.mode.is_read_only(),
			touched: false,
			rules: Vec::new(),
		});
		if !field.rules.contains(&rule) {
			field.rules.push(rule);
		}
		self
	}

	pub fn mode(&self) -> FormMode {
		self.mode
	}

	pub fn header(&self) -> Option<&str> {
		self.header.as_deref()
	}

	pub fn is_read_only(&self) -> bool {
		self.mode.is_read_only()
	}

	pub fn button_text(&self) -> &'static str {
		self.mode.button_text()
	}

	/// Switch mode; field enablement follows
	pub fn set_mode(&mut self, mode: FormMode) {
		self.mode = mode;
		for field in self.fields.values_mut() {
			field.disabled = mode.is_read_only();
		}
	}

	pub fn field(&self, key: &str) -> Option<&FormField> {
		self.fields.get(key)
	}

	pub fn fields(&self) -> impl Iterator<Item = &FormField> {
		self.fields.values()
	}

	/// Fields a renderer draws, in key order
	pub fn visible_fields(&self) -> Vec<&FormField> {
		self.fields.values().filter(|f| f.is_displayed()).collect()
	}

	/// Layout columns: one for a single visible field, two otherwise
	pub fn grid_cols(&self) -> usize {
		if self.visible_fields().len() == 1 { 1 } else { 2 }
	}

	/// Set a field's value and mark it touched
	pub fn set_value(&mut self, key: &str, value: Value) -> Result<(), FormError> {
		if self.is_read_only() {
			return Err(FormError::ReadOnly);
		}
		let field = self
			.fields
			.get_mut(key)
			.ok_or_else(|| FormError::UnknownField(key.to_string()))?;
		field.value = value;
		field.touched = true;
		Ok(())
	}

	/// Mark every field touched so that their errors show
	pub fn touch_all(&mut self) {
		for field in self.fields.values_mut() {
			field.touched = true;
		}
	}

	pub fn is_valid(&self) -> bool {
		self.fields.values().all(FormField::is_valid)
	}

	/// `(key, message)` for every touched invalid field
	pub fn errors(&self) -> Vec<(&str, &'static str)> {
		self.fields
			.values()
			.filter_map(|f| f.error().map(|message| (f.key.as_str(), message)))
			.collect()
	}

	pub fn value(&self) -> Value {
		let object: Map<String, Value> = self
			.fields
			.iter()
			.map(|(key, field)| (key.clone(), field.value.clone()))
			.collect();
		Value::Object(object)
	}

	/// Read the form as `T`
	///
	/// # Errors
	///
	/// [`FormError::Invalid`] when a field breaks a rule (all fields are then
	/// marked touched), [`FormError::Decode`] when the values do not fit `T`.
	pub fn submit<T: DeserializeOwned>(&mut self) -> Result<T, FormError> {
		if !self.is_valid() {
			self.touch_all();
			return Err(FormError::Invalid);
		}
		serde_json::from_value(self.value()).map_err(|e| FormError::Decode(e.to_string()))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;
	use timetable_types::{Schedule, Subject};

	#[rstest]
	#[case(FormMode::Create, false, "Create new")]
	#[case(FormMode::View, true, "")]
	#[case(FormMode::Edit, false, "Save changes")]
	fn test_mode(#[case] mode: FormMode, #[case] read_only: bool, #[case] button: &str) {
		let form = DataForm::from_value(mode, &json!({ "nome": "" })).unwrap();

		assert_eq!(form.is_read_only(), read_only);
		assert_eq!(form.button_text(), button);
		assert_eq!(form.field("nome").unwrap().disabled, read_only);
	}

	#[rstest]
	fn test_visible_fields_skip_ids_times_and_lists() {
		// Arrange
		let data = json!({
			"id": 3,
			"id_turma": 1,
			"nome": "Physics",
			"hora": "08:00",
			"professores": [],
			"sala": "B2"
		});

		// Act
		let form = DataForm::from_value(FormMode::Edit, &data).unwrap();

		// Assert
		let keys: Vec<&str> = form.visible_fields().iter().map(|f| f.key.as_str()).collect();
		assert_eq!(keys.len(), 2);
		assert!(keys.contains(&"nome"));
		assert!(keys.contains(&"sala"));
		assert_eq!(form.grid_cols(), 2);
	}

	#[rstest]
	fn test_single_visible_field_uses_one_column() {
		let form = DataForm::from_entity(FormMode::Create, &Subject::new("")).unwrap();

		assert_eq!(form.visible_fields().len(), 1);
		assert_eq!(form.grid_cols(), 1);
	}

	#[rstest]
	fn test_errors_show_after_touch() {
		// Arrange
		let mut form = DataForm::from_entity(FormMode::Create, &Subject::new(""))
			.unwrap()
			.with_rule("nome", FieldRule::Required);
		assert!(form.errors().is_empty());

		// Act
		let result = form.submit::<Subject>();

		// Assert
		assert_eq!(result, Err(FormError::Invalid));
		assert_eq!(form.errors(), vec![("nome", REQUIRED_MESSAGE)]);

		form.set_value("nome", json!("Art")).unwrap();
		assert!(form.errors().is_empty());
		assert_eq!(form.submit::<Subject>().unwrap().name, "Art");
	}

	#[rstest]
	#[case(json!("07:45"), None)]
	#[case(json!("7:45"), Some(GENERIC_ERROR_MESSAGE))]
	#[case(json!(""), Some(REQUIRED_MESSAGE))]
	fn test_time_rule(#[case] value: Value, #[case] expected: Option<&str>) {
		let mut form = DataForm::from_value(FormMode::Create, &json!({ "hora": "" }))
			.unwrap()
			.with_rule("hora", FieldRule::Required)
			.with_rule("hora", FieldRule::Time);

		form.set_value("hora", value).unwrap();

		assert_eq!(form.field("hora").unwrap().error(), expected);
	}

	#[rstest]
	fn test_read_only_rejects_changes() {
		let mut form = DataForm::from_value(FormMode::View, &json!({ "nome": "x" })).unwrap();

		assert_eq!(form.set_value("nome", json!("y")), Err(FormError::ReadOnly));

		form.set_mode(FormMode::Edit);
		assert_eq!(
			form.set_value("missing", json!(1)),
			Err(FormError::UnknownField("missing".to_string()))
		);
		assert!(!form.field("nome").unwrap().disabled);
	}

	#[rstest]
	fn test_submit_decodes_entity() {
		let mut form = DataForm::from_value(
			FormMode::Create,
			&json!({ "dia_da_semana": "TERCA", "hora": "10:30" }),
		)
		.unwrap();

		let schedule: Schedule = form.submit().unwrap();

		assert_eq!(schedule.time, "10:30");
		assert_eq!(schedule.weekday.label(), "Tuesday");
	}

	#[rstest]
	fn test_non_object_is_rejected() {
		assert!(matches!(
			DataForm::from_value(FormMode::Create, &json!([1, 2])),
			Err(FormError::Decode(_))
		));
	}
}
