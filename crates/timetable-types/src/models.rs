//! Domain models
//!
//! Every model mirrors one backend resource. Serde attributes map the
//! English field names onto the backend's wire names.

use crate::entity::Entity;
use crate::errors::ValidationError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

// 24-hour clock, zero padded: 00:00 through 23:59
static TIME_REGEX: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"^([01]\d|2[0-3]):([0-5]\d)$").expect("TIME_REGEX: invalid regex pattern")
});

/// Returns `true` when `value` is a valid `HH:MM` time of day.
///
/// # Examples
///
/// ```
/// use timetable_types::is_valid_time;
///
/// assert!(is_valid_time("08:30"));
/// assert!(is_valid_time("23:59"));
/// assert!(!is_valid_time("24:00"));
/// assert!(!is_valid_time("8:30"));
/// ```
pub fn is_valid_time(value: &str) -> bool {
	TIME_REGEX.is_match(value)
}

fn require_name(name: &str) -> Result<(), ValidationError> {
	if name.trim().is_empty() {
		return Err(ValidationError::required("nome"));
	}
	Ok(())
}

/// Day of the week a class meets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum Weekday {
	#[default]
	#[serde(rename = "SEGUNDA")]
	Monday,
	#[serde(rename = "TERCA")]
	Tuesday,
	#[serde(rename = "QUARTA")]
	Wednesday,
	#[serde(rename = "QUINTA")]
	Thursday,
	#[serde(rename = "SEXTA")]
	Friday,
	#[serde(rename = "SABADO")]
	Saturday,
	#[serde(rename = "DOMINGO")]
	Sunday,
}

impl Weekday {
	/// All days, Monday first
	pub const ALL: [Weekday; 7] = [
		Weekday::Monday,
		Weekday::Tuesday,
		Weekday::Wednesday,
		Weekday::Thursday,
		Weekday::Friday,
		Weekday::Saturday,
		Weekday::Sunday,
	];

	pub fn label(&self) -> &'static str {
		match self {
			Weekday::Monday => "Monday",
			Weekday::Tuesday => "Tuesday",
			Weekday::Wednesday => "Wednesday",
			Weekday::Thursday => "Thursday",
			Weekday::Friday => "Friday",
			Weekday::Saturday => "Saturday",
			Weekday::Sunday => "Sunday",
		}
	}
}

impl fmt::Display for Weekday {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.label())
	}
}

/// A subject taught at the school (`materia`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Subject {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub id: Option<i64>,
	#[serde(rename = "nome", default)]
	pub name: String,
	#[serde(rename = "professores", default)]
	pub professors: Vec<Professor>,
	#[serde(rename = "horarios", default)]
	pub schedules: Vec<Schedule>,
}

impl Subject {
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			..Default::default()
		}
	}

	/// Minimal `{id, name}` value used when another entity refers to a subject
	pub fn reference(id: i64, name: impl Into<String>) -> Self {
		Self {
			id: Some(id),
			name: name.into(),
			..Default::default()
		}
	}
}

impl Entity for Subject {
	const ENDPOINT: &'static str = "materia";

	fn id(&self) -> Option<i64> {
		self.id
	}

	fn set_id(&mut self, id: i64) {
		self.id = Some(id);
	}

	fn validate(&self) -> Result<(), ValidationError> {
		require_name(&self.name)
	}
}

/// A professor and the subjects they can teach (`professor`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Professor {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub id: Option<i64>,
	#[serde(rename = "nome", default)]
	pub name: String,
	#[serde(rename = "materias", default)]
	pub subjects: Vec<Subject>,
	#[serde(rename = "horarios", default)]
	pub schedules: Vec<Schedule>,
}

impl Professor {
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			..Default::default()
		}
	}

	pub fn reference(id: i64, name: impl Into<String>) -> Self {
		Self {
			id: Some(id),
			name: name.into(),
			..Default::default()
		}
	}

	/// Whether this professor is registered to teach `subject_id`
	pub fn teaches(&self, subject_id: i64) -> bool {
		self.subjects.iter().any(|s| s.id == Some(subject_id))
	}
}

impl Entity for Professor {
	const ENDPOINT: &'static str = "professor";

	fn id(&self) -> Option<i64> {
		self.id
	}

	fn set_id(&mut self, id: i64) {
		self.id = Some(id);
	}

	fn validate(&self) -> Result<(), ValidationError> {
		require_name(&self.name)
	}
}

/// A class (group of students) and its weekly timetable (`turma`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchoolClass {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub id: Option<i64>,
	#[serde(rename = "nome", default)]
	pub name: String,
	#[serde(rename = "horarios", default)]
	pub schedules: Vec<Schedule>,
}

impl SchoolClass {
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			..Default::default()
		}
	}
}

impl Entity for SchoolClass {
	const ENDPOINT: &'static str = "turma";

	fn id(&self) -> Option<i64> {
		self.id
	}

	fn set_id(&mut self, id: i64) {
		self.id = Some(id);
	}

	fn validate(&self) -> Result<(), ValidationError> {
		require_name(&self.name)?;
		self.schedules.iter().try_for_each(Schedule::validate)
	}
}

/// One weekly time slot (`horario`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub id: Option<i64>,
	#[serde(rename = "dia_da_semana")]
	pub weekday: Weekday,
	/// Start time, `HH:MM`
	#[serde(rename = "hora")]
	pub time: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub professor: Option<Box<Professor>>,
	#[serde(rename = "materia", default, skip_serializing_if = "Option::is_none")]
	pub subject: Option<Box<Subject>>,
	#[serde(rename = "turma", default, skip_serializing_if = "Option::is_none")]
	pub class: Option<Box<SchoolClass>>,
}

impl Entity for Schedule {
	const ENDPOINT: &'static str = "horario";

	fn id(&self) -> Option<i64> {
		self.id
	}

	fn set_id(&mut self, id: i64) {
		self.id = Some(id);
	}

	fn validate(&self) -> Result<(), ValidationError> {
		if self.time.is_empty() {
			return Err(ValidationError::required("hora"));
		}
		if !is_valid_time(&self.time) {
			return Err(ValidationError::invalid("hora", "expected HH:MM"));
		}
		Ok(())
	}
}
