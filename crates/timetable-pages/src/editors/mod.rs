//! Entity-specific edit pages
//!
//! These extend [`EditController`](crate::controllers::EditController) with
//! option lists loaded from other resources: the subjects a professor can
//! teach, and the professors and subjects of a class timetable.

pub mod class_schedule;
pub mod professor;

pub use class_schedule::{ClassScheduleEditor, ScheduleRow};
pub use professor::ProfessorEditor;
