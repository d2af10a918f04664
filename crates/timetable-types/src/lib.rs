//! Shared types for the timetable admin
//!
//! This crate holds everything the HTTP layer and the page layer agree on:
//!
//! - [`Entity`]: the capability every backend resource implements
//! - Domain models: [`Subject`], [`Professor`], [`SchoolClass`], [`Schedule`]
//! - Pagination shapes: [`Page`], [`ListQuery`], [`TotalCount`]
//! - Errors: [`ApiError`] (normalised HTTP failure) and [`ValidationError`]
//!
//! Field names follow the backend's JSON contract on the wire while the Rust
//! side uses English names.
//!
//! ## Example
//!
//! ```
//! use timetable_types::{Entity, Subject};
//!
//! let subject = Subject::new("Calculus");
//! assert_eq!(Subject::ENDPOINT, "materia");
//! assert!(subject.validate().is_ok());
//! ```

pub mod entity;
pub mod errors;
pub mod models;
pub mod page;

pub use entity::Entity;
pub use errors::{
	ApiError, ApiErrorKind, ApiResult, CONNECTION_ERROR_MESSAGE, UNKNOWN_ERROR_MESSAGE,
	ValidationError,
};
pub use models::{Professor, Schedule, SchoolClass, Subject, Weekday, is_valid_time};
pub use page::{DEFAULT_PAGE_SIZE, ListQuery, Page, TotalCount};
