//! Presentation component state
//!
//! Each component keeps what a renderer needs and turns user interaction
//! into values the page controllers understand, mostly
//! [`ListChange`](crate::controllers::ListChange)s.

pub mod calendar;
pub mod filter;
pub mod form;
pub mod pagination;
pub mod table;
pub mod text;

pub use calendar::{CalendarDay, CalendarSize, CalendarState};
pub use filter::TableFilter;
pub use form::{DataForm, FieldRule, FormError, FormField, FormMode};
pub use pagination::{PAGE_SIZE_OPTIONS, Pagination};
pub use table::{DataTable, TableActions, TableRow};
