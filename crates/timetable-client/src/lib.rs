//! Resource client for the timetable REST backend
//!
//! [`Resource`] is the capability page controllers depend on. It is
//! implemented by [`ResourceClient`], which talks HTTP to the backend, and by
//! [`MemoryResource`], an in-process store used by tests and offline demos.
//!
//! Every failure leaving this crate is an [`ApiError`](timetable_types::ApiError)
//! carrying only the user-facing message; the details are logged where the
//! failure happens.
//!
//! ## Example
//!
//! ```no_run
//! use timetable_client::{ApiClient, Resource};
//! use timetable_types::{ListQuery, Subject};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let api = ApiClient::new("http://127.0.0.1:5000/api")?;
//! let subjects = api.resource::<Subject>();
//! let page = subjects.fetch_page(&ListQuery::default()).await?;
//! println!("{} subjects", page.total_items);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod error;
pub mod memory;
pub mod resource;

pub use client::{ApiClient, ResourceClient};
pub use error::ClientError;
pub use memory::MemoryResource;
pub use resource::{DynResource, Resource};
