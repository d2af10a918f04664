//! Client-side table filter with debounced input

use futures_signals::signal::{Mutable, MutableSignalCloned};
use parking_lot::Mutex;
use serde::Serialize;
use serde_json::Value;
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

/// Delay between the last keystroke and applying the filter
pub const DEBOUNCE: Duration = Duration::from_millis(300);

struct Entry<T> {
	item: T,
	json: Value,
}

struct FilterInner<T> {
	properties: Vec<String>,
	debounce: Duration,
	entries: Mutex<Vec<Entry<T>>>,
	pending: Mutex<Option<JoinHandle<()>>>,
	value: Mutable<String>,
	loading: Mutable<bool>,
	filtered: Mutable<Vec<T>>,
}

impl<T> FilterInner<T>
where
	T: Serialize + Clone + Send + Sync + 'static,
{
	fn apply(&self, needle: &str) {
		let filtered: Vec<T> = {
			let entries = self.entries.lock();
			if self.properties.is_empty() {
				entries.iter().map(|e| e.item.clone()).collect()
			} else {
				entries
					.iter()
					.filter(|e| self.matches(&e.json, needle))
					.map(|e| e.item.clone())
					.collect()
			}
		};
		tracing::debug!(filter = needle, matches = filtered.len(), "table filter applied");
		self.filtered.set(filtered);
		self.loading.set_neq(false);
	}

	fn matches(&self, json: &Value, needle: &str) -> bool {
		let needle = needle.to_lowercase();
		self.properties.iter().any(|path| {
			nested_value(json, path)
				.map(value_text)
				.is_some_and(|text| text.to_lowercase().contains(&needle))
		})
	}

	fn abort_pending(&self) {
		if let Some(handle) = self.pending.lock().take() {
			handle.abort();
		}
	}
}

impl<T> Drop for FilterInner<T> {
	fn drop(&mut self) {
		if let Some(handle) = self.pending.get_mut().take() {
			handle.abort();
		}
	}
}

/// Filters an in-memory item list on a set of (possibly nested) properties
///
/// Property paths are dot-separated, e.g. `"professor.nome"`. Matching is a
/// case-insensitive substring test; an item matches when any property does.
/// Without properties every item passes.
pub struct TableFilter<T> {
	inner: Arc<FilterInner<T>>,
}

impl<T> Clone for TableFilter<T> {
	fn clone(&self) -> Self {
		Self {
			inner: Arc::clone(&self.inner),
		}
	}
}

impl<T> TableFilter<T>
where
	T: Serialize + Clone + Send + Sync + 'static,
{
	pub fn new<I, S>(properties: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self::with_debounce(properties, DEBOUNCE)
	}

	pub fn with_debounce<I, S>(properties: I, debounce: Duration) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self {
			inner: Arc::new(FilterInner {
				properties: properties.into_iter().map(Into::into).collect(),
				debounce,
				entries: Mutex::new(Vec::new()),
				pending: Mutex::new(None),
				value: Mutable::new(String::new()),
				loading: Mutable::new(false),
				filtered: Mutable::new(Vec::new()),
			}),
		}
	}

	/// Replace the source items and re-apply the current filter
	pub fn set_data(&self, items: impl IntoIterator<Item = T>) {
		let entries = items
			.into_iter()
			.map(|item| Entry {
				json: serde_json::to_value(&item).unwrap_or(Value::Null),
				item,
			})
			.collect();
		*self.inner.entries.lock() = entries;
		self.inner.apply(&self.inner.value.get_cloned());
	}

	/// Handle a keystroke; returns the lower-cased filter value
	///
	/// The filter is applied once no further input arrived for the debounce
	/// delay. Outside of a tokio runtime it is applied immediately.
	pub fn on_input(&self, raw: &str) -> String {
		let value = raw.to_lowercase();
		self.inner.value.set(value.clone());
		self.inner.loading.set_neq(true);
		self.inner.abort_pending();

		match Handle::try_current() {
			Ok(runtime) => {
				let inner: Weak<FilterInner<T>> = Arc::downgrade(&self.inner);
				let needle = value.clone();
				let debounce = self.inner.debounce;
				let handle = runtime.spawn(async move {
					tokio::time::sleep(debounce).await;
					if let Some(inner) = inner.upgrade() {
						inner.apply(&needle);
					}
				});
				*self.inner.pending.lock() = Some(handle);
			}
			Err(_) => self.inner.apply(&value),
		}
		value
	}

	/// Drop the filter and show every item again; returns the empty filter value
	pub fn clear(&self) -> String {
		self.inner.abort_pending();
		self.inner.value.set(String::new());
		self.inner.apply("");
		String::new()
	}

	pub fn value(&self) -> String {
		self.inner.value.get_cloned()
	}

	pub fn is_loading(&self) -> bool {
		self.inner.loading.get()
	}

	pub fn filtered(&self) -> Vec<T> {
		self.inner.filtered.get_cloned()
	}

	pub fn filtered_signal(&self) -> MutableSignalCloned<Vec<T>> {
		self.inner.filtered.signal_cloned()
	}
}

/// Follow a dot-separated path through nested objects
pub fn nested_value<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
	path.split('.')
		.try_fold(value, |current, part| current.get(part))
		.filter(|v| !v.is_null())
}

fn value_text(value: &Value) -> String {
	match value {
		Value::String(s) => s.clone(),
		other => other.to_string(),
	}
}
