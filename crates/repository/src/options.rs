//! Typed option bag for repository queries.
//!
//! Every query object owns a [`QueryOptions`] side-table. Producers append
//! values under an [`OptionKey`] marker type; builders read them back with the
//! same marker. The query object itself never has to know which options exist,
//! which keeps builders and the conditions they understand fully decoupled.
//!
//! ```
//! use helios_repository::options::{OptionKey, QueryOptions};
//!
//! struct Tags;
//!
//! impl OptionKey for Tags {
//!     type Value = String;
//!     const NAME: &'static str = "@Tags";
//! }
//!
//! let mut options = QueryOptions::new();
//! options.add::<Tags>("red".to_string());
//! options.add::<Tags>("blue".to_string());
//!
//! assert_eq!(options.get_all::<Tags>(), ["red", "blue"]);
//! ```
//!
//! The bag is not internally synchronized. A query belongs to a single build
//! at a time; mutation requires `&mut` access and sharing across threads is
//! only possible through the caller's own synchronization.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;

/// Marker type identifying one ordered list of values in a [`QueryOptions`].
pub trait OptionKey: 'static {
    /// The value type stored under this key.
    type Value: Send + Sync + 'static;

    /// Human readable key name used in diagnostics.
    const NAME: &'static str;
}

struct Entry {
    name: &'static str,
    len: usize,
    values: Box<dyn Any + Send + Sync>,
}

/// Keyed, ordered multi-value store attached to a query object.
///
/// Absent keys behave exactly like keys holding an empty list: reads never
/// fail, they just return nothing.
#[derive(Default)]
pub struct QueryOptions {
    entries: HashMap<TypeId, Entry>,
}

impl QueryOptions {
    /// Creates an empty option bag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a value to the list stored under `K`, creating the list if needed.
    pub fn add<K: OptionKey>(&mut self, value: K::Value) {
        let entry = self.entries.entry(TypeId::of::<K>()).or_insert_with(|| Entry {
            name: K::NAME,
            len: 0,
            values: Box::new(Vec::<K::Value>::new()),
        });

        if let Some(values) = entry.values.downcast_mut::<Vec<K::Value>>() {
            values.push(value);
            entry.len = values.len();
        }
    }

    /// Appends every value from `values` under `K`.
    pub fn extend<K, I>(&mut self, values: I)
    where
        K: OptionKey,
        I: IntoIterator<Item = K::Value>,
    {
        for value in values {
            self.add::<K>(value);
        }
    }

    /// Returns the values stored under `K` in insertion order.
    ///
    /// Returns an empty slice when nothing was ever added for `K`.
    pub fn get_all<K: OptionKey>(&self) -> &[K::Value] {
        self.entries
            .get(&TypeId::of::<K>())
            .and_then(|entry| entry.values.downcast_ref::<Vec<K::Value>>())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Returns the most recently added value for `K`.
    ///
    /// Useful for single-valued options where the last write wins.
    pub fn get_last<K: OptionKey>(&self) -> Option<&K::Value> {
        self.get_all::<K>().last()
    }

    /// Returns true if at least one value is stored under `K`.
    pub fn contains<K: OptionKey>(&self) -> bool {
        !self.get_all::<K>().is_empty()
    }

    /// Removes and returns all values stored under `K`.
    pub fn remove<K: OptionKey>(&mut self) -> Vec<K::Value> {
        self.entries
            .remove(&TypeId::of::<K>())
            .and_then(|entry| entry.values.downcast::<Vec<K::Value>>().ok())
            .map(|values| *values)
            .unwrap_or_default()
    }

    /// Returns the number of distinct keys with stored values.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no option has been added.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the names of all keys with stored values.
    pub fn key_names(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = self.entries.values().map(|e| e.name).collect();
        names.sort_unstable();
        names
    }
}

impl fmt::Debug for QueryOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for entry in self.entries.values() {
            map.entry(&entry.name, &entry.len);
        }
        map.finish()
    }
}
