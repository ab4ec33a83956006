use indexmap::IndexMap;
use tracing::warn;

use crate::header::{HeaderValues, normalize_key, sanitize_name, sanitize_value};

/// A single header: display name plus its ordered values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderEntry {
    name: String,
    values: Vec<String>,
}

impl HeaderEntry {
    /// The display name, with the casing it was stored with.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// All values joined with `", "`.
    pub fn line(&self) -> String {
        self.values.join(", ")
    }
}

/// Ordered, case-insensitive multi-value header container.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderBag {
    entries: IndexMap<String, HeaderEntry>,
}

impl HeaderBag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct header names.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in first-insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &HeaderEntry> {
        self.entries.values()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(&normalize_key(&sanitize_name(name)))
    }

    /// The values stored under `name`, empty if absent.
    pub fn get(&self, name: &str) -> &[String] {
        self.entries.get(&normalize_key(&sanitize_name(name))).map(HeaderEntry::values).unwrap_or_default()
    }

    /// The values stored under `name` joined with `", "`, empty if absent.
    pub fn get_line(&self, name: &str) -> String {
        self.get(name).join(", ")
    }

    /// Replaces all values under `name`, storing `name`'s casing as the display name.
    ///
    /// An existing entry keeps its position in the enumeration order.
    pub fn set(&mut self, name: &str, value: impl HeaderValues) {
        let Some(name) = Self::checked_name(name) else {
            return;
        };

        let entry = HeaderEntry { name: name.clone(), values: Self::checked_values(value) };
        self.entries.insert(normalize_key(&name), entry);
    }

    /// Appends values under `name`; the display name of an existing entry is kept.
    pub fn add(&mut self, name: &str, value: impl HeaderValues) {
        let Some(name) = Self::checked_name(name) else {
            return;
        };

        let values = Self::checked_values(value);
        self.entries
            .entry(normalize_key(&name))
            .and_modify(|entry| entry.values.extend_from_slice(&values))
            .or_insert_with(|| HeaderEntry { name, values });
    }

    /// Removes `name` if present, keeping the order of the remaining entries.
    pub fn remove(&mut self, name: &str) {
        self.entries.shift_remove(&normalize_key(&sanitize_name(name)));
    }

    /// Sets `name` and moves it to the first position.
    pub fn set_first(&mut self, name: &str, value: impl HeaderValues) {
        let Some(name) = Self::checked_name(name) else {
            return;
        };

        let key = normalize_key(&name);
        self.entries.shift_remove(&key);
        self.entries.shift_insert(0, key, HeaderEntry { name, values: Self::checked_values(value) });
    }

    fn checked_name(name: &str) -> Option<String> {
        let sanitized = sanitize_name(name);
        if sanitized.is_empty() {
            warn!(name = ?name, "header name is empty after sanitizing, ignored");
            return None;
        }
        Some(sanitized)
    }

    fn checked_values(value: impl HeaderValues) -> Vec<String> {
        value.into_header_values().iter().map(|value| sanitize_value(value)).collect()
    }
}

impl<'a> IntoIterator for &'a HeaderBag {
    type Item = &'a HeaderEntry;
    type IntoIter = indexmap::map::Values<'a, String, HeaderEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.values()
    }
}
