//! Query filters for collection reads
//!
//! A `Filter` is an open-ended set of query parameters that the API client
//! forwards verbatim. Stores use it to scope a refresh to one cycle.

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Filter(BTreeMap<String, String>);

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter scoped to a single cycle
    pub fn for_cycle(cycle_id: i64) -> Self {
        Self::new().cycle_id(cycle_id)
    }

    /// Scope to `cycle_id` when known, otherwise unfiltered
    pub fn for_optional_cycle(cycle_id: Option<i64>) -> Self {
        cycle_id.map(Self::for_cycle).unwrap_or_default()
    }

    /// Add an arbitrary parameter, replacing any previous value for `key`
    pub fn with(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.0.insert(key.into(), value.to_string());
        self
    }

    pub fn cycle_id(self, cycle_id: i64) -> Self {
        self.with("cycle_id", cycle_id)
    }

    pub fn day_of_week(self, day: u8) -> Self {
        self.with("day_of_week", day)
    }

    pub fn date(self, date: NaiveDate) -> Self {
        self.with("date", date.format("%Y-%m-%d"))
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("(all)");
        }
        let parts: Vec<String> = self.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
        f.write_str(&parts.join("&"))
    }
}
