//! Staff filter criteria over ticket records.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Filter value meaning "match any".
pub const WILDCARD: &str = "All";

/// Match rule for an enum-like text field (category or priority).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldMatch {
    #[default]
    Any,
    Exactly(String),
}

impl FieldMatch {
    /// Interpret a raw filter value. [`WILDCARD`] and empty input match any
    /// value; everything else must match exactly.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.is_empty() || raw == WILDCARD {
            FieldMatch::Any
        } else {
            FieldMatch::Exactly(raw.to_string())
        }
    }

    pub fn matches(&self, value: &str) -> bool {
        match self {
            FieldMatch::Any => true,
            FieldMatch::Exactly(expected) => expected == value,
        }
    }
}

/// Criteria for the staff view. Built per request, never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    /// First calendar date to keep (inclusive). `None` = unbounded.
    pub from: Option<NaiveDate>,
    /// Last calendar date to keep (inclusive). `None` = unbounded.
    pub to: Option<NaiveDate>,
    pub category: FieldMatch,
    pub priority: FieldMatch,
    /// Free-text term, matched case-insensitively as a substring.
    pub search: String,
}

impl FilterCriteria {
    /// Criteria that keep every record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep records dated within `[from, to]`.
    pub fn with_date_range(mut self, from: NaiveDate, to: NaiveDate) -> Self {
        self.from = Some(from);
        self.to = Some(to);
        self
    }

    /// Keep records dated on or after `from`.
    pub fn with_from(mut self, from: NaiveDate) -> Self {
        self.from = Some(from);
        self
    }

    /// Keep records dated on or before `to`.
    pub fn with_to(mut self, to: NaiveDate) -> Self {
        self.to = Some(to);
        self
    }

    /// Filter by category (`"All"` for any).
    pub fn with_category(mut self, category: &str) -> Self {
        self.category = FieldMatch::parse(category);
        self
    }

    /// Filter by priority (`"All"` for any).
    pub fn with_priority(mut self, priority: &str) -> Self {
        self.priority = FieldMatch::parse(priority);
        self
    }

    /// Filter by free text.
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    /// Whether any date bound is set.
    pub fn has_date_range(&self) -> bool {
        self.from.is_some() || self.to.is_some()
    }

    /// Lowercased search term with surrounding whitespace removed, or `None`
    /// when there is nothing to search for.
    pub fn search_term(&self) -> Option<String> {
        let term = self.search.trim();
        (!term.is_empty()).then(|| term.to_lowercase())
    }
}
