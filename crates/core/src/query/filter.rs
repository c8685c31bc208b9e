//! Filtering, ordering and facet options for ticket views.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::Serialize;

use super::criteria::{FilterCriteria, WILDCARD};
use crate::ticket::{TicketRecord, CATEGORIES, PRIORITIES};

/// Earliest and latest submission dates in a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateBounds {
    pub min: NaiveDate,
    pub max: NaiveDate,
}

/// Apply `criteria` to `records` and order the result newest first.
///
/// Predicates run in order: date range, category, priority, free text.
/// Records with an unknown timestamp never satisfy a date bound. The sort
/// is stable, so records with equal timestamps keep their snapshot order,
/// and records with unknown timestamps come last.
pub fn filter_records(records: &[TicketRecord], criteria: &FilterCriteria) -> Vec<TicketRecord> {
    let search = criteria.search_term();

    let mut view: Vec<TicketRecord> = records
        .iter()
        .filter(|r| within_dates(r, criteria))
        .filter(|r| criteria.category.matches(&r.category))
        .filter(|r| criteria.priority.matches(&r.priority))
        .filter(|r| search.as_deref().is_none_or(|term| matches_text(r, term)))
        .cloned()
        .collect();

    view.sort_by(newest_first);
    view
}

fn within_dates(record: &TicketRecord, criteria: &FilterCriteria) -> bool {
    if !criteria.has_date_range() {
        return true;
    }
    let Some(date) = record.date() else {
        return false;
    };
    criteria.from.is_none_or(|from| date >= from) && criteria.to.is_none_or(|to| date <= to)
}

fn matches_text(record: &TicketRecord, term: &str) -> bool {
    record
        .searchable_fields()
        .iter()
        .any(|field| field.to_lowercase().contains(term))
}

fn newest_first(a: &TicketRecord, b: &TicketRecord) -> Ordering {
    match (a.timestamp, b.timestamp) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Date range spanned by the snapshot, used to seed the default filter.
/// Falls back to `today` for both ends when no record carries a timestamp.
pub fn compute_date_bounds(records: &[TicketRecord], today: NaiveDate) -> DateBounds {
    let mut dates = records.iter().filter_map(TicketRecord::date);
    let Some(first) = dates.next() else {
        return DateBounds {
            min: today,
            max: today,
        };
    };

    dates.fold(
        DateBounds {
            min: first,
            max: first,
        },
        |bounds, date| DateBounds {
            min: bounds.min.min(date),
            max: bounds.max.max(date),
        },
    )
}

/// Category filter choices: the wildcard, then every known or stored
/// category in sorted order.
pub fn category_options(records: &[TicketRecord]) -> Vec<String> {
    options(CATEGORIES, records.iter().map(|r| r.category.as_str()))
}

/// Priority filter choices, built like [`category_options`].
pub fn priority_options(records: &[TicketRecord]) -> Vec<String> {
    options(PRIORITIES, records.iter().map(|r| r.priority.as_str()))
}

fn options<'a, const N: usize>(
    known: [&'a str; N],
    seen: impl Iterator<Item = &'a str>,
) -> Vec<String> {
    let values: BTreeSet<&str> = known
        .into_iter()
        .chain(seen)
        .filter(|value| !value.is_empty() && *value != WILDCARD)
        .collect();

    std::iter::once(WILDCARD)
        .chain(values)
        .map(str::to_string)
        .collect()
}

/// Distinct attachment names referenced by `records`, sorted.
pub fn attachment_names(records: &[TicketRecord]) -> Vec<String> {
    records
        .iter()
        .filter(|r| r.has_attachment())
        .map(|r| r.attachment_file.as_str())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}
