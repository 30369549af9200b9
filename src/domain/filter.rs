// src/domain/filter.rs

use crate::auth::PrincipalId;
use crate::domain::report::Report;

/// Ownership restriction applied once after a fetch.
///
/// Guests see every report. A signed-in principal only sees the reports they
/// filed themselves.
pub fn apply_visibility(all: &[Report], principal: Option<&PrincipalId>) -> Vec<Report> {
    match principal {
        None => all.to_vec(),
        Some(p) => all
            .iter()
            .filter(|r| r.reported_by == p.as_str())
            .cloned()
            .collect(),
    }
}

/// Case-insensitive substring match on species or last-seen address.
/// A blank query returns the input unchanged; otherwise the query is matched
/// as typed, surrounding whitespace included.
pub fn apply_search(reports: &[Report], query: &str) -> Vec<Report> {
    if query.trim().is_empty() {
        return reports.to_vec();
    }
    let needle = query.to_lowercase();

    reports
        .iter()
        .filter(|r| {
            r.species.to_lowercase().contains(&needle)
                || r.last_seen_address.to_lowercase().contains(&needle)
        })
        .cloned()
        .collect()
}

/// What the listing shows: the fetched collection plus the current subset.
#[derive(Debug, Default)]
pub struct ReportFeed {
    all: Vec<Report>,
    displayed: Vec<Report>,
}

impl ReportFeed {
    /// Start from a fresh fetch; the displayed set is the visibility subset.
    pub fn load(all: Vec<Report>, principal: Option<&PrincipalId>) -> Self {
        let displayed = apply_visibility(&all, principal);
        Self { all, displayed }
    }

    /// Re-filter from the full fetched collection on every query change.
    pub fn search(&mut self, query: &str) -> &[Report] {
        self.displayed = apply_search(&self.all, query);
        &self.displayed
    }

    pub fn displayed(&self) -> &[Report] {
        &self.displayed
    }
}
