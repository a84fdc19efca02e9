//! Listing filters for reports, triage decisions and alerts.
//!
//! Each query owns its filter predicate and its ordering so every repository
//! implementation lists the same way. Orderings compare sort keys only;
//! repositories break ties by insertion order, reversed for descending
//! listings, so equal keys come back newest-inserted first.

use hive_core::domain::{Alert, AlertStatus, Category, Report, ReportStatus, TriageDecision, TriageOutcome};
use hive_core::query::MAX_PAGE_SIZE;
use hive_core::{HiveError, PageRequest, ReportId, Result, SortDirection};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Sort key for report listings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportSort {
    /// Submission time
    #[default]
    CreatedAt,
    /// Category spelling
    Category,
    /// Status spelling
    Status,
}

/// Report listing: optional status/category filters, sorted, paginated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportQuery {
    /// Only reports in this status
    pub status: Option<ReportStatus>,
    /// Only reports in this category
    pub category: Option<Category>,
    /// Sort key
    pub sort: ReportSort,
    /// Sort direction
    pub direction: SortDirection,
    /// Page to return
    pub page: PageRequest,
}

impl ReportQuery {
    /// Restrict to one status.
    #[must_use]
    pub fn with_status(mut self, status: ReportStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Restrict to one category.
    #[must_use]
    pub fn with_category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    /// Choose the sort key and direction.
    #[must_use]
    pub fn sorted_by(mut self, sort: ReportSort, direction: SortDirection) -> Self {
        self.sort = sort;
        self.direction = direction;
        self
    }

    /// Select a page.
    #[must_use]
    pub fn with_page(mut self, page: PageRequest) -> Self {
        self.page = page;
        self
    }

    /// Check the page bounds.
    pub fn validate(&self) -> Result<()> {
        self.page.validate()
    }

    /// Whether an item passes every filter.
    pub fn matches(&self, report: &Report) -> bool {
        self.status.map_or(true, |s| report.status == s)
            && self.category.map_or(true, |c| report.category == c)
    }

    /// Ascending comparison on the sort key. Enumerations compare by their
    /// persisted spelling.
    pub fn compare(&self, a: &Report, b: &Report) -> Ordering {
        match self.sort {
            ReportSort::CreatedAt => a.created_at.cmp(&b.created_at),
            ReportSort::Category => a.category.as_str().cmp(b.category.as_str()),
            ReportSort::Status => a.status.as_str().cmp(b.status.as_str()),
        }
    }
}

/// Triage decision listing, newest first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TriageQuery {
    /// Only decisions on this report
    pub report_id: Option<ReportId>,
    /// Only decisions with this outcome
    pub decision: Option<TriageOutcome>,
    /// Page to return
    pub page: PageRequest,
}

impl TriageQuery {
    /// Every decision on one report
    pub fn for_report(report_id: ReportId) -> Self {
        Self {
            report_id: Some(report_id),
            ..Self::default()
        }
    }

    /// Restrict to one outcome.
    #[must_use]
    pub fn with_decision(mut self, decision: TriageOutcome) -> Self {
        self.decision = Some(decision);
        self
    }

    /// Select a page.
    #[must_use]
    pub fn with_page(mut self, page: PageRequest) -> Self {
        self.page = page;
        self
    }

    /// Check the page bounds.
    pub fn validate(&self) -> Result<()> {
        self.page.validate()
    }

    /// Whether an item passes every filter.
    pub fn matches(&self, decision: &TriageDecision) -> bool {
        self.report_id.map_or(true, |id| decision.report_id == id)
            && self.decision.map_or(true, |d| decision.decision == d)
    }

    /// Ascending by decision time; listings use the reverse.
    pub fn compare(a: &TriageDecision, b: &TriageDecision) -> Ordering {
        a.decided_at.cmp(&b.decided_at)
    }
}

/// Alert listing, newest created first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertQuery {
    /// Only alerts in this status
    pub status: Option<AlertStatus>,
    /// Page to return
    pub page: PageRequest,
}

impl AlertQuery {
    /// Alerts in one status.
    pub fn with_status(status: AlertStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    /// Select a page.
    #[must_use]
    pub fn with_page(mut self, page: PageRequest) -> Self {
        self.page = page;
        self
    }

    /// Check the page bounds.
    pub fn validate(&self) -> Result<()> {
        self.page.validate()
    }

    /// Whether an item passes every filter.
    pub fn matches(&self, alert: &Alert) -> bool {
        self.status.map_or(true, |s| alert.status == s)
    }

    /// Ascending by creation time; listings use the reverse.
    pub fn compare(a: &Alert, b: &Alert) -> Ordering {
        a.created_at.cmp(&b.created_at)
    }

    /// Ascending by publish time for the active-alert feed.
    pub fn compare_published(a: &Alert, b: &Alert) -> Ordering {
        a.published_at.cmp(&b.published_at)
    }
}

/// Check an active-alert limit against the page bounds.
pub fn validate_limit(limit: usize) -> Result<()> {
    if limit == 0 || limit > MAX_PAGE_SIZE as usize {
        return Err(HiveError::validation(
            "limit",
            format!("must be between 1 and {MAX_PAGE_SIZE}"),
        ));
    }
    Ok(())
}

/// Stable sort of `(insertion_index, item)` pairs by `cmp`, with ties
/// broken by insertion index; the whole order flips for descending.
pub fn order_by<T>(
    items: &mut [(usize, T)],
    direction: SortDirection,
    cmp: impl Fn(&T, &T) -> Ordering,
) {
    items.sort_by(|(ia, a), (ib, b)| {
        let ord = cmp(a, b).then(ia.cmp(ib));
        match direction {
            SortDirection::Asc => ord,
            SortDirection::Desc => ord.reverse(),
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_by_breaks_ties_by_insertion() {
        let mut items = vec![(0, 5), (1, 3), (2, 5), (3, 1)];
        order_by(&mut items, SortDirection::Desc, |a: &i32, b: &i32| a.cmp(b));
        assert_eq!(items, vec![(2, 5), (0, 5), (1, 3), (3, 1)]);

        order_by(&mut items, SortDirection::Asc, |a: &i32, b: &i32| a.cmp(b));
        assert_eq!(items, vec![(3, 1), (1, 3), (0, 5), (2, 5)]);
    }

    #[test]
    fn test_limit_bounds() {
        assert!(validate_limit(0).is_err());
        assert!(validate_limit(1).is_ok());
        assert!(validate_limit(101).is_err());
    }

    #[test]
    fn test_report_query_defaults() {
        let query: ReportQuery = serde_json::from_str(r#"{"category":"scam_phishing"}"#).unwrap();
        assert_eq!(query.sort, ReportSort::CreatedAt);
        assert_eq!(query.direction, SortDirection::Desc);
        assert_eq!(query.page, PageRequest::default());
        assert_eq!(query.category, Some(Category::ScamPhishing));
    }
}
