//! Status filter and search box of the artist applications screen
//!
//! The screen keeps a pending set of status filters next to the committed
//! query (`status=a,b&query=text`). Toggling only touches the pending set;
//! applying, clearing or submitting a search rewrites the query, and the
//! pending set is always re-derived from the query afterwards.

use std::collections::BTreeSet;

use crate::api::ApplicationStatus;

const STATUS_KEY: &str = "status";
const SEARCH_KEY: &str = "query";

/// Ordered key / value pairs of a url query string
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Replace the first occurrence of `key` (dropping the rest) or append it
    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        let value = value.into();
        match self.pairs.iter().position(|(k, _)| k == key) {
            Some(i) => {
                self.pairs[i].1 = value;
                let mut seen = 0;
                self.pairs.retain(|(k, _)| {
                    if k == key {
                        seen += 1;
                        seen == 1
                    } else {
                        true
                    }
                });
            }
            None => self.pairs.push((key.to_string(), value)),
        }
    }

    pub fn remove(&mut self, key: &str) {
        self.pairs.retain(|(k, _)| k != key);
    }

    pub fn to_query_string(&self) -> String {
        serde_urlencoded::to_string(&self.pairs).unwrap_or_default()
    }
}

#[derive(Clone, Debug, Default)]
pub struct ApplicationFilter {
    /// Pending selection in the filter menu
    pub active: BTreeSet<ApplicationStatus>,
    /// Text in the search box
    pub search: String,
    /// Committed query the list is fetched with
    pub query: QueryParams,
    /// Highlighted entry in the filter menu
    pub menu_cursor: usize,
}

impl ApplicationFilter {
    pub fn toggle(&mut self, status: ApplicationStatus) {
        if !self.active.remove(&status) {
            self.active.insert(status);
        }
    }

    pub fn toggle_at_cursor(&mut self) {
        if let Some(status) = ApplicationStatus::ALL.get(self.menu_cursor).copied() {
            self.toggle(status);
        }
    }

    pub fn is_active(&self, status: ApplicationStatus) -> bool {
        self.active.contains(&status)
    }

    /// Commit the pending set; the search term is kept.
    pub fn apply(&mut self) -> String {
        if self.active.is_empty() {
            self.query.remove(STATUS_KEY);
        } else {
            let joined = self
                .active
                .iter()
                .map(|s| s.as_str())
                .collect::<Vec<_>>()
                .join(",");
            self.query.set(STATUS_KEY, joined);
        }
        self.sync_from_query();
        self.query_string()
    }

    pub fn clear(&mut self) -> String {
        self.active.clear();
        self.search.clear();
        self.query = QueryParams::default();
        self.query_string()
    }

    /// Commit the search box; status filters are kept.
    pub fn submit_search(&mut self) -> String {
        let term = self.search.trim().to_string();
        if term.is_empty() {
            self.query.remove(SEARCH_KEY);
        } else {
            self.query.set(SEARCH_KEY, term);
        }
        self.sync_from_query();
        self.query_string()
    }

    /// Re-derive the pending set and search text from the committed query.
    /// Unknown status values are ignored.
    pub fn sync_from_query(&mut self) {
        self.active = self
            .query
            .get(STATUS_KEY)
            .map(parse_statuses)
            .unwrap_or_default();
        self.search = self.query.get(SEARCH_KEY).unwrap_or_default().to_string();
    }

    pub fn query_string(&self) -> String {
        self.query.to_query_string()
    }
}

fn parse_statuses(raw: &str) -> BTreeSet<ApplicationStatus> {
    raw.split(',')
        .filter(|s| !s.trim().is_empty())
        .filter_map(|s| s.parse().ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(raw: &str) -> QueryParams {
        QueryParams { pairs: serde_urlencoded::from_str(raw.trim_start_matches('?')).unwrap() }
    }

    fn filter_from(raw: &str) -> ApplicationFilter {
        let mut filter = ApplicationFilter { query: parse(raw), ..Default::default() };
        filter.sync_from_query();
        filter
    }

    #[test]
    fn test_toggle_does_not_touch_query() {
        let mut filter = ApplicationFilter::default();
        filter.toggle(ApplicationStatus::Pending);
        filter.toggle(ApplicationStatus::Reject);
        filter.toggle(ApplicationStatus::Pending);
        assert_eq!(filter.active, BTreeSet::from([ApplicationStatus::Reject]));
        assert!(filter.query_string().is_empty());
    }

    #[test]
    fn test_apply_then_parse_round_trips() {
        let mut filter = ApplicationFilter::default();
        filter.toggle(ApplicationStatus::Approve);
        filter.toggle(ApplicationStatus::Reject);
        let expected = filter.active.clone();

        let query = filter.apply();
        let reloaded = filter_from(&query);
        assert_eq!(reloaded.active, expected);
        assert_eq!(reloaded.query.get("status"), Some("approve,reject"));
    }

    #[test]
    fn test_apply_with_nothing_selected_removes_status() {
        let mut filter = filter_from("status=pending&query=neo");
        filter.toggle(ApplicationStatus::Pending);

        let query = filter.apply();
        assert_eq!(query, "query=neo");
        assert!(filter.active.is_empty());
        assert_eq!(filter.search, "neo");
    }

    #[test]
    fn test_clear_resets_everything() {
        let mut filter = filter_from("?status=pending,approve&query=neo");
        assert_eq!(filter.active.len(), 2);

        assert_eq!(filter.clear(), "");
        assert!(filter.active.is_empty());
        assert!(filter.search.is_empty());
        assert!(filter.query_string().is_empty());
    }

    #[test]
    fn test_search_keeps_status_and_blank_search_removes_key() {
        let mut filter = ApplicationFilter::default();
        filter.toggle(ApplicationStatus::Pending);
        filter.apply();

        filter.search = "  daft punk ".into();
        let query = filter.submit_search();
        let params = parse(&query);
        assert_eq!(params.get("status"), Some("pending"));
        assert_eq!(params.get("query"), Some("daft punk"));

        filter.search.clear();
        let query = filter.submit_search();
        assert_eq!(parse(&query).get("query"), None);
        assert!(filter.is_active(ApplicationStatus::Pending));
    }

    #[test]
    fn test_unknown_statuses_are_ignored() {
        let filter = filter_from("status=archived,reject,");
        assert_eq!(filter.active, BTreeSet::from([ApplicationStatus::Reject]));
    }

    #[test]
    fn test_set_replaces_duplicates() {
        let mut params = parse("a=1&b=2&a=3");
        params.set("a", "9");
        assert_eq!(params.to_query_string(), "a=9&b=2");
    }
}
