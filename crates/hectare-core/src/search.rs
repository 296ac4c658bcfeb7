use crate::models::{PropertyRecord, PropertyStatus};
use tracing::debug;

/// Free-text query, trimmed and lowercased once up front
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    needle: String,
}

impl SearchQuery {
    pub fn new(raw: &str) -> Self {
        Self {
            needle: raw.trim().to_lowercase(),
        }
    }

    /// Empty or whitespace-only input means "no search"
    pub fn is_empty(&self) -> bool {
        self.needle.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.needle
    }

    /// Substring match over internal id, address and owner address
    ///
    /// An empty query matches everything.
    pub fn matches(&self, record: &PropertyRecord) -> bool {
        if self.is_empty() {
            return true;
        }

        [
            record.internal_id.as_str(),
            record.address.as_str(),
            record.owner_address.as_str(),
        ]
        .iter()
        .any(|field| field.to_lowercase().contains(&self.needle))
    }
}

/// Search records by free text
///
/// Stable filter: results keep input order. A blank query returns every
/// record rather than nothing, so the dashboards all behave the same way.
pub fn search<'a>(records: &'a [PropertyRecord], query: &str) -> Vec<&'a PropertyRecord> {
    let query = SearchQuery::new(query);

    let results: Vec<_> = records.iter().filter(|r| query.matches(r)).collect();
    debug!(
        "search '{}' matched {} of {} records",
        query.as_str(),
        results.len(),
        records.len()
    );
    results
}

/// Structured selection used by the dashboard views
///
/// Every field that is set must match. The default filter keeps everything.
#[derive(Debug, Clone, Default)]
pub struct PropertyFilter {
    pub query: SearchQuery,
    pub status: Option<PropertyStatus>,
    pub lga: Option<String>,
    pub owner: Option<String>,
    pub min_value: Option<u64>,
    pub max_value: Option<u64>,
}

impl PropertyFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_query(mut self, query: &str) -> Self {
        self.query = SearchQuery::new(query);
        self
    }

    pub fn with_status(mut self, status: PropertyStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_lga(mut self, lga: impl Into<String>) -> Self {
        self.lga = Some(lga.into());
        self
    }

    pub fn with_owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = Some(owner.into());
        self
    }

    pub fn with_value_range(mut self, min: Option<u64>, max: Option<u64>) -> Self {
        self.min_value = min;
        self.max_value = max;
        self
    }

    pub fn matches(&self, record: &PropertyRecord) -> bool {
        if !self.query.matches(record) {
            return false;
        }

        if let Some(status) = self.status {
            if record.status != status {
                return false;
            }
        }

        if let Some(lga) = &self.lga {
            match &record.lga {
                Some(record_lga) if record_lga.eq_ignore_ascii_case(lga) => {}
                _ => return false,
            }
        }

        if let Some(owner) = &self.owner {
            if !record.owner_address.eq_ignore_ascii_case(owner) {
                return false;
            }
        }

        if let Some(min) = self.min_value {
            if record.estimated_value < min {
                return false;
            }
        }

        if let Some(max) = self.max_value {
            if record.estimated_value > max {
                return false;
            }
        }

        true
    }

    /// Apply to a record slice, preserving order
    pub fn apply<'a>(&self, records: &'a [PropertyRecord]) -> Vec<&'a PropertyRecord> {
        let results: Vec<_> = records.iter().filter(|r| self.matches(r)).collect();
        debug!(
            "filter {:?} kept {} of {} records",
            self,
            results.len(),
            records.len()
        );
        results
    }
}
