//! # Record Filter
//!
//! The `role`/`username` query pair shared by listing and statistics.
//! When `role` is `leader`, only records whose `teamLeader` equals `username`
//! are kept. This is a data filter, not an access check.

use super::record::Record;

/// Role value that switches the leader filter on
pub const LEADER_ROLE: &str = "leader";

const ROLE_PARAM: &str = "role";
const USERNAME_PARAM: &str = "username";

/// Optional role/username restriction
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordFilter {
    pub role: Option<String>,
    pub username: Option<String>,
}

impl RecordFilter {
    /// No restriction
    pub fn all() -> Self {
        Self::default()
    }

    /// Restrict to records owned by `username`
    pub fn leader(username: impl Into<String>) -> Self {
        Self {
            role: Some(LEADER_ROLE.to_string()),
            username: Some(username.into()),
        }
    }

    /// Build a filter from decoded query pairs.
    ///
    /// A repeated key keeps its first non-empty value; blank values and
    /// unknown keys are ignored.
    pub fn from_query_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut filter = Self::default();
        for (key, value) in pairs {
            if value.is_empty() {
                continue;
            }
            let slot = match key.as_str() {
                ROLE_PARAM => &mut filter.role,
                USERNAME_PARAM => &mut filter.username,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value);
            }
        }
        filter
    }

    fn is_leader(&self) -> bool {
        self.role.as_deref() == Some(LEADER_ROLE)
    }

    /// Whether a record passes the filter
    pub fn matches(&self, record: &Record) -> bool {
        if !self.is_leader() {
            return true;
        }
        // A missing username compares as the empty string
        let username = self.username.as_deref().unwrap_or("");
        record.team_leader() == Some(username)
    }

    /// Keep matching records, preserving order
    pub fn apply(&self, records: Vec<Record>) -> Vec<Record> {
        if !self.is_leader() {
            return records;
        }
        records.into_iter().filter(|r| self.matches(r)).collect()
    }
}
