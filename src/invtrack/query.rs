//! Listing parameters: name filter plus skip/limit pagination.
//!
//! A [`ListQuery`] is what a caller hands in (raw, possibly out of range);
//! a [`Page`] is the checked form the store paginates with.

use crate::error::{InvError, Result};
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

pub const DEFAULT_LIMIT: usize = 100;
pub const MAX_LIMIT: usize = 1000;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skip: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Page {
    limit: usize,
    skip: usize,
    name: Option<Regex>,
}

impl Default for Page {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            skip: 0,
            name: None,
        }
    }
}

impl Page {
    pub fn from_query(query: &ListQuery) -> Result<Self> {
        let limit = match query.limit {
            None => DEFAULT_LIMIT,
            Some(limit) if (1..=MAX_LIMIT as i64).contains(&limit) => limit as usize,
            Some(limit) => {
                return Err(InvError::InvalidArgument(format!(
                    "limit {} is outside 1..={}",
                    limit, MAX_LIMIT
                )))
            }
        };
        let skip = match query.skip {
            None => 0,
            Some(skip) => usize::try_from(skip)
                .map_err(|_| InvError::InvalidArgument(format!("skip {} was < 0", skip)))?,
        };
        let name = match query.name.as_deref() {
            None | Some("") => None,
            Some(pattern) => Some(
                RegexBuilder::new(pattern)
                    .case_insensitive(true)
                    .build()
                    .map_err(|e| {
                        InvError::InvalidArgument(format!("name pattern {:?}: {}", pattern, e))
                    })?,
            ),
        };
        Ok(Self { limit, skip, name })
    }

    /// True when `name` passes the filter (always, if there is none).
    pub fn matches(&self, name: &str) -> bool {
        self.name.as_ref().map_or(true, |re| re.is_match(name))
    }

    pub fn skip(&self) -> usize {
        self.skip
    }

    pub fn limit(&self) -> usize {
        self.limit
    }
}
