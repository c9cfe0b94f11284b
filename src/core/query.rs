//! Query parameters shared by the stores: pagination, sort direction and
//! keyword matching

use regex::{Regex, RegexBuilder};
use serde::Deserialize;
use validator::Validate;

use crate::core::error::ValidationError;

/// Raw `page`/`size` query parameters
///
/// Signed so that `page=0` or `page=-3` reach validation instead of failing
/// to parse.
///
/// # Example
/// ```rust,ignore
/// GET /trucks/page?page=2&size=3
/// ```
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PageQuery {
    #[validate(range(min = 1, message = "page must be at least 1"))]
    pub page: i64,

    #[validate(range(min = 1, message = "size must be at least 1"))]
    pub size: i64,
}

impl PageQuery {
    /// Validate and convert into a [`PageRequest`]
    pub fn into_request(self) -> Result<PageRequest, ValidationError> {
        self.validate()?;
        // both are >= 1 once validated
        Ok(PageRequest {
            page: self.page.unsigned_abs(),
            size: self.size.unsigned_abs(),
        })
    }
}

/// A validated 1-indexed page window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u64,
    size: u64,
}

impl PageRequest {
    /// Build a page window; both `page` and `size` must be at least 1
    pub fn new(page: i64, size: i64) -> Result<Self, ValidationError> {
        PageQuery { page, size }.into_request()
    }

    pub fn page(&self) -> u64 {
        self.page
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    /// Number of records to skip: `(page - 1) * size`
    pub fn skip(&self) -> u64 {
        (self.page - 1).saturating_mul(self.size)
    }
}

/// Direction for `sortByCapacity`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn from_desc(desc: bool) -> Self {
        if desc {
            SortDirection::Descending
        } else {
            SortDirection::Ascending
        }
    }

    /// MongoDB sort order value (`1` / `-1`)
    pub fn as_order(&self) -> i32 {
        match self {
            SortDirection::Ascending => 1,
            SortDirection::Descending => -1,
        }
    }
}

/// `?desc=` on the sort route, `false` when omitted
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SortQuery {
    #[serde(default)]
    pub desc: bool,
}

/// Escape a search keyword so it is matched literally
pub fn escape_keyword(keyword: &str) -> String {
    regex::escape(keyword)
}

/// Case-insensitive literal substring matcher for a search keyword
///
/// Fails only when the keyword exceeds the regex size limit.
pub fn keyword_pattern(keyword: &str) -> Result<Regex, regex::Error> {
    RegexBuilder::new(&escape_keyword(keyword))
        .case_insensitive(true)
        .build()
}
