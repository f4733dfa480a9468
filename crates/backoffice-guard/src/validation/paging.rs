use serde::{Deserialize, Serialize};

use super::issue::{Issue, IssueKind};
use super::rejection::RequestRejection;
use super::result::ValidationResult;

pub const DEFAULT_PAGE: usize = 0;
pub const DEFAULT_SIZE: usize = 20;
pub const MAX_SIZE: usize = 100;

/// Raw listing parameters as they arrive on a query string.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct PageQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
}

/// Validated zero-based page window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Page {
    pub page: usize,
    pub size: usize,
}

impl Page {
    pub fn normalize(query: PageQuery) -> Result<Self, RequestRejection> {
        let page = query.page.unwrap_or(DEFAULT_PAGE as i64);
        let size = query.size.unwrap_or(DEFAULT_SIZE as i64);
        let mut result = ValidationResult::new();

        if page < 0 {
            result.push(Issue::error(IssueKind::Shape, "page", "page must be >= 0"));
        }
        if size < 1 || size > MAX_SIZE as i64 {
            result.push(
                Issue::error(
                    IssueKind::Shape,
                    "size",
                    format!("size must be between 1 and {MAX_SIZE}"),
                )
                .with_meta("maxSize", MAX_SIZE),
            );
        }

        result.into_outcome()?;
        Ok(Self {
            page: page as usize,
            size: size as usize,
        })
    }

    pub fn offset(&self) -> usize {
        self.page.saturating_mul(self.size)
    }
}

impl Default for Page {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            size: DEFAULT_SIZE,
        }
    }
}
