//! Page parameters and the "infinity" pagination envelope.

use serde::{Deserialize, Serialize};

use crate::errors::{AppError, Result};

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_LIMIT: i64 = 10;
/// Hard upper bound on rows per page, whatever the client asks for.
pub const MAX_LIMIT: i64 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageOptions {
    /// 1-indexed page number.
    pub page: i64,
    pub limit: i64,
}

impl PageOptions {
    /// Apply defaults, reject non-positive values and clamp `limit` to [`MAX_LIMIT`].
    pub fn from_query(page: Option<i64>, limit: Option<i64>) -> Result<Self> {
        let page = page.unwrap_or(DEFAULT_PAGE);
        let limit = limit.unwrap_or(DEFAULT_LIMIT);
        if page < 1 {
            return Err(AppError::Validation("page must be >= 1".to_string()));
        }
        if limit < 1 {
            return Err(AppError::Validation("limit must be >= 1".to_string()));
        }
        Ok(Self {
            page,
            limit: limit.min(MAX_LIMIT),
        })
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }
}

/// Uniform response shape for paginated listings.
///
/// `data` and `results` carry the same items. There is no `total`: the
/// envelope is built without a count query.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InfinityPage<T> {
    pub data: Vec<T>,
    pub has_next_page: bool,
    pub results: Vec<T>,
    pub page: i64,
    pub limit: i64,
}

/// Wrap one page of rows.
///
/// `has_next_page` is true whenever the page came back full. A full last page
/// therefore reports a next page that turns out empty.
pub fn infinity_pagination<T: Clone>(items: Vec<T>, options: PageOptions) -> InfinityPage<T> {
    let has_next_page = items.len() as i64 == options.limit;
    InfinityPage {
        results: items.clone(),
        data: items,
        has_next_page,
        page: options.page,
        limit: options.limit,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_absent() {
        let opts = PageOptions::from_query(None, None).unwrap();
        assert_eq!(opts, PageOptions { page: 1, limit: 10 });
        assert_eq!(opts.offset(), 0);
    }

    #[test]
    fn limit_above_max_is_clamped_to_exactly_max() {
        for requested in [51, 100, 1000, i64::MAX] {
            let opts = PageOptions::from_query(Some(1), Some(requested)).unwrap();
            assert_eq!(opts.limit, MAX_LIMIT);
        }
        let opts = PageOptions::from_query(Some(1), Some(50)).unwrap();
        assert_eq!(opts.limit, 50);
    }

    #[test]
    fn non_positive_page_or_limit_is_rejected() {
        assert!(PageOptions::from_query(Some(0), None).is_err());
        assert!(PageOptions::from_query(Some(-2), None).is_err());
        assert!(PageOptions::from_query(None, Some(0)).is_err());
    }

    #[test]
    fn offset_is_zero_based() {
        let opts = PageOptions::from_query(Some(3), Some(20)).unwrap();
        assert_eq!(opts.offset(), 40);
    }

    #[test]
    fn full_page_reports_next_page() {
        let opts = PageOptions { page: 2, limit: 3 };
        let page = infinity_pagination(vec![1, 2, 3], opts);
        assert!(page.has_next_page);
        assert_eq!(page.data, page.results);
        assert_eq!(page.page, 2);
        assert_eq!(page.limit, 3);
    }

    #[test]
    fn short_page_is_last() {
        let page = infinity_pagination(vec!["a"], PageOptions { page: 1, limit: 10 });
        assert!(!page.has_next_page);

        let empty: InfinityPage<u8> = infinity_pagination(vec![], PageOptions { page: 4, limit: 10 });
        assert!(!empty.has_next_page);
        assert!(empty.data.is_empty());
    }

    #[test]
    fn envelope_serializes_camel_case() {
        let page = infinity_pagination(vec![7], PageOptions { page: 1, limit: 1 });
        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(json["hasNextPage"], serde_json::json!(true));
        assert_eq!(json["results"], serde_json::json!([7]));
        assert!(json.get("total").is_none());
    }
}
