use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

use crate::{dto::fields::parse_bool, models::Product};

/// Raw query string of `GET /api/products`. Values stay strings so that
/// garbage falls back to defaults instead of rejecting the request; see
/// [`ProductQuery::from_query`].
#[derive(Debug, Default, Clone, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ProductQuery {
    /// Page size, default 10.
    pub limit: Option<String>,
    /// Page number, default 1, clamped to the last page.
    pub page: Option<String>,
    /// `asc` or `desc`, by price.
    pub sort: Option<String>,
    pub category: Option<String>,
    /// `true` or `false`.
    pub status: Option<String>,
    /// `status:<bool>`, `category:<value>`, or a bare category.
    pub query: Option<String>,
}

impl ProductQuery {
    /// Reads a raw query string. Unknown keys are ignored and a repeated key
    /// keeps its first value, the same one the pagination links rewrite.
    pub fn from_query(raw: Option<&str>) -> Self {
        let mut query = Self::default();
        let Some(raw) = raw else {
            return query;
        };
        for (key, value) in url::form_urlencoded::parse(raw.as_bytes()) {
            let slot = match key.as_ref() {
                "limit" => &mut query.limit,
                "page" => &mut query.page,
                "sort" => &mut query.sort,
                "category" => &mut query.category,
                "status" => &mut query.status,
                "query" => &mut query.query,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into_owned());
            }
        }
        query
    }

    pub fn pagination(&self) -> Pagination {
        Pagination::from_raw(self.page.as_deref(), self.limit.as_deref())
    }

    pub fn sort_order(&self) -> Option<SortOrder> {
        self.sort.as_deref().and_then(SortOrder::parse)
    }

    /// Explicit `category`/`status` win; `query` is only read when neither is set.
    pub fn filter(&self) -> ProductFilter {
        let status = self.status.as_deref().and_then(parse_bool);
        let category = self.category.clone().filter(|c| !c.is_empty());
        let mut filter = ProductFilter { category, status };

        if filter.category.is_none() && filter.status.is_none() {
            if let Some(q) = self.query.as_deref().filter(|q| !q.is_empty()) {
                if let Some(raw) = q.strip_prefix("status:") {
                    filter.status = parse_bool(first_segment(raw));
                } else if let Some(raw) = q.strip_prefix("category:") {
                    filter.category = Some(first_segment(raw).to_string());
                } else {
                    filter.category = Some(q.to_string());
                }
            }
        }
        filter
    }
}

fn first_segment(raw: &str) -> &str {
    raw.split(':').next().unwrap_or_default()
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ProductFilter {
    pub category: Option<String>,
    pub status: Option<bool>,
}

impl ProductFilter {
    pub fn is_empty(&self) -> bool {
        self.category.is_none() && self.status.is_none()
    }

    pub fn matches(&self, product: &Product) -> bool {
        self.category.as_ref().is_none_or(|c| &product.category == c)
            && self.status.is_none_or(|s| product.status == s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "asc" => Some(SortOrder::Asc),
            "desc" => Some(SortOrder::Desc),
            _ => None,
        }
    }
}

/// Requested page and page size, both at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: u64,
    pub limit: u64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            limit: Pagination::DEFAULT_LIMIT,
        }
    }
}

impl Pagination {
    pub const DEFAULT_LIMIT: u64 = 10;

    pub fn new(page: u64, limit: u64) -> Self {
        Self {
            page: page.max(1),
            limit: limit.max(1),
        }
    }

    /// Missing, zero or unparseable values take the default; negative ones
    /// become 1.
    pub fn from_raw(page: Option<&str>, limit: Option<&str>) -> Self {
        let page = parse_or(page, 1);
        let limit = parse_or(limit, Self::DEFAULT_LIMIT as i64);
        Self::new(page.max(1) as u64, limit.max(1) as u64)
    }

    /// Resolves the request against `total` matching records, clamping the
    /// page to the last one.
    pub fn window(&self, total: u64) -> PageWindow {
        let total_pages = total.div_ceil(self.limit).max(1);
        PageWindow {
            total,
            limit: self.limit,
            page: self.page.min(total_pages),
            total_pages,
        }
    }
}

fn parse_or(raw: Option<&str>, default: i64) -> i64 {
    match raw.and_then(leading_int) {
        Some(0) | None => default,
        Some(n) => n,
    }
}

/// Integer prefix of `raw` (`"12abc"` is 12, `"2.5"` is 2).
fn leading_int(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    let (sign, digits) = match raw.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, raw.strip_prefix('+').unwrap_or(raw)),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    digits[..end].parse::<i64>().ok().map(|n| sign * n)
}

/// A resolved page over `total` records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub total: u64,
    pub limit: u64,
    pub page: u64,
    pub total_pages: u64,
}

impl PageWindow {
    pub fn offset(&self) -> usize {
        ((self.page - 1) * self.limit) as usize
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    pub fn prev_page(&self) -> Option<u64> {
        self.has_prev().then(|| self.page - 1)
    }

    pub fn next_page(&self) -> Option<u64> {
        self.has_next().then(|| self.page + 1)
    }
}
