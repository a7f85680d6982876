//! Listing filters, the sort safelist resolver, and pagination metadata.

use serde::Serialize;

use crate::validator::{permitted_value, Validator};

/// Largest page number a client may request.
pub const MAX_PAGE: i64 = 10_000_000;

/// Largest page size a client may request.
pub const MAX_PAGE_SIZE: i64 = 100;

/// Default page size when the client does not supply one.
pub const DEFAULT_PAGE_SIZE: i64 = 20;

/// Pagination and sorting parameters for a listing request.
///
/// `sort_safelist` is supplied by the endpoint, never by the client. Only a
/// value found verbatim in it may reach an `ORDER BY` clause.
#[derive(Debug, Clone)]
pub struct Filters {
    pub page: i64,
    pub page_size: i64,
    pub sort: String,
    pub sort_safelist: &'static [&'static str],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

impl Filters {
    /// Column name for `ORDER BY`, with any leading `-` removed.
    ///
    /// # Panics
    ///
    /// Panics if `sort` is not in the safelist. [`validate_filters`] rejects
    /// such values, so reaching this means validation was skipped.
    pub fn sort_column(&self) -> &str {
        if permitted_value(self.sort.as_str(), self.sort_safelist) {
            return self.sort.trim_start_matches('-');
        }
        panic!("unsafe sort parameter: {}", self.sort);
    }

    pub fn sort_direction(&self) -> SortDirection {
        if self.sort.starts_with('-') {
            SortDirection::Desc
        } else {
            SortDirection::Asc
        }
    }

    pub fn limit(&self) -> i64 {
        self.page_size
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.page_size
    }
}

/// Check the page bounds and that `sort` is in the safelist.
pub fn validate_filters(v: &mut Validator, filters: &Filters) {
    v.check(filters.page > 0, "page", "must be greater than zero");
    v.check(filters.page <= MAX_PAGE, "page", "must be a maximum of 10 million");
    v.check(filters.page_size > 0, "page_size", "must be greater than zero");
    v.check(
        filters.page_size <= MAX_PAGE_SIZE,
        "page_size",
        "must be a maximum of 100",
    );
    v.check(
        permitted_value(filters.sort.as_str(), filters.sort_safelist),
        "sort",
        "invalid sort value",
    );
}

/// Pagination summary for one page of a listing.
///
/// An empty listing carries no pagination context: every field is zero and
/// the value serializes as `{}`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Metadata {
    #[serde(skip_serializing_if = "is_zero")]
    pub current_page: i64,
    #[serde(skip_serializing_if = "is_zero")]
    pub page_size: i64,
    #[serde(skip_serializing_if = "is_zero")]
    pub first_page: i64,
    #[serde(skip_serializing_if = "is_zero")]
    pub last_page: i64,
    #[serde(skip_serializing_if = "is_zero")]
    pub total_records: i64,
}

fn is_zero(n: &i64) -> bool {
    *n == 0
}

impl Metadata {
    /// Build metadata from the total row count the listing query observed.
    pub fn calculate(total_records: i64, page: i64, page_size: i64) -> Self {
        if total_records == 0 {
            return Self::default();
        }
        Self {
            current_page: page,
            page_size,
            first_page: 1,
            last_page: (total_records + page_size - 1) / page_size,
            total_records,
        }
    }
}
