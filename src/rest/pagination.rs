use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_LIMIT: i64 = 10;

/// Normalised page/limit pair. Both are always at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pagination {
    page: i64,
    limit: i64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl Pagination {
    /// Non-positive values fall back to the defaults
    pub fn new(page: i64, limit: i64) -> Self {
        Self {
            page: if page > 0 { page } else { DEFAULT_PAGE },
            limit: if limit > 0 { limit } else { DEFAULT_LIMIT },
        }
    }

    pub fn page(&self) -> i64 {
        self.page
    }

    pub fn limit(&self) -> i64 {
        self.limit
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }
}

/// `?page=&limit=` as sent by clients
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PaginationQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl PaginationQuery {
    /// Missing or non-positive values take the defaults; limit is capped at `max_limit`.
    pub fn resolve(self, default_limit: i64, max_limit: i64) -> Pagination {
        let default_limit = if default_limit > 0 { default_limit } else { DEFAULT_LIMIT };
        let limit = self
            .limit
            .filter(|limit| *limit > 0)
            .unwrap_or(default_limit)
            .min(max_limit.max(1));

        Pagination::new(self.page.unwrap_or(DEFAULT_PAGE), limit)
    }
}

/// Input to `Responder::pagination`
#[derive(Debug, Clone)]
pub struct PaginationParams<T> {
    pub data: Vec<T>,
    pub total_data: i64,
    pub pagination: Option<Pagination>,
}

/// Nested under `result` of a paginated response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaginationResult<T> {
    pub data: Vec<T>,
    pub total_data: i64,
    pub page: i64,
    pub total_page: i64,
}

impl<T> PaginationParams<T> {
    /// `total_page` is `total_data / limit` with truncating division, so a
    /// partially filled last page is not counted.
    pub fn into_result(self) -> PaginationResult<T> {
        let pagination = self.pagination.unwrap_or_else(|| {
            tracing::info!("proceeding with default pagination value");
            Pagination::default()
        });

        if self.total_data == 0 {
            tracing::info!("proceeding with 0 total_data");
        }

        PaginationResult {
            data: self.data,
            total_data: self.total_data,
            page: pagination.page,
            total_page: self.total_data / pagination.limit,
        }
    }
}
