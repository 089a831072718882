use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    Success,
    Error,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ApiResponse<T> {
    pub status: ResponseStatus,
    pub payload: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(payload: T) -> Self {
        Self {
            status: ResponseStatus::Success,
            payload,
        }
    }
}

/// Pagination details reported beside a listing payload.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub total_pages: u64,
    pub prev_page: Option<u64>,
    pub next_page: Option<u64>,
    pub page: u64,
    pub has_prev_page: bool,
    pub has_next_page: bool,
    pub prev_link: Option<String>,
    pub next_link: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PagedResponse<T> {
    pub status: ResponseStatus,
    pub payload: Vec<T>,
    #[serde(flatten)]
    pub page: PageInfo,
}

impl<T: Serialize> PagedResponse<T> {
    pub fn success(payload: Vec<T>, page: PageInfo) -> Self {
        Self {
            status: ResponseStatus::Success,
            payload,
            page,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub status: ResponseStatus,
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            status: ResponseStatus::Error,
            error: error.into(),
        }
    }
}
