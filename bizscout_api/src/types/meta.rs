use serde::{Deserialize, Serialize};

/// Paging block attached to Apollo search responses.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct Pagination {
    #[serde(default)]
    pub page: i64,
    #[serde(default)]
    pub per_page: i64,
    #[serde(default)]
    pub total_entries: i64,
    #[serde(default)]
    pub total_pages: i64,
}

/// Envelope used by the LinkedIn proxy: `{ "data": ... }`.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Response<T> {
    pub data: T,
}
