//! REST API envelope types

use serde::Deserialize;

/// Standard response envelope.
#[derive(Debug, Deserialize)]
pub struct RestEnvelope<T> {
    #[serde(default = "default_success")]
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
    #[serde(default)]
    pub errors: Vec<RestFieldError>,
    pub pagination: Option<RestPagination>,
}

fn default_success() -> bool {
    true
}

/// Error body; every field optional because proxies answer with arbitrary JSON.
#[derive(Debug, Default, Deserialize)]
pub struct RestErrorBody {
    pub message: Option<String>,
    pub error: Option<String>,
    #[serde(default)]
    pub errors: Vec<RestFieldError>,
}

/// Field-level validation error.
#[derive(Debug, Deserialize)]
pub struct RestFieldError {
    #[serde(alias = "path", alias = "param")]
    pub field: Option<String>,
    #[serde(alias = "msg")]
    pub message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestPagination {
    pub page: u32,
    #[serde(alias = "pageSize", alias = "perPage")]
    pub limit: u32,
    #[serde(alias = "totalCount", alias = "totalItems")]
    pub total: u32,
}
