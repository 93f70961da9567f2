//! REST request helpers

use reqwest::{Method, RequestBuilder};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{BackendError, Result};
use crate::http_client::HttpUtils;
use crate::traits::{BackendErrorMapper, ErrorContext, RawApiError};
use crate::types::{PaginatedResponse, PaginationParams};

use super::{MAX_PAGE_SIZE, RestBackend, RestEnvelope, RestErrorBody};

impl RestBackend {
    /// Request with auth and request-id headers.
    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{path}", self.base_url);
        let mut builder = self
            .client
            .request(method, url)
            .header("Accept", "application/json")
            .header("X-Request-Id", uuid::Uuid::new_v4().to_string());
        if let Some(token) = self.token.get() {
            builder = builder.bearer_auth(token);
        }
        builder
    }

    /// Send, check status and unwrap the envelope.
    async fn send<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
        method: &Method,
        path: &str,
        ctx: ErrorContext,
    ) -> Result<RestEnvelope<T>> {
        let (status, response_text) =
            HttpUtils::execute_request(builder, self.backend_name(), method.as_str(), path)
                .await?;

        if !(200..300).contains(&status) {
            return Err(self.error_from_body(status, &response_text, ctx));
        }

        let envelope: RestEnvelope<T> = HttpUtils::parse_json(&response_text, self.backend_name())?;
        if !envelope.success {
            let mut ctx = ctx;
            ctx.param = envelope.errors.first().and_then(|e| e.field.clone());
            let message = envelope
                .message
                .or_else(|| envelope.errors.into_iter().next().map(|e| e.message))
                .unwrap_or_default();
            log::warn!("[{}] API rejected {path}: {message}", self.backend_name());
            return Err(self.map_error(RawApiError::with_code(status.to_string(), message), ctx));
        }
        Ok(envelope)
    }

    fn error_from_body(&self, status: u16, response_text: &str, ctx: ErrorContext) -> BackendError {
        let body: RestErrorBody = serde_json::from_str(response_text).unwrap_or_default();
        let mut ctx = ctx;
        ctx.param = body.errors.first().and_then(|e| e.field.clone());
        let message = body
            .message
            .or(body.error)
            .or_else(|| body.errors.into_iter().next().map(|e| e.message))
            .unwrap_or_else(|| format!("HTTP {status}"));
        let err = self.map_error(RawApiError::with_code(status.to_string(), message), ctx);
        if err.is_expected() {
            log::warn!("{err}");
        } else {
            log::error!("{err}");
        }
        err
    }

    fn serialize<B: Serialize>(&self, body: &B) -> Result<String> {
        serde_json::to_string(body).map_err(|e| self.serialization_error(e))
    }

    async fn with_body<T: DeserializeOwned, B: Serialize>(
        &self,
        method: Method,
        path: &str,
        body: &B,
        ctx: ErrorContext,
    ) -> Result<RestEnvelope<T>> {
        let payload = self.serialize(body)?;
        let builder = self
            .request(method.clone(), path)
            .header("Content-Type", "application/json")
            .body(payload);
        self.send(builder, &method, path, ctx).await
    }

    fn require_data<T>(&self, envelope: RestEnvelope<T>) -> Result<T> {
        envelope
            .data
            .ok_or_else(|| self.parse_error("Missing data in response"))
    }

    // ==================== Verbs ====================

    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str, ctx: ErrorContext) -> Result<T> {
        let builder = self.request(Method::GET, path);
        let envelope = self.send(builder, &Method::GET, path, ctx).await?;
        self.require_data(envelope)
    }

    /// GET a list endpoint. `path` may already carry a query string.
    pub(crate) async fn get_page<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &PaginationParams,
    ) -> Result<PaginatedResponse<T>> {
        let params = params.validated(MAX_PAGE_SIZE);
        let sep = if path.contains('?') { '&' } else { '?' };
        let full_path = format!(
            "{path}{sep}page={}&limit={}",
            params.page, params.page_size
        );
        let builder = self.request(Method::GET, &full_path);
        let envelope: RestEnvelope<Vec<T>> = self
            .send(builder, &Method::GET, &full_path, ErrorContext::default())
            .await?;
        let items = envelope.data.unwrap_or_default();
        Ok(match envelope.pagination {
            Some(p) => PaginatedResponse::new(items, p.page, p.limit, p.total),
            None => {
                let total = u32::try_from(items.len()).unwrap_or(u32::MAX);
                PaginatedResponse::new(items, params.page, params.page_size, total)
            }
        })
    }

    pub(crate) async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
        ctx: ErrorContext,
    ) -> Result<T> {
        let envelope = self.with_body(Method::POST, path, body, ctx).await?;
        self.require_data(envelope)
    }

    pub(crate) async fn put<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
        ctx: ErrorContext,
    ) -> Result<T> {
        let envelope = self.with_body(Method::PUT, path, body, ctx).await?;
        self.require_data(envelope)
    }

    pub(crate) async fn patch<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
        ctx: ErrorContext,
    ) -> Result<T> {
        let envelope = self.with_body(Method::PATCH, path, body, ctx).await?;
        self.require_data(envelope)
    }

    pub(crate) async fn delete(&self, path: &str, ctx: ErrorContext) -> Result<()> {
        let builder = self.request(Method::DELETE, path);
        let _envelope: RestEnvelope<serde_json::Value> =
            self.send(builder, &Method::DELETE, path, ctx).await?;
        Ok(())
    }
}
