//! Client for the category/budget service that owns the raw spending data.

use std::time::Duration;

use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{error, info};

use crate::date_utils::MonthPeriod;
use crate::error::{AppError, AppResult};
use crate::models::{Budget, Category};

pub const CORRELATION_HEADER: &str = "X-Correlation-Id";

const BUDGET_SERVICE: &str = "Budget";
const CATEGORY_SERVICE: &str = "Category";

/// Per-request values forwarded to the budgeting service.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    /// Raw bearer token of the caller, forwarded as-is.
    pub auth_token: Option<String>,
    pub correlation_id: Option<String>,
}

#[derive(Debug, Clone)]
pub struct UpstreamClient {
    client: Client,
    base_url: Url,
}

impl UpstreamClient {
    pub fn new(base_url: &str, timeout: Duration) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))?;
        let base_url = Url::parse(base_url).map_err(|e| {
            AppError::Internal(format!("Invalid category/budget service URL {}: {}", base_url, e))
        })?;

        Ok(Self { client, base_url })
    }

    pub async fn fetch_budgets(
        &self,
        user_id: &str,
        month: &MonthPeriod,
        ctx: &RequestContext,
    ) -> AppResult<Vec<Budget>> {
        let mut url = self.user_url(user_id, "budgets")?;
        url.query_pairs_mut().append_pair("month", &month.to_string());
        self.get_json(BUDGET_SERVICE, url, ctx).await
    }

    pub async fn fetch_categories(
        &self,
        user_id: &str,
        ctx: &RequestContext,
    ) -> AppResult<Vec<Category>> {
        let url = self.user_url(user_id, "categories")?;
        self.get_json(CATEGORY_SERVICE, url, ctx).await
    }

    fn user_url(&self, user_id: &str, resource: &str) -> AppResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                AppError::Internal(format!("Cannot build paths on {}", self.base_url))
            })?
            .pop_if_empty()
            .extend([user_id, resource]);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        service: &'static str,
        url: Url,
        ctx: &RequestContext,
    ) -> AppResult<T> {
        let correlation_id = ctx.correlation_id.as_deref().unwrap_or_default();
        info!(
            correlation_id = %correlation_id,
            url = %url,
            method = "GET",
            "Requesting {} data",
            service.to_lowercase()
        );

        let mut request = self.client.get(url.clone());
        if let Some(id) = &ctx.correlation_id {
            request = request.header(CORRELATION_HEADER, id);
        }
        if let Some(token) = &ctx.auth_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|e| {
            error!(correlation_id = %correlation_id, url = %url, method = "GET", error = %e, "{} service unreachable", service);
            AppError::Upstream {
                service,
                status: None,
                detail: e.to_string(),
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let detail = error_detail(status.as_u16(), &body);
            error!(
                correlation_id = %correlation_id,
                url = %url,
                method = "GET",
                status_code = status.as_u16(),
                detail = %detail,
                "{} service error",
                service
            );
            return Err(AppError::Upstream {
                service,
                status: Some(status.as_u16()),
                detail,
            });
        }

        response.json::<T>().await.map_err(|e| {
            error!(correlation_id = %correlation_id, url = %url, error = %e, "{} service returned an unreadable body", service);
            AppError::Upstream {
                service,
                status: None,
                detail: format!("Invalid response body: {}", e),
            }
        })
    }
}

/// Best human-readable explanation of a failed upstream response: the
/// `detail` field of a JSON object body, else the raw body, else the status.
pub fn error_detail(status: u16, body: &str) -> String {
    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(map)) => match map.get("detail") {
            Some(Value::String(detail)) => detail.clone(),
            Some(other) => other.to_string(),
            None => body.to_string(),
        },
        _ if !body.is_empty() => body.to_string(),
        _ => format!("Status code: {}", status),
    }
}
