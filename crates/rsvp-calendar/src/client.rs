//! JSON-over-HTTP implementation of the remote create primitive.

use std::time::Duration;

use reqwest::StatusCode;
use rsvp_core::{AuthError, Config, ConfigError, NetworkError, ReqwestErrorExt};
use serde::Deserialize;
use tracing::instrument;

use crate::error::ServiceError;
use crate::response::{CreateItemRequest, CreateItemService};
use crate::retry::{with_retry, RetryConfig};
use crate::types::RemoteItem;

const CREATE_ITEM_PATH: &str = "/items/create";
const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum ResponseClass {
    Success,
    Warning,
    Error,
}

/// Body returned by the create endpoint.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateItemResponse {
    pub response_class: ResponseClass,
    pub response_code: Option<String>,
    pub message_text: Option<String>,
    #[serde(default)]
    pub items: Vec<RemoteItem>,
}

pub struct HttpItemService {
    client: reqwest::Client,
    access_token: Option<String>,
    base_url: String,
    retry: RetryConfig,
}

impl HttpItemService {
    pub fn new(base_url: &str, access_token: Option<&str>) -> Self {
        Self {
            client: reqwest::Client::new(),
            access_token: access_token.map(str::to_string),
            base_url: base_url.trim_end_matches('/').to_string(),
            retry: RetryConfig::default(),
        }
    }

    /// Build a service from the user's configuration.
    ///
    /// # Errors
    ///
    /// Returns `Config` if the HTTP client cannot be built from the settings.
    pub fn from_config(config: &Config) -> Result<Self, ServiceError> {
        let mut builder = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.service.request_timeout_secs));

        if cfg!(debug_assertions) && config.service.allow_invalid_certs {
            tracing::warn!("Accepting invalid certificates for {}", config.service.endpoint_url);
            builder = builder.danger_accept_invalid_certs(true);
        }

        let client = builder
            .build()
            .map_err(|e| ConfigError::Invalid(format!("HTTP client: {}", e)))?;

        Ok(Self {
            client,
            access_token: config.service.access_token.clone(),
            base_url: config.service.endpoint_url.trim_end_matches('/').to_string(),
            retry: RetryConfig::from(&config.retry),
        })
    }

    pub fn with_retry_config(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    #[instrument(
        skip(self, request),
        level = "info",
        fields(disposition = ?request.message_disposition, kind = ?request.item.kind)
    )]
    async fn post_create(&self, request: &CreateItemRequest) -> Result<Vec<RemoteItem>, ServiceError> {
        let url = format!("{}{}", self.base_url, CREATE_ITEM_PATH);

        let response = with_retry(&self.retry, || {
            let mut builder = self.client.post(&url).json(request);
            if let Some(token) = &self.access_token {
                builder = builder.bearer_auth(token);
            }
            builder.send()
        })
        .await
        .map_err(|e| ServiceError::Network(e.into_network_error()))?;

        let body = self.handle_response(response).await?;
        into_items(body)
    }

    async fn handle_response(
        &self,
        response: reqwest::Response,
    ) -> Result<CreateItemResponse, ServiceError> {
        let status = response.status();

        if status.is_success() {
            return response
                .json()
                .await
                .map_err(|e| {
                    ServiceError::from(NetworkError::InvalidResponse(format!(
                        "JSON parse error: {}",
                        e
                    )))
                });
        }

        match status {
            StatusCode::UNAUTHORIZED => Err(AuthError::TokenExpired.into()),
            StatusCode::FORBIDDEN => Err(AuthError::AccessDenied.into()),
            StatusCode::NOT_FOUND => {
                let text = response.text().await.unwrap_or_default();
                Err(ServiceError::ItemNotFound(text))
            }
            StatusCode::TOO_MANY_REQUESTS => {
                let retry_after = response
                    .headers()
                    .get("Retry-After")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(DEFAULT_RETRY_AFTER_SECS);
                Err(ServiceError::RateLimited(retry_after))
            }
            _ => {
                let text = response.text().await.unwrap_or_default();
                Err(NetworkError::ServerError {
                    status: status.as_u16(),
                    message: text,
                }
                .into())
            }
        }
    }
}

fn into_items(body: CreateItemResponse) -> Result<Vec<RemoteItem>, ServiceError> {
    match body.response_class {
        ResponseClass::Success => Ok(body.items),
        ResponseClass::Warning => {
            tracing::warn!(
                code = body.response_code.as_deref().unwrap_or("unknown"),
                "Create completed with warning: {}",
                body.message_text.as_deref().unwrap_or("")
            );
            Ok(body.items)
        }
        ResponseClass::Error => {
            let code = body.response_code.unwrap_or_else(|| "ErrorInternalServerError".to_string());
            let message = body.message_text.unwrap_or_default();
            if code == "ErrorItemNotFound" {
                Err(ServiceError::ItemNotFound(message))
            } else {
                Err(ServiceError::Fault { code, message })
            }
        }
    }
}

impl CreateItemService for HttpItemService {
    async fn create_item(&self, request: CreateItemRequest) -> Result<Vec<RemoteItem>, ServiceError> {
        self.post_create(&request).await
    }
}
