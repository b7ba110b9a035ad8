//! Forecast errors and their JSON error envelope.

use crate::city::City;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::Value;

/// Message used when the upstream gives no usable one.
pub const FALLBACK_UPSTREAM_MESSAGE: &str = "無法取得天氣資料";

/// Errors from fetching and reshaping a forecast.
#[derive(Debug, thiserror::Error)]
pub enum ForecastError {
    #[error("API_KEY not set")]
    MissingApiKey,

    #[error("no forecast data for {0}")]
    NotFound(City),

    #[error("CWA API error (status {status}): {message}")]
    Upstream {
        status: u16,
        message: String,
        details: Value,
    },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid dataset payload: {0}")]
    Decode(#[from] serde_json::Error),
}

pub type ForecastResult<T> = std::result::Result<T, ForecastError>;

impl ForecastError {
    /// Build an upstream error from a non-success status and its raw body.
    ///
    /// The body is kept as JSON when it parses, otherwise as a JSON string.
    pub fn upstream(status: u16, body: &[u8]) -> Self {
        let details = serde_json::from_slice::<Value>(body)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(body).into_owned()));
        let message = details
            .get("message")
            .and_then(Value::as_str)
            .filter(|m| !m.is_empty())
            .unwrap_or(FALLBACK_UPSTREAM_MESSAGE)
            .to_string();

        ForecastError::Upstream {
            status,
            message,
            details,
        }
    }

    /// HTTP status this error is reported with.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ForecastError::MissingApiKey => StatusCode::INTERNAL_SERVER_ERROR,
            ForecastError::NotFound(_) => StatusCode::NOT_FOUND,
            ForecastError::Upstream { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            ForecastError::Http(_) | ForecastError::Decode(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Client-facing envelope for this error.
    pub fn body(&self) -> ErrorBody {
        match self {
            ForecastError::MissingApiKey => {
                ErrorBody::new("伺服器設定錯誤").with_message("請設定 API_KEY 環境變數")
            }
            ForecastError::NotFound(city) => {
                ErrorBody::new("查無資料").with_message(format!("無法取得{}天氣資料", city))
            }
            ForecastError::Upstream {
                message, details, ..
            } => ErrorBody::new("CWA API 錯誤")
                .with_message(message.clone())
                .with_details(details.clone()),
            ForecastError::Http(_) | ForecastError::Decode(_) => {
                ErrorBody::new("伺服器錯誤").with_message("無法取得天氣資料，請稍後再試")
            }
        }
    }
}

impl IntoResponse for ForecastError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self.body())).into_response()
    }
}

/// JSON error envelope shared by every failing endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorBody {
    /// Error category
    pub error: String,
    /// Human-readable explanation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Upstream payload, passed through untouched
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: None,
            details: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }
}
