//! HTTP server: info and health endpoints, the weather routes, CORS and
//! catch-all error handling.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use std::any::Any;
use std::sync::Arc;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;

use crate::api::weather_router;
use crate::city::City;
use crate::error::ErrorBody;
use crate::upstream::ForecastSource;

/// JSON response for `GET /`
#[derive(Debug, Serialize)]
pub struct ServiceInfo {
    pub message: String,
    pub version: String,
    pub description: String,
    pub endpoints: Endpoints,
}

/// Public paths listed by `GET /`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Endpoints {
    pub taipei: String,
    pub new_taipei: String,
    pub taoyuan: String,
    pub taichung: String,
    pub tainan: String,
    pub kaohsiung: String,
    pub health: String,
}

/// JSON response for `GET /api/health`
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
}

/// GET / - Service description
async fn service_info() -> Json<ServiceInfo> {
    Json(ServiceInfo {
        message: "歡迎使用 CWA 天氣預報 API".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        description: "提供台灣六都 36 小時天氣預報".to_string(),
        endpoints: Endpoints {
            taipei: City::Taipei.endpoint(),
            new_taipei: City::NewTaipei.endpoint(),
            taoyuan: City::Taoyuan.endpoint(),
            taichung: City::Taichung.endpoint(),
            tainan: City::Tainan.endpoint(),
            kaohsiung: City::Kaohsiung.endpoint(),
            health: "/api/health".to_string(),
        },
    })
}

/// GET /api/health - Liveness check, never touches the upstream
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK".to_string(),
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    })
}

async fn not_found() -> (StatusCode, Json<ErrorBody>) {
    (StatusCode::NOT_FOUND, Json(ErrorBody::new("找不到此路徑")))
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "Unknown panic message".to_string()
    };

    log::error!("Handler panicked: {}", message);

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorBody::new("伺服器錯誤").with_message(message)),
    )
        .into_response()
}

/// Wrap routes with the 404 fallback, panic handler and CORS.
fn finish(router: Router) -> Router {
    // CORS layer to allow browser clients on any origin
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods(tower_http::cors::Any)
        .allow_headers(tower_http::cors::Any);

    router
        .fallback(not_found)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(cors)
}

/// Create the full application router
pub fn create_router<S: ForecastSource>(source: Arc<S>) -> Router {
    let routes = Router::new()
        .route("/", get(service_info))
        .route("/api/health", get(health_check))
        .nest("/api/weather", weather_router(source));

    finish(routes)
}

/// Run the HTTP server until `shutdown_rx` fires
pub async fn run_server<S: ForecastSource>(
    source: Arc<S>,
    port: u16,
    mut shutdown_rx: tokio::sync::watch::Receiver<()>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let app = create_router(source);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;
    log::info!("HTTP server listening on http://localhost:{}", port);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_rx.changed().await.ok();
        })
        .await?;

    log::info!("HTTP server stopped.");
    Ok(())
}
