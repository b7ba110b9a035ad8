//! `/api/weather` routes, one fixed endpoint per city.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use std::sync::Arc;

use crate::city::City;
use crate::error::ForecastError;
use crate::forecast::CityForecast;
use crate::upstream::ForecastSource;

/// Success body of every city endpoint.
#[derive(Debug, Serialize)]
pub struct ForecastResponse {
    pub success: bool,
    pub data: CityForecast,
}

async fn city_forecast<S: ForecastSource>(
    source: Arc<S>,
    city: City,
) -> Result<Json<ForecastResponse>, ForecastError> {
    log::debug!("[API] forecast request for {}", city);

    match source.fetch_forecast(city).await {
        Ok(data) => Ok(Json(ForecastResponse {
            success: true,
            data,
        })),
        Err(e) => {
            log::error!("[API] failed to fetch forecast for {}: {}", city, e);
            Err(e)
        }
    }
}

/// Build the weather router. Caller nests this under `/api/weather`.
pub fn weather_router<S: ForecastSource>(source: Arc<S>) -> Router {
    City::ALL
        .into_iter()
        .fold(Router::<Arc<S>>::new(), |router, city| {
            router.route(
                &format!("/{}", city.slug()),
                get(move |State(source): State<Arc<S>>| city_forecast(source, city)),
            )
        })
        .with_state(source)
}
