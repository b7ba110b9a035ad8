//! CWA Weather
//!
//! HTTP proxy serving simplified 36-hour forecasts for Taiwan's six special
//! municipalities from the Central Weather Administration open-data API.
//!
//! # Endpoints
//!
//! - `GET /` - service description
//! - `GET /api/health` - liveness check
//! - `GET /api/weather/{taipei,newtaipei,taoyuan,taichung,tainan,kaohsiung}`

pub mod api;
pub mod city;
pub mod config;
pub mod error;
pub mod forecast;
pub mod server;
pub mod upstream;

pub use city::City;
pub use config::{Config, ConfigError};
pub use error::{ErrorBody, ForecastError, ForecastResult};
pub use forecast::{Alignment, CityForecast, ForecastPeriod};
pub use server::{create_router, run_server};
pub use upstream::{CwaClient, ForecastSource};
