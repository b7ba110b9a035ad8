//! Reshapes the CWA `F-C0032-001` dataset into per-period forecasts.
//!
//! The dataset groups values by weather element (`Wx`, `PoP`, ...), each with
//! its own time series. Clients want the transpose: one record per time
//! window with every element merged in.

use crate::city::City;
use crate::error::{ForecastError, ForecastResult};
use serde::{Deserialize, Serialize};

// ── Upstream wire format ────────────────────────────────────────────

/// Top-level dataset response.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetResponse {
    #[serde(default)]
    pub records: Records,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Records {
    #[serde(default)]
    pub dataset_description: String,
    #[serde(default)]
    pub location: Vec<Location>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    #[serde(default)]
    pub location_name: String,
    #[serde(default)]
    pub weather_element: Vec<WeatherElement>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherElement {
    #[serde(default)]
    pub element_name: String,
    #[serde(default)]
    pub time: Vec<TimeEntry>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeEntry {
    #[serde(default)]
    pub start_time: String,
    #[serde(default)]
    pub end_time: String,
    #[serde(default)]
    pub parameter: Parameter,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Parameter {
    #[serde(default)]
    pub parameter_name: String,
}

// ── Public model ────────────────────────────────────────────────────

/// One forecast time window with every known element merged in.
///
/// Fields whose element is absent upstream are empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastPeriod {
    pub start_time: String,
    pub end_time: String,
    pub weather: String,
    pub rain: String,
    pub min_temp: String,
    pub max_temp: String,
    pub comfort: String,
    pub wind_speed: String,
}

/// Simplified forecast for one city, periods in upstream order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CityForecast {
    pub city: String,
    pub update_time: String,
    pub forecasts: Vec<ForecastPeriod>,
}

/// How entries of the other element series are matched to the periods of the
/// first series.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    /// Entry `i` of every element belongs to period `i`.
    #[default]
    Index,
    /// Entries belong to the period with the same start and end time.
    Time,
}

// ── Transformation ──────────────────────────────────────────────────

/// Output field fed by a weather element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Weather,
    Rain,
    MinTemp,
    MaxTemp,
    Comfort,
    WindSpeed,
}

impl Field {
    fn for_element(name: &str) -> Option<Self> {
        match name {
            "Wx" => Some(Field::Weather),
            "PoP" => Some(Field::Rain),
            "MinT" => Some(Field::MinTemp),
            "MaxT" => Some(Field::MaxTemp),
            "CI" => Some(Field::Comfort),
            "WS" => Some(Field::WindSpeed),
            _ => None,
        }
    }

    fn suffix(self) -> &'static str {
        match self {
            Field::Rain => "%",
            Field::MinTemp | Field::MaxTemp => "°C",
            _ => "",
        }
    }
}

impl ForecastPeriod {
    fn field_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::Weather => &mut self.weather,
            Field::Rain => &mut self.rain,
            Field::MinTemp => &mut self.min_temp,
            Field::MaxTemp => &mut self.max_temp,
            Field::Comfort => &mut self.comfort,
            Field::WindSpeed => &mut self.wind_speed,
        }
    }
}

fn find_entry<'a>(
    element: &'a WeatherElement,
    index: usize,
    period: &ForecastPeriod,
    alignment: Alignment,
) -> Option<&'a TimeEntry> {
    match alignment {
        Alignment::Index => element.time.get(index),
        Alignment::Time => element
            .time
            .iter()
            .find(|t| t.start_time == period.start_time && t.end_time == period.end_time),
    }
}

/// Merge one location's element series into forecast periods.
///
/// The first element's series defines how many periods there are and their
/// time windows.
pub fn merge_periods(location: &Location, alignment: Alignment) -> Vec<ForecastPeriod> {
    let Some(first) = location.weather_element.first() else {
        return Vec::new();
    };

    first
        .time
        .iter()
        .enumerate()
        .map(|(i, slot)| {
            let mut period = ForecastPeriod {
                start_time: slot.start_time.clone(),
                end_time: slot.end_time.clone(),
                ..Default::default()
            };

            for element in &location.weather_element {
                let Some(field) = Field::for_element(&element.element_name) else {
                    continue;
                };
                if let Some(entry) = find_entry(element, i, &period, alignment) {
                    *period.field_mut(field) =
                        format!("{}{}", entry.parameter.parameter_name, field.suffix());
                }
            }

            period
        })
        .collect()
}

/// Build the simplified forecast for `city` from a decoded dataset.
///
/// Prefers the record named after the city and falls back to the first one,
/// since the upstream query already filters by location name.
pub fn build_city_forecast(
    response: DatasetResponse,
    city: City,
    alignment: Alignment,
) -> ForecastResult<CityForecast> {
    let Records {
        dataset_description,
        location,
    } = response.records;

    let record = location
        .iter()
        .find(|l| l.location_name == city.location_name())
        .or_else(|| location.first())
        .ok_or(ForecastError::NotFound(city))?;

    Ok(CityForecast {
        city: record.location_name.clone(),
        update_time: dataset_description,
        forecasts: merge_periods(record, alignment),
    })
}

#[cfg(test)]
pub(crate) mod fixtures {
    use serde_json::{json, Value};

    pub const WINDOWS: [(&str, &str); 3] = [
        ("2026-10-18 18:00:00", "2026-10-19 06:00:00"),
        ("2026-10-19 06:00:00", "2026-10-19 18:00:00"),
        ("2026-10-19 18:00:00", "2026-10-20 06:00:00"),
    ];

    pub fn element(name: &str, values: &[&str]) -> Value {
        let time: Vec<Value> = WINDOWS
            .iter()
            .zip(values)
            .map(|((start, end), value)| {
                json!({
                    "startTime": start,
                    "endTime": end,
                    "parameter": { "parameterName": value }
                })
            })
            .collect();
        json!({ "elementName": name, "time": time })
    }

    pub fn full_elements() -> Vec<Value> {
        vec![
            element("Wx", &["多雲", "晴時多雲", "多雲時陰"]),
            element("PoP", &["20", "10", "30"]),
            element("MinT", &["24", "25", "23"]),
            element("CI", &["舒適", "舒適至悶熱", "舒適"]),
            element("MaxT", &["28", "31", "27"]),
        ]
    }

    /// Dataset payload as the CWA API returns it for one location.
    pub fn dataset(location_name: &str, elements: Vec<Value>) -> Value {
        json!({
            "success": "true",
            "result": { "resource_id": "F-C0032-001" },
            "records": {
                "datasetDescription": "三十六小時天氣預報",
                "location": [
                    { "locationName": location_name, "weatherElement": elements }
                ]
            }
        })
    }
}
