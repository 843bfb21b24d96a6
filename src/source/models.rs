//! Telemetry payload types.

use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Mean energy yield reported by the telemetry source.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MeanYield {
    #[serde(default, deserialize_with = "null_as_default")]
    pub value: f64,
}

/// Envelope returned by the mean energy yield endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MeanYieldResponse {
    #[serde(default)]
    pub data: Option<MeanYield>,
}

/// One windowed turbine performance sample.
///
/// Duration buckets are in seconds. Fields missing from the payload, or sent as
/// `null`, are zero.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PerformanceReading {
    /// Turbine identifier
    pub tid: Option<String>,
    /// Start of the window this reading covers
    pub date: Option<NaiveDateTime>,
    /// Availability in percent
    #[serde(deserialize_with = "null_as_default")]
    pub availability: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub energy_yield: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub power_avg: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub power_max: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub wind_avg: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub wind_max: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub values_count: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub error_count: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub power_production_time: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub low_wind_time: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub error_time: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub service_time: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub ice_time: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub storm_time: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub shadow_time: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub twist_time: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub grid_failure_time: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub comm_failure_time: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub visit_time: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub server_stop_time: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub fire_time: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub bat_monitoring_time: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub night_shutdown_time: f64,
}

impl PerformanceReading {
    /// A reading with only the window start set.
    pub fn placeholder(date: NaiveDateTime) -> Self {
        Self {
            date: Some(date),
            ..Default::default()
        }
    }
}

/// Reads an explicit `null` as the type's default.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Envelope returned by the performance endpoints.
///
/// Every layer may be absent: the array, any element of it, and the echoed window.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PerformanceResponse {
    pub from: Option<String>,
    pub to: Option<String>,
    pub data: Option<Vec<Option<PerformanceReading>>>,
}

/// Which layer of a performance response was missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Absence {
    Response,
    Data,
    EmptyData,
    FirstEntry,
}

impl fmt::Display for Absence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Absence::Response => "Performance response is null.",
            Absence::Data => "Performance data array is null.",
            Absence::EmptyData => "Performance data array is empty.",
            Absence::FirstEntry => "First performance data entry is null.",
        };
        f.write_str(text)
    }
}

/// Extract the usable reading from a response, or name the layer that was absent.
pub fn first_reading(response: Option<&PerformanceResponse>) -> Result<&PerformanceReading, Absence> {
    let response = response.ok_or(Absence::Response)?;
    let data = response.data.as_ref().ok_or(Absence::Data)?;
    let first = data.first().ok_or(Absence::EmptyData)?;
    first.as_ref().ok_or(Absence::FirstEntry)
}

/// Normalized outcome of one performance query.
#[derive(Debug, Clone, PartialEq)]
pub struct PerformanceQueryResult {
    window: Option<(String, String)>,
    reading: Result<PerformanceReading, Absence>,
}

impl PerformanceQueryResult {
    pub fn from_response(response: Option<PerformanceResponse>) -> Self {
        let reading = first_reading(response.as_ref()).cloned();
        let window = response.and_then(|r| match (r.from, r.to) {
            (Some(from), Some(to)) => Some((from, to)),
            _ => None,
        });
        Self { window, reading }
    }

    pub fn reading(&self) -> Result<&PerformanceReading, Absence> {
        self.reading.as_ref().map_err(|absence| *absence)
    }

    pub fn into_reading(self) -> Option<PerformanceReading> {
        self.reading.ok()
    }

    /// The echoed query window as `from -> to`, or `Unknown`.
    pub fn window_label(&self) -> String {
        match &self.window {
            Some((from, to)) => format!("{} -> {}", from, to),
            None => "Unknown".to_string(),
        }
    }
}
