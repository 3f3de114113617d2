use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A parsed forecast product: every forecast area in document order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ForecastDocument {
    pub areas: Vec<Area>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Area {
    pub area_code: String,
    pub description: Option<String>,
    pub periods: Vec<ForecastPeriod>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ForecastPeriod {
    pub index: Option<u32>,
    pub start_time: String,
    pub texts: Vec<TextField>,
    pub elements: Vec<ElementField>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextField {
    pub kind: FieldKind,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ElementField {
    pub kind: FieldKind,
    pub value: String,
}

/// Field `type` attributes the extractor understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    ProbabilityOfPrecipitation,
    PrecipitationRange,
    AirTemperatureMinimum,
    AirTemperatureMaximum,
    WindSpeedKilometres,
    Unknown,
}

impl FromStr for FieldKind {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim() {
            "probability_of_precipitation" => Self::ProbabilityOfPrecipitation,
            "precipitation_range" => Self::PrecipitationRange,
            "air_temperature_minimum" => Self::AirTemperatureMinimum,
            "air_temperature_maximum" => Self::AirTemperatureMaximum,
            "wind_speed_kilometres" => Self::WindSpeedKilometres,
            _ => Self::Unknown,
        })
    }
}

impl ForecastPeriod {
    /// First text field of the given kind; later duplicates are ignored.
    pub fn text(&self, kind: FieldKind) -> Option<&str> {
        self.texts
            .iter()
            .find(|field| field.kind == kind)
            .map(|field| field.value.as_str())
    }

    /// First element field of the given kind; later duplicates are ignored.
    pub fn element(&self, kind: FieldKind) -> Option<&str> {
        self.elements
            .iter()
            .find(|field| field.kind == kind)
            .map(|field| field.value.as_str())
    }

    pub fn start(&self) -> Option<DateTime<FixedOffset>> {
        DateTime::parse_from_rfc3339(self.start_time.trim()).ok()
    }

    /// Calendar date of the start time, in the timestamp's own offset.
    pub fn start_date(&self) -> Option<NaiveDate> {
        self.start().map(|start| start.date_naive())
    }
}

/// Values pulled out of one forecast period.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractedMetrics {
    pub precipitation_chance_percent: i32,
    pub precipitation_volume_max_mm: f64,
    pub min_temp: i32,
    pub max_temp: i32,
    pub wind_speed_kmh: i32,
}

/// One bar of the rainfall chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RainPeriod {
    pub likelihood: i32,
    pub volume: f64,
    pub start_time: String,
}

/// Which policy produced a verdict.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum DecisionMode {
    /// Tomorrow's period only, scored on chance of rain.
    #[default]
    TargetDay,
    /// Σ(chance/100 × volume) over every period of the area.
    SumProduct,
}

impl DecisionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TargetDay => "target_day",
            Self::SumProduct => "sum_product",
        }
    }
}

impl std::fmt::Display for DecisionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The recommendation handed to renderers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UmbrellaVerdict {
    pub need_umbrella: bool,
    pub precipitation_chance_percent: i32,
    #[serde(rename = "precipitation_volume_mm")]
    pub precipitation_volume_max_mm: f64,
    pub location: String,
    pub timestamp: DateTime<FixedOffset>,
    pub min_temp: i32,
    pub max_temp: i32,
    pub wind_speed_kmh: i32,
    pub mode: DecisionMode,
    pub threshold: f64,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub forecast_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub sum_product: Option<f64>,
    #[serde(default)]
    pub periods: Vec<RainPeriod>,
}
