//! Tolerant parsers for the free-text fields of a forecast period.
//!
//! Upstream text is not trusted to be well formed. Every parser here degrades
//! to zero on malformed input instead of failing the request.

use crate::domain::model::{ExtractedMetrics, FieldKind, ForecastPeriod, RainPeriod};

const PERCENT_SUFFIX: char = '%';
const MILLIMETRE_SUFFIX: &str = " mm";
const RANGE_SEPARATOR: &str = " to ";

/// `"80%"` -> 80. A missing `%` or a non-integer body yields 0.
pub fn parse_percentage(text: &str) -> i32 {
    text.trim()
        .strip_suffix(PERCENT_SUFFIX)
        .and_then(|body| body.parse().ok())
        .unwrap_or_else(|| {
            tracing::debug!("Unparsable percentage {:?}, using 0", text);
            0
        })
}

/// `"2 to 8 mm"` -> 8.0 (upper bound). Anything else, including a negative or
/// non-finite bound, yields 0.0.
pub fn parse_range_upper(text: &str) -> f64 {
    let trimmed = text.trim();
    let body = trimmed.strip_suffix(MILLIMETRE_SUFFIX).unwrap_or(trimmed);

    let parts: Vec<&str> = body.split(RANGE_SEPARATOR).collect();
    if parts.len() != 2 {
        tracing::debug!("Range {:?} is not of the form \"A to B mm\", using 0.0", text);
        return 0.0;
    }

    match parts[1].trim().parse::<f64>() {
        Ok(upper) if upper.is_finite() && upper >= 0.0 => upper,
        _ => {
            tracing::debug!("Unparsable range upper bound in {:?}, using 0.0", text);
            0.0
        }
    }
}

/// Temperatures and wind speeds. Malformed text yields 0.
pub fn parse_integer(text: &str) -> i32 {
    text.trim().parse().unwrap_or(0)
}

impl ExtractedMetrics {
    /// Absent fields default to zero, same as malformed ones.
    pub fn from_period(period: &ForecastPeriod) -> Self {
        let element_int = |kind| period.element(kind).map(parse_integer).unwrap_or(0);

        Self {
            precipitation_chance_percent: period
                .text(FieldKind::ProbabilityOfPrecipitation)
                .map(parse_percentage)
                .unwrap_or(0),
            precipitation_volume_max_mm: period
                .element(FieldKind::PrecipitationRange)
                .map(parse_range_upper)
                .unwrap_or(0.0),
            min_temp: element_int(FieldKind::AirTemperatureMinimum),
            max_temp: element_int(FieldKind::AirTemperatureMaximum),
            wind_speed_kmh: element_int(FieldKind::WindSpeedKilometres),
        }
    }

    /// chance/100 × volume, the per-period term of the sum-product score.
    pub fn expected_rain_mm(&self) -> f64 {
        f64::from(self.precipitation_chance_percent) * self.precipitation_volume_max_mm / 100.0
    }
}

impl RainPeriod {
    pub fn from_period(period: &ForecastPeriod, metrics: &ExtractedMetrics) -> Self {
        Self {
            likelihood: metrics.precipitation_chance_percent,
            volume: metrics.precipitation_volume_max_mm,
            start_time: period.start_time.clone(),
        }
    }
}
