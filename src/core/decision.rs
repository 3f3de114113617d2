use crate::domain::model::{Area, DecisionMode, ExtractedMetrics, RainPeriod, UmbrellaVerdict};
use chrono::{DateTime, FixedOffset, NaiveDate};

pub const DEFAULT_CHANCE_THRESHOLD: f64 = 50.0;
pub const DEFAULT_SUM_PRODUCT_THRESHOLD: f64 = 20.0;

impl DecisionMode {
    pub fn default_threshold(&self) -> f64 {
        match self {
            Self::TargetDay => DEFAULT_CHANCE_THRESHOLD,
            Self::SumProduct => DEFAULT_SUM_PRODUCT_THRESHOLD,
        }
    }
}

/// Parses a caller-supplied threshold such as a `?threshold=` query value.
///
/// Blank input means "no override". Anything that is not a positive finite
/// number is reported and ignored so the default applies.
pub fn parse_threshold(raw: Option<&str>) -> Option<f64> {
    let raw = raw.map(str::trim).filter(|s| !s.is_empty())?;
    match raw.parse::<f64>() {
        Ok(value) if is_usable_threshold(value) => Some(value),
        Ok(value) => {
            tracing::warn!("⚠️ Threshold {} is not a positive finite number, using default", value);
            None
        }
        Err(_) => {
            tracing::warn!("⚠️ Invalid threshold param {:?}, using default", raw);
            None
        }
    }
}

fn is_usable_threshold(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

/// Score-versus-threshold comparison for one decision mode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecisionEngine {
    mode: DecisionMode,
    threshold: f64,
}

impl DecisionEngine {
    pub fn new(mode: DecisionMode, threshold: Option<f64>) -> Self {
        Self::with_fallback(mode, threshold, None)
    }

    /// `requested` wins, then `configured`, then the mode's default.
    /// Candidates that are not positive finite numbers are skipped with a warning.
    pub fn with_fallback(
        mode: DecisionMode,
        requested: Option<f64>,
        configured: Option<f64>,
    ) -> Self {
        let threshold = [requested, configured]
            .into_iter()
            .flatten()
            .find(|value| {
                let usable = is_usable_threshold(*value);
                if !usable {
                    tracing::warn!(
                        "⚠️ Threshold {} is not a positive finite number, ignoring it",
                        value
                    );
                }
                usable
            })
            .unwrap_or_else(|| mode.default_threshold());

        Self { mode, threshold }
    }

    pub fn mode(&self) -> DecisionMode {
        self.mode
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Strictly greater than: a score equal to the threshold does not need an umbrella.
    pub fn exceeds(&self, score: f64) -> bool {
        score > self.threshold
    }

    /// Target-day verdict from the metrics of the one selected period.
    pub fn decide_period(
        &self,
        metrics: &ExtractedMetrics,
        rain: RainPeriod,
        forecast_date: NaiveDate,
        location: &str,
        generated_at: DateTime<FixedOffset>,
    ) -> UmbrellaVerdict {
        let need_umbrella = self.exceeds(f64::from(metrics.precipitation_chance_percent));

        tracing::info!(
            "☂️ Chance {}% vs threshold {} -> need_umbrella={}",
            metrics.precipitation_chance_percent,
            self.threshold,
            need_umbrella
        );

        UmbrellaVerdict {
            need_umbrella,
            precipitation_chance_percent: metrics.precipitation_chance_percent,
            precipitation_volume_max_mm: metrics.precipitation_volume_max_mm,
            location: location.to_string(),
            timestamp: generated_at,
            min_temp: metrics.min_temp,
            max_temp: metrics.max_temp,
            wind_speed_kmh: metrics.wind_speed_kmh,
            mode: DecisionMode::TargetDay,
            threshold: self.threshold,
            forecast_date: Some(forecast_date),
            sum_product: None,
            periods: vec![rain],
        }
    }

    /// Sum-product verdict over every period of the area.
    ///
    /// Reports the maximum chance and volume seen; temperatures and wind come
    /// from the first period, which is the nearest one in the feed.
    pub fn decide_aggregate(
        &self,
        area: &Area,
        location: &str,
        generated_at: DateTime<FixedOffset>,
    ) -> UmbrellaVerdict {
        let mut sum_product: f64 = 0.0;
        let mut chance_max: i32 = 0;
        let mut volume_max: f64 = 0.0;
        let mut periods = Vec::with_capacity(area.periods.len());
        let mut first: Option<ExtractedMetrics> = None;

        for period in &area.periods {
            let metrics = ExtractedMetrics::from_period(period);
            sum_product += metrics.expected_rain_mm();
            chance_max = chance_max.max(metrics.precipitation_chance_percent);
            volume_max = volume_max.max(metrics.precipitation_volume_max_mm);
            periods.push(RainPeriod::from_period(period, &metrics));
            first.get_or_insert(metrics);
        }

        let need_umbrella = self.exceeds(sum_product);
        let first = first.unwrap_or_default();

        tracing::info!(
            "☂️ Sum-product {:.2} over {} periods vs threshold {} -> need_umbrella={}",
            sum_product,
            periods.len(),
            self.threshold,
            need_umbrella
        );

        UmbrellaVerdict {
            need_umbrella,
            precipitation_chance_percent: chance_max,
            precipitation_volume_max_mm: volume_max,
            location: location.to_string(),
            timestamp: generated_at,
            min_temp: first.min_temp,
            max_temp: first.max_temp,
            wind_speed_kmh: first.wind_speed_kmh,
            mode: DecisionMode::SumProduct,
            threshold: self.threshold,
            forecast_date: None,
            sum_product: Some(sum_product),
            periods,
        }
    }
}
