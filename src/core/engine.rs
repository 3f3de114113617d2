use crate::core::decision::DecisionEngine;
use crate::core::select::{find_area, select_period, target_date};
use crate::domain::model::{
    DecisionMode, ExtractedMetrics, ForecastDocument, RainPeriod, UmbrellaVerdict,
};
use crate::domain::ports::{Clock, ConfigProvider, ForecastFetcher};
use crate::utils::error::Result;
use crate::utils::monitor::RequestMonitor;

/// What a check looks at and how it decides.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckSettings {
    pub feed_url: String,
    pub area_code: String,
    pub location_label: String,
    pub mode: DecisionMode,
    pub default_threshold: Option<f64>,
}

impl CheckSettings {
    pub fn from_config<P: ConfigProvider + ?Sized>(config: &P) -> Self {
        Self {
            feed_url: config.feed_url().to_string(),
            area_code: config.area_code().to_string(),
            location_label: config.location_label().to_string(),
            mode: config.decision_mode(),
            default_threshold: config.default_threshold(),
        }
    }
}

/// Fetch -> parse -> select -> extract -> decide, once per call.
///
/// Holds no forecast data between calls; the fetcher and clock are the only
/// collaborators, so concurrent checks never share state.
pub struct UmbrellaService<F: ForecastFetcher, C: Clock> {
    fetcher: F,
    clock: C,
    settings: CheckSettings,
    monitor_enabled: bool,
}

impl<F: ForecastFetcher, C: Clock> UmbrellaService<F, C> {
    pub fn new(fetcher: F, clock: C, settings: CheckSettings) -> Self {
        Self::new_with_monitoring(fetcher, clock, settings, false)
    }

    pub fn new_with_monitoring(
        fetcher: F,
        clock: C,
        settings: CheckSettings,
        monitor_enabled: bool,
    ) -> Self {
        Self {
            fetcher,
            clock,
            settings,
            monitor_enabled,
        }
    }

    /// Runs one check. `threshold` overrides the configured threshold when it
    /// is a positive finite number.
    pub async fn check(&self, threshold: Option<f64>) -> Result<UmbrellaVerdict> {
        let mut monitor = RequestMonitor::new(self.monitor_enabled);
        let now = self.clock.now();
        let settings = &self.settings;

        tracing::info!("🌦️ Fetching weather data from {}", settings.feed_url);
        let raw = self.fetcher.fetch(&settings.feed_url).await?;
        tracing::debug!("Downloaded {} bytes of XML", raw.len());
        monitor.mark("fetch");

        let document = ForecastDocument::from_xml(&raw)?;
        monitor.mark("parse");

        let engine =
            DecisionEngine::with_fallback(settings.mode, threshold, settings.default_threshold);

        let verdict = match engine.mode() {
            DecisionMode::TargetDay => {
                let date = target_date(now);
                let period = select_period(&document, &settings.area_code, date)?;
                tracing::debug!(
                    "Selected period starting {} for {} on {}",
                    period.start_time,
                    settings.area_code,
                    date
                );
                monitor.mark("select");

                let metrics = ExtractedMetrics::from_period(period);
                let rain = RainPeriod::from_period(period, &metrics);
                engine.decide_period(&metrics, rain, date, &settings.location_label, now)
            }
            DecisionMode::SumProduct => {
                let area = find_area(&document, &settings.area_code)?;
                monitor.mark("select");
                engine.decide_aggregate(area, &settings.location_label, now)
            }
        };
        monitor.mark("decide");

        tracing::info!(
            "✅ Weather check complete: need_umbrella={} ({}% chance, {:.1}mm)",
            verdict.need_umbrella,
            verdict.precipitation_chance_percent,
            verdict.precipitation_volume_max_mm
        );
        monitor.log_final_stats();

        Ok(verdict)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::clock::FixedClock;
    use crate::utils::error::UmbrellaError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StaticFetcher {
        body: String,
        calls: AtomicUsize,
    }

    impl StaticFetcher {
        fn new(body: &str) -> Self {
            Self {
                body: body.to_string(),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl ForecastFetcher for StaticFetcher {
        async fn fetch(&self, _url: &str) -> Result<Vec<u8>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.body.as_bytes().to_vec())
        }
    }

    struct FailingFetcher;

    #[async_trait]
    impl ForecastFetcher for FailingFetcher {
        async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
            Err(UmbrellaError::HttpStatus {
                status: 503,
                url: url.to_string(),
            })
        }
    }

    fn settings(mode: DecisionMode) -> CheckSettings {
        CheckSettings {
            feed_url: "http://feed.test/IDN11060.xml".to_string(),
            area_code: "NSW_PT131".to_string(),
            location_label: "Sydney".to_string(),
            mode,
            default_threshold: None,
        }
    }

    fn clock() -> FixedClock {
        FixedClock::parse("2025-10-10T12:00:00Z").unwrap()
    }

    const THREE_DAYS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<product>
  <forecast>
    <area aac="NSW_PT131">
      <forecast-period start-time-local="2025-10-10T00:00:00Z">
        <text type="probability_of_precipitation">90%</text>
        <element type="precipitation_range">10 to 20 mm</element>
      </forecast-period>
      <forecast-period start-time-local="2025-10-11T00:00:00Z">
        <text type="probability_of_precipitation">30%</text>
        <element type="precipitation_range">0 to 2 mm</element>
        <element type="air_temperature_minimum">15</element>
        <element type="air_temperature_maximum">25</element>
        <element type="wind_speed_kilometres">30</element>
      </forecast-period>
      <forecast-period start-time-local="2025-10-12T00:00:00Z">
        <text type="probability_of_precipitation">70%</text>
        <element type="precipitation_range">5 to 15 mm</element>
      </forecast-period>
    </area>
  </forecast>
</product>"#;

    #[tokio::test]
    async fn test_check_uses_only_tomorrows_period() {
        let fetcher = StaticFetcher::new(THREE_DAYS);
        let service = UmbrellaService::new(fetcher, clock(), settings(DecisionMode::TargetDay));

        let verdict = service.check(None).await.unwrap();

        assert!(!verdict.need_umbrella);
        assert_eq!(verdict.precipitation_chance_percent, 30);
        assert_eq!(verdict.precipitation_volume_max_mm, 2.0);
        assert_eq!(verdict.min_temp, 15);
        assert_eq!(verdict.max_temp, 25);
        assert_eq!(verdict.wind_speed_kmh, 30);
        assert_eq!(verdict.location, "Sydney");
        assert_eq!(verdict.timestamp, clock().now());
        assert_eq!(verdict.forecast_date.unwrap().to_string(), "2025-10-11");
    }

    #[tokio::test]
    async fn test_each_check_fetches_again() {
        let service = UmbrellaService::new(
            StaticFetcher::new(THREE_DAYS),
            clock(),
            settings(DecisionMode::TargetDay),
        );

        service.check(None).await.unwrap();
        service.check(None).await.unwrap();

        assert_eq!(service.fetcher.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_request_threshold_beats_configured_default() {
        let mut cfg = settings(DecisionMode::TargetDay);
        cfg.default_threshold = Some(10.0);
        let service = UmbrellaService::new(StaticFetcher::new(THREE_DAYS), clock(), cfg);

        assert!(service.check(None).await.unwrap().need_umbrella);
        assert!(!service.check(Some(40.0)).await.unwrap().need_umbrella);
        // unusable override falls back to the configured default
        let verdict = service.check(Some(-1.0)).await.unwrap();
        assert_eq!(verdict.threshold, 10.0);
    }

    #[tokio::test]
    async fn test_sum_product_mode() {
        let service = UmbrellaService::new_with_monitoring(
            StaticFetcher::new(THREE_DAYS),
            clock(),
            settings(DecisionMode::SumProduct),
            true,
        );

        let verdict = service.check(None).await.unwrap();
        assert!(verdict.need_umbrella);
        assert_eq!(verdict.periods.len(), 3);
        assert!((verdict.sum_product.unwrap() - 29.1).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_non_finite_range_does_not_poison_sum_product() {
        let xml = THREE_DAYS.replace("10 to 20 mm", "2 to NaN mm");
        let service = UmbrellaService::new(
            StaticFetcher::new(&xml),
            clock(),
            settings(DecisionMode::SumProduct),
        );

        let verdict = service.check(None).await.unwrap();

        // 0.9*0 + 0.3*2 + 0.7*15 = 11.1
        let score = verdict.sum_product.unwrap();
        assert!(score.is_finite());
        assert!((score - 11.1).abs() < 1e-9);
        assert_eq!(verdict.periods[0].volume, 0.0);
        assert!(serde_json::to_value(&verdict).unwrap()["periods"][0]["volume"].is_number());
    }

    #[tokio::test]
    async fn test_no_period_for_tomorrow() {
        let late_clock = FixedClock::parse("2025-10-20T08:00:00Z").unwrap();
        let service = UmbrellaService::new(
            StaticFetcher::new(THREE_DAYS),
            late_clock,
            settings(DecisionMode::TargetDay),
        );

        let err = service.check(None).await.unwrap_err();
        assert!(matches!(err, UmbrellaError::PeriodNotFound { .. }));
    }

    #[tokio::test]
    async fn test_fetch_failure_propagates() {
        let service = UmbrellaService::new(FailingFetcher, clock(), settings(DecisionMode::TargetDay));
        let err = service.check(None).await.unwrap_err();
        assert!(matches!(err, UmbrellaError::HttpStatus { status: 503, .. }));
    }

    #[tokio::test]
    async fn test_parse_failure_propagates() {
        let service = UmbrellaService::new(
            StaticFetcher::new("<html>maintenance</html>"),
            clock(),
            settings(DecisionMode::SumProduct),
        );
        let err = service.check(None).await.unwrap_err();
        assert!(matches!(err, UmbrellaError::ParseError { .. }));
    }
}
