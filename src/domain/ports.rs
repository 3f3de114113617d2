use crate::domain::model::DecisionMode;
use crate::utils::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};

/// Retrieves the raw forecast product.
#[async_trait]
pub trait ForecastFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}

/// Source of "now". Read once per check so a request never straddles midnight.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<FixedOffset>;
}

pub trait ConfigProvider: Send + Sync {
    fn feed_url(&self) -> &str;
    fn area_code(&self) -> &str;
    fn location_label(&self) -> &str;
    fn timeout_seconds(&self) -> u64;
    fn decision_mode(&self) -> DecisionMode;
    fn default_threshold(&self) -> Option<f64>;
}
