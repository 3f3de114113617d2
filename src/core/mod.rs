pub mod decision;
pub mod document;
pub mod engine;
pub mod extract;
pub mod select;

pub use crate::domain::model::{DecisionMode, ExtractedMetrics, ForecastDocument, UmbrellaVerdict};
pub use crate::domain::ports::{Clock, ConfigProvider, ForecastFetcher};
pub use crate::utils::error::Result;
pub use decision::{parse_threshold, DecisionEngine};
pub use engine::{CheckSettings, UmbrellaService};
