//! XML product -> [`ForecastDocument`].
//!
//! Deserialization goes through private mirror types shaped like the feed and
//! is then lowered into the domain model, so the rest of the crate never sees
//! raw attribute strings. Anything the mirrors do not name is ignored.

use crate::domain::model::{
    Area, ElementField, FieldKind, ForecastDocument, ForecastPeriod, TextField,
};
use crate::utils::error::{Result, UmbrellaError};
use quick_xml::events::Event;
use quick_xml::Reader;
use serde::Deserialize;

const ROOT_ELEMENT: &[u8] = b"product";

#[derive(Debug, Deserialize)]
struct RawProduct {
    forecast: Option<RawForecast>,
}

#[derive(Debug, Deserialize)]
struct RawForecast {
    #[serde(rename = "area", default)]
    areas: Vec<RawArea>,
}

#[derive(Debug, Deserialize)]
struct RawArea {
    #[serde(rename = "@aac", default)]
    aac: String,
    #[serde(rename = "@description")]
    description: Option<String>,
    #[serde(rename = "forecast-period", default)]
    periods: Vec<RawPeriod>,
}

#[derive(Debug, Deserialize)]
struct RawPeriod {
    #[serde(rename = "@index")]
    index: Option<String>,
    #[serde(rename = "@start-time-local")]
    start_time_local: Option<String>,
    #[serde(rename = "@start-time-utc")]
    start_time_utc: Option<String>,
    #[serde(rename = "@start-time")]
    start_time: Option<String>,
    #[serde(rename = "text", default)]
    texts: Vec<RawField>,
    #[serde(rename = "element", default)]
    elements: Vec<RawField>,
}

#[derive(Debug, Deserialize)]
struct RawField {
    #[serde(rename = "@type", default)]
    kind: String,
    #[serde(rename = "$text", default)]
    value: String,
}

impl ForecastDocument {
    pub fn from_xml(bytes: &[u8]) -> Result<Self> {
        let text = std::str::from_utf8(bytes).map_err(|e| UmbrellaError::ParseError {
            message: format!("document is not valid UTF-8: {}", e),
        })?;

        check_root_element(text)?;

        let product: RawProduct = quick_xml::de::from_str(text)?;
        let forecast = product.forecast.ok_or_else(|| UmbrellaError::ParseError {
            message: "document has no <forecast> section".to_string(),
        })?;

        let areas: Vec<Area> = forecast.areas.into_iter().map(Area::from).collect();
        tracing::debug!("Parsed forecast document with {} areas", areas.len());

        Ok(Self { areas })
    }
}

fn check_root_element(text: &str) -> Result<()> {
    let mut reader = Reader::from_str(text);

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) => {
                let name = e.local_name();
                if name.as_ref() == ROOT_ELEMENT {
                    return Ok(());
                }
                return Err(UmbrellaError::ParseError {
                    message: format!(
                        "unexpected root element <{}>",
                        String::from_utf8_lossy(name.as_ref())
                    ),
                });
            }
            Ok(Event::Eof) => {
                return Err(UmbrellaError::ParseError {
                    message: "document has no root element".to_string(),
                })
            }
            Ok(_) => continue,
            Err(e) => {
                return Err(UmbrellaError::ParseError {
                    message: format!("malformed XML at position {}: {}", reader.buffer_position(), e),
                })
            }
        }
    }
}

impl From<RawArea> for Area {
    fn from(raw: RawArea) -> Self {
        Self {
            area_code: raw.aac,
            description: raw.description,
            periods: raw.periods.into_iter().map(ForecastPeriod::from).collect(),
        }
    }
}

impl From<RawPeriod> for ForecastPeriod {
    fn from(raw: RawPeriod) -> Self {
        // 優先使用當地時間
        let start_time = raw
            .start_time_local
            .or(raw.start_time_utc)
            .or(raw.start_time)
            .unwrap_or_default();

        Self {
            index: raw.index.and_then(|i| i.trim().parse().ok()),
            start_time,
            texts: raw
                .texts
                .into_iter()
                .map(|f| TextField {
                    kind: f.kind.parse().unwrap_or(FieldKind::Unknown),
                    value: f.value,
                })
                .collect(),
            elements: raw
                .elements
                .into_iter()
                .map(|f| ElementField {
                    kind: f.kind.parse().unwrap_or(FieldKind::Unknown),
                    value: f.value,
                })
                .collect(),
        }
    }
}
