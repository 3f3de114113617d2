use crate::domain::model::{Area, ForecastDocument, ForecastPeriod};
use crate::utils::error::{Result, UmbrellaError};
use chrono::{DateTime, Days, FixedOffset, NaiveDate};

/// The forecast day a check targets: the calendar date of `now + 1 day`.
pub fn target_date(now: DateTime<FixedOffset>) -> NaiveDate {
    let date = now.date_naive();
    date.checked_add_days(Days::new(1)).unwrap_or(date)
}

/// First area carrying `area_code`, in document order.
pub fn find_area<'a>(document: &'a ForecastDocument, area_code: &str) -> Result<&'a Area> {
    document
        .areas
        .iter()
        .find(|area| area.area_code == area_code)
        .ok_or_else(|| UmbrellaError::AreaNotFound {
            area_code: area_code.to_string(),
        })
}

/// First period of the area whose start time falls on `date`.
///
/// Periods with an unparsable start time are skipped. When nothing matches the
/// result is `PeriodNotFound`; no other period is substituted.
pub fn select_period<'a>(
    document: &'a ForecastDocument,
    area_code: &str,
    date: NaiveDate,
) -> Result<&'a ForecastPeriod> {
    let area = find_area(document, area_code)?;

    area.periods
        .iter()
        .find(|period| match period.start_date() {
            Some(start) => start == date,
            None => {
                tracing::debug!(
                    "Skipping period with unparsable start time {:?}",
                    period.start_time
                );
                false
            }
        })
        .ok_or_else(|| UmbrellaError::PeriodNotFound {
            area_code: area_code.to_string(),
            date,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{FieldKind, TextField};

    fn period(start_time: &str, chance: &str) -> ForecastPeriod {
        ForecastPeriod {
            start_time: start_time.to_string(),
            texts: vec![TextField {
                kind: FieldKind::ProbabilityOfPrecipitation,
                value: chance.to_string(),
            }],
            ..Default::default()
        }
    }

    fn document() -> ForecastDocument {
        ForecastDocument {
            areas: vec![
                Area {
                    area_code: "NSW_PT131".to_string(),
                    description: Some("Sydney".to_string()),
                    periods: vec![
                        period("2025-10-10T00:00:00Z", "90%"),
                        period("not-a-timestamp", "99%"),
                        period("2025-10-11T00:00:00Z", "30%"),
                        period("2025-10-11T12:00:00Z", "60%"),
                        period("2025-10-12T00:00:00Z", "70%"),
                    ],
                },
                Area {
                    area_code: "NSW_PT131".to_string(),
                    description: Some("Duplicate".to_string()),
                    periods: vec![period("2025-10-11T00:00:00Z", "10%")],
                },
            ],
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_target_date_is_tomorrow() {
        let now = DateTime::parse_from_rfc3339("2025-10-10T12:00:00Z").unwrap();
        assert_eq!(target_date(now), date(2025, 10, 11));

        let late = DateTime::parse_from_rfc3339("2025-12-31T23:59:59+11:00").unwrap();
        assert_eq!(target_date(late), date(2026, 1, 1));
    }

    #[test]
    fn test_select_first_matching_period() {
        let doc = document();
        let selected = select_period(&doc, "NSW_PT131", date(2025, 10, 11)).unwrap();
        assert_eq!(selected.text(FieldKind::ProbabilityOfPrecipitation), Some("30%"));

        // repeated selection is stable
        let again = select_period(&doc, "NSW_PT131", date(2025, 10, 11)).unwrap();
        assert!(std::ptr::eq(selected, again));
    }

    #[test]
    fn test_first_area_wins_on_duplicate_codes() {
        let doc = document();
        let area = find_area(&doc, "NSW_PT131").unwrap();
        assert_eq!(area.description.as_deref(), Some("Sydney"));
    }

    #[test]
    fn test_missing_area() {
        let doc = document();
        let err = select_period(&doc, "VIC_PT042", date(2025, 10, 11)).unwrap_err();
        assert!(matches!(err, UmbrellaError::AreaNotFound { ref area_code } if area_code == "VIC_PT042"));
    }

    #[test]
    fn test_missing_period_does_not_fall_back() {
        let doc = document();
        let err = select_period(&doc, "NSW_PT131", date(2025, 10, 20)).unwrap_err();
        assert!(matches!(err, UmbrellaError::PeriodNotFound { date: d, .. } if d == date(2025, 10, 20)));
    }

    #[test]
    fn test_start_date_compared_in_its_own_offset() {
        let doc = ForecastDocument {
            areas: vec![Area {
                area_code: "NSW_PT131".to_string(),
                description: None,
                periods: vec![period("2025-10-11T05:00:00+11:00", "40%")],
            }],
        };
        assert!(select_period(&doc, "NSW_PT131", date(2025, 10, 11)).is_ok());
        assert!(select_period(&doc, "NSW_PT131", date(2025, 10, 10)).is_err());
    }
}
