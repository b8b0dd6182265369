//! Delay feature derivation
//!
//! Every derived column is recomputed from the raw timestamp strings, so
//! deriving an already derived table gives back the same table.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime};

use crate::models::{RawShipment, ShipmentRecord, ShipmentTable};

const DATETIME_FORMATS: [&str; 6] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S%.f",
    "%Y/%m/%d %H:%M",
];

const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%Y/%m/%d"];

/// Parse a timestamp cell, returning `None` for anything unparseable
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_utc());
    }
    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Some(dt);
        }
    }
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(value, format) {
            return date.and_hms_opt(0, 0, 0);
        }
    }
    None
}

/// Whole days between estimated and actual delivery, floored.
///
/// A parcel delivered one hour before the estimate is `-1`, one hour after is `0`.
pub fn delay_days(estimated: NaiveDateTime, delivered: NaiveDateTime) -> i64 {
    let delta = delivered - estimated;
    let days = delta.num_days();
    if delta < Duration::days(days) {
        days - 1
    } else {
        days
    }
}

/// Derive one record from its raw cells
pub fn derive_record(raw: &RawShipment) -> ShipmentRecord {
    let purchased_at = parse_timestamp(&raw.purchase_timestamp);
    let estimated_at = parse_timestamp(&raw.estimated_delivery);
    let delivered_at = parse_timestamp(&raw.delivered_customer);

    let delivery_delay_days = match (estimated_at, delivered_at) {
        (Some(estimated), Some(delivered)) => Some(delay_days(estimated, delivered)),
        _ => None,
    };

    ShipmentRecord {
        raw: raw.clone(),
        purchased_at,
        estimated_at,
        delivered_at,
        delivery_delay_days,
        on_time: delivery_delay_days.map(|d| d <= 0),
        delivery_day_of_week: delivered_at.map(|dt| dt.weekday().num_days_from_monday()),
        delivery_month: delivered_at.map(|dt| dt.month()),
    }
}

/// Build a derived table from raw rows
pub fn derive_table(headers: Vec<String>, raws: &[RawShipment]) -> ShipmentTable {
    let rows = raws.iter().map(derive_record).collect();
    ShipmentTable::new(headers, rows)
}

/// Recompute every derived column of a table from its raw cells
pub fn rederive_table(table: &ShipmentTable) -> ShipmentTable {
    let rows = table.rows().iter().map(|r| derive_record(&r.raw)).collect();
    table.with_rows(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(purchase: &str, estimated: &str, delivered: &str) -> RawShipment {
        RawShipment {
            purchase_timestamp: purchase.to_string(),
            estimated_delivery: estimated.to_string(),
            delivered_customer: delivered.to_string(),
            order_status: Some("delivered".to_string()),
            extra: vec![("order_id".to_string(), "abc".to_string())],
        }
    }

    #[test]
    fn test_two_days_early_is_on_time() {
        let record = derive_record(&raw("2022-01-01", "2022-01-10", "2022-01-08"));
        assert_eq!(record.delivery_delay_days, Some(-2));
        assert_eq!(record.on_time, Some(true));
    }

    #[test]
    fn test_late_delivery() {
        let record = derive_record(&raw(
            "2022-01-01 09:00:00",
            "2022-01-10 00:00:00",
            "2022-01-13 15:30:00",
        ));
        assert_eq!(record.delivery_delay_days, Some(3));
        assert_eq!(record.on_time, Some(false));
    }

    #[test]
    fn test_delay_is_floored() {
        let estimated = parse_timestamp("2022-01-10 12:00:00").unwrap();
        let hour_early = parse_timestamp("2022-01-10 11:00:00").unwrap();
        let hour_late = parse_timestamp("2022-01-10 13:00:00").unwrap();
        assert_eq!(delay_days(estimated, hour_early), -1);
        assert_eq!(delay_days(estimated, hour_late), 0);
        assert_eq!(delay_days(estimated, estimated), 0);
    }

    #[test]
    fn test_unparseable_delivery_leaves_derived_columns_undefined() {
        let record = derive_record(&raw("2022-01-01", "2022-01-10", "not a date"));
        assert_eq!(record.delivery_delay_days, None);
        assert_eq!(record.on_time, None);
        assert_eq!(record.delivery_day_of_week, None);
        assert_eq!(record.delivery_month, None);
    }

    #[test]
    fn test_missing_estimate_keeps_calendar_columns() {
        let record = derive_record(&raw("2022-01-01", "", "2022-03-06"));
        assert_eq!(record.delivery_delay_days, None);
        assert_eq!(record.on_time, None);
        // 2022-03-06 was a Sunday
        assert_eq!(record.delivery_day_of_week, Some(6));
        assert_eq!(record.delivery_month, Some(3));
    }

    #[test]
    fn test_parse_formats() {
        let expected = NaiveDate::from_ymd_opt(2022, 6, 15)
            .unwrap()
            .and_hms_opt(14, 5, 0)
            .unwrap();
        assert_eq!(parse_timestamp("2022-06-15 14:05:00"), Some(expected));
        assert_eq!(parse_timestamp("2022-06-15T14:05:00"), Some(expected));
        assert_eq!(parse_timestamp("2022-06-15 14:05"), Some(expected));
        assert_eq!(parse_timestamp("2022/06/15 14:05"), Some(expected));
        assert_eq!(parse_timestamp("2022-06-15T16:05:00+02:00"), Some(expected));
        assert_eq!(
            parse_timestamp(" 2022-06-15 "),
            NaiveDate::from_ymd_opt(2022, 6, 15).unwrap().and_hms_opt(0, 0, 0)
        );
        assert_eq!(parse_timestamp(""), None);
        assert_eq!(parse_timestamp("15/06/2022"), None);
        assert_eq!(parse_timestamp("2022-13-01"), None);
    }

    #[test]
    fn test_on_time_matches_delay_for_every_row() {
        let raws = vec![
            raw("2022-01-01", "2022-01-10", "2022-01-08"),
            raw("2022-01-01", "2022-01-10", "2022-01-10"),
            raw("2022-01-01", "2022-01-10", "2022-01-11"),
            raw("2022-01-01", "garbage", "2022-01-11"),
            raw("2022-01-01", "2022-01-10", ""),
        ];
        let table = derive_table(vec![], &raws);
        for row in table.rows() {
            match row.delivery_delay_days {
                Some(delay) => assert_eq!(row.on_time, Some(delay <= 0)),
                None => assert_eq!(row.on_time, None),
            }
            match row.delivered_at {
                Some(_) => {
                    assert!(row.delivery_day_of_week.unwrap() <= 6);
                    assert!((1..=12).contains(&row.delivery_month.unwrap()));
                }
                None => {
                    assert_eq!(row.delivery_day_of_week, None);
                    assert_eq!(row.delivery_month, None);
                }
            }
        }
    }

    #[test]
    fn test_rederive_is_identical() {
        let raws = vec![
            raw("2022-01-01", "2022-01-10", "2022-01-08"),
            raw("bad", "2022-02-10", "2022-02-12 08:00:00"),
        ];
        let table = derive_table(vec!["a".to_string()], &raws);
        let again = rederive_table(&table);
        assert_eq!(table, again);
        assert_eq!(rederive_table(&again), table);
    }
}
