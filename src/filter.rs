//! Purchase-date window filtering

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::ShipmentTable;

/// Inclusive range of purchase dates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// An inverted window matches nothing
    pub fn is_inverted(&self) -> bool {
        self.start > self.end
    }

    /// Build the window for a request.
    ///
    /// No requested bound means no filtering. A single bound is completed
    /// from the table's purchase-date range; with no range to borrow from,
    /// the open side collapses onto the given bound.
    pub fn resolve(
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
        range: Option<(NaiveDate, NaiveDate)>,
    ) -> Option<Self> {
        match (start, end) {
            (None, None) => None,
            (Some(start), Some(end)) => Some(Self::new(start, end)),
            (Some(start), None) => {
                let end = range.map(|(_, max)| max).unwrap_or(start);
                Some(Self::new(start, end))
            }
            (None, Some(end)) => {
                let start = range.map(|(min, _)| min).unwrap_or(end);
                Some(Self::new(start, end))
            }
        }
    }
}

/// Earliest and latest purchase date, used as default picker bounds
pub fn purchase_date_range(table: &ShipmentTable) -> Option<(NaiveDate, NaiveDate)> {
    table
        .rows()
        .iter()
        .filter_map(|r| r.purchased_at.map(|dt| dt.date()))
        .fold(None, |range, date| match range {
            None => Some((date, date)),
            Some((min, max)) => Some((min.min(date), max.max(date))),
        })
}

/// Rows whose purchase date lies within the window.
///
/// Rows without a parseable purchase timestamp never match.
pub fn filter_by_purchase_date(table: &ShipmentTable, window: DateWindow) -> ShipmentTable {
    let rows = table
        .rows()
        .iter()
        .filter(|r| {
            r.purchased_at
                .map(|dt| window.contains(dt.date()))
                .unwrap_or(false)
        })
        .cloned()
        .collect();
    table.with_rows(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::derive_table;
    use crate::models::RawShipment;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn table(purchases: &[&str]) -> ShipmentTable {
        let raws: Vec<RawShipment> = purchases
            .iter()
            .map(|p| RawShipment {
                purchase_timestamp: p.to_string(),
                estimated_delivery: "2023-01-10".to_string(),
                delivered_customer: "2023-01-08".to_string(),
                order_status: None,
                extra: vec![],
            })
            .collect();
        derive_table(vec![], &raws)
    }

    #[test]
    fn test_june_window_keeps_one_row() {
        let t = table(&["2022-01-01", "2022-06-15", "2022-12-31"]);
        let filtered = filter_by_purchase_date(&t, DateWindow::new(date(2022, 6, 1), date(2022, 6, 30)));
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered.rows()[0].raw.purchase_timestamp, "2022-06-15");
        // source untouched
        assert_eq!(t.len(), 3);
    }

    #[test]
    fn test_bounds_are_inclusive_by_date() {
        let t = table(&["2022-06-01 00:00:00", "2022-06-30 23:59:59", "2022-07-01 00:00:00"]);
        let filtered = filter_by_purchase_date(&t, DateWindow::new(date(2022, 6, 1), date(2022, 6, 30)));
        assert_eq!(filtered.len(), 2);
    }

    #[test]
    fn test_full_range_returns_full_table() {
        let t = table(&["2022-01-01", "2022-06-15 10:00:00", "2022-12-31 18:00:00"]);
        let (min, max) = purchase_date_range(&t).unwrap();
        assert_eq!((min, max), (date(2022, 1, 1), date(2022, 12, 31)));
        let filtered = filter_by_purchase_date(&t, DateWindow::new(min, max));
        assert_eq!(filtered, t);
    }

    #[test]
    fn test_filter_is_idempotent() {
        let t = table(&["2022-01-01", "2022-03-15", "2022-06-15", "bad"]);
        let window = DateWindow::new(date(2022, 2, 1), date(2022, 6, 30));
        let once = filter_by_purchase_date(&t, window);
        let twice = filter_by_purchase_date(&once, window);
        assert_eq!(once, twice);
        assert_eq!(once.len(), 2);
    }

    #[test]
    fn test_inverted_window_is_empty() {
        let t = table(&["2022-01-01", "2022-06-15"]);
        let window = DateWindow::new(date(2022, 12, 1), date(2022, 1, 1));
        assert!(window.is_inverted());
        assert!(filter_by_purchase_date(&t, window).is_empty());
    }

    #[test]
    fn test_unparseable_purchase_never_matches() {
        let t = table(&["", "nope"]);
        assert_eq!(purchase_date_range(&t), None);
        let window = DateWindow::new(date(1900, 1, 1), date(2100, 1, 1));
        assert!(filter_by_purchase_date(&t, window).is_empty());
    }

    #[test]
    fn test_resolve_fills_missing_side() {
        let range = Some((date(2022, 1, 1), date(2022, 12, 31)));
        assert_eq!(DateWindow::resolve(None, None, range), None);
        assert_eq!(
            DateWindow::resolve(Some(date(2022, 6, 1)), None, range),
            Some(DateWindow::new(date(2022, 6, 1), date(2022, 12, 31)))
        );
        assert_eq!(
            DateWindow::resolve(None, Some(date(2022, 6, 1)), range),
            Some(DateWindow::new(date(2022, 1, 1), date(2022, 6, 1)))
        );
        assert_eq!(
            DateWindow::resolve(Some(date(2022, 6, 1)), None, None),
            Some(DateWindow::new(date(2022, 6, 1), date(2022, 6, 1)))
        );
    }
}
