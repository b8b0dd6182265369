//! Delay statistics and grouped tables
//!
//! Statistics that cannot be computed (empty table, every delay undefined)
//! come back as `None` and are rendered as "unknown" by the report layer.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::calendar_names::{day_name, month_name};
use crate::models::{ShipmentRecord, ShipmentTable};

// ============================================================================
// Data Structures
// ============================================================================

/// Aggregated delay metrics for one group of rows
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupStats {
    /// Weekday or month number; `None` for status groups
    pub index: Option<u32>,
    pub key: String,
    pub count: usize,
    pub delay_count: usize,
    pub mean_delay_days: Option<f64>,
    /// Fraction of rows with a known delay that were on time
    pub on_time_rate: Option<f64>,
}

/// The group with the highest mean delay
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupPeak {
    pub index: Option<u32>,
    pub key: String,
    pub mean_delay_days: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DelayBreakdown {
    pub by_weekday: Vec<GroupStats>,
    pub by_month: Vec<GroupStats>,
    /// `None` when the table has no status column
    pub by_status: Option<Vec<GroupStats>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DelaySummary {
    pub record_count: usize,
    pub delay_count: usize,
    pub mean_delay_days: Option<f64>,
    pub on_time_pct: Option<f64>,
    pub worst_weekday: Option<GroupPeak>,
    pub worst_month: Option<GroupPeak>,
    pub worst_status: Option<GroupPeak>,
    pub status_column_present: bool,
}

// ============================================================================
// Accumulation
// ============================================================================

#[derive(Debug, Default, Clone, Copy)]
struct DelayAccumulator {
    rows: usize,
    delay_sum: i64,
    delay_count: usize,
    on_time_count: usize,
}

impl DelayAccumulator {
    fn push(&mut self, record: &ShipmentRecord) {
        self.rows += 1;
        if let Some(delay) = record.delivery_delay_days {
            self.delay_sum += delay;
            self.delay_count += 1;
        }
        if record.on_time == Some(true) {
            self.on_time_count += 1;
        }
    }

    fn mean_delay(&self) -> Option<f64> {
        if self.delay_count > 0 {
            Some(self.delay_sum as f64 / self.delay_count as f64)
        } else {
            None
        }
    }

    fn on_time_rate(&self) -> Option<f64> {
        if self.delay_count > 0 {
            Some(self.on_time_count as f64 / self.delay_count as f64)
        } else {
            None
        }
    }

    fn into_group(self, index: Option<u32>, key: String) -> GroupStats {
        GroupStats {
            index,
            key,
            count: self.rows,
            delay_count: self.delay_count,
            mean_delay_days: self.mean_delay(),
            on_time_rate: self.on_time_rate(),
        }
    }
}

/// Highest mean delay; on ties the earlier group wins
fn peak(groups: &[GroupStats]) -> Option<GroupPeak> {
    let mut best: Option<GroupPeak> = None;
    for group in groups {
        let Some(mean) = group.mean_delay_days else {
            continue;
        };
        if best.as_ref().map_or(true, |b| mean > b.mean_delay_days) {
            best = Some(GroupPeak {
                index: group.index,
                key: group.key.clone(),
                mean_delay_days: mean,
            });
        }
    }
    best
}

// ============================================================================
// Aggregation
// ============================================================================

impl DelayBreakdown {
    pub fn from_table(table: &ShipmentTable) -> Self {
        let mut weekdays: BTreeMap<u32, DelayAccumulator> = BTreeMap::new();
        let mut months: BTreeMap<u32, DelayAccumulator> = BTreeMap::new();
        let mut statuses: BTreeMap<String, DelayAccumulator> = BTreeMap::new();

        for record in table.rows() {
            if let Some(day) = record.delivery_day_of_week {
                weekdays.entry(day).or_default().push(record);
            }
            if let Some(month) = record.delivery_month {
                months.entry(month).or_default().push(record);
            }
            if let Some(status) = record.status() {
                statuses.entry(status.to_string()).or_default().push(record);
            }
        }

        let by_weekday = weekdays
            .into_iter()
            .map(|(day, acc)| acc.into_group(Some(day), day_name(day).to_string()))
            .collect();
        let by_month = months
            .into_iter()
            .map(|(month, acc)| acc.into_group(Some(month), month_name(month).to_string()))
            .collect();
        let by_status = table.has_status_column().then(|| {
            statuses
                .into_iter()
                .map(|(status, acc)| acc.into_group(None, status))
                .collect()
        });

        Self {
            by_weekday,
            by_month,
            by_status,
        }
    }
}

impl DelaySummary {
    pub fn compute(table: &ShipmentTable, breakdown: &DelayBreakdown) -> Self {
        let mut overall = DelayAccumulator::default();
        for record in table.rows() {
            overall.push(record);
        }

        Self {
            record_count: overall.rows,
            delay_count: overall.delay_count,
            mean_delay_days: overall.mean_delay(),
            on_time_pct: overall.on_time_rate().map(|r| r * 100.0),
            worst_weekday: peak(&breakdown.by_weekday),
            worst_month: peak(&breakdown.by_month),
            worst_status: breakdown.by_status.as_deref().and_then(peak),
            status_column_present: table.has_status_column(),
        }
    }
}

/// Scalar statistics plus the grouped tables they were drawn from
pub fn summarize(table: &ShipmentTable) -> (DelaySummary, DelayBreakdown) {
    let breakdown = DelayBreakdown::from_table(table);
    let summary = DelaySummary::compute(table, &breakdown);
    (summary, breakdown)
}
