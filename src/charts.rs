//! Chart-ready data for the dashboard renderer
//!
//! Nothing here draws; each chart is a plain serializable table.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::calendar_names::day_name;
use crate::models::ShipmentTable;
use crate::summary::DelayBreakdown;

pub const HISTOGRAM_BINS: usize = 30;
const WHISKER_IQR: f64 = 1.5;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DelayHistogram {
    pub total: usize,
    pub bins: Vec<HistogramBin>,
}

/// Five-number summary for one weekday
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeekdayBox {
    pub day: u32,
    pub label: String,
    pub count: usize,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
    pub lower_whisker: f64,
    pub upper_whisker: f64,
    pub outliers: Vec<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusBar {
    pub status: String,
    pub on_time_rate: f64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSet {
    pub delay_histogram: DelayHistogram,
    pub weekday_box_plot: Vec<WeekdayBox>,
    /// Omitted when the table has no status column
    pub on_time_by_status: Option<Vec<StatusBar>>,
}

impl ChartSet {
    pub fn build(table: &ShipmentTable, breakdown: &DelayBreakdown) -> Self {
        Self {
            delay_histogram: delay_histogram(table, HISTOGRAM_BINS),
            weekday_box_plot: weekday_box_plot(table),
            on_time_by_status: on_time_by_status(breakdown),
        }
    }
}

/// Equal-width histogram over the defined delays.
///
/// The last bin is closed on the right so the maximum lands in it. A single
/// distinct value gets a one-day span centred on it.
pub fn delay_histogram(table: &ShipmentTable, bin_count: usize) -> DelayHistogram {
    let values: Vec<i64> = table.delays().collect();
    let (Some(min), Some(max)) = (values.iter().min(), values.iter().max()) else {
        return DelayHistogram {
            total: 0,
            bins: vec![],
        };
    };
    let bin_count = bin_count.max(1);

    let (lower, upper) = if min == max {
        (*min as f64 - 0.5, *max as f64 + 0.5)
    } else {
        (*min as f64, *max as f64)
    };
    let span = upper - lower;
    let edge = |i: usize| lower + span * i as f64 / bin_count as f64;

    let mut counts = vec![0usize; bin_count];
    for value in &values {
        let slot = ((*value as f64 - lower) / span * bin_count as f64).floor() as usize;
        counts[slot.min(bin_count - 1)] += 1;
    }

    let bins = counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| HistogramBin {
            lower: edge(i),
            upper: edge(i + 1),
            count,
        })
        .collect();

    DelayHistogram {
        total: values.len(),
        bins,
    }
}

/// Linear-interpolation quantile of sorted values
fn quantile(sorted: &[i64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    sorted[lo] as f64 + (sorted[hi] - sorted[lo]) as f64 * frac
}

/// Delay distribution per delivery weekday, Monday first
pub fn weekday_box_plot(table: &ShipmentTable) -> Vec<WeekdayBox> {
    let mut by_day: BTreeMap<u32, Vec<i64>> = BTreeMap::new();
    for record in table.rows() {
        if let (Some(day), Some(delay)) = (record.delivery_day_of_week, record.delivery_delay_days) {
            by_day.entry(day).or_default().push(delay);
        }
    }

    by_day
        .into_iter()
        .map(|(day, mut delays)| {
            delays.sort_unstable();
            let q1 = quantile(&delays, 0.25);
            let median = quantile(&delays, 0.5);
            let q3 = quantile(&delays, 0.75);
            let iqr = q3 - q1;
            let low_fence = q1 - WHISKER_IQR * iqr;
            let high_fence = q3 + WHISKER_IQR * iqr;

            let inside = delays
                .iter()
                .map(|d| *d as f64)
                .filter(|d| *d >= low_fence && *d <= high_fence);
            let lower_whisker = inside.clone().fold(f64::INFINITY, f64::min);
            let upper_whisker = inside.fold(f64::NEG_INFINITY, f64::max);
            let outliers = delays
                .iter()
                .copied()
                .filter(|d| (*d as f64) < low_fence || (*d as f64) > high_fence)
                .collect();

            WeekdayBox {
                day,
                label: day_name(day).to_string(),
                count: delays.len(),
                min: delays[0] as f64,
                q1,
                median,
                q3,
                max: delays[delays.len() - 1] as f64,
                lower_whisker,
                upper_whisker,
                outliers,
            }
        })
        .collect()
}

/// On-time rate per order status; statuses with no known delay are skipped
pub fn on_time_by_status(breakdown: &DelayBreakdown) -> Option<Vec<StatusBar>> {
    breakdown.by_status.as_ref().map(|groups| {
        groups
            .iter()
            .filter_map(|g| {
                g.on_time_rate.map(|rate| StatusBar {
                    status: g.key.clone(),
                    on_time_rate: rate,
                    count: g.count,
                })
            })
            .collect()
    })
}
