//! Dashboard report assembly and Markdown summary text

use serde::Serialize;

use crate::charts::ChartSet;
use crate::filter::DateWindow;
use crate::models::{ShipmentTable, STATUS_COLUMN};
use crate::summary::{summarize, DelayBreakdown, DelaySummary, GroupPeak};

pub const PAGE_TITLE: &str = "Shipment Delivery Dashboard";
pub const PAGE_HEADER: &str = "Delivery timeliness and shipping patterns";
pub const UNKNOWN: &str = "unknown";

/// Everything the dashboard page shows for one request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardReport {
    pub title: String,
    pub header: String,
    pub window: Option<DateWindow>,
    pub summary: DelaySummary,
    pub breakdown: DelayBreakdown,
    pub charts: ChartSet,
    pub notices: Vec<String>,
    pub markdown: String,
}

impl DashboardReport {
    pub fn build(table: &ShipmentTable, window: Option<DateWindow>) -> Self {
        let (summary, breakdown) = summarize(table);
        let charts = ChartSet::build(table, &breakdown);
        let notices = notices(&summary);
        let markdown = render_markdown(&summary, window);

        Self {
            title: PAGE_TITLE.to_string(),
            header: PAGE_HEADER.to_string(),
            window,
            summary,
            breakdown,
            charts,
            notices,
            markdown,
        }
    }
}

fn notices(summary: &DelaySummary) -> Vec<String> {
    let mut notices = Vec::new();
    if !summary.status_column_present {
        notices.push(format!(
            "Column '{}' is not available in this dataset; the status chart and status statistic are omitted.",
            STATUS_COLUMN
        ));
    }
    let undefined = summary.record_count - summary.delay_count;
    if undefined > 0 {
        notices.push(format!(
            "{} of {} shipments have no parseable estimated or delivered date and are excluded from delay statistics.",
            undefined, summary.record_count
        ));
    }
    notices
}

pub fn format_days(days: Option<f64>) -> String {
    match days {
        Some(d) => format!("{:.2} days", d),
        None => UNKNOWN.to_string(),
    }
}

pub fn format_pct(pct: Option<f64>) -> String {
    match pct {
        Some(p) => format!("{:.1}%", p),
        None => UNKNOWN.to_string(),
    }
}

fn peak_sentence(subject: &str, noun: &str, peak: Option<&GroupPeak>, quote: bool) -> String {
    match peak {
        Some(p) if quote => format!(
            "{} \"{}\" has the highest mean delay ({})",
            subject,
            p.key,
            format_days(Some(p.mean_delay_days))
        ),
        Some(p) => format!(
            "{} {} have the highest mean delay ({})",
            subject,
            p.key,
            format_days(Some(p.mean_delay_days))
        ),
        None => format!("the most delayed {} is {}", noun, UNKNOWN),
    }
}

/// Markdown summary with the statistics interpolated
pub fn render_markdown(summary: &DelaySummary, window: Option<DateWindow>) -> String {
    let mut lines = vec!["## Summary".to_string(), String::new()];

    let scope = match window {
        Some(w) => format!(
            "_Purchases from {} to {}, {} shipments._",
            w.start, w.end, summary.record_count
        ),
        None => format!("_All purchases, {} shipments._", summary.record_count),
    };
    lines.push(scope);
    lines.push(String::new());

    lines.push(format!(
        "1. **Delivery delay**: the average delay is {}; {} of shipments arrived on or before the estimated date.",
        format_days(summary.mean_delay_days),
        format_pct(summary.on_time_pct)
    ));
    lines.push(format!(
        "2. **Weekday pattern**: {}.",
        peak_sentence("deliveries on", "weekday", summary.worst_weekday.as_ref(), false)
    ));
    lines.push(format!(
        "3. **Seasonal pattern**: {}.",
        peak_sentence("deliveries in", "month", summary.worst_month.as_ref(), false)
    ));
    if summary.status_column_present {
        lines.push(format!(
            "4. **Order status**: {}.",
            peak_sentence("status", "status", summary.worst_status.as_ref(), true)
        ));
    }

    lines.join("\n") + "\n"
}
