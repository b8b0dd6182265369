//! One pass from a loaded table and a date window to the dashboard view

use serde::Serialize;
use tracing::debug;

use crate::filter::{filter_by_purchase_date, DateWindow};
use crate::models::ShipmentTable;
use crate::report::DashboardReport;

pub const NO_DATA_WARNING: &str = "No shipments match the selected date range.";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DashboardView {
    /// The dataset could not be acquired
    Unavailable { message: String },
    /// The filtered table is empty; nothing is computed
    NoData {
        warning: String,
        window: Option<DateWindow>,
    },
    Ready(Box<DashboardReport>),
}

impl DashboardView {
    pub fn is_ready(&self) -> bool {
        matches!(self, DashboardView::Ready(_))
    }
}

/// Filter the table (when a window is given) and build the report
pub fn build_dashboard(table: &ShipmentTable, window: Option<DateWindow>) -> DashboardView {
    let report = match window {
        Some(w) => {
            let filtered = filter_by_purchase_date(table, w);
            debug!(
                "Window {}..{} kept {}/{} rows",
                w.start,
                w.end,
                filtered.len(),
                table.len()
            );
            if filtered.is_empty() {
                return DashboardView::NoData {
                    warning: NO_DATA_WARNING.to_string(),
                    window,
                };
            }
            DashboardReport::build(&filtered, window)
        }
        None => {
            if table.is_empty() {
                return DashboardView::NoData {
                    warning: NO_DATA_WARNING.to_string(),
                    window,
                };
            }
            DashboardReport::build(table, None)
        }
    };
    DashboardView::Ready(Box::new(report))
}
