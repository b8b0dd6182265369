//! Shared business logic for the dashboard API
//!
//! Each request runs the whole pipeline against the cached table.

use chrono::NaiveDate;
use std::sync::Arc;
use tracing::warn;

use crate::acquisition::{AcquisitionError, DataLoader, DataSource};
use crate::filter::{purchase_date_range, DateWindow};
use crate::models::ShipmentTable;
use crate::pipeline::{build_dashboard, DashboardView};

#[derive(Debug, Clone, PartialEq)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub record_count: usize,
}

pub struct DashboardService {
    source: DataSource,
    loader: DataLoader,
}

impl DashboardService {
    pub fn new(source: DataSource, loader: DataLoader) -> Self {
        Self { source, loader }
    }

    pub fn source(&self) -> &DataSource {
        &self.source
    }

    pub async fn table(&self) -> Result<Arc<ShipmentTable>, AcquisitionError> {
        self.loader.load(&self.source).await
    }

    /// Default date-picker bounds
    pub async fn date_range(&self) -> Result<DateRange, AcquisitionError> {
        let table = self.table().await?;
        let range = purchase_date_range(&table);
        Ok(DateRange {
            start: range.map(|(min, _)| min),
            end: range.map(|(_, max)| max),
            record_count: table.len(),
        })
    }

    pub async fn dashboard(&self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> DashboardView {
        let table = match self.table().await {
            Ok(table) => table,
            Err(e) => {
                warn!("Data unavailable for {}: {}", self.source, e);
                return DashboardView::Unavailable {
                    message: e.to_string(),
                };
            }
        };
        let window = DateWindow::resolve(start, end, purchase_date_range(&table));
        build_dashboard(&table, window)
    }

    pub async fn invalidate(&self) -> bool {
        self.loader.invalidate(&self.source).await
    }
}
