use chrono::NaiveDateTime;

pub const PURCHASE_COLUMN: &str = "order_purchase_timestamp_item";
pub const ESTIMATED_COLUMN: &str = "order_estimated_delivery_date_item";
pub const DELIVERED_COLUMN: &str = "order_delivered_customer_date_item";
pub const STATUS_COLUMN: &str = "order_status_item";

/// Raw row from CSV ingestion, cells kept exactly as read
#[derive(Debug, Clone, PartialEq)]
pub struct RawShipment {
    pub purchase_timestamp: String,
    pub estimated_delivery: String,
    pub delivered_customer: String,
    pub order_status: Option<String>,
    /// Uninterpreted columns in header order
    pub extra: Vec<(String, String)>,
}

/// Shipment row with parsed timestamps and derived delay columns
#[derive(Debug, Clone, PartialEq)]
pub struct ShipmentRecord {
    pub raw: RawShipment,
    pub purchased_at: Option<NaiveDateTime>,
    pub estimated_at: Option<NaiveDateTime>,
    pub delivered_at: Option<NaiveDateTime>,
    pub delivery_delay_days: Option<i64>,
    pub on_time: Option<bool>,
    /// 0 = Monday .. 6 = Sunday
    pub delivery_day_of_week: Option<u32>,
    /// 1 = January .. 12 = December
    pub delivery_month: Option<u32>,
}

impl ShipmentRecord {
    /// Order status, if the row has a non-blank one
    pub fn status(&self) -> Option<&str> {
        self.raw
            .order_status
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

/// Immutable table of derived shipment rows
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ShipmentTable {
    headers: Vec<String>,
    has_status_column: bool,
    rows: Vec<ShipmentRecord>,
}

impl ShipmentTable {
    pub fn new(headers: Vec<String>, rows: Vec<ShipmentRecord>) -> Self {
        let has_status_column = headers.iter().any(|h| h == STATUS_COLUMN);
        Self {
            headers,
            has_status_column,
            rows,
        }
    }

    /// New table with the same columns and a different set of rows
    pub fn with_rows(&self, rows: Vec<ShipmentRecord>) -> Self {
        Self {
            headers: self.headers.clone(),
            has_status_column: self.has_status_column,
            rows,
        }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn has_status_column(&self) -> bool {
        self.has_status_column
    }

    pub fn rows(&self) -> &[ShipmentRecord] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Defined delay values, in row order
    pub fn delays(&self) -> impl Iterator<Item = i64> + '_ {
        self.rows.iter().filter_map(|r| r.delivery_delay_days)
    }
}
