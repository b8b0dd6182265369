//! CSV reading into a derived shipment table

use csv::{ReaderBuilder, StringRecord};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{info, warn};

use super::AcquisitionError;
use crate::features::derive_table;
use crate::models::{
    RawShipment, ShipmentTable, DELIVERED_COLUMN, ESTIMATED_COLUMN, PURCHASE_COLUMN, STATUS_COLUMN,
};

const MAX_LOGGED_ROW_ERRORS: usize = 5;

/// Positions of the interpreted columns within a header row
struct ColumnLayout {
    purchase: usize,
    estimated: usize,
    delivered: usize,
    status: Option<usize>,
    extra: Vec<(usize, String)>,
}

impl ColumnLayout {
    fn from_headers(headers: &[String], origin: &Path) -> Result<Self, AcquisitionError> {
        let find = |name: &str| headers.iter().position(|h| h == name);
        let require = |column: &'static str| {
            find(column).ok_or_else(|| AcquisitionError::MissingColumn {
                column,
                path: origin.to_path_buf(),
            })
        };

        let purchase = require(PURCHASE_COLUMN)?;
        let estimated = require(ESTIMATED_COLUMN)?;
        let delivered = require(DELIVERED_COLUMN)?;
        let status = find(STATUS_COLUMN);

        let interpreted = [Some(purchase), Some(estimated), Some(delivered), status];
        let extra = headers
            .iter()
            .enumerate()
            .filter(|(i, _)| !interpreted.contains(&Some(*i)))
            .map(|(i, h)| (i, h.clone()))
            .collect();

        Ok(Self {
            purchase,
            estimated,
            delivered,
            status,
            extra,
        })
    }

    fn raw(&self, record: &StringRecord) -> RawShipment {
        let cell = |i: usize| record.get(i).unwrap_or_default().to_string();
        RawShipment {
            purchase_timestamp: cell(self.purchase),
            estimated_delivery: cell(self.estimated),
            delivered_customer: cell(self.delivered),
            order_status: self.status.map(cell),
            extra: self
                .extra
                .iter()
                .map(|(i, name)| (name.clone(), cell(*i)))
                .collect(),
        }
    }
}

/// Load and derive a shipment CSV from disk
pub fn load_csv(path: &Path) -> Result<ShipmentTable, AcquisitionError> {
    info!("Reading CSV from {:?}", path);
    let file = File::open(path).map_err(|e| AcquisitionError::io(path, e))?;
    parse_csv(file, path)
}

/// Parse shipment CSV from any reader; `origin` only labels errors and logs.
///
/// Rows the reader rejects (wrong field count, invalid UTF-8) are skipped.
pub fn parse_csv<R: Read>(input: R, origin: &Path) -> Result<ShipmentTable, AcquisitionError> {
    let mut reader = ReaderBuilder::new().has_headers(true).from_reader(input);

    let headers: Vec<String> = reader
        .headers()
        .map_err(|source| AcquisitionError::Malformed {
            path: origin.to_path_buf(),
            source,
        })?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
        .collect();
    let layout = ColumnLayout::from_headers(&headers, origin)?;

    let mut raws = Vec::new();
    let mut error_count = 0;
    for (i, result) in reader.records().enumerate() {
        match result {
            Ok(record) => raws.push(layout.raw(&record)),
            Err(e) => {
                if error_count < MAX_LOGGED_ROW_ERRORS {
                    warn!("Skipping row {} of {:?}: {}", i + 1, origin, e);
                }
                error_count += 1;
            }
        }
    }

    info!(
        "Parsed {} rows from {:?} ({} skipped)",
        raws.len(),
        origin,
        error_count
    );

    Ok(derive_table(headers, &raws))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = "\
order_id,order_purchase_timestamp_item,order_estimated_delivery_date_item,order_delivered_customer_date_item,order_status_item
a1,2022-01-01 10:00:00,2022-01-10 00:00:00,2022-01-08 12:00:00,delivered
a2,2022-06-15 09:30:00,2022-06-20 00:00:00,,shipped
a3,2022-12-31 23:00:00,2023-01-05 00:00:00,2023-01-07 08:00:00,delivered
";

    #[test]
    fn test_parse_sample() {
        let table = parse_csv(SAMPLE.as_bytes(), Path::new("sample.csv")).unwrap();
        assert_eq!(table.len(), 3);
        assert!(table.has_status_column());
        assert_eq!(table.headers()[0], "order_id");

        let first = &table.rows()[0];
        assert_eq!(first.delivery_delay_days, Some(-2));
        assert_eq!(first.on_time, Some(true));
        assert_eq!(first.status(), Some("delivered"));
        assert_eq!(first.raw.extra, vec![("order_id".to_string(), "a1".to_string())]);

        assert_eq!(table.rows()[1].delivery_delay_days, None);
        assert_eq!(table.rows()[2].delivery_delay_days, Some(2));
    }

    #[test]
    fn test_status_column_is_optional() {
        let csv = "\
order_purchase_timestamp_item,order_estimated_delivery_date_item,order_delivered_customer_date_item
2022-01-01,2022-01-10,2022-01-08
";
        let table = parse_csv(csv.as_bytes(), Path::new("no_status.csv")).unwrap();
        assert!(!table.has_status_column());
        assert_eq!(table.rows()[0].status(), None);
    }

    #[test]
    fn test_missing_timestamp_column() {
        let csv = "order_purchase_timestamp_item,order_delivered_customer_date_item\n2022-01-01,2022-01-08\n";
        let err = parse_csv(csv.as_bytes(), Path::new("bad.csv")).unwrap_err();
        match err {
            AcquisitionError::MissingColumn { column, .. } => assert_eq!(column, ESTIMATED_COLUMN),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_empty_input_is_missing_columns() {
        let err = parse_csv("".as_bytes(), Path::new("empty.csv")).unwrap_err();
        assert!(matches!(err, AcquisitionError::MissingColumn { .. }));
    }

    #[test]
    fn test_ragged_rows_are_skipped() {
        let csv = "\
order_purchase_timestamp_item,order_estimated_delivery_date_item,order_delivered_customer_date_item
2022-01-01,2022-01-10,2022-01-08
2022-01-02,2022-01-10
2022-01-03,2022-01-10,2022-01-12
";
        let table = parse_csv(csv.as_bytes(), Path::new("ragged.csv")).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows()[1].delivery_delay_days, Some(2));
    }

    #[test]
    fn test_invalid_utf8_header_is_malformed() {
        let mut csv = b"order_purchase_timestamp_item,order_estimated_delivery_date_item,order_delivered_customer_date_item,".to_vec();
        csv.extend_from_slice(b"\xff\xfe,x\n2022-01-01,2022-01-10,2022-01-08,a,b\n");
        let err = parse_csv(&csv[..], Path::new("binary.csv")).unwrap_err();
        assert!(matches!(err, AcquisitionError::Malformed { .. }));
        assert!(err.to_string().contains("binary.csv"));
    }

    #[test]
    fn test_invalid_utf8_row_is_skipped() {
        let mut csv = b"order_purchase_timestamp_item,order_estimated_delivery_date_item,order_delivered_customer_date_item,order_status_item\n".to_vec();
        csv.extend_from_slice(b"2022-01-01,2022-01-10,2022-01-08,deliv\xffered\n");
        csv.extend_from_slice(b"2022-01-03,2022-01-10,2022-01-12,delivered\n");
        let table = parse_csv(&csv[..], Path::new("mixed.csv")).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.rows()[0].delivery_delay_days, Some(2));
    }

    #[test]
    fn test_headers_are_trimmed() {
        let csv = "\u{feff} order_purchase_timestamp_item , order_estimated_delivery_date_item,order_delivered_customer_date_item\n2022-01-01,2022-01-10,2022-01-08\n";
        let table = parse_csv(csv.as_bytes(), Path::new("bom.csv")).unwrap();
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_load_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();
        let table = load_csv(file.path()).unwrap();
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_csv(&dir.path().join("absent.csv")).unwrap_err();
        assert!(matches!(err, AcquisitionError::NotFound(_)));
        assert!(err.to_string().contains("absent.csv"));
    }
}
