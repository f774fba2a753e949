//! Flat-file persistence for the stock, billing and complaint tables.
//!
//! Every dataset has a fixed file name and a fixed column list. Stores load
//! and save whole tables; nothing is cached between calls and the last save
//! wins.

mod csv_store;
mod memory;

pub use csv_store::CsvStore;
pub use memory::MemoryStore;

use std::io::Read;

use csv::{ReaderBuilder, Trim, WriterBuilder};
use serde::{de::DeserializeOwned, Serialize};

use crate::{
    errors::ServiceError,
    models::{BillingLedger, BillingRecord, ComplaintLog, ComplaintRecord, StockItem, StockTable},
};

const STOCK_COLUMNS: &[&str] = &["TyreName", "Size", "Brand", "PurchasePrice", "Quantity"];
const BILLING_COLUMNS: &[&str] = &[
    "BillNumber",
    "Date",
    "TyreName",
    "Size",
    "Brand",
    "Quantity",
    "SellPrice",
    "TotalPrice",
];
const COMPLAINT_COLUMNS: &[&str] = &[
    "TyreName",
    "Size",
    "Brand",
    "Date",
    "Issue",
    "QuantityAffected",
    "Status",
];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, strum::Display, strum::EnumIter)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Dataset {
    Stock,
    Billing,
    Complaint,
}

impl Dataset {
    pub fn file_name(self) -> &'static str {
        match self {
            Dataset::Stock => "stock.csv",
            Dataset::Billing => "billing.csv",
            Dataset::Complaint => "complaint.csv",
        }
    }

    pub fn columns(self) -> &'static [&'static str] {
        match self {
            Dataset::Stock => STOCK_COLUMNS,
            Dataset::Billing => BILLING_COLUMNS,
            Dataset::Complaint => COMPLAINT_COLUMNS,
        }
    }
}

/// A row type bound to one dataset. Field order must match the dataset's
/// columns.
pub trait Record: Serialize + DeserializeOwned {
    const DATASET: Dataset;
}

/// Whole-table load and save.
pub trait TableStore {
    fn load_rows<R: Record>(&self) -> Result<Vec<R>, ServiceError>;

    fn save_rows<R: Record>(&self, rows: &[R]) -> Result<(), ServiceError>;

    fn load_stock(&self) -> Result<StockTable, ServiceError> {
        StockTable::from_rows(self.load_rows::<StockItem>()?)
    }

    fn save_stock(&self, stock: &StockTable) -> Result<(), ServiceError> {
        self.save_rows(stock.rows())
    }

    fn load_billing(&self) -> Result<BillingLedger, ServiceError> {
        Ok(BillingLedger::from_rows(self.load_rows::<BillingRecord>()?))
    }

    fn save_billing(&self, billing: &BillingLedger) -> Result<(), ServiceError> {
        self.save_rows(billing.rows())
    }

    fn load_complaints(&self) -> Result<ComplaintLog, ServiceError> {
        Ok(ComplaintLog::from_rows(self.load_rows::<ComplaintRecord>()?))
    }

    fn save_complaints(&self, complaints: &ComplaintLog) -> Result<(), ServiceError> {
        self.save_rows(complaints.rows())
    }
}

/// Header-only file contents for `dataset`.
pub(crate) fn encode_header(dataset: Dataset) -> Result<Vec<u8>, ServiceError> {
    encode_rows::<StockItem>(dataset, &[])
}

/// The header row is written explicitly so an empty table still carries its
/// columns.
pub(crate) fn encode_rows<R: Serialize>(dataset: Dataset, rows: &[R]) -> Result<Vec<u8>, ServiceError> {
    let mut writer = WriterBuilder::new().has_headers(false).from_writer(Vec::new());
    writer.write_record(dataset.columns())?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer
        .into_inner()
        .map_err(|err| ServiceError::Io(err.into_error()))
}

/// Empty input decodes as an empty table. Any other header must match the
/// dataset's columns exactly.
pub(crate) fn decode_rows<R: Record, T: Read>(input: T) -> Result<Vec<R>, ServiceError> {
    let dataset = R::DATASET;
    let mut reader = ReaderBuilder::new().trim(Trim::All).from_reader(input);
    let found: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    if found.is_empty() {
        return Ok(Vec::new());
    }
    if found != dataset.columns() {
        return Err(ServiceError::Schema {
            dataset,
            expected: dataset.columns().iter().map(|c| c.to_string()).collect(),
            found,
        });
    }
    reader
        .deserialize()
        .collect::<Result<Vec<R>, csv::Error>>()
        .map_err(ServiceError::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    use crate::models::ComplaintStatus;

    #[test]
    fn header_only_table_lists_columns_in_order() {
        let bytes = encode_header(Dataset::Billing).unwrap();
        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            "BillNumber,Date,TyreName,Size,Brand,Quantity,SellPrice,TotalPrice\n"
        );
    }

    #[test]
    fn stock_rows_are_written_in_column_order() {
        let rows = vec![StockItem::new("CEAT Milaze", "155/80 R13", "CEAT", dec!(2450.50), 6)];
        let text = String::from_utf8(encode_rows(Dataset::Stock, &rows).unwrap()).unwrap();
        assert_eq!(
            text,
            "TyreName,Size,Brand,PurchasePrice,Quantity\nCEAT Milaze,155/80 R13,CEAT,2450.50,6\n"
        );
    }

    #[test]
    fn billing_dates_use_day_month_year() {
        let text = "BillNumber,Date,TyreName,Size,Brand,Quantity,SellPrice,TotalPrice\n\
                    1,05-03-2024 14:30,A,145/80 R12,MRF,2,120,240\n";
        let rows: Vec<BillingRecord> = decode_rows(text.as_bytes()).unwrap();
        assert_eq!(
            rows[0].date,
            NaiveDate::from_ymd_opt(2024, 3, 5)
                .unwrap()
                .and_hms_opt(14, 30, 0)
                .unwrap()
        );
        assert_eq!(rows[0].total_price, dec!(240));
    }

    #[test]
    fn complaint_status_decodes_by_name() {
        let text = "TyreName,Size,Brand,Date,Issue,QuantityAffected,Status\n\
                    A,145/80 R12,MRF,01-02-2024,sidewall bulge,1,Resolved\n";
        let rows: Vec<ComplaintRecord> = decode_rows(text.as_bytes()).unwrap();
        assert_eq!(rows[0].status, ComplaintStatus::Resolved);
    }

    #[test]
    fn unknown_complaint_status_survives_a_round_trip() {
        let text = "TyreName,Size,Brand,Date,Issue,QuantityAffected,Status\n\
                    A,145/80 R12,MRF,01-02-2024,sidewall bulge,1,Closed\n";
        let rows: Vec<ComplaintRecord> = decode_rows(text.as_bytes()).unwrap();
        assert_eq!(rows[0].status, ComplaintStatus::Other("Closed".to_string()));
        let written = encode_rows(Dataset::Complaint, &rows).unwrap();
        assert_eq!(String::from_utf8(written).unwrap(), text);
    }

    #[test]
    fn mismatched_header_is_a_schema_error() {
        let text = "Name,Size,Brand,Price,Qty\nA,1,B,2,3\n";
        let result = decode_rows::<StockItem, _>(text.as_bytes());
        assert_matches!(result, Err(ServiceError::Schema { dataset: Dataset::Stock, .. }));
    }

    #[test]
    fn empty_input_is_an_empty_table() {
        let rows: Vec<StockItem> = decode_rows(&b""[..]).unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn malformed_quantity_is_a_csv_error() {
        let text = "TyreName,Size,Brand,PurchasePrice,Quantity\nA,1,B,100,-4\n";
        let result = decode_rows::<StockItem, _>(text.as_bytes());
        assert_matches!(result, Err(ServiceError::Csv(_)));
    }
}
