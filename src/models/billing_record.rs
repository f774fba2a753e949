use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::date_format;
use crate::store::{Dataset, Record};

/// One completed sale. Rows are never edited once appended.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BillingRecord {
    pub bill_number: u64,
    #[serde(with = "date_format::bill_timestamp")]
    pub date: NaiveDateTime,
    pub tyre_name: String,
    pub size: String,
    pub brand: String,
    pub quantity: u32,
    #[serde(with = "rust_decimal::serde::str")]
    pub sell_price: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub total_price: Decimal,
}

impl Record for BillingRecord {
    const DATASET: Dataset = Dataset::Billing;
}

/// The append-only billing table.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BillingLedger {
    records: Vec<BillingRecord>,
}

impl BillingLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_rows(records: Vec<BillingRecord>) -> Self {
        Self { records }
    }

    /// Bill numbers are 1-based and derived from the row count.
    pub fn next_bill_number(&self) -> u64 {
        self.records.len() as u64 + 1
    }

    /// Sell prices recorded for `tyre_name`, oldest first.
    pub fn sell_prices_for<'a>(&'a self, tyre_name: &'a str) -> impl Iterator<Item = Decimal> + 'a {
        self.records
            .iter()
            .filter(move |record| record.tyre_name == tyre_name)
            .map(|record| record.sell_price)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &BillingRecord> {
        self.records.iter()
    }

    pub fn rows(&self) -> &[BillingRecord] {
        &self.records
    }

    pub fn last(&self) -> Option<&BillingRecord> {
        self.records.last()
    }

    pub(crate) fn append(&mut self, record: BillingRecord) {
        self.records.push(record);
    }
}
