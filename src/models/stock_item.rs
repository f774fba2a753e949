use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{validate_non_negative_price, validate_tyre_name};
use crate::{
    errors::ServiceError,
    store::{Dataset, Record},
};

/// One row of the stock table. `tyre_name` is the key.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "PascalCase")]
pub struct StockItem {
    #[validate(custom = "validate_tyre_name")]
    pub tyre_name: String,
    pub size: String,
    pub brand: String,
    #[serde(with = "rust_decimal::serde::str")]
    #[validate(custom = "validate_non_negative_price")]
    pub purchase_price: Decimal,
    pub quantity: u32,
}

impl StockItem {
    pub fn new(
        tyre_name: impl Into<String>,
        size: impl Into<String>,
        brand: impl Into<String>,
        purchase_price: Decimal,
        quantity: u32,
    ) -> Self {
        Self {
            tyre_name: tyre_name.into().trim().to_string(),
            size: size.into().trim().to_string(),
            brand: brand.into().trim().to_string(),
            purchase_price,
            quantity,
        }
    }
}

impl Record for StockItem {
    const DATASET: Dataset = Dataset::Stock;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum UpsertOutcome {
    Inserted,
    Updated,
}

/// The stock table: rows in file order plus a `tyre_name -> row` index.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StockTable {
    items: Vec<StockItem>,
    index: HashMap<String, usize>,
}

impl StockTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the table from loaded rows. A repeated tyre name is rejected
    /// rather than resolved by position.
    pub fn from_rows(rows: Vec<StockItem>) -> Result<Self, ServiceError> {
        let mut index = HashMap::with_capacity(rows.len());
        for (position, item) in rows.iter().enumerate() {
            if index.insert(item.tyre_name.clone(), position).is_some() {
                return Err(ServiceError::ValidationError(format!(
                    "stock table lists tyre '{}' more than once",
                    item.tyre_name
                )));
            }
        }
        Ok(Self { items: rows, index })
    }

    pub fn get(&self, tyre_name: &str) -> Option<&StockItem> {
        self.index.get(tyre_name).map(|&position| &self.items[position])
    }

    pub fn contains(&self, tyre_name: &str) -> bool {
        self.index.contains_key(tyre_name)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &StockItem> {
        self.items.iter()
    }

    pub fn rows(&self) -> &[StockItem] {
        &self.items
    }

    pub fn into_rows(self) -> Vec<StockItem> {
        self.items
    }

    pub(crate) fn get_mut(&mut self, tyre_name: &str) -> Option<&mut StockItem> {
        match self.index.get(tyre_name) {
            Some(&position) => self.items.get_mut(position),
            None => None,
        }
    }

    /// Overwrites the row with the same name in place, or appends.
    pub(crate) fn upsert(&mut self, item: StockItem) -> UpsertOutcome {
        match self.index.get(&item.tyre_name) {
            Some(&position) => {
                self.items[position] = item;
                UpsertOutcome::Updated
            }
            None => {
                self.index.insert(item.tyre_name.clone(), self.items.len());
                self.items.push(item);
                UpsertOutcome::Inserted
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use rust_decimal_macros::dec;

    fn item(name: &str, quantity: u32) -> StockItem {
        StockItem::new(name, "145/80 R12", "MRF", dec!(2100), quantity)
    }

    #[test]
    fn upsert_keeps_row_position_on_update() {
        let mut table = StockTable::new();
        assert_eq!(table.upsert(item("A", 4)), UpsertOutcome::Inserted);
        assert_eq!(table.upsert(item("B", 2)), UpsertOutcome::Inserted);
        assert_eq!(table.upsert(item("A", 9)), UpsertOutcome::Updated);

        let names: Vec<_> = table.iter().map(|i| i.tyre_name.as_str()).collect();
        assert_eq!(names, ["A", "B"]);
        assert_eq!(table.get("A").map(|i| i.quantity), Some(9));
    }

    #[test]
    fn duplicate_names_in_loaded_rows_are_rejected() {
        let result = StockTable::from_rows(vec![item("A", 1), item("A", 2)]);
        assert_matches!(result, Err(ServiceError::ValidationError(msg)) if msg.contains("'A'"));
    }

    #[test]
    fn new_trims_text_fields() {
        let item = StockItem::new("  Apollo Alnac ", " 185/65 R15", "Apollo ", dec!(3400), 1);
        assert_eq!(item.tyre_name, "Apollo Alnac");
        assert_eq!(item.size, "185/65 R15");
        assert_eq!(item.brand, "Apollo");
    }
}
