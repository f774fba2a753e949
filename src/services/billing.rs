use chrono::{NaiveDateTime, Timelike};
use rust_decimal::Decimal;
use serde::Deserialize;
use validator::Validate;

use super::inventory::decrement_stock;
use crate::{
    errors::ServiceError,
    models::{validate_non_negative_price, validate_tyre_name, BillingLedger, BillingRecord, StockTable},
};

#[derive(Clone, Debug, Deserialize, Validate)]
pub struct BillRequest {
    #[validate(custom = "validate_tyre_name")]
    pub tyre_name: String,
    #[validate(range(min = 1))]
    pub quantity: u32,
    #[validate(custom = "validate_non_negative_price")]
    pub sell_price: Decimal,
}

impl BillRequest {
    pub fn new(tyre_name: impl Into<String>, quantity: u32, sell_price: Decimal) -> Self {
        Self {
            tyre_name: tyre_name.into().trim().to_string(),
            quantity,
            sell_price,
        }
    }
}

/// New table values produced by a sale. Nothing is persisted yet.
#[derive(Clone, Debug)]
pub struct BillOutcome {
    pub stock: StockTable,
    pub billing: BillingLedger,
    pub record: BillingRecord,
}

/// Records a sale: takes the quantity off stock and appends a numbered bill.
/// On any failure neither table changes.
pub fn create_bill(
    stock: &StockTable,
    billing: &BillingLedger,
    request: &BillRequest,
    now: NaiveDateTime,
) -> Result<BillOutcome, ServiceError> {
    request.validate()?;
    let stock = decrement_stock(stock, &request.tyre_name, request.quantity)?;
    let item = stock
        .get(&request.tyre_name)
        .ok_or_else(|| ServiceError::not_found_tyre(&request.tyre_name))?;

    let total_price = Decimal::from(request.quantity)
        .checked_mul(request.sell_price)
        .ok_or_else(|| ServiceError::ValidationError("bill total is too large".to_string()))?;

    let record = BillingRecord {
        bill_number: billing.next_bill_number(),
        date: to_minute(now),
        tyre_name: item.tyre_name.clone(),
        size: item.size.clone(),
        brand: item.brand.clone(),
        quantity: request.quantity,
        sell_price: request.sell_price,
        total_price,
    };

    let mut billing = billing.clone();
    billing.append(record.clone());
    Ok(BillOutcome { stock, billing, record })
}

// The billing file only keeps minutes.
fn to_minute(now: NaiveDateTime) -> NaiveDateTime {
    now.with_second(0)
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(now)
}
