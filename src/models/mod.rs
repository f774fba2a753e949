//! Row types for the three persisted tables and the in-memory table values
//! built from them.

pub mod billing_record;
pub mod complaint;
pub mod date_format;
pub mod stock_item;

pub use billing_record::{BillingLedger, BillingRecord};
pub use complaint::{ComplaintLog, ComplaintRecord, ComplaintStatus};
pub use stock_item::{StockItem, StockTable, UpsertOutcome};

use rust_decimal::Decimal;
use validator::ValidationError;

pub(crate) fn validate_tyre_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        let mut err = ValidationError::new("tyre_name_empty");
        err.message = Some("Tyre name must not be empty".into());
        return Err(err);
    }
    Ok(())
}

pub(crate) fn validate_non_negative_price(price: &Decimal) -> Result<(), ValidationError> {
    if price.is_sign_negative() && !price.is_zero() {
        let mut err = ValidationError::new("price_negative");
        err.message = Some("Price must not be negative".into());
        return Err(err);
    }
    Ok(())
}
