use tracing::debug;
use validator::Validate;

use crate::{
    errors::ServiceError,
    models::{StockItem, StockTable},
};

/// Writes `item` into a copy of `stock`: an existing row with the same tyre
/// name is overwritten in place, otherwise the row is appended.
pub fn upsert_stock(stock: &StockTable, item: StockItem) -> Result<StockTable, ServiceError> {
    item.validate()?;
    let mut next = stock.clone();
    let outcome = next.upsert(item);
    debug!(%outcome, rows = next.len(), "Stock row written");
    Ok(next)
}

/// Returns a copy of `stock` with `quantity` taken off `tyre_name`.
/// `stock` itself is never modified.
pub fn decrement_stock(
    stock: &StockTable,
    tyre_name: &str,
    quantity: u32,
) -> Result<StockTable, ServiceError> {
    let available = stock
        .get(tyre_name)
        .map(|item| item.quantity)
        .ok_or_else(|| ServiceError::not_found_tyre(tyre_name))?;
    if quantity > available {
        return Err(ServiceError::InsufficientStock {
            tyre_name: tyre_name.to_string(),
            requested: quantity,
            available,
        });
    }

    let mut next = stock.clone();
    if let Some(item) = next.get_mut(tyre_name) {
        item.quantity = available - quantity;
    }
    Ok(next)
}
