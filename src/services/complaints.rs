use chrono::NaiveDate;
use serde::Deserialize;
use validator::Validate;

use crate::{
    errors::ServiceError,
    models::{validate_tyre_name, ComplaintLog, ComplaintRecord, ComplaintStatus, StockTable},
};

#[derive(Clone, Debug, Deserialize, Validate)]
pub struct ComplaintRequest {
    #[validate(custom = "validate_tyre_name")]
    pub tyre_name: String,
    #[validate(length(min = 1, max = 500))]
    pub issue: String,
    #[validate(range(min = 1))]
    pub quantity_affected: u32,
}

impl ComplaintRequest {
    pub fn new(tyre_name: impl Into<String>, issue: impl Into<String>, quantity_affected: u32) -> Self {
        Self {
            tyre_name: tyre_name.into().trim().to_string(),
            issue: issue.into().trim().to_string(),
            quantity_affected,
        }
    }
}

/// The complaint table with the new row appended. Nothing is persisted yet.
#[derive(Clone, Debug)]
pub struct ComplaintOutcome {
    pub log: ComplaintLog,
    pub record: ComplaintRecord,
}

/// Appends a `Pending` complaint dated `today`. Size and brand come from the
/// stock row, which must exist.
pub fn add_complaint(
    stock: &StockTable,
    complaints: &ComplaintLog,
    request: &ComplaintRequest,
    today: NaiveDate,
) -> Result<ComplaintOutcome, ServiceError> {
    request.validate()?;
    let item = stock
        .get(&request.tyre_name)
        .ok_or_else(|| ServiceError::not_found_tyre(&request.tyre_name))?;

    let record = ComplaintRecord {
        tyre_name: item.tyre_name.clone(),
        size: item.size.clone(),
        brand: item.brand.clone(),
        date: today,
        issue: request.issue.clone(),
        quantity_affected: request.quantity_affected,
        status: ComplaintStatus::Pending,
    };

    let mut log = complaints.clone();
    log.append(record.clone());
    Ok(ComplaintOutcome { log, record })
}
