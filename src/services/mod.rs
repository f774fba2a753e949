//! Shop operations.
//!
//! The submodules hold pure functions over table values. [`ShopService`]
//! wraps them in the load, compute, save cycle each user action needs.

pub mod billing;
pub mod complaints;
pub mod inventory;
pub mod pricing;

use chrono::{Local, NaiveDateTime};
use tracing::{info, instrument, warn};

use crate::{
    errors::ServiceError,
    models::{BillingLedger, BillingRecord, ComplaintLog, ComplaintRecord, StockItem, StockTable, UpsertOutcome},
    store::TableStore,
};
use billing::BillRequest;
use complaints::ComplaintRequest;
use pricing::{DemandMatch, PriceSuggestion};

fn local_now() -> NaiveDateTime {
    Local::now().naive_local()
}

/// Runs shop actions against a store. Every call reloads the tables it
/// needs and writes back the ones it changed.
pub struct ShopService<S> {
    store: S,
    clock: fn() -> NaiveDateTime,
}

impl<S: TableStore> ShopService<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            clock: local_now,
        }
    }

    /// Replaces the local-time clock used to date bills and complaints.
    pub fn with_clock(mut self, clock: fn() -> NaiveDateTime) -> Self {
        self.clock = clock;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn stock(&self) -> Result<StockTable, ServiceError> {
        self.store.load_stock()
    }

    #[instrument(skip(self, item), fields(tyre_name = %item.tyre_name))]
    pub fn upsert_stock(&self, item: StockItem) -> Result<UpsertOutcome, ServiceError> {
        let stock = self.store.load_stock()?;
        let outcome = if stock.contains(&item.tyre_name) {
            UpsertOutcome::Updated
        } else {
            UpsertOutcome::Inserted
        };
        let quantity = item.quantity;
        let stock = inventory::upsert_stock(&stock, item).map_err(|e| {
            warn!(error = %e, "Stock update rejected");
            e
        })?;
        self.store.save_stock(&stock)?;
        info!(%outcome, quantity, "Stock updated");
        Ok(outcome)
    }

    /// Saves stock before billing, so a failed billing write leaves the
    /// stock already reduced.
    #[instrument(skip(self, request), fields(tyre_name = %request.tyre_name, quantity = request.quantity))]
    pub fn create_bill(&self, request: BillRequest) -> Result<BillingRecord, ServiceError> {
        let stock = self.store.load_stock()?;
        let ledger = self.store.load_billing()?;
        let outcome = billing::create_bill(&stock, &ledger, &request, (self.clock)()).map_err(|e| {
            warn!(error = %e, "Bill rejected");
            e
        })?;

        self.store.save_stock(&outcome.stock)?;
        self.store.save_billing(&outcome.billing)?;

        let record = outcome.record;
        info!(
            bill_number = record.bill_number,
            total_price = %record.total_price,
            "Bill created"
        );
        Ok(record)
    }

    pub fn bills(&self) -> Result<BillingLedger, ServiceError> {
        self.store.load_billing()
    }

    #[instrument(skip(self))]
    pub fn suggest_price(&self, tyre_name: &str) -> Result<PriceSuggestion, ServiceError> {
        let stock = self.store.load_stock()?;
        let billing = self.store.load_billing()?;
        pricing::suggest_price(tyre_name, &stock, &billing)
    }

    #[instrument(skip(self))]
    pub fn search_demand(&self, query: &str) -> Result<Vec<DemandMatch>, ServiceError> {
        let stock = self.store.load_stock()?;
        let billing = self.store.load_billing()?;
        let hits = pricing::search_demand(query, &stock, &billing);
        if hits.is_empty() {
            info!("No tyres matched");
        }
        Ok(hits)
    }

    pub fn complaints(&self) -> Result<ComplaintLog, ServiceError> {
        self.store.load_complaints()
    }

    #[instrument(skip(self, request), fields(tyre_name = %request.tyre_name))]
    pub fn add_complaint(&self, request: ComplaintRequest) -> Result<ComplaintRecord, ServiceError> {
        let stock = self.store.load_stock()?;
        let log = self.store.load_complaints()?;
        let today = (self.clock)().date();
        let outcome = complaints::add_complaint(&stock, &log, &request, today).map_err(|e| {
            warn!(error = %e, "Complaint rejected");
            e
        })?;
        self.store.save_complaints(&outcome.log)?;

        info!(pending = outcome.log.pending().count(), "Complaint logged");
        Ok(outcome.record)
    }
}
