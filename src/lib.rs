//! tyrestock library
//!
//! Stock, billing, price suggestion and complaint tracking for a tyre shop,
//! persisted as flat CSV tables.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

pub mod config;
pub mod errors;
pub mod models;
pub mod services;
pub mod store;

pub use errors::ServiceError;
pub use services::ShopService;
pub use store::{CsvStore, Dataset, MemoryStore, TableStore};
