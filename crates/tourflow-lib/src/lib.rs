//! Tourflow library entry points.
//!
//! This crate holds everything the HTTP services share: the tour and booking
//! data model, the SQLite-backed store, the parameterized catalog filter
//! builder, and the simulated operator feed used to refresh the catalog.
//! The service binaries should only depend on the types and functions
//! exported here instead of reimplementing behavior.

#![deny(warnings)]

pub mod booking;
pub mod error;
pub mod feed;
pub mod filter;
pub mod model;
pub mod store;

pub use booking::{booking_number, BookingConfirmation, BookingRecord, BookingRequest};
pub use error::{Error, Result};
pub use feed::{scrape_operator_feeds, NewTour, PRICE_JITTER};
pub use filter::{CatalogFilter, RESULT_LIMIT};
pub use model::{Tour, TourSummary};
pub use store::Store;
