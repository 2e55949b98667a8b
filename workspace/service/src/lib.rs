//! Business operations of the car rental and sales back office.
//!
//! Every operation takes a `DatabaseConnection`, validates its input before
//! touching storage and runs multi-step writes in a single transaction.
//! Lookups only see live (not soft-deleted) records.

mod amount;
pub mod catalog;
pub mod commerce;
pub mod dashboard;
pub mod error;
pub mod feedback;
pub mod identity;
mod lifecycle;

#[cfg(test)]
mod testing;

pub use error::{Result, ServiceError};
