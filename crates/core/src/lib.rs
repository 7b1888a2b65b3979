//! Domain rules for the rentdesk car rental back office.
//!
//! Everything here is free of I/O: booking overlap, cost derivation, rental
//! status, input validation and the error taxonomy shared by the store and
//! HTTP layers.

pub mod availability;
pub mod entity;
pub mod error;
pub mod image;
pub mod pricing;
pub mod rental;
pub mod types;
pub mod validation;
