//! Row models and input DTOs.

pub mod car;
pub mod customer;
pub mod image;
pub mod rental;
