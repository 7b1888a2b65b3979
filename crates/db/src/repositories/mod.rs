//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&DbPool` as the first argument.

pub mod car_repo;
pub mod customer_repo;
pub mod rental_repo;
pub mod uniqueness_repo;

pub use car_repo::CarRepo;
pub use customer_repo::CustomerRepo;
pub use rental_repo::RentalRepo;
pub use uniqueness_repo::UniquenessRepo;
