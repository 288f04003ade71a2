//! Repository layer - Data access abstraction
//!
//! Repositories provide an abstraction over data persistence,
//! following the Repository pattern for clean separation of concerns.

mod blacklist_repository;
mod customer_repository;
pub(crate) mod entities;

pub use blacklist_repository::{BlacklistRepository, BlacklistStore};
pub use customer_repository::{CustomerRepository, CustomerStore};

// Export mocks for tests (both unit and integration)
#[cfg(any(test, feature = "test-utils"))]
pub use blacklist_repository::MockBlacklistRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use customer_repository::MockCustomerRepository;
