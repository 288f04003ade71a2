//! Infrastructure layer - External systems integration
//!
//! This module handles all external system concerns:
//! - Database connections, migrations and repositories
//! - Unit of Work for transaction management

pub mod db;
pub mod repositories;
pub mod unit_of_work;

pub use db::{Database, Migrator};
pub use repositories::{BlacklistRepository, BlacklistStore, CustomerRepository, CustomerStore};
pub use unit_of_work::{Persistence, TransactionContext, TxCustomerRepository, UnitOfWork};

#[cfg(any(test, feature = "test-utils"))]
pub use repositories::{MockBlacklistRepository, MockCustomerRepository};
