//! SeaORM entity definitions
//!
//! These are database-specific entities separate from domain models.

pub mod blacklist;
pub mod customer;
pub mod insurance;
pub mod insurance_plan;
pub mod profile;
