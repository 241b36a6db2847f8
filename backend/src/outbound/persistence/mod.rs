//! PostgreSQL persistence adapters.
//!
//! Diesel repositories implementing the domain's driven persistence ports,
//! the shared connection pool, and the embedded migrations run at startup.

mod diesel_error_mapping;
mod diesel_speed_test_repository;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_speed_test_repository::DieselSpeedTestRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
