//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the domain repository ports, backed by
//! PostgreSQL through `diesel-async` with `bb8` connection pooling.
//!
//! # Architecture
//!
//! - **Thin adapters**: repositories only translate between Diesel rows and
//!   domain types. No business rules live here.
//! - **Internal models**: row structs (`models.rs`) and table definitions
//!   (`schema.rs`) never leave this module.
//! - **Typed errors**: database failures are mapped to the error enum of the
//!   port being implemented.
//!
//! # Example
//!
//! ```ignore
//! use repair_desk::outbound::persistence::{DbPool, DieselRecordRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/repairs")).await?;
//! let records = DieselRecordRepository::new(pool);
//! ```

pub(crate) mod diesel_helpers;
mod diesel_history_repository;
mod diesel_lookup_repository;
mod diesel_photo_repository;
mod diesel_record_repository;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_history_repository::DieselHistoryRepository;
pub use diesel_lookup_repository::DieselLookupRepository;
pub use diesel_photo_repository::DieselPhotoRepository;
pub use diesel_record_repository::DieselRecordRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
