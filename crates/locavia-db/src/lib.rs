//! Locavia Database Layer
//!
//! This crate provides PostgreSQL database access and repository implementations
//! for the Locavia rental platform. It includes:
//!
//! - Connection pool management with sqlx
//! - Embedded schema migrations
//! - Tenant-scoped repository implementations
//! - Transaction support for atomic rental operations

pub mod pool;
pub mod repositories;

pub use pool::{create_pool, run_migrations};
pub use repositories::*;

// Re-export commonly used types
pub use locavia_core::{AppError, AppResult};
pub use sqlx::{PgPool, Postgres, Transaction};
