//! Business logic services for Locavia
//!
//! This crate contains the business logic that orchestrates the rental
//! lifecycle and its billing consequences.
//!
//! # Architecture
//!
//! Services are designed to be composable and testable:
//! - Pure billing math lives in `billing` and is tested without a database
//! - Lifecycle writes run inside a single sqlx transaction per operation
//! - Services are wrapped in Arc for safe sharing across async tasks
//! - All operations are instrumented with tracing
//! - Comprehensive error handling with AppError
//!
//! # Services
//!
//! - `RentalManager` - Checkout, check-in and cancellation of rentals
//! - `AnalyticsEngine` - Dashboard stats, ROI/customer insights, zombie scan
//! - `billing` - Day counting, fines and settlement totals
//! - `rental_code` - Per-tenant monotonic rental code sequence

pub mod analytics;
pub mod billing;
pub mod rental_code;
pub mod rental_manager;

pub use analytics::{AnalyticsEngine, StatsPeriod};
pub use rental_manager::{CheckinCommand, CheckoutCommand, RentalManager};

/// The manager as wired in production, backed by Postgres repositories.
pub type PgRentalManager = RentalManager<locavia_db::PgSettingsRepository>;

/// The analytics engine as wired in production.
pub type PgAnalyticsEngine = AnalyticsEngine<locavia_db::PgSettingsRepository>;

/// Business logic constants
pub mod constants {
    /// Prefix of every rental code
    pub const RENTAL_CODE_PREFIX: &str = "AL";

    /// Minimum width of the zero-padded numeric suffix
    pub const RENTAL_CODE_PAD_WIDTH: usize = 4;

    /// A rental always bills at least this many days
    pub const MIN_RENTAL_DAYS: i64 = 1;

    /// Length of a billing day in seconds
    pub const SECONDS_PER_DAY: i64 = 86_400;

    /// Upper bound on the agreed rental length in days (10 years)
    pub const MAX_RENTAL_DAYS: i64 = 3_650;
}
