//! Repository implementations

pub mod payment_repo;
pub mod rental_repo;
pub mod settings_repo;
pub mod tool_repo;

pub use payment_repo::PgPaymentRepository;
pub use rental_repo::PgRentalRepository;
pub use settings_repo::PgSettingsRepository;
pub use tool_repo::PgToolRepository;
