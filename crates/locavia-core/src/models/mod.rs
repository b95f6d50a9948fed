//! Domain models for Locavia
//!
//! This module contains all the core domain models used throughout the application.

pub mod customer;
pub mod payment;
pub mod rental;
pub mod settings;
pub mod tool;

pub use customer::{normalize_document, Customer};
pub use payment::{Payment, PaymentMethod, PaymentStatus};
pub use rental::{Rental, RentalStatus};
pub use settings::{PlanTier, TenantSettings};
pub use tool::{Tool, ToolStatus};
