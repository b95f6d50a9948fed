//! API layer for Locavia
//!
//! HTTP handlers for the rental lifecycle, dashboard and insight endpoints.
//! Handlers are thin adapters: request parsing, header-based tenant scoping
//! and response shaping live here; every business rule lives in
//! `locavia-services`.

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    clippy::cargo,
    missing_docs
)]

pub mod dto;
pub mod extract;
pub mod handlers;

// Re-export DTOs (common types)
pub use dto::{ApiResponse, PaginationParams};

// Re-export the tenant extractor and route configuration functions
pub use extract::TenantContext;
pub use handlers::{configure_dashboard, configure_insights, configure_rentals, configure_tools};
