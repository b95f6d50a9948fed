//! HTTP request handlers

pub mod dashboard;
pub mod insights;
pub mod rental;
pub mod tool;

pub use dashboard::configure as configure_dashboard;
pub use insights::configure as configure_insights;
pub use rental::configure as configure_rentals;
pub use tool::configure as configure_tools;
