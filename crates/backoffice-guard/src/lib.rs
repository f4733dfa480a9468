//! Write-time validation and policy engine for back-office records.
//!
//! [`validation`] holds the reusable checks and the issue model; [`records`]
//! applies them per record kind and exposes the write path over HTTP.

pub mod config;
pub mod error;
pub mod records;
pub mod telemetry;
pub mod validation;

pub use error::AppError;
