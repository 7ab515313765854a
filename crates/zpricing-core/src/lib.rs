//! ZPricing Core Library
//!
//! This crate provides the foundational types, traits, and error handling
//! for resolving rate plan prices and discounts. It includes:
//!
//! - Catalog models (charges, tiers, the tagged query record)
//! - Price/discount request and response values
//! - The `QueryService` abstraction over the billing catalog
//! - Unified error handling
//! - Application configuration

pub mod config;
pub mod error;
pub mod models;
pub mod traits;

pub use config::AppConfig;
pub use error::AppError;

/// Result type alias using AppError
pub type AppResult<T> = Result<T, AppError>;
