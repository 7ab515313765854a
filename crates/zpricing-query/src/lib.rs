//! Catalog query layer for ZPricing
//!
//! Builds ZOQL statements and executes them through a `QueryService`:
//!
//! - `HttpQueryClient` - the billing platform's JSON query actions
//! - `InMemoryCatalog` - a fixed catalog for fixtures and tests
//!
//! # Usage
//!
//! ```rust,ignore
//! use zpricing_query::{statement, HttpQueryClient};
//!
//! let client = HttpQueryClient::new(
//!     "https://apisandbox.zuora.com/rest/v1",
//!     &session_token,
//!     10_000, // timeout_ms
//!     10,     // max_pages
//! )?;
//!
//! let charges = client
//!     .query(&statement::charges_for_rate_plan(&rate_plan_id).to_string())
//!     .await?;
//! ```

pub mod client;
pub mod memory;
pub mod statement;
pub mod types;

pub use client::HttpQueryClient;
pub use memory::{CatalogSnapshot, InMemoryCatalog};
pub use statement::ZoqlQuery;
