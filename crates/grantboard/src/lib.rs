//! Grant discovery and pricing catalog client.
//!
//! Remote grant and plan collections are fetched through [`query::QueryClient`],
//! normalized into strict records by [`catalog`], and laid out for display by
//! the grant listing formatter and the plan arrangement engine.

pub mod catalog;
pub mod config;
pub mod error;
pub mod query;
pub mod telemetry;
