//! Remote catalog queries and their renderable outcome.
//!
//! [`QueryClient`] owns one cache slot and at most one in-flight request per
//! [`QueryKey`]. Every observation starts at [`QueryResult::Loading`] and
//! settles exactly once into `Error`, `Empty`, or `Success`.

mod client;
pub mod resource;
pub mod source;
mod state;

#[cfg(test)]
mod tests;

pub use client::{QueryClient, QueryHandle};
pub use resource::{GrantDetailQuery, GrantsQuery, PlansQuery, QueryKey, Resource};
pub use source::{HttpSource, QueryClientError, RemoteSource, SourceRequest, TransportError};
pub use state::{QueryResult, QueryStatus};
