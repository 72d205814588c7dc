//! Unified search client for the Atlas discovery index
//!
//! This crate is the typed client for Atlas's hosted search cluster. One
//! request fans out across the places, events, and articles collections,
//! and the responses come back merged into a single relevance-ranked list.
//!
//! # Features
//!
//! - **Multi-collection fan-out**: concurrent collection queries, bounded by
//!   the slowest call rather than their sum
//! - **Failure-tolerant merging**: a failed collection degrades the response
//!   instead of failing the search
//! - **Engagement-aware ranking**: index text relevance blended with the
//!   app's engagement signal
//! - **Short-TTL response cache**: canonically keyed, process-local
//! - **Fire-and-forget analytics**: one record per search, off the latency
//!   path
//!
//! # Example
//!
//! ```rust,no_run
//! use atlas_search_client::{SearchConfig, SearchRequest, SearchService};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let service = SearchService::new(SearchConfig::from_env()?)?;
//!
//!     let response = service.search(SearchRequest::new("pizza")).await?;
//!     println!(
//!         "{} results in {} ms",
//!         response.total_found, response.elapsed_ms
//!     );
//!
//!     for result in &response.results {
//!         println!("[{}] {}", result.content_type, result.title);
//!     }
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod aggregate;
pub mod analytics;
pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod normalize;
pub mod prefetch;
pub mod query;
pub mod request;
pub mod service;
pub mod synonyms;
pub mod wire;

pub use client::IndexClient;
pub use config::{CollectionProfiles, Environment, RankingConfig, SearchConfig};
pub use error::{SearchError, SearchResult};
pub use normalize::UnifiedResult;
pub use request::{ContentType, GeoOrigin, SearchFilters, SearchRequest};
pub use service::{SearchResponse, SearchService};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::analytics::{AnalyticsRecord, AnalyticsSink};
    pub use crate::client::IndexClient;
    pub use crate::config::{Environment, RankingConfig, SearchConfig};
    pub use crate::error::{SearchError, SearchResult};
    pub use crate::normalize::UnifiedResult;
    pub use crate::prefetch::PrefetchedPlaces;
    pub use crate::request::{ContentType, GeoOrigin, SearchFilters, SearchRequest};
    pub use crate::service::{SearchResponse, SearchService};
}
