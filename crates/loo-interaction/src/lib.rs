//! Lucky Loo interaction layer.
//!
//! Implementations of the core's external seams: the HTTP decision client
//! for the court API and file-backed capture adapters.

pub mod capture;
pub mod court_api_client;

pub use capture::{FileCaptureAdapter, NoCaptureAdapter};
pub use court_api_client::{CourtApiClient, HealthStatus};
