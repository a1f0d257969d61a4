//! HTTP serving layer for a pre-trained outlet sales regression model.
//!
//! The model and its categorical label encoders are produced by an offline
//! training process and written to disk as JSON artifacts. This service loads
//! them lazily, at most once per process, and answers prediction requests
//! over a small HTTP surface:
//!
//! - `GET /` renders a static input form
//! - `POST /predict` encodes the submitted outlet attributes and runs inference
//! - `GET /health` reports artifact load state
//! - `GET /metadata` reports each encoder's label vocabulary
//! - `GET /metrics` exposes Prometheus counters
//!
//! # Modules
//!
//! - [`config`]: Configuration loading from environment
//! - [`error`]: Unified error types
//! - [`artifacts`]: Lazy, lock-guarded artifact store
//! - [`encoding`]: Label encoders and feature row construction
//! - [`model`]: Opaque predictor interface and the forest implementation
//! - [`api`]: HTTP handlers and routes
//! - [`metrics`]: Prometheus counters
//! - [`utils`]: Utility functions

pub mod api;
pub mod artifacts;
pub mod config;
pub mod encoding;
pub mod error;
pub mod metrics;
pub mod model;
pub mod utils;

pub use config::Config;
pub use error::ApiError;
