//! Prometheus metrics backend for the tender scheduler.
//!
//! [`PrometheusMetrics`] implements [`tender_core::MetricsBackend`] on a private registry.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use tender_core::{OfferScheduler, TaskTemplate};
//! use tender_model::ResourceRequirement;
//! use tender_prometheus::PrometheusMetrics;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let metrics = PrometheusMetrics::new()?;
//! let scheduler = OfferScheduler::new(ResourceRequirement::default(), TaskTemplate::default())
//!     .with_metrics(Arc::new(metrics.clone()));
//! # let _ = scheduler;
//! let text = metrics.render()?;
//! # let _ = text;
//! # Ok(())
//! # }
//! ```
//!
//! ## Metrics
//! - `tender_offers_total{outcome}` - Counter
//! - `tender_tasks_launched_total` - Counter
//! - `tender_task_status_total{state}` - Counter
//! - `tender_driver_errors_total{op}` - Counter

mod backend;
pub use backend::PrometheusMetrics;

pub use prometheus::{Encoder, Registry, TextEncoder};
