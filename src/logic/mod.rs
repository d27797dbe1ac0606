//! Core prediction-serving logic, independent of HTTP

pub mod explain;
pub mod features;
pub mod model;
pub mod rate_limit;
pub mod service;
pub mod surface;

#[cfg(test)]
pub(crate) mod testing;

pub use rate_limit::RateLimiter;
pub use service::{Prediction, PredictionService, ServiceError, ServiceSettings};
