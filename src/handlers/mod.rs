//! HTTP handlers

pub mod health;
pub mod predict;
pub mod reports;
pub mod surface;
