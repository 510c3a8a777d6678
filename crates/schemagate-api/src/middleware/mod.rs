//! # Middleware
//!
//! Request-level middleware applied to every API route.

pub mod metrics;
