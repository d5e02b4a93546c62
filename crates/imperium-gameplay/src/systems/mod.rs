//! The two tick systems, run in production-then-build order.

pub mod build;
pub mod production;
