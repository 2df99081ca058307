//! Core domain types and logic.

pub mod price_table;
pub mod returns;
pub mod statistics;
pub mod weights;
pub mod portfolio_metrics;
pub mod sampler;
pub mod selector;
pub mod profiler;
pub mod analysis;
pub mod config_validation;
pub mod error;
