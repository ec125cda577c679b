//! Core domain types and analytics.

pub mod ohlcv;
pub mod indicator;
pub mod risk;
pub mod signal;
pub mod analysis;
pub mod market;
pub mod portfolio;
pub mod envelope;
pub mod settings;
pub mod error;
