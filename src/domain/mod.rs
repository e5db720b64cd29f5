//! Core domain types and logic. No I/O lives here.

pub mod candle;
pub mod signal;
pub mod indicator;
pub mod strategy;
pub mod portfolio;
pub mod execution;
pub mod metrics;
pub mod backtest;
pub mod config_validation;
pub mod error;
