//! # Ledgerlens Analytics Engine
//!
//! This crate turns one user's financial records into the aggregate report shown
//! on the analytics dashboard: spending by category, net income, monthly and
//! weekly trends, and budget overage.
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Logic:** This is a pure logic crate. It has no knowledge of external systems.
//!   It depends only on `core-types` (Layer 0).
//! - **Stateless Calculation:** The `AnalyticsEngine` is a stateless calculator. It takes
//!   a `Ledger` snapshot, a `MonthSelector` and the current instant as input and produces
//!   an `AnalyticsReport` as output. Nothing is read from the clock or the database here,
//!   which makes every report reproducible in tests.
//!
//! ## Public API
//!
//! - `AnalyticsEngine`: The main struct that contains the aggregation logic.
//! - `AnalyticsReport`: The bundle of eleven statistics returned to callers.
//! - `parse_month`: Month query-parameter parsing ("March" or "3").
//! - `AnalyticsError`: The specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod engine;
pub mod error;
pub mod month;
pub mod report;

// Re-export the key components to create a clean, public-facing API.
pub use engine::AnalyticsEngine;
pub use error::AnalyticsError;
pub use month::{parse_month, resolve_selector};
pub use report::{
    AnalyticsReport, CategoryMonthTotal, CategoryTotal, MonthNetIncome, MonthTotal, WeekTotal,
};
