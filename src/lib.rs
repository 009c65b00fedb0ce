//! Percentile fan charts for many simulated dice-game runs, plus an
//! observed-vs-expected roll frequency chart.
//!
//! Input flows through one of three ingestion paths into a
//! [`SeriesSet`](crate::core::model::SeriesSet), optionally rebased, and is then
//! rendered by [`report::band`](crate::report::band).

pub mod cli;
pub mod core;
pub mod report;
