//! quizmark-core — Grading, attempt lifecycle, and performance analytics.
//!
//! This crate defines the data model, the scoring engine, the at-most-once
//! submission contract, and the pure analytics transforms that turn attempt
//! history into dashboard metrics. It performs no I/O beyond the optional
//! file helpers in [`parser`], [`snapshot`] and [`config`].

pub mod analytics;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod lifecycle;
pub mod model;
pub mod parser;
pub mod prediction;
pub mod scoring;
pub mod snapshot;
pub mod store;
