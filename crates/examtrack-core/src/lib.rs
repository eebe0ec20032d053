//! examtrack-core — entity model, normalization, and the metrics engine.
//!
//! This crate holds everything pure: the typed study entities, the
//! field-repair policy applied to raw rows, and the priority/readiness
//! computations the rest of examtrack builds on. No I/O happens here.

pub mod insights;
pub mod leaderboard;
pub mod metrics;
pub mod model;
pub mod normalize;
pub mod tenancy;
