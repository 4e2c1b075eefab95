//! AireMax air-quality service.
//!
//! Fetches nearest-station observations from AQICN and turns them into a
//! normalized report with Spanish health guidance, per-pollutant levels and
//! relabeled weather indicators.

pub mod classify;
pub mod config;
pub mod indicators;
pub mod ingest;
pub mod logging;
pub mod model;
pub mod report;
pub mod web;
