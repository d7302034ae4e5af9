//! Upriver Core Library
//!
//! Core domain logic for tracing upstream supply-chain dependencies of
//! industrial processes stored as directed, weighted exchange edges.

pub mod config;
pub mod db;
pub mod error;
pub mod format;
pub mod graph;
pub mod logging;
pub mod report;
