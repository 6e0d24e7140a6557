//! trustdash-core: marketplace trust metrics and policy impact simulation.
//!
//! Layering, leaf first:
//!   model / dataset   base records and ingestion validation
//!   sentiment         review polarity, scored once at ingestion
//!   generator         deterministic synthetic dataset
//!   store             SQLite persistence with atomic dataset swap
//!   metrics           trust metrics and grouped breakdowns
//!   policy            seller compliance simulation
//!   cache / service   per-request memoisation and the query facade

pub mod cache;
pub mod config;
pub mod dataset;
pub mod error;
pub mod generator;
pub mod metrics;
pub mod model;
pub mod name_generator;
pub mod policy;
pub mod request;
pub mod rng;
pub mod sentiment;
pub mod service;
pub mod store;
pub mod types;
