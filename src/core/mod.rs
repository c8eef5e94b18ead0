// LogSieve - core/mod.rs
//
// Core business logic layer: record assembly, classification, the record
// store and the query pipeline.
// Must NOT depend on: app or platform layers.

pub mod assembler;
pub mod classifier;
pub mod discovery;
pub mod export;
pub mod filter;
pub mod model;
pub mod query;
pub mod store;
