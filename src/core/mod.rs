//! Core library components.
//!
//! This module contains the migration pipeline: discovery, decryption,
//! extraction, naming, the target store, orchestration and reporting.

pub mod config;
pub mod constants;
pub mod decrypt;
pub mod discovery;
pub mod domain;
pub mod extract;
pub mod migrate;
pub mod naming;
pub mod process;
pub mod report;
pub mod store;
pub mod types;
