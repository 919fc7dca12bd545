//! End-to-end tests of the picker pipeline

pub mod error_scenarios;
pub mod fixtures;
pub mod pipeline_test;
pub mod properties;
