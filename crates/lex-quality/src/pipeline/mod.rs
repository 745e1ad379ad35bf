//! Pipeline module.
//!
//! This module provides the configured façade over analysis and cleaning.

mod builder;

pub use builder::{Pipeline, PipelineBuilder};
