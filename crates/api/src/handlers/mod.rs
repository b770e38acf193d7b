//! HTTP handlers, grouped by resource.

pub mod ai_models;
pub mod recommendations;
pub mod scan;
