//! Chart builder for the Pulse Dash analytics engine
//!
//! Pure functions from (query configuration, result matrix, geo features)
//! to the chart specification consumed by the rendering layer. Nothing in
//! this crate performs I/O; the controller feeds it snapshots.

pub mod format;
pub mod transform;

pub use format::{format_value, strip_case_label};
pub use transform::build_chart;
