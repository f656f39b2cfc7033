//! System integration for the Pulse Dash analytics engine
//!
//! Ties the data manager and the chart builder together: the lazily loaded
//! organisation-unit tree and the visualization controller that sequences
//! fetches in response to user actions.

pub mod controller;
pub mod tree;

pub use controller::{DxPatch, GridRect, VisualizationController};
pub use tree::OrgUnitTreeLoader;
