//! Pulso: USD/ARS forecast chart
//!
//! Loads the published exchange-rate history and the model's prediction from
//! object storage, anchors the forecast on the last observation and produces
//! a chart configuration (plus a static SVG of its initial viewport).

pub mod api;
pub mod config;
pub mod models;
pub mod services;
pub mod utils;
