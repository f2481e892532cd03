//! Data models for frames, metrics, SOP results and line items.

pub mod config;
pub mod frame;
pub mod line_item;
pub mod metric;
pub mod sop;
pub mod statement;
