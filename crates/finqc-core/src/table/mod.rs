//! Statement table parsing and frame building.

mod frames;
mod parser;

pub use frames::{build_frame, build_frames, build_frames_with_fallback, FrameOptions, StatementTable};
pub use parser::parse_table;
