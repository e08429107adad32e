//! Pieces shared by the tools in this workspace.

mod logger;

pub use logger::{file_level, output_level, setup_logging};
