//! Small helpers shared across the sandbox crates.

pub mod date_handling;
pub mod path_processing;
pub mod text_processing;

pub use date_handling::{compact_timestamp, format_compact_timestamp};
pub use path_processing::{expand_tilde, is_contained_relative_path};
pub use text_processing::{json_preview, truncate_chars, value_to_text};
