//! Invoice field and segment extraction.

pub mod metadata;
pub mod rules;
pub mod segment;

pub use metadata::extract_metadata;
pub use segment::{extract_line_items, find_itemized_segment};
