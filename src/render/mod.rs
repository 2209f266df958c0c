//! Generated artifacts. Currently a single summary PNG.

pub mod summary;

pub use summary::{artifact_path, generate_summary_image, ARTIFACT_FILE};
