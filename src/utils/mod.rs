pub mod format;

pub use format::{compression_ratio, encoded_size_from_payload, format_size, is_image_mime};
