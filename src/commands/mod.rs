//! Command handlers a frontend drives a session through:
//! - [`convert_images`]: Convert a batch of files
//! - [`reconvert_all`]: Re-run every recoverable result at a new quality
//! - [`download_single`] / [`export_archive`]: Get converted bytes out
//! - [`remove_image`] / [`clear_all`]: Drop results

mod image;

pub use image::*;
