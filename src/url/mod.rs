//! URL handling module for Image-Sweep
//!
//! This module provides URL joining, fragment stripping, same-site checks and
//! image-extension classification shared by the crawler, the extractor and
//! the downloader.

mod domain;
mod image;
mod normalize;

// Re-export main functions
pub use domain::{netloc, same_site};
pub use image::{is_image_extension, is_probable_image_url, IMAGE_EXTENSIONS};
pub use normalize::{absolute_url, is_data_image, is_data_uri, parse_start_url, strip_fragment};
