pub mod error;
pub mod validation;
pub mod formats;
pub mod fs;
pub mod size;

pub use error::{ConverterError, ConverterResult, PathError, TranscodeError, ValidationError};
pub use validation::{validate_index, validate_input_path, validate_quality, MAX_QUALITY, MIN_QUALITY};
pub use formats::{ImageFormat, is_accepted_mime_type, mime_type_from_name, swap_extension};
pub use fs::{extract_filename, read_bytes, write_output};
pub use size::{format_file_size, format_signed_file_size};
