//! File presentation helpers.

pub mod format;

pub use format::{
    file_extension, format_date, format_file_size, is_document, is_image, is_video, save_blob,
    FileKind,
};
