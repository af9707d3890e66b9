//! Presentation helpers for files: kinds, sizes, dates and saving blobs.

use std::path::{Component, Path, PathBuf};

use chrono::{DateTime, Utc};

use crate::error::{DriveError, Result};

const DOCUMENT_EXTENSIONS: &[&str] = &["doc", "docx", "txt", "rtf", "odt", "pages"];
const SPREADSHEET_EXTENSIONS: &[&str] = &["xls", "xlsx", "csv", "numbers", "ods"];
const PRESENTATION_EXTENSIONS: &[&str] = &["ppt", "pptx", "key", "odp"];
const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "bmp", "svg", "webp"];
const AUDIO_EXTENSIONS: &[&str] = &["mp3", "wav", "ogg", "flac", "m4a", "aac"];
const VIDEO_EXTENSIONS: &[&str] = &["mp4", "avi", "mov", "wmv", "mkv", "flv", "webm"];
const ARCHIVE_EXTENSIONS: &[&str] = &["zip", "rar", "7z", "tar", "gz"];

const SIZE_UNITS: &[&str] = &["Bytes", "KB", "MB", "GB", "TB"];

/// Broad category of a file, decided by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    /// Text and word-processor files.
    Document,
    /// Spreadsheets and CSV.
    Spreadsheet,
    /// Slide decks.
    Presentation,
    /// PDF.
    Pdf,
    /// Images.
    Image,
    /// Audio.
    Audio,
    /// Video.
    Video,
    /// Compressed archives.
    Archive,
    /// Anything unrecognized.
    Other,
}

impl FileKind {
    /// Classify a file name.
    pub fn from_name(name: &str) -> Self {
        let ext = file_extension(name).to_lowercase();
        let ext = ext.as_str();
        if DOCUMENT_EXTENSIONS.contains(&ext) {
            FileKind::Document
        } else if SPREADSHEET_EXTENSIONS.contains(&ext) {
            FileKind::Spreadsheet
        } else if PRESENTATION_EXTENSIONS.contains(&ext) {
            FileKind::Presentation
        } else if ext == "pdf" {
            FileKind::Pdf
        } else if IMAGE_EXTENSIONS.contains(&ext) {
            FileKind::Image
        } else if AUDIO_EXTENSIONS.contains(&ext) {
            FileKind::Audio
        } else if VIDEO_EXTENSIONS.contains(&ext) {
            FileKind::Video
        } else if ARCHIVE_EXTENSIONS.contains(&ext) {
            FileKind::Archive
        } else {
            FileKind::Other
        }
    }

    /// Icon name for this kind: text-like files get `file-text`, the rest `file`.
    pub fn icon(&self) -> &'static str {
        match self {
            FileKind::Document | FileKind::Spreadsheet | FileKind::Presentation | FileKind::Pdf => {
                "file-text"
            }
            _ => "file",
        }
    }

    /// Whether this is a document in the wide sense (text, sheets, slides, PDF).
    pub fn is_document(&self) -> bool {
        self.icon() == "file-text"
    }
}

/// Extension of a file name without the dot, or `""` when there is none.
///
/// A leading dot alone does not start an extension (`.bashrc` has none).
pub fn file_extension(name: &str) -> &str {
    match name.rfind('.') {
        Some(0) | None => "",
        Some(idx) => &name[idx + 1..],
    }
}

/// Whether the name looks like an image.
pub fn is_image(name: &str) -> bool {
    FileKind::from_name(name) == FileKind::Image
}

/// Whether the name looks like a video.
pub fn is_video(name: &str) -> bool {
    FileKind::from_name(name) == FileKind::Video
}

/// Whether the name looks like a document, spreadsheet, presentation or PDF.
pub fn is_document(name: &str) -> bool {
    FileKind::from_name(name).is_document()
}

/// Human-readable size using 1024-based units, at most two decimals.
///
/// ```
/// use mydrive::file::format::format_file_size;
///
/// assert_eq!(format_file_size(0), "0 Bytes");
/// assert_eq!(format_file_size(1536), "1.5 KB");
/// ```
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut unit = 0;
    let mut value = bytes as f64;
    while value >= 1024.0 && unit < SIZE_UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let rounded = format!("{:.2}", value);
    let trimmed = rounded.trim_end_matches('0').trim_end_matches('.');
    format!("{} {}", trimmed, SIZE_UNITS[unit])
}

/// Date for listings, e.g. `Jun 15, 2023, 10:30 AM`.
pub fn format_date(date: &DateTime<Utc>) -> String {
    date.format("%b %-d, %Y, %I:%M %p").to_string()
}

/// Parse an RFC 3339 timestamp and format it; unparsable input is returned as-is.
pub fn format_date_str(raw: &str) -> String {
    match DateTime::parse_from_rfc3339(raw) {
        Ok(date) => format_date(&date.with_timezone(&Utc)),
        Err(_) => raw.to_string(),
    }
}

/// Save downloaded bytes as `dir/name` and return the written path.
///
/// `name` must be a plain file name; anything that would resolve outside
/// `dir` is rejected.
pub async fn save_blob(dir: &Path, name: &str, bytes: &[u8]) -> Result<PathBuf> {
    let mut components = Path::new(name).components();
    let file_name = match (components.next(), components.next()) {
        (Some(Component::Normal(file_name)), None) => file_name.to_owned(),
        _ => {
            return Err(DriveError::Validation(format!(
                "invalid download file name: {}",
                name
            )))
        }
    };

    tokio::fs::create_dir_all(dir).await?;
    let path = dir.join(file_name);
    tokio::fs::write(&path, bytes).await?;
    Ok(path)
}
