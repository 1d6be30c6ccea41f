//! Upload checks: MIME type, per-file size, aggregate size, file count and
//! file name characters.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Default per-file size ceiling (5 MiB).
pub const DEFAULT_MAX_FILE_SIZE_BYTES: u64 = 5 * 1024 * 1024;

/// Default ceiling on the combined size of an application's files (25 MiB).
pub const DEFAULT_MAX_TOTAL_SIZE_BYTES: u64 = 25 * 1024 * 1024;

/// Default maximum number of files per application.
pub const DEFAULT_MAX_FILE_COUNT: usize = 10;

/// Longest accepted file name (characters).
pub const MAX_FILE_NAME_CHARS: usize = 255;

/// Accepted MIME types.
pub const ALLOWED_MIME_TYPES: &[&str] = &["application/pdf", "image/jpeg", "image/png"];

static FILE_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9 ._()\-]*$").expect("valid regex"));

/// Metadata of a file about to be uploaded or already attached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileMeta {
    pub name: String,
    pub mime_type: String,
    pub size_bytes: u64,
}

/// Upload ceilings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileLimits {
    pub max_file_size_bytes: u64,
    pub max_total_size_bytes: u64,
    pub max_file_count: usize,
}

impl Default for FileLimits {
    fn default() -> Self {
        Self {
            max_file_size_bytes: DEFAULT_MAX_FILE_SIZE_BYTES,
            max_total_size_bytes: DEFAULT_MAX_TOTAL_SIZE_BYTES,
            max_file_count: DEFAULT_MAX_FILE_COUNT,
        }
    }
}

/// [`validate_file_with`] using [`FileLimits::default`].
pub fn validate_file(file: &FileMeta, existing_files: &[FileMeta]) -> Option<String> {
    validate_file_with(&FileLimits::default(), file, existing_files)
}

/// Check `file` against the limits, given the files already attached.
///
/// Constraints are checked in order (type, size, aggregate size, count,
/// name) and the first violation's message is returned.
pub fn validate_file_with(
    limits: &FileLimits,
    file: &FileMeta,
    existing_files: &[FileMeta],
) -> Option<String> {
    let mime = file.mime_type.trim().to_ascii_lowercase();
    if !ALLOWED_MIME_TYPES.contains(&mime.as_str()) {
        return Some("Only PDF, JPEG and PNG files are allowed".to_string());
    }

    if file.size_bytes > limits.max_file_size_bytes {
        return Some(format!(
            "File size must not exceed {}",
            format_size(limits.max_file_size_bytes)
        ));
    }

    let existing_total = existing_files
        .iter()
        .fold(0u64, |acc, f| acc.saturating_add(f.size_bytes));
    if existing_total.saturating_add(file.size_bytes) > limits.max_total_size_bytes {
        return Some(format!(
            "Total size of all files must not exceed {}",
            format_size(limits.max_total_size_bytes)
        ));
    }

    if existing_files.len() >= limits.max_file_count {
        return Some(format!(
            "A maximum of {} files can be uploaded",
            limits.max_file_count
        ));
    }

    if file.name.chars().count() > MAX_FILE_NAME_CHARS || !FILE_NAME_RE.is_match(&file.name) {
        return Some(
            "File name may contain only letters, digits, spaces, dots, hyphens, underscores and brackets"
                .to_string(),
        );
    }

    None
}

/// Human-readable size in whole MB (1 MB = 1024 * 1024 bytes).
fn format_size(bytes: u64) -> String {
    const MB: u64 = 1024 * 1024;
    if bytes % MB == 0 {
        format!("{} MB", bytes / MB)
    } else {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    }
}
