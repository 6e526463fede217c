use std::path::Path;
use thiserror::Error;

/// Advisory maximum upload size: 50 MB per file. Surfaced in docs and the UI;
/// the HTTP body limit layer is the only place this is actually enforced.
pub const MAX_DATASET_SIZE: usize = 50 * 1024 * 1024;

/// Media types accepted for tabular datasets
pub const ALLOWED_DATASET_MIME_TYPES: &[&str] = &[
    "text/csv",
    "application/vnd.ms-excel",
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
];

/// Extensions accepted when the declared media type is missing or generic
pub const ALLOWED_DATASET_EXTENSIONS: &[&str] = &["csv", "xls", "xlsx"];

#[derive(Debug, Error)]
pub enum FormatError {
    #[error("{0} is not a supported format. Please upload CSV or Excel files.")]
    RejectedFormat(String),

    #[error("Filename cannot be empty")]
    EmptyFilename,
}

/// Allow-list check for one candidate: accepted when either the declared
/// media type or the filename extension matches. Declared types are
/// normalized through `mime` so parameters like `;charset=utf-8` don't
/// defeat the comparison.
pub fn check_dataset_format(filename: &str, mime_hint: Option<&str>) -> Result<(), FormatError> {
    if let Some(declared) = mime_hint {
        if let Ok(parsed) = declared.parse::<mime::Mime>() {
            if ALLOWED_DATASET_MIME_TYPES
                .iter()
                .any(|&allowed| allowed == parsed.essence_str())
            {
                return Ok(());
            }
        }
    }

    if let Some(ext) = Path::new(filename).extension().and_then(|e| e.to_str()) {
        let ext_lower = ext.to_lowercase();
        if ALLOWED_DATASET_EXTENSIONS.contains(&ext_lower.as_str()) {
            return Ok(());
        }
    }

    Err(FormatError::RejectedFormat(filename.to_string()))
}

/// Sanitizes a client-supplied filename for display and logging.
/// Strips any path component and replaces control/reserved characters,
/// so a hostile Content-Disposition cannot smuggle traversal sequences
/// into the dashboard.
pub fn sanitize_filename(filename: &str) -> Result<String, FormatError> {
    let name = Path::new(filename)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("");

    if name.is_empty() {
        return Err(FormatError::EmptyFilename);
    }

    if filename.contains("..") || filename.contains('/') || filename.contains('\\') {
        tracing::warn!("Path component in uploaded filename: {}", filename);
    }

    let sanitized: String = name
        .chars()
        .map(|c| {
            if c.is_control()
                || c == '/'
                || c == '\\'
                || c == ':'
                || c == '*'
                || c == '?'
                || c == '"'
                || c == '<'
                || c == '>'
                || c == '|'
                || c == ';'
            {
                '_'
            } else {
                c
            }
        })
        .collect();

    // Limit length safely for UTF-8
    let sanitized = if sanitized.len() > 255 {
        let mut end = 255;
        while !sanitized.is_char_boundary(end) {
            end -= 1;
        }
        sanitized[..end].to_string()
    } else {
        sanitized
    };

    Ok(sanitized)
}

/// Human-readable size for dashboard rows ("1.46 KB", "2.5 MB").
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }
    const UNITS: &[&str] = &["Bytes", "KB", "MB", "GB"];
    let exponent = ((bytes as f64).ln() / 1024_f64.ln()).floor() as usize;
    let exponent = exponent.min(UNITS.len() - 1);
    let value = bytes as f64 / 1024_f64.powi(exponent as i32);
    // Two decimals with trailing zeros trimmed, matching the dashboard formatter
    let rounded = (value * 100.0).round() / 100.0;
    format!("{} {}", rounded, UNITS[exponent])
}
