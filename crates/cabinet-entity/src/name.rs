//! Name validation rules for folders and uploaded files.

use cabinet_core::error::AppError;

/// Maximum length of a single path segment in bytes.
const MAX_NAME_LENGTH: usize = 255;

/// Validates a name that becomes exactly one path segment.
pub fn validate_name(name: &str) -> Result<(), AppError> {
    if name.trim().is_empty() {
        return Err(AppError::validation("Name cannot be empty"));
    }

    if name.len() > MAX_NAME_LENGTH {
        return Err(AppError::validation(format!(
            "Name exceeds maximum length of {MAX_NAME_LENGTH} bytes"
        )));
    }

    if name == "." || name == ".." {
        return Err(AppError::validation("Name cannot be '.' or '..'"));
    }

    if name.contains(['/', '\\', '\0']) {
        return Err(AppError::validation("Name contains invalid characters"));
    }

    Ok(())
}

/// Splits an uploaded filename into base name and extension at the last dot.
///
/// `archive.tar.gz` yields `("archive.tar", "gz")`. A name with no dot, a
/// trailing dot, or nothing before the last dot (`.bashrc`) is rejected.
pub fn split_filename(filename: &str) -> Result<(String, String), AppError> {
    validate_name(filename)?;

    let Some((base, ext)) = filename.rsplit_once('.') else {
        return Err(AppError::validation(format!(
            "Filename '{filename}' has no extension"
        )));
    };

    if base.is_empty() || ext.is_empty() {
        return Err(AppError::validation(format!(
            "Filename '{filename}' must have a name and an extension"
        )));
    }

    Ok((base.to_string(), ext.to_string()))
}
