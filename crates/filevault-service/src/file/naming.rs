//! Storage key construction for uploaded files.

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;
use uuid::Uuid;

/// Make a file name safe for use in a storage key.
///
/// The name is decomposed (NFD) and its combining marks dropped, so accented
/// letters fold to their base letter. Every character left outside
/// `[A-Za-z0-9_.-]` becomes `_`. Only the last extension is kept
/// separate; a leading dot does not start an extension.
pub fn sanitize_file_name(name: &str) -> String {
    let name = name.trim();
    let (stem, extension) = match name.rfind('.') {
        Some(idx) if idx > 0 => (&name[..idx], Some(&name[idx + 1..])),
        _ => (name, None),
    };

    let mut stem = clean(stem);
    if stem.is_empty() {
        stem = "file".to_string();
    }

    match extension.map(clean).filter(|e| !e.is_empty()) {
        Some(ext) => format!("{stem}.{ext}"),
        None => stem,
    }
}

/// Object store key for a new upload:
/// `"{user}/{folder|root}/{unix_millis}_{sanitized_name}"`.
pub fn storage_path(
    uploader_id: Uuid,
    folder_id: Option<Uuid>,
    unix_millis: i64,
    file_name: &str,
) -> String {
    let folder = folder_id.map_or_else(|| "root".to_string(), |id| id.to_string());
    format!(
        "{uploader_id}/{folder}/{unix_millis}_{}",
        sanitize_file_name(file_name)
    )
}

fn clean(part: &str) -> String {
    part.nfd()
        .filter(|c| !is_combining_mark(*c))
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect()
}
