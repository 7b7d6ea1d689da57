const MAX_FILE_NAME_LEN: usize = 100;

/// Reduces an uploaded file name to a safe single path segment.
pub fn sanitize_file_name(raw: &str) -> String {
    let base = raw.rsplit(['/', '\\']).next().unwrap_or(raw);
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let trimmed = cleaned.trim_start_matches('.');
    let truncated: String = trimmed.chars().take(MAX_FILE_NAME_LEN).collect();
    if truncated.is_empty() {
        "resume".to_string()
    } else {
        truncated
    }
}

/// True when `key` names exactly one object and cannot escape the bucket directory.
pub fn is_safe_object_key(key: &str) -> bool {
    !key.is_empty()
        && !key.starts_with('.')
        && !key.contains(['/', '\\'])
        && !key.contains("..")
}
