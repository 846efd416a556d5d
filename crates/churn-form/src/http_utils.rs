pub fn join_base_path(base: &str, path: &str) -> anyhow::Result<String> {
    if base.trim().is_empty() {
        anyhow::bail!("base_url is empty");
    }
    let normalized_base = base.trim().trim_end_matches('/');
    let normalized_path = if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    };
    Ok(format!("{normalized_base}{normalized_path}"))
}

/// Single-line, bounded rendering of a response body for log fields.
pub fn escape_log_body(body: &str, limit: usize) -> String {
    if body.is_empty() {
        return "<empty>".to_string();
    }
    let escaped = body.replace('\n', "\\n").replace('\r', "\\r");
    if escaped.chars().count() <= limit {
        return escaped;
    }
    let truncated: String = escaped.chars().take(limit).collect();
    format!("{truncated}...")
}
