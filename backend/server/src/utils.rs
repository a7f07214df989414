pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());

    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }

    out
}

/// Escaped text with its line breaks kept as `<br>`.
pub fn escape_multiline(text: &str) -> String {
    text.split('\n')
        .map(|line| escape_html(line.trim_end_matches('\r')))
        .collect::<Vec<_>>()
        .join("<br>")
}

/// Escaped URL for an attribute, only for http(s) links.
pub fn safe_url(url: &str) -> Option<String> {
    let url = url.trim();
    let lower = url.to_ascii_lowercase();

    if lower.starts_with("https://") || lower.starts_with("http://") {
        Some(escape_html(url))
    } else {
        None
    }
}
