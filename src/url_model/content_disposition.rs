//! Content-Disposition filename extraction.

use super::percent::percent_decode;

/// Extracts the `filename` / `filename*` parameter from a raw
/// Content-Disposition header value.
///
/// An optional charset/language prefix of up to 20 characters ending in `'`
/// (as in `filename*=UTF-8''name`) is discarded. The value runs to the next
/// `;`, is percent-decoded (malformed escapes keep the raw text), and has
/// embedded quote characters stripped.
pub fn filename_from_content_disposition(header: &str) -> Option<String> {
    let lower = header.to_ascii_lowercase();
    let at = lower.rfind("filename")?;

    let mut rest = &header[at + "filename".len()..];
    rest = rest.strip_prefix('*').unwrap_or(rest);
    rest = rest.strip_prefix('=')?;

    if let Some(end) = charset_prefix_end(rest) {
        rest = &rest[end..];
    }

    let value = rest.split(';').next().unwrap_or("").trim();
    if value.is_empty() {
        return None;
    }

    let decoded = percent_decode(value).unwrap_or_else(|| value.to_string());
    let cleaned: String = decoded.chars().filter(|&c| c != '"').collect();
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned.to_string())
    }
}

/// Byte offset just past a charset/language prefix: the last `'` within the
/// first 21 characters, if any.
fn charset_prefix_end(rest: &str) -> Option<usize> {
    let mut end = None;
    for (chars_seen, (i, c)) in rest.char_indices().enumerate() {
        if chars_seen > 20 {
            break;
        }
        if c == '\'' {
            end = Some(i + 1);
        }
    }
    end
}
