//! URL modeling and filename derivation.
//!
//! Derives filenames from URL paths, Content-Disposition headers, or page
//! titles, and strips characters the host download manager rejects.

mod content_disposition;
mod path;
mod percent;
mod sanitize;

pub use content_disposition::filename_from_content_disposition;
pub use path::{filename_from_url, UrlName};
pub use percent::percent_decode;
pub use sanitize::strip_illegal_chars;

/// Extensions treated as confirmed media filenames.
const MEDIA_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "png", "gif", "bmp", "webm", "mp4", "ogg", "mp3",
];

/// True when `token` ends in `.<ext>` for a known media extension
/// (case-insensitive, non-empty stem).
pub fn has_media_extension(token: &str) -> bool {
    match token.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => {
            MEDIA_EXTENSIONS.iter().any(|m| ext.eq_ignore_ascii_case(m))
        }
        _ => false,
    }
}

/// Scans a page title for a whitespace-delimited token that looks like a
/// media filename. Last resort when the network is unreachable.
pub fn filename_from_title(title: &str) -> Option<String> {
    title
        .split_whitespace()
        .find(|t| has_media_extension(t))
        .map(str::to_string)
}
