//! Filename extraction from a source URL.
//!
//! Host download APIs infer filenames from the final path segment only,
//! which fails when the real filename sits in a middle segment (some media
//! hosts append extra segments after it) or when the URL carries a numeric
//! suffix segment. This recovers the filename in those cases.

use super::has_media_extension;
use super::percent::percent_decode;

/// Outcome of URL-based derivation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UrlName {
    /// A path segment ending in a recognized media extension.
    Filename(String),
    /// Best-effort stem with no confirmed extension; may be empty.
    Basename(String),
}

/// Derives a filename (or basename) from `original_url`. Never fails.
///
/// Steps: percent-decode (malformed escapes keep the raw URL), strip the
/// first `scheme://host/` prefix, cut at the first of `?` `#` `:`, collapse
/// doubled slashes, then look for a trailing segment with a media extension.
pub fn filename_from_url(original_url: &str) -> UrlName {
    let decoded =
        percent_decode(original_url).unwrap_or_else(|| original_url.to_string());

    let rest = match decoded
        .strip_prefix("http://")
        .or_else(|| decoded.strip_prefix("https://"))
    {
        Some(after_scheme) => after_scheme
            .split_once('/')
            .map_or("", |(_host, path)| path),
        None => decoded.as_str(),
    };

    // Query string, fragment, and trailing `:word` suffixes are all noise.
    let cut = rest.split(['?', '#', ':']).next().unwrap_or("");

    let mut path = cut.to_string();
    while path.contains("//") {
        path = path.replace("//", "/");
    }

    if let Some(name) = media_segment(&path) {
        return UrlName::Filename(name);
    }

    // One video host appends a resolution segment after the real name.
    let trimmed = path.strip_suffix("/480").unwrap_or(&path);
    UrlName::Basename(trimmed.rsplit('/').next().unwrap_or("").to_string())
}

/// Finds the last segment ending in a known media extension, allowing an
/// optional dot-free sub-path after it.
fn media_segment(path: &str) -> Option<String> {
    let segments: Vec<&str> = path.split('/').collect();
    let (index, segment) = segments
        .iter()
        .enumerate()
        .rev()
        .find(|(_, s)| has_media_extension(s))?;

    let tail_ok = segments[index + 1..]
        .iter()
        .all(|s| !s.is_empty() && !s.contains('.'));
    if tail_ok {
        Some(segment.to_string())
    } else {
        None
    }
}
