//! Save-path and prefix template resolution.
//!
//! Path templates may carry placeholder tokens (`::domain::`, `::title::`,
//! `::thread_num::`, `::date::`, `::time::`) that are filled from page
//! metadata and the clock. Either slash style is accepted in templates; the
//! host download API recognizes both.

use chrono::{DateTime, Local};

use crate::request::PageInfo;
use crate::url_model::strip_illegal_chars;

/// Resolves a save-path template against `page` and the current time.
pub fn resolve_save_path(template: &str, page: &PageInfo) -> String {
    resolve_save_path_at(template, page, Local::now())
}

/// Resolves a prefix template: `::date::` / `::time::` expand, anything else
/// passes through, empty means no prefix.
pub fn resolve_prefix(template: &str) -> String {
    resolve_prefix_at(template, Local::now())
}

/// Substitutes placeholders and normalizes the result to either an empty
/// string (download-manager default directory) or a trimmed path with
/// exactly one trailing slash.
pub(crate) fn resolve_save_path_at(
    template: &str,
    page: &PageInfo,
    now: DateTime<Local>,
) -> String {
    // Every placeholder contains a colon; skip the scan when none can match.
    let substituted = if template.contains(':') {
        substitute(template, page, now)
    } else {
        template.to_string()
    };

    let trimmed = substituted.trim_matches(|c| c == '/' || c == '\\');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("{trimmed}/")
    }
}

pub(crate) fn resolve_prefix_at(template: &str, now: DateTime<Local>) -> String {
    match template {
        "::date::" => format_date(now),
        "::time::" => now.timestamp_millis().to_string(),
        other => other.to_string(),
    }
}

/// One substitution per placeholder per scan; metadata values are stripped of
/// characters the host rejects before they enter the path.
fn substitute(template: &str, page: &PageInfo, now: DateTime<Local>) -> String {
    template
        .replacen("::domain::", &strip_illegal_chars(&page.domain), 1)
        .replacen("::title::", &strip_illegal_chars(&page.title), 1)
        .replacen("::thread_num::", &strip_illegal_chars(&page.thread_num), 1)
        .replacen("::date::", &format_date(now), 1)
        .replacen("::time::", &now.timestamp_millis().to_string(), 1)
}

/// Local timestamp as `YYYYMMDD_HHMMSS`.
fn format_date(now: DateTime<Local>) -> String {
    now.format("%Y%m%d_%H%M%S").to_string()
}
