//! Download request input types.
//!
//! Requests arrive as JSON from the extension messaging layer; fields the
//! page did not set come through as their empty defaults.

use serde::Deserialize;

/// Page metadata used for template placeholders and last-resort fallbacks.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PageInfo {
    pub domain: String,
    pub title: String,
    pub thread_num: String,
}

/// One download request. Immutable once received; all mutable working state
/// lives in the per-request resolution state.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadRequest {
    /// Source URL to fetch.
    pub src: String,
    /// Save-path template; empty means the download manager's default dir.
    #[serde(default)]
    pub path: String,
    /// Filename prefix template (`::date::`, `::time::`, or a literal).
    #[serde(default)]
    pub filename_prefix: String,
    /// Explicit filename supplied by the page, if any.
    #[serde(default)]
    pub original_name: String,
    /// Ask the host to show its save dialog instead of saving silently.
    #[serde(default)]
    pub show_save_dialog: bool,
    #[serde(default)]
    pub page_info: PageInfo,
}
