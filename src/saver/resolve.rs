//! Per-request filename resolution.

use chrono::Utc;
use tracing::debug;

use crate::host::{HeaderProbe, ProbeError, ProbeMethod, ProbeResponse};
use crate::request::DownloadRequest;
use crate::template;
use crate::url_model::{self, UrlName};

/// Mutable working state for one download request.
///
/// Created per request and discarded once the duplicate check finishes;
/// nothing here is shared between concurrent requests.
#[derive(Debug, Default)]
pub(crate) struct ResolutionState {
    /// Empty, or a trimmed directory path with exactly one trailing slash.
    pub save_path: String,
    pub prefix: String,
    /// Resolved leaf name; empty until determined.
    pub filename: String,
    /// Best-effort stem when no extension could be confirmed.
    pub basename: String,
}

impl ResolutionState {
    /// Resolves templates and tries the URL-only derivation. An explicit
    /// original name from the page short-circuits everything.
    pub fn from_request(request: &DownloadRequest) -> Self {
        let mut state = Self {
            save_path: template::resolve_save_path(&request.path, &request.page_info),
            prefix: template::resolve_prefix(&request.filename_prefix),
            ..Self::default()
        };

        if !request.original_name.is_empty() {
            state.filename = request.original_name.clone();
        } else {
            match url_model::filename_from_url(&request.src) {
                UrlName::Filename(name) => state.filename = name,
                UrlName::Basename(base) => state.basename = base,
            }
        }
        state
    }

    /// True when a definite filename is already known.
    pub fn is_resolved(&self) -> bool {
        !self.filename.is_empty()
    }

    /// Determines the filename from response headers; falls back to a
    /// page-title scan or the clock when the network is unreachable.
    pub async fn resolve_from_headers(
        &mut self,
        probe: &dyn HeaderProbe,
        url: &str,
        page_title: &str,
    ) {
        match fetch_with_get_fallback(probe, url).await {
            Ok(response) => self.apply_headers(&response),
            Err(e) => {
                debug!("header probe failed for {url}: {e}");
                self.filename =
                    url_model::filename_from_title(page_title).unwrap_or_else(epoch_millis);
            }
        }
    }

    fn apply_headers(&mut self, response: &ProbeResponse) {
        if let Some(cd) = response.content_disposition.as_deref() {
            if let Some(name) = url_model::filename_from_content_disposition(cd) {
                self.filename = name;
                return;
            }
        }

        let stem = if self.basename.is_empty() {
            epoch_millis()
        } else {
            self.basename.clone()
        };
        let extension = response
            .content_type
            .as_deref()
            .map(extension_from_content_type)
            .unwrap_or_default();
        self.filename = format!("{stem}{extension}");
    }

    /// Final leaf name: percent-decoded (malformed escapes keep the raw
    /// string), prefixed, stripped of characters the host rejects. A name
    /// that strips down to nothing falls back to the clock so the submitted
    /// leaf is never empty.
    pub fn final_filename(&self) -> String {
        let decoded = url_model::percent_decode(&self.filename)
            .unwrap_or_else(|| self.filename.clone());
        let named = if self.prefix.is_empty() {
            decoded
        } else {
            format!("{}__{}", self.prefix, decoded)
        };
        let stripped = url_model::strip_illegal_chars(&named);
        if stripped.is_empty() {
            epoch_millis()
        } else {
            stripped
        }
    }
}

/// HEAD first; servers answering 404/405/501 get one GET retry (some reject
/// HEAD but serve GET).
async fn fetch_with_get_fallback(
    probe: &dyn HeaderProbe,
    url: &str,
) -> Result<ProbeResponse, ProbeError> {
    let head = probe.fetch(url, ProbeMethod::Head).await?;
    if matches!(head.status, 404 | 405 | 501) {
        return probe.fetch(url, ProbeMethod::Get).await;
    }
    Ok(head)
}

/// Extension derived from a Content-Type: first word of the subtype, with
/// the `jpeg` alias normalized. Includes the leading dot; empty when the
/// subtype yields nothing.
fn extension_from_content_type(content_type: &str) -> String {
    let subtype = content_type.split('/').nth(1).unwrap_or("");
    let word: String = subtype
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect();
    if word.is_empty() {
        String::new()
    } else if word.eq_ignore_ascii_case("jpeg") {
        ".jpg".to_string()
    } else {
        format!(".{word}")
    }
}

/// Last-resort filename stem: current epoch milliseconds.
fn epoch_millis() -> String {
    Utc::now().timestamp_millis().to_string()
}
