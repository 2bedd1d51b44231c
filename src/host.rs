//! Host collaborator interfaces.
//!
//! The surrounding extension runtime provides the download manager, the tab
//! messaging channel, and the network. Everything here is a seam so the
//! pipeline can run against the real host or an in-memory test double.

use async_trait::async_trait;
use thiserror::Error;

/// Identifier the host assigns to a submitted download.
pub type DownloadId = i64;

/// Identifier of the tab (UI context) that triggered a request.
pub type TabId = i64;

/// Collision policy passed to the host download manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictAction {
    /// Append a numeric suffix instead of overwriting an existing file.
    Uniquify,
    Overwrite,
    Prompt,
}

/// Parameters for one host download submission.
#[derive(Debug, Clone)]
pub struct DownloadSpec {
    pub url: String,
    /// Relative target: normalized save path plus the final leaf filename.
    pub filename: String,
    pub conflict_action: ConflictAction,
    /// Show the host's save dialog instead of saving silently.
    pub save_as: bool,
}

/// State of a previously submitted download as reported by the host.
#[derive(Debug, Clone)]
pub struct DownloadItem {
    pub id: DownloadId,
    /// Absolute path the host actually stored the file under.
    pub filename: String,
}

/// Error from a host download-manager call.
#[derive(Debug, Error)]
#[error("host download API: {0}")]
pub struct HostError(pub String);

/// Request-level header-probe failure (no response at all; HTTP error
/// statuses are reported through [`ProbeResponse::status`] instead).
#[derive(Debug, Error)]
#[error("header probe: {0}")]
pub struct ProbeError(pub String);

/// Method used for a header probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeMethod {
    Head,
    Get,
}

/// Response headers relevant to filename determination.
#[derive(Debug, Clone, Default)]
pub struct ProbeResponse {
    pub status: u32,
    pub content_disposition: Option<String>,
    pub content_type: Option<String>,
}

/// Host download-manager surface.
#[async_trait]
pub trait DownloadHost: Send + Sync {
    /// Submits a download; resolves to the host-assigned id.
    async fn download(&self, spec: DownloadSpec) -> Result<DownloadId, HostError>;

    /// Looks up a download record by id. `None` when the record is not yet
    /// visible; the record store may race with submission.
    async fn search_by_id(&self, id: DownloadId) -> Result<Option<DownloadItem>, HostError>;

    /// One-way message to the originating tab.
    async fn notify_tab(&self, tab: TabId, message: &str) -> Result<(), HostError>;
}

/// Header-only network fetch.
#[async_trait]
pub trait HeaderProbe: Send + Sync {
    /// Fetches response headers for `url`. GET responses have their body
    /// discarded; only status and headers are consulted.
    async fn fetch(&self, url: &str, method: ProbeMethod) -> Result<ProbeResponse, ProbeError>;
}
