//! Download pipeline: resolve a filename, submit, verify.

mod duplicate;
mod resolve;

use std::sync::Arc;

use tracing::{debug, warn};

use crate::config::SaverConfig;
use crate::host::{ConflictAction, DownloadHost, DownloadSpec, HeaderProbe, TabId};
use crate::request::DownloadRequest;

use resolve::ResolutionState;

/// Message sent to the originating tab when the host renamed the file.
pub const DUPLICATE_WARNING: &str = "duplicate_warning";

/// The download helper. Owns the host collaborators; each call to
/// [`Saver::process_download`] works on its own resolution state, so calls
/// may run concurrently.
pub struct Saver {
    host: Arc<dyn DownloadHost>,
    probe: Arc<dyn HeaderProbe>,
    config: SaverConfig,
}

impl Saver {
    pub fn new(host: Arc<dyn DownloadHost>, probe: Arc<dyn HeaderProbe>, config: SaverConfig) -> Self {
        Self { host, probe, config }
    }

    /// Resolves a filename for `request`, submits the download with the
    /// uniquify collision policy, and notifies `tab` if the host renamed the
    /// file. Fire-and-forget: every failure is handled here and nothing is
    /// returned to the caller.
    pub async fn process_download(&self, request: DownloadRequest, tab: TabId) {
        let mut state = ResolutionState::from_request(&request);
        if !state.is_resolved() {
            state
                .resolve_from_headers(self.probe.as_ref(), &request.src, &request.page_info.title)
                .await;
        }

        let filename = state.final_filename();
        let target = format!("{}{}", state.save_path, filename);
        debug!("resolved {} -> {target}", request.src);

        let spec = DownloadSpec {
            url: request.src.clone(),
            filename: target,
            conflict_action: ConflictAction::Uniquify,
            save_as: request.show_save_dialog,
        };

        let id = match self.host.download(spec).await {
            Ok(id) => id,
            Err(e) => {
                // Accepted degraded behavior: not retried, not surfaced.
                warn!("download submission failed for {}: {e}", request.src);
                return;
            }
        };

        duplicate::check(
            self.host.as_ref(),
            &self.config.duplicate_check,
            id,
            tab,
            &filename,
        )
        .await;
    }
}
