//! Post-download rename verification.

use tokio::time::{sleep, Duration};
use tracing::debug;

use crate::config::DuplicateCheckConfig;
use crate::host::{DownloadHost, DownloadId, TabId};

use super::DUPLICATE_WARNING;

/// Looks up the stored download record and warns the tab when the host
/// uniquified the filename over an existing file.
///
/// The record store can lag behind submission, so an empty result is retried
/// on a fixed delay, as an explicit counter loop: one initial lookup plus up
/// to `max_retries` more. Exhausting the budget is a silent give-up: no
/// notification, no error.
pub(crate) async fn check(
    host: &dyn DownloadHost,
    config: &DuplicateCheckConfig,
    id: DownloadId,
    tab: TabId,
    requested: &str,
) {
    let mut retries = 0u32;
    let item = loop {
        match host.search_by_id(id).await {
            Ok(Some(item)) => break item,
            Ok(None) if retries < config.max_retries => {
                retries += 1;
                sleep(Duration::from_millis(config.delay_ms)).await;
            }
            Ok(None) => {
                debug!("download {id}: record missing after {retries} retries, giving up");
                return;
            }
            Err(e) => {
                debug!("download {id}: record lookup failed: {e}");
                return;
            }
        }
    };

    // A stored path that no longer ends with the requested leaf name means
    // the host appended a uniquify suffix.
    if !item.filename.ends_with(requested) {
        debug!(
            "download {id}: stored as {:?}, requested {:?}, warning tab {tab}",
            item.filename, requested
        );
        if let Err(e) = host.notify_tab(tab, DUPLICATE_WARNING).await {
            debug!("download {id}: duplicate notification failed: {e}");
        }
    }
}
