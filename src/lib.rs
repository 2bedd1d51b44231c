//! mediasave: download helper for browser-hosted media saving.
//!
//! Given a download request (source URL, optional original filename, save
//! path and prefix templates, page metadata), the pipeline resolves a final
//! save path and filename, submits the download to the host download manager
//! with the uniquify collision policy, and afterwards checks whether the
//! host silently renamed the file over an existing one, warning the
//! originating tab when it did.
//!
//! The host surfaces (download manager, tab messaging, header fetches) are
//! traits in [`host`]; [`fetch_head::CurlProbe`] is the bundled network
//! implementation. The single entry point is [`Saver::process_download`].

pub mod config;
pub mod fetch_head;
pub mod host;
pub mod logging;
pub mod request;
pub mod saver;
pub mod template;
pub mod url_model;

pub use config::SaverConfig;
pub use request::{DownloadRequest, PageInfo};
pub use saver::{Saver, DUPLICATE_WARNING};
