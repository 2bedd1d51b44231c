//! End-to-end pipeline tests with in-memory host doubles.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use mediasave::config::{DuplicateCheckConfig, SaverConfig};
use mediasave::host::{
    ConflictAction, DownloadHost, DownloadId, DownloadItem, DownloadSpec, HeaderProbe, HostError,
    ProbeError, ProbeMethod, ProbeResponse, TabId,
};
use mediasave::{DownloadRequest, PageInfo, Saver, DUPLICATE_WARNING};

const TAB: TabId = 7;

/// Host double: records submissions and notifications, serves one download
/// record that becomes visible after a configurable number of lookups.
#[derive(Default)]
struct MockHost {
    fail_download: bool,
    /// Lookups that return "not found" before the record appears.
    lookups_before_visible: u32,
    /// Absolute path the host "stored" the file under; `None` means the
    /// record never becomes visible.
    stored_path: Option<String>,
    lookups: AtomicU32,
    submitted: Mutex<Vec<DownloadSpec>>,
    notifications: Mutex<Vec<(TabId, String)>>,
}

impl MockHost {
    fn stored(path: &str) -> Self {
        Self {
            stored_path: Some(path.to_string()),
            ..Self::default()
        }
    }

    fn submitted(&self) -> Vec<DownloadSpec> {
        self.submitted.lock().unwrap().clone()
    }

    fn notifications(&self) -> Vec<(TabId, String)> {
        self.notifications.lock().unwrap().clone()
    }
}

#[async_trait]
impl DownloadHost for MockHost {
    async fn download(
        &self,
        spec: DownloadSpec,
    ) -> Result<DownloadId, HostError> {
        if self.fail_download {
            return Err(HostError("denied".to_string()));
        }
        self.submitted.lock().unwrap().push(spec);
        Ok(42)
    }

    async fn search_by_id(&self, id: DownloadId) -> Result<Option<DownloadItem>, HostError> {
        let n = self.lookups.fetch_add(1, Ordering::SeqCst);
        if n < self.lookups_before_visible {
            return Ok(None);
        }
        Ok(self.stored_path.clone().map(|filename| DownloadItem { id, filename }))
    }

    async fn notify_tab(&self, tab: TabId, message: &str) -> Result<(), HostError> {
        self.notifications
            .lock()
            .unwrap()
            .push((tab, message.to_string()));
        Ok(())
    }
}

/// Probe double replaying canned responses in order.
struct ScriptedProbe {
    responses: Mutex<Vec<Result<ProbeResponse, ProbeError>>>,
    calls: Mutex<Vec<ProbeMethod>>,
}

impl ScriptedProbe {
    fn new(responses: Vec<Result<ProbeResponse, ProbeError>>) -> Self {
        Self {
            responses: Mutex::new(responses),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Probe that panics if the pipeline touches the network.
    fn unreachable() -> Self {
        Self::new(Vec::new())
    }
}

#[async_trait]
impl HeaderProbe for ScriptedProbe {
    async fn fetch(&self, _url: &str, method: ProbeMethod) -> Result<ProbeResponse, ProbeError> {
        self.calls.lock().unwrap().push(method);
        let mut responses = self.responses.lock().unwrap();
        assert!(!responses.is_empty(), "unexpected probe call");
        responses.remove(0)
    }
}

fn test_config() -> SaverConfig {
    SaverConfig {
        duplicate_check: DuplicateCheckConfig {
            max_retries: 5,
            delay_ms: 1,
        },
        ..SaverConfig::default()
    }
}

fn saver(host: Arc<MockHost>, probe: Arc<ScriptedProbe>) -> Saver {
    Saver::new(host, probe, test_config())
}

fn request(src: &str) -> DownloadRequest {
    DownloadRequest {
        src: src.to_string(),
        path: String::new(),
        filename_prefix: String::new(),
        original_name: String::new(),
        show_save_dialog: false,
        page_info: PageInfo::default(),
    }
}

#[tokio::test]
async fn url_derived_filename_needs_no_probe() {
    let host = Arc::new(MockHost::stored("/home/u/Downloads/photo.jpg"));
    let probe = Arc::new(ScriptedProbe::unreachable());
    saver(host.clone(), probe)
        .process_download(request("http://host/a/photo.jpg/480"), TAB)
        .await;

    let submitted = host.submitted();
    assert_eq!(submitted.len(), 1);
    assert_eq!(submitted[0].filename, "photo.jpg");
    assert_eq!(submitted[0].conflict_action, ConflictAction::Uniquify);
    assert!(host.notifications().is_empty());
}

#[tokio::test]
async fn uniquified_store_warns_the_tab_once() {
    let host = Arc::new(MockHost::stored("/home/u/Downloads/photo (1).jpg"));
    let probe = Arc::new(ScriptedProbe::unreachable());
    saver(host.clone(), probe)
        .process_download(request("http://host/photo.jpg"), TAB)
        .await;

    assert_eq!(
        host.notifications(),
        vec![(TAB, DUPLICATE_WARNING.to_string())]
    );
}

#[tokio::test]
async fn exact_store_does_not_warn() {
    let host = Arc::new(MockHost::stored("/home/u/Downloads/photo.jpg"));
    let probe = Arc::new(ScriptedProbe::unreachable());
    saver(host.clone(), probe)
        .process_download(request("http://host/photo.jpg"), TAB)
        .await;

    assert!(host.notifications().is_empty());
}

#[tokio::test]
async fn record_visible_after_retries_still_warns() {
    let host = Arc::new(MockHost {
        lookups_before_visible: 3,
        stored_path: Some("/d/photo (2).jpg".to_string()),
        ..MockHost::default()
    });
    let probe = Arc::new(ScriptedProbe::unreachable());
    saver(host.clone(), probe)
        .process_download(request("http://host/photo.jpg"), TAB)
        .await;

    assert_eq!(host.lookups.load(Ordering::SeqCst), 4);
    assert_eq!(host.notifications().len(), 1);
}

#[tokio::test]
async fn record_never_visible_gives_up_silently() {
    let host = Arc::new(MockHost {
        stored_path: None,
        ..MockHost::default()
    });
    let probe = Arc::new(ScriptedProbe::unreachable());
    saver(host.clone(), probe)
        .process_download(request("http://host/photo.jpg"), TAB)
        .await;

    // Bounded: the initial lookup plus the configured retries, then silence.
    assert_eq!(host.lookups.load(Ordering::SeqCst), 6);
    assert!(host.notifications().is_empty());
}

#[tokio::test]
async fn record_visible_on_last_retry_still_warns() {
    // The full budget is one lookup plus five retries; a record that only
    // appears on the sixth lookup is still checked.
    let host = Arc::new(MockHost {
        lookups_before_visible: 5,
        stored_path: Some("/d/photo (1).jpg".to_string()),
        ..MockHost::default()
    });
    let probe = Arc::new(ScriptedProbe::unreachable());
    saver(host.clone(), probe)
        .process_download(request("http://host/photo.jpg"), TAB)
        .await;

    assert_eq!(host.lookups.load(Ordering::SeqCst), 6);
    assert_eq!(
        host.notifications(),
        vec![(TAB, DUPLICATE_WARNING.to_string())]
    );
}

#[tokio::test]
async fn submission_failure_is_swallowed() {
    let host = Arc::new(MockHost {
        fail_download: true,
        ..MockHost::default()
    });
    let probe = Arc::new(ScriptedProbe::unreachable());
    saver(host.clone(), probe)
        .process_download(request("http://host/photo.jpg"), TAB)
        .await;

    assert_eq!(host.lookups.load(Ordering::SeqCst), 0);
    assert!(host.notifications().is_empty());
}

#[tokio::test]
async fn head_rejection_retries_as_get() {
    let host = Arc::new(MockHost::stored("/d/real.gif"));
    let probe = Arc::new(ScriptedProbe::new(vec![
        Ok(ProbeResponse {
            status: 405,
            ..Default::default()
        }),
        Ok(ProbeResponse {
            status: 200,
            content_disposition: Some("attachment; filename=\"real.gif\"".to_string()),
            content_type: None,
        }),
    ]));
    saver(host.clone(), probe.clone())
        .process_download(request("http://host/videos/12345"), TAB)
        .await;

    assert_eq!(
        *probe.calls.lock().unwrap(),
        vec![ProbeMethod::Head, ProbeMethod::Get]
    );
    assert_eq!(host.submitted()[0].filename, "real.gif");
}

#[tokio::test]
async fn content_type_supplies_extension_for_basename() {
    let host = Arc::new(MockHost::stored("/d/12345.jpg"));
    let probe = Arc::new(ScriptedProbe::new(vec![Ok(ProbeResponse {
        status: 200,
        content_disposition: None,
        content_type: Some("image/jpeg".to_string()),
    })]));
    saver(host.clone(), probe)
        .process_download(request("http://host/videos/12345"), TAB)
        .await;

    assert_eq!(host.submitted()[0].filename, "12345.jpg");
}

#[tokio::test]
async fn empty_basename_with_jpeg_type_ends_in_jpg() {
    let host = Arc::new(MockHost::default());
    let probe = Arc::new(ScriptedProbe::new(vec![Ok(ProbeResponse {
        status: 200,
        content_disposition: None,
        content_type: Some("image/jpeg".to_string()),
    })]));
    saver(host.clone(), probe)
        .process_download(request("http://example.com/"), TAB)
        .await;

    let name = host.submitted()[0].filename.clone();
    assert!(name.ends_with(".jpg"), "got {name}");
    assert!(!name.ends_with(".jpeg"));
}

#[tokio::test]
async fn network_failure_falls_back_to_title_scan() {
    let host = Arc::new(MockHost::default());
    let probe = Arc::new(ScriptedProbe::new(vec![Err(ProbeError(
        "connection refused".to_string(),
    ))]));
    let mut req = request("http://host/videos/12345");
    req.page_info.title = "thread about photo.png and more".to_string();
    saver(host.clone(), probe)
        .process_download(req, TAB)
        .await;

    assert_eq!(host.submitted()[0].filename, "photo.png");
}

#[tokio::test]
async fn templates_prefix_and_dialog_flag_flow_through() {
    let host = Arc::new(MockHost::default());
    let probe = Arc::new(ScriptedProbe::unreachable());
    let mut req = request("http://host/pic.png");
    req.path = "/::domain::/::thread_num::/".to_string();
    req.filename_prefix = "board".to_string();
    req.show_save_dialog = true;
    req.page_info = PageInfo {
        domain: "example.com".to_string(),
        title: String::new(),
        thread_num: "777".to_string(),
    };
    saver(host.clone(), probe).process_download(req, TAB).await;

    let spec = &host.submitted()[0];
    assert_eq!(spec.filename, "example.com/777/board__pic.png");
    assert!(spec.save_as);
}

#[tokio::test]
async fn illegal_characters_never_reach_the_host() {
    let host = Arc::new(MockHost::default());
    let probe = Arc::new(ScriptedProbe::unreachable());
    let mut req = request("http://host/x");
    req.original_name = "a/b\\c:d*e?f\"g<h>i|j\tk.png".to_string();
    saver(host.clone(), probe).process_download(req, TAB).await;

    let name = host.submitted()[0].filename.clone();
    assert!(
        !name.contains(['/', '\\', ':', '*', '?', '"', '<', '>', '|', '\t']),
        "got {name:?}"
    );
    assert_eq!(name, "abcdefghijk.png");
}

#[tokio::test]
async fn request_json_drives_the_pipeline() {
    let req: DownloadRequest = serde_json::from_str(
        r#"{
            "src": "http://host/a/photo.jpg",
            "path": "pics",
            "pageInfo": {"domain": "host", "title": "", "threadNum": ""}
        }"#,
    )
    .unwrap();
    let host = Arc::new(MockHost::default());
    let probe = Arc::new(ScriptedProbe::unreachable());
    saver(host.clone(), probe).process_download(req, TAB).await;

    assert_eq!(host.submitted()[0].filename, "pics/photo.jpg");
}
