//! HTTP header probing over libcurl.
//!
//! Fetches response status plus `Content-Disposition`/`Content-Type` with a
//! HEAD request, or a GET whose body is discarded (some servers reject HEAD
//! but serve GET). curl runs on a blocking thread via `spawn_blocking`.

use std::str;
use std::time::Duration;

use async_trait::async_trait;

use crate::config::ProbeConfig;
use crate::host::{HeaderProbe, ProbeError, ProbeMethod, ProbeResponse};

/// Header probe backed by `curl::easy::Easy`.
#[derive(Debug, Clone, Default)]
pub struct CurlProbe {
    config: ProbeConfig,
}

impl CurlProbe {
    pub fn new(config: ProbeConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl HeaderProbe for CurlProbe {
    async fn fetch(&self, url: &str, method: ProbeMethod) -> Result<ProbeResponse, ProbeError> {
        let url = url.to_string();
        let config = self.config.clone();
        tokio::task::spawn_blocking(move || probe(&url, method, &config))
            .await
            .map_err(|e| ProbeError(format!("probe task: {e}")))?
    }
}

/// Performs the request on the current thread. Follows redirects; an HTTP
/// error status is a valid outcome here, not an error.
fn probe(url: &str, method: ProbeMethod, config: &ProbeConfig) -> Result<ProbeResponse, ProbeError> {
    let mut headers: Vec<String> = Vec::new();

    let mut easy = curl::easy::Easy::new();
    easy.url(url).map_err(curl_err)?;
    match method {
        ProbeMethod::Head => easy.nobody(true).map_err(curl_err)?,
        ProbeMethod::Get => easy.get(true).map_err(curl_err)?,
    }
    easy.follow_location(true).map_err(curl_err)?;
    easy.connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .map_err(curl_err)?;
    easy.timeout(Duration::from_secs(config.timeout_secs))
        .map_err(curl_err)?;

    {
        let mut transfer = easy.transfer();
        transfer
            .header_function(|data| {
                if let Ok(s) = str::from_utf8(data) {
                    headers.push(s.trim_end().to_string());
                }
                true
            })
            .map_err(curl_err)?;
        // GET fallback: body bytes are discarded, only headers matter.
        transfer
            .write_function(|data| Ok(data.len()))
            .map_err(curl_err)?;
        transfer.perform().map_err(curl_err)?;
    }

    let status = easy.response_code().map_err(curl_err)?;
    Ok(parse_headers(status, &headers))
}

fn curl_err(e: curl::Error) -> ProbeError {
    ProbeError(e.to_string())
}

/// Collects the filename-relevant headers from raw header lines.
fn parse_headers(status: u32, lines: &[String]) -> ProbeResponse {
    let mut response = ProbeResponse {
        status,
        ..Default::default()
    };
    for line in lines {
        if let Some((name, value)) = line.trim().split_once(':') {
            let name = name.trim();
            let value = value.trim();
            if name.eq_ignore_ascii_case("content-disposition") {
                response.content_disposition = Some(value.to_string());
            } else if name.eq_ignore_ascii_case("content-type") {
                response.content_type = Some(value.to_string());
            }
        }
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_headers_picks_relevant_fields() {
        let lines = [
            "HTTP/1.1 200 OK".to_string(),
            "Content-Type: image/png".to_string(),
            "Content-Disposition: attachment; filename=\"a.png\"".to_string(),
            "Content-Length: 999".to_string(),
        ];
        let r = parse_headers(200, &lines);
        assert_eq!(r.status, 200);
        assert_eq!(r.content_type.as_deref(), Some("image/png"));
        assert!(r
            .content_disposition
            .as_deref()
            .unwrap()
            .contains("a.png"));
    }

    #[test]
    fn parse_headers_tolerates_noise() {
        let lines = ["".to_string(), "HTTP/1.1 404 Not Found".to_string()];
        let r = parse_headers(404, &lines);
        assert_eq!(r.status, 404);
        assert!(r.content_type.is_none());
        assert!(r.content_disposition.is_none());
    }
}
