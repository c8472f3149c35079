//! Remote script retrieval.

use std::io::Read;
use std::time::Duration;

use brewsync_core::ToolUrl;

use crate::error::SyncError;

/// Request timeout for the blocking HTTP agent.
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Default upper bound on a downloaded script body. Larger bodies are a `Fetch` error.
pub const MAX_BODY_BYTES: u64 = 64 * 1024 * 1024;

/// Source of the remote tool script bytes.
pub trait Fetcher {
    /// Download `url` in full. Any non-success outcome is a `SyncError::Fetch`.
    fn fetch(&self, url: &ToolUrl) -> Result<Vec<u8>, SyncError>;
}

/// Blocking HTTP fetcher backed by a `ureq` agent.
pub struct HttpFetcher {
    agent: ureq::Agent,
    max_body_bytes: u64,
}

impl HttpFetcher {
    pub fn new() -> Self {
        Self::with_timeout(FETCH_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(timeout)
            .user_agent(concat!("brewsync/", env!("CARGO_PKG_VERSION")))
            .build();
        Self {
            agent,
            max_body_bytes: MAX_BODY_BYTES,
        }
    }

    pub fn with_max_body_bytes(mut self, limit: u64) -> Self {
        self.max_body_bytes = limit;
        self
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, url: &ToolUrl) -> Result<Vec<u8>, SyncError> {
        tracing::debug!("GET {}", url);
        let fetch_err = |reason: String| SyncError::Fetch {
            url: url.to_string(),
            reason,
        };

        let response = match self.agent.get(url.as_str()).call() {
            Ok(response) => response,
            Err(ureq::Error::Status(code, response)) => {
                return Err(fetch_err(format!(
                    "HTTP {code} {}",
                    response.status_text()
                )))
            }
            Err(ureq::Error::Transport(transport)) => return Err(fetch_err(transport.to_string())),
        };

        // One byte past the limit distinguishes "exactly at" from "over".
        let limit = self.max_body_bytes;
        let mut body = Vec::new();
        response
            .into_reader()
            .take(limit.saturating_add(1))
            .read_to_end(&mut body)
            .map_err(|e| fetch_err(format!("reading body: {e}")))?;
        if body.len() as u64 > limit {
            return Err(fetch_err(format!("body exceeds {limit} bytes")));
        }
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufRead, BufReader, Write};
    use std::net::TcpListener;
    use std::thread;

    /// Serve exactly one canned HTTP response on an ephemeral port.
    fn serve_once(status_line: &'static str, body: &'static [u8]) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());
            let mut line = String::new();
            loop {
                line.clear();
                if reader.read_line(&mut line).unwrap() == 0 || line == "\r\n" {
                    break;
                }
            }
            let head = format!(
                "{status_line}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                body.len()
            );
            // The client may hang up early once it has seen enough.
            let _ = stream.write_all(head.as_bytes());
            let _ = stream.write_all(body);
        });
        format!("http://{addr}/octo/tool/main/tool.py")
    }

    #[test]
    fn fetch_returns_body_on_200() {
        let url = serve_once("HTTP/1.1 200 OK", b"print('hi')\n");
        let body = HttpFetcher::new().fetch(&ToolUrl(url)).unwrap();
        assert_eq!(body, b"print('hi')\n");
    }

    #[test]
    fn fetch_accepts_body_exactly_at_limit() {
        let url = serve_once("HTTP/1.1 200 OK", b"01234567");
        let body = HttpFetcher::new()
            .with_max_body_bytes(8)
            .fetch(&ToolUrl(url))
            .unwrap();
        assert_eq!(body, b"01234567");
    }

    #[test]
    fn fetch_rejects_body_over_limit_instead_of_truncating() {
        let url = serve_once("HTTP/1.1 200 OK", b"0123456789");
        let err = HttpFetcher::new()
            .with_max_body_bytes(8)
            .fetch(&ToolUrl(url))
            .unwrap_err();
        match err {
            SyncError::Fetch { reason, .. } => {
                assert_eq!(reason, "body exceeds 8 bytes");
            }
            other => panic!("expected Fetch error, got {other:?}"),
        }
    }

    #[test]
    fn fetch_maps_404_to_fetch_error() {
        let url = serve_once("HTTP/1.1 404 Not Found", b"404: Not Found");
        let err = HttpFetcher::new().fetch(&ToolUrl(url.clone())).unwrap_err();
        match err {
            SyncError::Fetch { url: u, reason } => {
                assert_eq!(u, url);
                assert!(reason.contains("404"), "reason: {reason}");
            }
            other => panic!("expected Fetch error, got {other:?}"),
        }
    }

    #[test]
    fn fetch_maps_connection_refused_to_fetch_error() {
        let port = {
            let l = TcpListener::bind("127.0.0.1:0").unwrap();
            l.local_addr().unwrap().port()
        };
        let url = ToolUrl(format!("http://127.0.0.1:{port}/x.py"));
        let err = HttpFetcher::with_timeout(Duration::from_secs(2))
            .fetch(&url)
            .unwrap_err();
        assert!(matches!(err, SyncError::Fetch { .. }), "got: {err:?}");
    }
}
