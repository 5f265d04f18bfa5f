//! Blocking client for the docking backend's read endpoints.
//!
//! Every request is bounded by [`ClientConfig::timeout`]; a request that runs
//! over it fails with [`ApiError::Timeout`] instead of hanging.
pub mod poll;
/// Status and result payloads of the backend
pub mod structs;

// Re-exports
pub use poll::{poll_until, PollHandle, PollOutcome, PollPolicy, StatusWatcher};
pub use structs::*;

use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, trace, warn};

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);
/// Default backend address.
pub const DEFAULT_API_BASE: &str = "http://localhost:8000";

/// Errors raised while talking to the backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request did not complete within the configured timeout
    #[error("Request timed out. Check API connectivity.")]
    Timeout,

    /// The backend answered with a non-success status
    #[error("{message}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body, or a generic message if the body was empty
        message: String,
    },

    /// Connection or protocol failure
    #[error("request failed: {0}")]
    Transport(#[source] reqwest::Error),

    /// The response body was not the expected JSON
    #[error("unexpected response from {path}: {source}")]
    Decode {
        /// Endpoint path that was requested
        path: String,
        /// Underlying JSON error
        source: serde_json::Error,
    },
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Timeout
        } else {
            ApiError::Transport(err)
        }
    }
}

/// Convenience alias for backend calls.
pub type Result<T> = std::result::Result<T, ApiError>;

/// Connection settings for [`ApiClient`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL the endpoint paths are appended to, e.g. `http://localhost:8000`
    pub api_base: String,
    /// Upper bound for each request, including reading the body
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Client for the backend endpoints consumed by contact analysis and polling.
#[derive(Clone)]
pub struct ApiClient {
    api_base: String,
    http: reqwest::blocking::Client,
}

impl ApiClient {
    /// Build a client for `config.api_base` with the configured timeout.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .timeout(config.timeout)
            .build()?;
        Ok(Self {
            api_base: config.api_base.trim_end_matches('/').to_string(),
            http,
        })
    }

    /// Issue a GET request and return the body of a successful response.
    fn get_text(&self, path: &str) -> Result<String> {
        let url = format!("{}{path}", self.api_base);
        trace!("GET {url}");

        let response = self.http.get(&url).send()?;
        let status = response.status();
        let body = response.text()?;
        if !status.is_success() {
            let message = match body.trim() {
                "" => format!("Request failed: {}", status.as_u16()),
                text => text.to_string(),
            };
            return Err(ApiError::Status {
                status: status.as_u16(),
                message,
            });
        }
        debug!("GET {path} returned {} bytes", body.len());
        Ok(body)
    }

    fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let body = self.get_text(path)?;
        serde_json::from_str(&body).map_err(|source| ApiError::Decode {
            path: path.to_string(),
            source,
        })
    }

    /// Fetch a prepared receptor structure from `/protein-files/{path}`.
    pub fn fetch_protein_file(&self, path: &str) -> Result<String> {
        self.get_text(&format!("/protein-files/{}", path.trim_start_matches('/')))
    }

    /// Fetch a stored result file, e.g. a pose, from `/files/{path}`.
    pub fn fetch_file(&self, path: &str) -> Result<String> {
        self.get_text(&format!("/files/{}", path.trim_start_matches('/')))
    }

    /// Fetch progress counters of a run from `/runs/{run_id}/status`.
    pub fn fetch_run_status(&self, run_id: &str) -> Result<RunStatus> {
        self.get_json(&format!("/runs/{run_id}/status"))
    }

    /// Fetch per-target results of a run from `/runs/{run_id}/results`.
    pub fn fetch_run_results(&self, run_id: &str) -> Result<RunResults> {
        self.get_json(&format!("/runs/{run_id}/results"))
    }

    /// Fetch progress counters of a batch from `/batches/{batch_id}/status`.
    pub fn fetch_batch_status(&self, batch_id: &str) -> Result<BatchStatus> {
        self.get_json(&format!("/batches/{batch_id}/status"))
    }

    /// Fetch the receptor and every pose of a run result entry.
    ///
    /// A missing receptor path yields an empty receptor text. Poses that fail
    /// to download are kept as empty texts so pose indices stay aligned; their
    /// contact summaries come out as "not available" rather than failing the
    /// whole entry. A failing receptor download is returned as an error.
    pub fn fetch_structures(&self, entry: &RunResultEntry) -> Result<(String, Vec<String>)> {
        let receptor = match &entry.receptor_pdbqt_path {
            Some(path) => self.fetch_protein_file(path)?,
            None => String::new(),
        };
        let poses = entry
            .pose_paths
            .iter()
            .map(|path| {
                self.fetch_file(path).unwrap_or_else(|e| {
                    warn!("Failed to fetch pose {path}: {e}");
                    String::new()
                })
            })
            .collect();
        Ok((receptor, poses))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread;

    /// Serve canned responses, one per connection, and return the base URL.
    fn serve(responses: Vec<(u16, &'static str)>) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        thread::spawn(move || {
            for (status, body) in responses {
                let (mut stream, _) = listener.accept().unwrap();
                let mut buf = [0u8; 4096];
                let _ = stream.read(&mut buf);
                let response = format!(
                    "HTTP/1.1 {status} Status\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    body.len()
                );
                let _ = stream.write_all(response.as_bytes());
            }
        });
        format!("http://{addr}")
    }

    fn client(api_base: String, timeout: Duration) -> ApiClient {
        ApiClient::new(&ClientConfig { api_base, timeout }).unwrap()
    }

    #[test]
    fn fetches_text_files() {
        let base = serve(vec![(200, "ATOM  receptor"), (200, "ATOM  pose")]);
        let api = client(base, DEFAULT_TIMEOUT);
        assert_eq!(api.fetch_protein_file("P1/receptor.pdbqt").unwrap(), "ATOM  receptor");
        assert_eq!(api.fetch_file("/runs/r1/out.pdbqt").unwrap(), "ATOM  pose");
    }

    #[test]
    fn decodes_status() {
        let base = serve(vec![(
            200,
            r#"{"status": "SUCCEEDED", "total": 2, "done": 2, "failed": 0, "running": []}"#,
        )]);
        let status = client(base, DEFAULT_TIMEOUT).fetch_run_status("r1").unwrap();
        assert_eq!(status.status, JobState::Succeeded);
        assert_eq!(status.done, 2);
    }

    #[test]
    fn error_status_carries_body() {
        let base = serve(vec![(404, r#"{"detail":"Run not found"}"#), (500, "")]);
        let api = client(base, DEFAULT_TIMEOUT);

        match api.fetch_run_status("missing") {
            Err(ApiError::Status { status, message }) => {
                assert_eq!(status, 404);
                assert!(message.contains("Run not found"));
            }
            other => panic!("expected status error, got {other:?}"),
        }
        match api.fetch_file("broken") {
            Err(e @ ApiError::Status { .. }) => assert_eq!(e.to_string(), "Request failed: 500"),
            other => panic!("expected status error, got {other:?}"),
        }
    }

    #[test]
    fn invalid_json_is_a_decode_error() {
        let base = serve(vec![(200, "not json")]);
        let err = client(base, DEFAULT_TIMEOUT)
            .fetch_batch_status("b1")
            .unwrap_err();
        assert!(matches!(err, ApiError::Decode { .. }));
    }

    #[test]
    fn slow_backend_times_out() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        thread::spawn(move || {
            // Accept and hold the connection without answering
            let (_stream, _) = listener.accept().unwrap();
            thread::sleep(Duration::from_secs(2));
        });

        let api = client(format!("http://{addr}"), Duration::from_millis(200));
        let err = api.fetch_run_status("r1").unwrap_err();
        assert!(matches!(err, ApiError::Timeout));
        assert_eq!(err.to_string(), "Request timed out. Check API connectivity.");
    }

    #[test]
    fn structures_tolerate_missing_poses() {
        let base = serve(vec![(200, "RECEPTOR"), (200, "POSE 1"), (404, "gone")]);
        let entry = RunResultEntry {
            protein_id: "P1".to_string(),
            protein_name: "EGFR".to_string(),
            best_score: Some(-7.4),
            percentile: None,
            pose_paths: vec!["a.pdbqt".to_string(), "b.pdbqt".to_string()],
            status: JobState::Succeeded,
            error: None,
            receptor_pdbqt_path: Some("P1/receptor.pdbqt".to_string()),
            metrics: None,
        };
        let (receptor, poses) = client(base, DEFAULT_TIMEOUT).fetch_structures(&entry).unwrap();
        assert_eq!(receptor, "RECEPTOR");
        assert_eq!(poses, vec!["POSE 1".to_string(), String::new()]);
    }
}
