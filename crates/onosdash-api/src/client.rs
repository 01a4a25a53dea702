// HTTP client for the ONOS northbound REST API.
//
// Base path: http://{host}:{port}/onos/v1
// Auth: HTTP Basic on every request
//
// Bodies are returned verbatim as `serde_json::Value`. Interpreting the
// payload shape is the aggregator's job, not the client's.

use std::time::Duration;

use reqwest::Method;
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderValue};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, trace};
use url::Url;

use crate::endpoint::Endpoint;
use crate::error::{Error, ErrorKind};
use crate::transport::TransportConfig;

// ── Client ───────────────────────────────────────────────────────────

/// Async client for one ONOS controller.
///
/// Holds the endpoint it was built with and never re-reads settings on
/// its own: callers build a fresh client (cheaply, sharing the pooled
/// `reqwest::Client`) whenever the configuration may have changed.
#[derive(Clone)]
pub struct OnosClient {
    http: reqwest::Client,
    endpoint: Endpoint,
    base_url: Url,
    timeout: Duration,
}

impl OnosClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build a client with its own `reqwest::Client` from a transport config.
    pub fn new(endpoint: Endpoint, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Self::with_client(http, endpoint, transport.timeout)
    }

    /// Wrap an existing `reqwest::Client`, applying `timeout` per request.
    pub fn with_client(
        http: reqwest::Client,
        endpoint: Endpoint,
        timeout: Duration,
    ) -> Result<Self, Error> {
        let base_url = endpoint.base_url()?;
        Ok(Self {
            http,
            endpoint,
            base_url,
            timeout,
        })
    }

    /// A client for a (possibly different) endpoint sharing this client's
    /// connection pool. Used once per refresh cycle with freshly loaded settings.
    pub fn reconfigure(&self, endpoint: Endpoint, timeout: Duration) -> Result<Self, Error> {
        Self::with_client(self.http.clone(), endpoint, timeout)
    }

    /// The resolved `http://{host}:{port}/onos/v1` base.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Append a raw relative path (e.g. `"/devices"`) to the base URL.
    fn url(&self, path: &str) -> Result<Url, Error> {
        let base = self.base_url.as_str().trim_end_matches('/');
        let path = path.trim_start_matches('/');
        Ok(Url::parse(&format!("{base}/{path}"))?)
    }

    /// Append individually escaped path segments (ids may contain `/`).
    fn segments_url(&self, segments: &[&str]) -> Result<Url, Error> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| Error::InvalidUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    // ── Request pipeline ─────────────────────────────────────────────

    /// Issue one authenticated request against a relative API path.
    ///
    /// Every read the dashboard performs is a `GET`; other methods are
    /// accepted for completeness.
    pub async fn request<B: Serialize + Sync + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<Value, Error> {
        let url = self.url(path)?;
        self.send(method, url, body).await
    }

    async fn get(&self, url: Url) -> Result<Value, Error> {
        self.send::<()>(Method::GET, url, None).await
    }

    async fn send<B: Serialize + Sync + ?Sized>(
        &self,
        method: Method,
        url: Url,
        body: Option<&B>,
    ) -> Result<Value, Error> {
        debug!("{method} {url}");
        let url_str = url.to_string();

        let mut builder = self
            .http
            .request(method, url)
            .timeout(self.timeout)
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .header(ACCEPT, HeaderValue::from_static("application/json"))
            .basic_auth(&self.endpoint.username, Some(self.endpoint.password()));
        if let Some(body) = body {
            builder = builder.json(body);
        }

        // Dropping the future on expiry aborts the underlying connection.
        let resp = builder
            .send()
            .await
            .map_err(|e| Error::from_transport(&e, &url_str, self.timeout))?;

        let status = resp.status();
        debug!(status = status.as_u16(), url = %url_str, "controller responded");

        if !status.is_success() {
            return Err(Error::HttpStatus {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("Unknown").to_owned(),
            });
        }

        let body = resp
            .text()
            .await
            .map_err(|e| Error::from_transport(&e, &url_str, self.timeout))?;

        if body.trim().is_empty() {
            return Ok(Value::Null);
        }

        trace!(bytes = body.len(), "parsing response body");
        serde_json::from_str(&body).map_err(|e| {
            let preview = body.chars().take(200).collect::<String>();
            Error::MalformedResponse {
                message: format!("{e} (body preview: {preview:?})"),
                body,
            }
        })
    }

    // ━━ Public API ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    // ── Devices ──────────────────────────────────────────────────────

    /// `GET /devices` → `{"devices": [...]}`
    pub async fn list_devices(&self) -> Result<Value, Error> {
        self.get(self.segments_url(&["devices"])?).await
    }

    /// `GET /devices/{id}`
    pub async fn get_device(&self, device_id: &str) -> Result<Value, Error> {
        self.get(self.segments_url(&["devices", device_id])?).await
    }

    /// `GET /devices/{id}/ports` → `{"id": ..., "ports": [...]}`
    pub async fn get_device_ports(&self, device_id: &str) -> Result<Value, Error> {
        self.get(self.segments_url(&["devices", device_id, "ports"])?)
            .await
    }

    // ── Hosts ────────────────────────────────────────────────────────

    /// `GET /hosts` → `{"hosts": [...]}`
    pub async fn list_hosts(&self) -> Result<Value, Error> {
        self.get(self.segments_url(&["hosts"])?).await
    }

    /// `GET /hosts/{id}` (ids look like `00:00:00:00:00:01/None`)
    pub async fn get_host(&self, host_id: &str) -> Result<Value, Error> {
        self.get(self.segments_url(&["hosts", host_id])?).await
    }

    // ── Links ────────────────────────────────────────────────────────

    /// `GET /links` → `{"links": [...]}`
    pub async fn list_links(&self) -> Result<Value, Error> {
        self.get(self.segments_url(&["links"])?).await
    }

    // ── Topology ─────────────────────────────────────────────────────

    /// `GET /topology` → `{"time": .., "devices": n, "links": n, "clusters": n}`
    pub async fn get_topology(&self) -> Result<Value, Error> {
        self.get(self.segments_url(&["topology"])?).await
    }

    /// `GET /topology/clusters` → `{"clusters": [...]}`
    pub async fn get_topology_clusters(&self) -> Result<Value, Error> {
        self.get(self.segments_url(&["topology", "clusters"])?)
            .await
    }

    // ── Flows ────────────────────────────────────────────────────────

    /// `GET /flows` → `{"flows": [...]}`
    pub async fn list_flows(&self) -> Result<Value, Error> {
        self.get(self.segments_url(&["flows"])?).await
    }

    /// `GET /flows/{deviceId}`
    pub async fn list_device_flows(&self, device_id: &str) -> Result<Value, Error> {
        self.get(self.segments_url(&["flows", device_id])?).await
    }

    /// `GET /flows/{deviceId}/{flowId}`
    pub async fn get_flow(&self, device_id: &str, flow_id: &str) -> Result<Value, Error> {
        self.get(self.segments_url(&["flows", device_id, flow_id])?)
            .await
    }

    // ── Applications ─────────────────────────────────────────────────

    /// `GET /applications` → `{"applications": [...]}`
    pub async fn list_applications(&self) -> Result<Value, Error> {
        self.get(self.segments_url(&["applications"])?).await
    }

    // ── Diagnostics ──────────────────────────────────────────────────

    /// Probe the controller with `GET /devices` and report the outcome
    /// together with remediation hints.
    ///
    /// Purely advisory; nothing else branches on the suggestions.
    pub async fn test_connection(&self) -> ConnectionTest {
        match self.list_devices().await {
            Ok(data) => {
                debug!(endpoint = %self.endpoint.display_addr(), "connection test succeeded");
                ConnectionTest {
                    success: true,
                    endpoint: self.base_url.to_string(),
                    error: None,
                    error_kind: None,
                    status: None,
                    suggestions: Vec::new(),
                    data: Some(data),
                }
            }
            Err(e) => {
                debug!(endpoint = %self.endpoint.display_addr(), error = %e, "connection test failed");
                ConnectionTest {
                    success: false,
                    endpoint: self.base_url.to_string(),
                    suggestions: suggestions_for(&e, &self.endpoint, self.timeout),
                    error_kind: Some(e.kind()),
                    status: e.status(),
                    error: Some(e.to_string()),
                    data: None,
                }
            }
        }
    }
}

// ── Connection test ──────────────────────────────────────────────────

/// Result of [`OnosClient::test_connection`].
#[derive(Debug, Clone, Serialize)]
pub struct ConnectionTest {
    pub success: bool,
    pub endpoint: String,
    pub error: Option<String>,
    pub error_kind: Option<ErrorKind>,
    /// HTTP status of the failed probe, when the controller answered.
    pub status: Option<u16>,
    pub suggestions: Vec<String>,
    /// The devices payload, when the probe succeeded.
    pub data: Option<Value>,
}

fn suggestions_for(err: &Error, endpoint: &Endpoint, timeout: Duration) -> Vec<String> {
    let addr = endpoint.display_addr();
    match err {
        Error::Connectivity { .. } => vec![
            format!("Verify the controller is running and {addr} is reachable from this host"),
            "Enable CORS on the controller so browser dashboards on another origin are allowed"
                .into(),
            "Alternatively, serve the dashboard behind a reverse proxy on the controller's origin"
                .into(),
        ],
        Error::Timeout { .. } => vec![
            format!(
                "The controller did not answer within {}s; check its load or raise the timeout",
                timeout.as_secs_f64()
            ),
            format!("Confirm {addr} is the REST port (8181 on a stock install)"),
        ],
        Error::HttpStatus { status: 401 | 403, .. } => vec![
            format!(
                "The controller rejected user '{}'; check the username and password",
                endpoint.username
            ),
            "Stock ONOS installs accept onos/rocks".into(),
        ],
        Error::HttpStatus { status: 404, .. } => vec![
            format!("{addr} answered but has no /onos/v1 API; confirm the port and that the REST app is active"),
        ],
        Error::HttpStatus { .. } => vec![
            "The controller reported an internal error; check its logs".into(),
        ],
        Error::MalformedResponse { .. } => vec![
            format!("{addr} did not return JSON; make sure it is the ONOS REST API and not a proxy page"),
        ],
        Error::InvalidUrl(_) | Error::ClientBuild(_) => vec![
            "Check the configured controller address and port".into(),
        ],
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::SecretString;

    use super::*;
    use crate::transport::DEFAULT_TIMEOUT;

    fn client_for(host: &str) -> OnosClient {
        let endpoint = Endpoint::new(host, 8181, "onos", SecretString::from("rocks"));
        OnosClient::with_client(reqwest::Client::new(), endpoint, DEFAULT_TIMEOUT).unwrap()
    }

    #[test]
    fn raw_paths_join_onto_base() {
        let client = client_for("10.0.0.1");
        assert_eq!(
            client.url("/devices").unwrap().as_str(),
            "http://10.0.0.1:8181/onos/v1/devices"
        );
        assert_eq!(
            client.url("topology/clusters").unwrap().as_str(),
            "http://10.0.0.1:8181/onos/v1/topology/clusters"
        );
    }

    #[test]
    fn segments_are_escaped() {
        let client = client_for("10.0.0.1");
        let url = client
            .segments_url(&["hosts", "00:00:00:00:00:01/None"])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://10.0.0.1:8181/onos/v1/hosts/00:00:00:00:00:01%2FNone"
        );
    }

    #[test]
    fn connectivity_suggestions_mention_cors_and_proxy() {
        let endpoint = Endpoint::default();
        let err = Error::Connectivity {
            url: "http://127.0.0.1:8181/onos/v1/devices".into(),
            message: "connection refused".into(),
        };
        let hints = suggestions_for(&err, &endpoint, DEFAULT_TIMEOUT);
        assert_eq!(hints.len(), 3);
        assert!(hints.iter().any(|h| h.contains("CORS")));
        assert!(hints.iter().any(|h| h.contains("reverse proxy")));
    }
}
