// Controller endpoint: where to connect and as whom.

use secrecy::{ExposeSecret, SecretString};
use url::Url;

use crate::error::Error;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8181;
pub const DEFAULT_USERNAME: &str = "onos";
pub const DEFAULT_PASSWORD: &str = "rocks";

/// REST prefix every ONOS northbound call lives under.
pub const API_PREFIX: &str = "/onos/v1";

/// Address and credentials of one ONOS controller.
///
/// Cheap to clone; the password stays wrapped in [`SecretString`] and is
/// redacted from `Debug` output.
#[derive(Debug, Clone)]
pub struct Endpoint {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: SecretString,
}

impl Default for Endpoint {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.into(),
            port: DEFAULT_PORT,
            username: DEFAULT_USERNAME.into(),
            password: SecretString::from(DEFAULT_PASSWORD),
        }
    }
}

impl Endpoint {
    pub fn new(
        host: impl Into<String>,
        port: u16,
        username: impl Into<String>,
        password: SecretString,
    ) -> Self {
        Self {
            host: host.into(),
            port,
            username: username.into(),
            password,
        }
    }

    /// `http://{host}:{port}/onos/v1`
    pub fn base_url(&self) -> Result<Url, Error> {
        let host = self.host.trim();
        // Bare IPv6 literals need brackets inside a URL authority.
        let authority = if host.contains(':') && !host.starts_with('[') {
            format!("[{host}]:{}", self.port)
        } else {
            format!("{host}:{}", self.port)
        };
        let url = Url::parse(&format!("http://{authority}{API_PREFIX}"))?;
        Ok(url)
    }

    /// `host:port`, for log lines and diagnostics.
    pub fn display_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub(crate) fn password(&self) -> &str {
        self.password.expose_secret()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn default_endpoint_matches_stock_controller() {
        let endpoint = Endpoint::default();
        assert_eq!(
            endpoint.base_url().unwrap().as_str(),
            "http://127.0.0.1:8181/onos/v1"
        );
        assert_eq!(endpoint.username, "onos");
        assert_eq!(endpoint.password(), "rocks");
    }

    #[test]
    fn ipv6_host_is_bracketed() {
        let endpoint = Endpoint::new("::1", 8181, "onos", SecretString::from("rocks"));
        assert_eq!(
            endpoint.base_url().unwrap().as_str(),
            "http://[::1]:8181/onos/v1"
        );
    }

    #[test]
    fn invalid_host_is_rejected() {
        let endpoint = Endpoint::new("bad host", 8181, "onos", SecretString::from("rocks"));
        assert!(matches!(endpoint.base_url(), Err(Error::InvalidUrl(_))));
    }

    #[test]
    fn debug_output_redacts_password() {
        let endpoint = Endpoint::new("10.0.0.5", 8181, "admin", SecretString::from("hunter2"));
        let debug = format!("{endpoint:?}");
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("10.0.0.5"));
    }
}
