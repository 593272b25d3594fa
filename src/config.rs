//! Service configuration parsed from environment variables.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_PORT: u16 = 80;
pub const DEFAULT_BIND_ADDR: IpAddr = IpAddr::V4(Ipv4Addr::UNSPECIFIED);
pub const DEFAULT_AP_IP: Ipv4Addr = Ipv4Addr::new(192, 168, 71, 1);
pub const DEFAULT_DNS_BIND: SocketAddr = SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 53);
pub const DEFAULT_PORTAL_URL: &str = "http://10.3.8.216";
pub const DEFAULT_CHECK_URL: &str = "http://connect.rom.miui.com/generate_204?cmd=redirect&arubalp=12345";
pub const DEFAULT_PORTAL_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid {var}: {value:?}")]
    Invalid { var: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortalConfig {
    /// HTTP listen address for the login page and `/login`.
    pub http_addr: SocketAddr,
    /// Address clients reach the device on. Foreign `Host` headers are
    /// redirected here and every DNS `A` query resolves to it.
    pub ap_ip: Ipv4Addr,
    pub dns_bind: SocketAddr,
    pub dns_enabled: bool,
    /// Campus portal base URL, without trailing slash.
    pub portal_url: String,
    /// Probe URL: `204` when online, redirect/login page otherwise.
    pub check_url: String,
    pub portal_timeout: Duration,
    /// Built login screen (`index.html` + `pkg/`).
    pub site_dir: PathBuf,
}

impl PortalConfig {
    /// Build typed config from the process environment.
    ///
    /// Optional, all with defaults:
    /// - `PORT` (80), `BIND_ADDR` (`0.0.0.0`)
    /// - `AP_IP` (`192.168.71.1`)
    /// - `DNS_BIND` (`0.0.0.0:53`), `DNS_ENABLED` (true)
    /// - `PORTAL_URL`, `PORTAL_CHECK_URL`, `PORTAL_TIMEOUT_SECS` (10)
    /// - `SITE_DIR` (`client/site` next to this crate)
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if a set variable cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`Self::from_env`] with an injectable variable source.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if a present value cannot be parsed.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = parse_or("PORT", lookup("PORT"), DEFAULT_PORT)?;
        let bind_addr = parse_or("BIND_ADDR", lookup("BIND_ADDR"), DEFAULT_BIND_ADDR)?;
        let ap_ip = parse_or("AP_IP", lookup("AP_IP"), DEFAULT_AP_IP)?;
        let dns_bind = parse_or("DNS_BIND", lookup("DNS_BIND"), DEFAULT_DNS_BIND)?;
        let dns_enabled = match lookup("DNS_ENABLED") {
            None => true,
            Some(raw) => parse_bool(&raw).ok_or(ConfigError::Invalid { var: "DNS_ENABLED", value: raw })?,
        };
        let portal_url = lookup("PORTAL_URL")
            .unwrap_or_else(|| DEFAULT_PORTAL_URL.to_owned())
            .trim_end_matches('/')
            .to_owned();
        let check_url = lookup("PORTAL_CHECK_URL").unwrap_or_else(|| DEFAULT_CHECK_URL.to_owned());
        let timeout_secs = parse_or("PORTAL_TIMEOUT_SECS", lookup("PORTAL_TIMEOUT_SECS"), DEFAULT_PORTAL_TIMEOUT_SECS)?;
        let site_dir = lookup("SITE_DIR").map_or_else(default_site_dir, PathBuf::from);

        Ok(Self {
            http_addr: SocketAddr::new(bind_addr, port),
            ap_ip,
            dns_bind,
            dns_enabled,
            portal_url,
            check_url,
            portal_timeout: Duration::from_secs(timeout_secs),
            site_dir,
        })
    }

    /// Root URL the captive redirect points at. The port is left out when it
    /// is the HTTP default.
    #[must_use]
    pub fn home_url(&self) -> String {
        match self.http_addr.port() {
            DEFAULT_PORT => format!("http://{}/", self.ap_ip),
            port => format!("http://{}:{port}/", self.ap_ip),
        }
    }
}

fn default_site_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("client").join("site")
}

fn parse_or<T>(var: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
{
    match raw {
        None => Ok(default),
        Some(value) => value.trim().parse().map_err(|_| ConfigError::Invalid { var, value }),
    }
}

pub(crate) fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
