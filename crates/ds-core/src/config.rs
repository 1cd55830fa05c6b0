//! `dsclient.toml` configuration.
//!
//! Every key is optional; missing keys take the defaults below.
//!
//! ```toml
//! host = "localhost"
//! port = 50000
//! username = "alice"
//! scheduler = "bf"
//! fit_now = "strict"
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::resources::Dominance;

pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 50000;
pub const DEFAULT_SCHEDULER: &str = "fff";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Simulator host.
    pub host: String,
    /// Simulator port.
    pub port: u16,
    /// Identity sent with `AUTH`.
    pub username: String,
    /// Short name of the placement algorithm.
    pub scheduler: String,
    /// Ordering for every "fits now" test.
    pub fit_now: Dominance,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            username: login_name(),
            scheduler: DEFAULT_SCHEDULER.to_string(),
            fit_now: Dominance::Weak,
        }
    }
}

impl ClientConfig {
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn to_toml_string(&self) -> anyhow::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// `host:port`, suitable for `TcpStream::connect`.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Name of the logged-in user, used as the default `AUTH` identity.
pub fn login_name() -> String {
    ["USER", "USERNAME"]
        .iter()
        .find_map(|var| std::env::var(var).ok().filter(|v| !v.is_empty()))
        .unwrap_or_else(|| "dsclient".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.host, "localhost");
        assert_eq!(config.port, 50000);
        assert_eq!(config.scheduler, "fff");
        assert_eq!(config.fit_now, Dominance::Weak);
        assert!(!config.username.is_empty());
        assert_eq!(config.address(), "localhost:50000");
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let config = ClientConfig::from_toml_str("port = 51000\nscheduler = \"lrr\"\n").unwrap();
        assert_eq!(config.host, "localhost");
        assert_eq!(config.port, 51000);
        assert_eq!(config.scheduler, "lrr");
    }

    #[test]
    fn rejects_wrong_types() {
        assert!(ClientConfig::from_toml_str("port = \"fifty\"").is_err());
        assert!(ClientConfig::from_toml_str("fit_now = \"loose\"").is_err());
    }

    #[test]
    fn fit_now_accepts_strict() {
        let config = ClientConfig::from_toml_str("fit_now = \"strict\"").unwrap();
        assert_eq!(config.fit_now, Dominance::Strict);
    }

    #[test]
    fn round_trips_through_file() {
        let config = ClientConfig {
            host: "10.0.0.5".to_string(),
            port: 50001,
            username: "alice".to_string(),
            scheduler: "wf".to_string(),
            fit_now: Dominance::Strict,
        };

        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(config.to_toml_string().unwrap().as_bytes())
            .unwrap();

        let loaded = ClientConfig::from_file(file.path()).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(ClientConfig::from_file(Path::new("/nonexistent/dsclient.toml")).is_err());
    }
}
