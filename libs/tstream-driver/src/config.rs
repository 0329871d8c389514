use serde::Deserialize;

use crate::error::ConfigError;

/// Driver name; DSN schemes must contain it.
pub const DRIVER_NAME: &str = "awstimestream";

const KEY_REGION: &str = "region";
const KEY_KEY_ID: &str = "accessKeyID";
const KEY_SECRET: &str = "secretAccessKey";
const KEY_XRAY: &str = "enableXray";

/// Where credentials come from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case", tag = "provider")]
pub enum Credentials {
    /// Resolved by the transport from its default provider chain.
    #[default]
    DefaultChain,
    Static {
        access_key_id: String,
        secret_access_key: String,
    },
}

/// Connection settings handed to the query service transport.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct DriverConfig {
    /// `<scheme>://<host[:port]>`; empty for the regional default endpoint.
    #[serde(default)]
    pub endpoint: String,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub credentials: Credentials,
    #[serde(default)]
    pub enable_xray: bool,
}

impl DriverConfig {
    /// Parse `awstimestream[+scheme]://[host[:port]]/?region=..&accessKeyID=..&secretAccessKey=..`.
    pub fn from_dsn(dsn: &str) -> Result<Self, ConfigError> {
        let parsed = url::Url::parse(dsn)?;
        let scheme = endpoint_scheme(parsed.scheme())?;

        let mut cfg = DriverConfig::default();
        let (mut key_id, mut secret) = (String::new(), String::new());
        for (k, v) in parsed.query_pairs() {
            match &*k {
                KEY_REGION => cfg.region = v.into_owned(),
                KEY_KEY_ID => key_id = v.into_owned(),
                KEY_SECRET => secret = v.into_owned(),
                KEY_XRAY => cfg.enable_xray = v == "true",
                _ => {}
            }
        }

        if let Some(host) = parsed.host_str().filter(|h| !h.is_empty()) {
            cfg.endpoint = match parsed.port() {
                Some(port) => format!("{scheme}://{host}:{port}"),
                None => format!("{scheme}://{host}"),
            };
        }
        if !key_id.is_empty() && !secret.is_empty() {
            cfg.credentials = Credentials::Static {
                access_key_id: key_id,
                secret_access_key: secret,
            };
        }
        Ok(cfg)
    }

    /// Load configuration from a TOML file.
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_string(),
            source,
        })?;
        Self::parse(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }
}

/// `awstimestream` → `https`, `awstimestream+http` → `http`.
fn endpoint_scheme(scheme: &str) -> Result<String, ConfigError> {
    if !scheme.contains(DRIVER_NAME) {
        return Err(ConfigError::InvalidScheme(scheme.to_string()));
    }
    if scheme == DRIVER_NAME {
        return Ok("https".to_string());
    }
    Ok(scheme.replacen(&format!("{DRIVER_NAME}+"), "", 1))
}
