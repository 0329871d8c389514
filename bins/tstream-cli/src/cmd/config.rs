use tstream_driver::{Credentials, DriverConfig};

use super::error::CliError;

/// Resolve the driver configuration from `--dsn` or `--config`.
/// `None` when neither is given.
pub fn resolve(dsn: Option<&str>, config: Option<&str>) -> Result<Option<DriverConfig>, CliError> {
    match (dsn, config) {
        (Some(dsn), _) => Ok(Some(DriverConfig::from_dsn(dsn)?)),
        (None, Some(path)) => Ok(Some(DriverConfig::load(path)?)),
        (None, None) => Ok(None),
    }
}

/// Log the effective configuration. Secrets are never printed.
pub fn log_effective(dsn: Option<&str>, config: Option<&str>) -> Result<(), CliError> {
    let Some(cfg) = resolve(dsn, config)? else {
        tracing::debug!("no driver configuration given");
        return Ok(());
    };
    let credentials = match &cfg.credentials {
        Credentials::DefaultChain => "default_chain",
        Credentials::Static { .. } => "static",
    };
    tracing::info!(
        endpoint = if cfg.endpoint.is_empty() { "<regional default>" } else { cfg.endpoint.as_str() },
        region = %cfg.region,
        credentials,
        enable_xray = cfg.enable_xray,
        "driver configuration"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dsn_wins_over_config_path() {
        let cfg = resolve(Some("awstimestream:///?region=us-west-2"), Some("/does/not/exist.toml"))
            .unwrap()
            .unwrap();
        assert_eq!(cfg.region, "us-west-2");
    }

    #[test]
    fn missing_config_file_is_an_error() {
        let err = resolve(None, Some("/does/not/exist.toml")).unwrap_err();
        assert!(matches!(err, CliError::Config(_)));
        assert!(resolve(None, None).unwrap().is_none());
    }
}
