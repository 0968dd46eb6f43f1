use crate::config::types::{Config, CrawlerConfig, HostsConfig, UserAgentConfig};
use crate::ConfigError;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_hosts_config(&config.hosts)?;
    Ok(())
}

/// Validates crawler configuration
///
/// Pool sizes, the per-host cap and the queue capacity must all be positive.
/// A depth of zero is allowed and yields an empty crawl.
pub fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    for (name, value) in [
        ("downloaders", config.downloaders),
        ("extractors", config.extractors),
        ("per_host", config.per_host),
        ("queue_capacity", config.queue_capacity),
    ] {
        if value < 1 {
            return Err(ConfigError::Validation(format!(
                "{} must be >= 1, got {}",
                name, value
            )));
        }
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    // Validate crawler name: non-empty, alphanumeric + hyphens only
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler_name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    if config.timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "timeout_secs must be >= 1".to_string(),
        ));
    }

    Ok(())
}

/// Validates the host allow-list
fn validate_hosts_config(config: &HostsConfig) -> Result<(), ConfigError> {
    for host in &config.allow {
        validate_host(host)?;
    }
    Ok(())
}

/// Validates a bare host name as it would appear in a URL
fn validate_host(host: &str) -> Result<(), ConfigError> {
    if host.is_empty() {
        return Err(ConfigError::Validation(
            "Allowed host cannot be empty".to_string(),
        ));
    }

    // Hosts are matched against parsed URLs, so they must round-trip through one
    let parsed = ::url::Url::parse(&format!("http://{}/", host))
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid host '{}': {}", host, e)))?;

    let is_bare = parsed.host_str() == Some(host.to_lowercase().as_str())
        && parsed.port().is_none()
        && parsed.username().is_empty()
        && parsed.path() == "/"
        && parsed.query().is_none()
        && parsed.fragment().is_none();

    if !is_bare {
        return Err(ConfigError::InvalidUrl(format!(
            "Invalid host '{}': expected a bare host name",
            host
        )));
    }

    Ok(())
}
