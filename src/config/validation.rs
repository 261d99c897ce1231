use crate::config::types::{Config, CrawlerConfig, OutputConfig, RendererConfig};
use crate::ConfigError;
use url::Url;

/// Upper bound for both crawl depth and concurrency
const MAX_DEPTH: u32 = 10;
const MAX_CONCURRENCY: u32 = 10;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_base_url(&config.target.base_url)?;
    validate_crawler_config(&config.crawler)?;
    validate_renderer_config(&config.renderer)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates the crawl target: http(s) with a domain-shaped host
fn validate_base_url(base_url: &str) -> Result<(), ConfigError> {
    if base_url.is_empty() {
        return Err(ConfigError::Validation("base_url cannot be empty".to_string()));
    }

    let url = Url::parse(base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base_url '{}': {}", base_url, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "base_url must use http or https, got '{}'",
            url.scheme()
        )));
    }

    let host = url
        .host_str()
        .ok_or_else(|| ConfigError::InvalidUrl(format!("base_url '{}' has no host", base_url)))?;

    validate_domain_string(host)
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.max_depth < 1 || config.max_depth > MAX_DEPTH {
        return Err(ConfigError::Validation(format!(
            "max_depth must be between 1 and {}, got {}",
            MAX_DEPTH, config.max_depth
        )));
    }

    if config.concurrency < 1 || config.concurrency > MAX_CONCURRENCY {
        return Err(ConfigError::Validation(format!(
            "concurrency must be between 1 and {}, got {}",
            MAX_CONCURRENCY, config.concurrency
        )));
    }

    if config.skip_patterns.iter().any(|p| p.trim().is_empty()) {
        return Err(ConfigError::Validation(
            "skip_patterns cannot contain blank entries".to_string(),
        ));
    }

    Ok(())
}

/// Validates renderer configuration
fn validate_renderer_config(config: &RendererConfig) -> Result<(), ConfigError> {
    Url::parse(&config.webdriver_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid webdriver_url: {}", e)))?;

    if config.viewport_width == 0 || config.viewport_height == 0 {
        return Err(ConfigError::Validation(format!(
            "viewport must be non-zero, got {}x{}",
            config.viewport_width, config.viewport_height
        )));
    }

    if config.page_timeout == 0 {
        return Err(ConfigError::Validation(
            "page_timeout must be greater than zero".to_string(),
        ));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.directory.as_os_str().is_empty() {
        return Err(ConfigError::Validation(
            "output directory cannot be empty".to_string(),
        ));
    }

    if config.report_file.is_empty() {
        return Err(ConfigError::Validation(
            "report_file cannot be empty".to_string(),
        ));
    }

    if config.summary_file.is_empty() {
        return Err(ConfigError::Validation(
            "summary_file cannot be empty".to_string(),
        ));
    }

    if config.report_file == config.summary_file {
        return Err(ConfigError::Validation(format!(
            "report_file and summary_file must differ, both are '{}'",
            config.report_file
        )));
    }

    Ok(())
}

/// Validates a host against the domain shape `[A-Za-z0-9.-]+\.[A-Za-z]{2,}`
fn validate_domain_string(domain: &str) -> Result<(), ConfigError> {
    if domain.is_empty() {
        return Err(ConfigError::InvalidPattern(
            "Domain cannot be empty".to_string(),
        ));
    }

    if !domain
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-')
    {
        return Err(ConfigError::InvalidPattern(format!(
            "Domain '{}' contains invalid characters",
            domain
        )));
    }

    let Some((labels, tld)) = domain.rsplit_once('.') else {
        return Err(ConfigError::InvalidPattern(format!(
            "Domain '{}' must contain at least one dot (e.g., 'example.com')",
            domain
        )));
    };

    if labels.is_empty() {
        return Err(ConfigError::InvalidPattern(format!(
            "Domain '{}' has no name before its top-level domain",
            domain
        )));
    }

    if tld.len() < 2 || !tld.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(ConfigError::InvalidPattern(format!(
            "Domain '{}' must end in an alphabetic top-level domain of at least two letters",
            domain
        )));
    }

    Ok(())
}
