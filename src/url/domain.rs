use crate::{UrlError, UrlResult};
use ::url::Url;

/// Extracts the host from a URL string
///
/// The host is converted to lowercase. The port, path, query and fragment are
/// ignored, so every page served by one origin host shares one admission slot
/// pool.
///
/// # Arguments
///
/// * `url` - The URL to extract the host from
///
/// # Returns
///
/// * `Ok(String)` - The lowercase host
/// * `Err(UrlError)` - If the URL does not parse or has no host
///
/// # Examples
///
/// ```
/// use wavecrawl::url::extract_host;
///
/// assert_eq!(extract_host("https://EXAMPLE.com/path").unwrap(), "example.com");
/// assert!(extract_host("mailto:someone@example.com").is_err());
/// ```
pub fn extract_host(url: &str) -> UrlResult<String> {
    let parsed = Url::parse(url).map_err(|e| UrlError::Parse(format!("{}: {}", url, e)))?;

    parsed
        .host_str()
        .map(|h| h.to_lowercase())
        .ok_or_else(|| UrlError::MissingHost(url.to_string()))
}
