use serde::Deserialize;

/// Main configuration structure for wavecrawl
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub hosts: HostsConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct CrawlerConfig {
    /// Number of breadth-first levels to download
    pub depth: u32,

    /// Number of download workers
    pub downloaders: usize,

    /// Number of link extraction workers
    pub extractors: usize,

    /// Maximum number of concurrent downloads per host
    pub per_host: usize,

    /// Capacity of each worker pool's job queue
    pub queue_capacity: usize,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            depth: 3,
            downloaders: 10,
            extractors: 10,
            per_host: 10,
            queue_capacity: 1024,
        }
    }
}

/// User agent identification for the HTTP downloader
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct UserAgentConfig {
    /// Name of the crawler
    pub crawler_name: String,

    /// Version of the crawler
    pub crawler_version: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl UserAgentConfig {
    /// Formats the `User-Agent` header value
    pub fn header_value(&self) -> String {
        format!("{}/{}", self.crawler_name, self.crawler_version)
    }
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: env!("CARGO_PKG_NAME").to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
            timeout_secs: 30,
        }
    }
}

/// Hosts reported in the crawl result
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HostsConfig {
    /// Allow-list of hosts; empty means every host is reported
    #[serde(default)]
    pub allow: Vec<String>,
}
