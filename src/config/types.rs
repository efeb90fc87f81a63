use serde::Deserialize;

/// Main configuration structure for Image-Sweep
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crawler: CrawlerConfig,
    pub downloader: DownloaderConfig,
    pub output: OutputConfig,
}

/// Page discovery configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CrawlerConfig {
    /// Follow same-site links from the start page
    pub enabled: bool,

    /// Maximum number of pages to visit when crawling
    pub max_pages: usize,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            max_pages: 20,
        }
    }
}

/// Download pool configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct DownloaderConfig {
    /// Number of concurrent downloads
    pub max_workers: usize,
}

impl Default for DownloaderConfig {
    fn default() -> Self {
        Self {
            max_workers: crate::download::DEFAULT_MAX_WORKERS,
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct OutputConfig {
    /// Output directory; derived from the start URL and time when absent
    pub directory: Option<String>,

    /// Produce `<directory>.zip` after the run
    pub archive: bool,

    /// Maximum number of `data:` references kept in the manifest
    pub data_url_limit: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: None,
            archive: true,
            data_url_limit: crate::output::DATA_URL_SAMPLE_LIMIT,
        }
    }
}
