// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// 应用程序配置设置
///
/// 包含服务器、存储、下载器、浏览器与指标等所有配置项
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// 服务器配置
    pub server: ServerSettings,
    /// 存储配置
    pub storage: StorageSettings,
    /// 图片下载配置
    pub scraper: ScraperSettings,
    /// 浏览器配置
    pub browser: BrowserSettings,
    /// 指标配置
    pub metrics: MetricsSettings,
}

/// 服务器配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    /// 服务器监听主机地址
    pub host: String,
    /// 服务器监听端口
    pub port: u16,
}

/// 存储配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct StorageSettings {
    /// 图片根目录，类别文件夹是它的直接子目录
    pub root: PathBuf,
}

/// 图片下载配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct ScraperSettings {
    /// 单次任务的默认图片数量（参数越界时回退到该值）
    pub default_max_images: usize,
    /// 两次下载之间的间隔（毫秒）
    pub download_delay_ms: u64,
    /// 单个图片下载的超时时间（秒）
    pub download_timeout_secs: u64,
    /// 图片文件的最小字节数
    pub min_image_bytes: u64,
    /// 下载时使用的 User-Agent
    pub user_agent: String,
}

/// 浏览器配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct BrowserSettings {
    /// 是否以无头模式启动
    pub headless: bool,
    /// 远程 Chrome 调试地址，设置后不再本地启动浏览器
    pub remote_debugging_url: Option<String>,
    /// 搜索结果页 URL 模板，`{query}` 会被替换为编码后的关键词
    pub search_url_template: String,
    /// 最大滚动次数
    pub max_scroll_attempts: u32,
    /// 每次滚动后的等待时间（毫秒）
    pub scroll_wait_ms: u64,
    /// 等待 Cookie 同意弹窗的时间（毫秒）
    pub consent_wait_ms: u64,
    /// CDP 请求超时时间（秒）
    pub request_timeout_secs: u64,
}

/// 指标配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct MetricsSettings {
    /// 是否启用 Prometheus 导出
    pub enabled: bool,
    /// 导出器监听地址
    pub listen_address: String,
}

impl ScraperSettings {
    pub fn download_delay(&self) -> Duration {
        Duration::from_millis(self.download_delay_ms)
    }

    pub fn download_timeout(&self) -> Duration {
        Duration::from_secs(self.download_timeout_secs)
    }
}

impl BrowserSettings {
    pub fn scroll_wait(&self) -> Duration {
        Duration::from_millis(self.scroll_wait_ms)
    }

    pub fn consent_wait(&self) -> Duration {
        Duration::from_millis(self.consent_wait_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl MetricsSettings {
    pub fn socket_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        self.listen_address.parse()
    }
}

impl Settings {
    /// 创建新的配置实例
    ///
    /// 依次加载默认值、`config/default.toml`、`config/{APP_ENVIRONMENT}.toml`
    /// 以及 `PIXHARVEST__` 前缀的环境变量
    ///
    /// # Returns
    ///
    /// * `Ok(Settings)` - 成功加载的配置
    /// * `Err(ConfigError)` - 配置加载失败
    pub fn new() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "default".to_string());
        Self::builder()?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(Environment::with_prefix("PIXHARVEST").separator("__"))
            .build()?
            .try_deserialize()
    }

    /// 仅使用内置默认值构建配置，不读取文件与环境变量
    pub fn defaults() -> Result<Self, ConfigError> {
        Self::builder()?.build()?.try_deserialize()
    }

    fn builder() -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 5000)?
            .set_default("storage.root", "scraped_images")?
            .set_default("scraper.default_max_images", 20)?
            .set_default("scraper.download_delay_ms", 500)?
            .set_default("scraper.download_timeout_secs", 15)?
            .set_default("scraper.min_image_bytes", 1024)?
            .set_default(
                "scraper.user_agent",
                "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
            )?
            .set_default("browser.headless", true)?
            .set_default(
                "browser.search_url_template",
                "https://www.google.com/search?q={query}&tbm=isch",
            )?
            .set_default("browser.max_scroll_attempts", 10)?
            .set_default("browser.scroll_wait_ms", 2000)?
            .set_default("browser.consent_wait_ms", 3000)?
            .set_default("browser.request_timeout_secs", 30)?
            .set_default("metrics.enabled", false)?
            .set_default("metrics.listen_address", "0.0.0.0:9000")
    }
}

#[cfg(test)]
#[path = "settings_test.rs"]
mod tests;
