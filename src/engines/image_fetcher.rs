// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CONTENT_TYPE, REFERER};
use serde_json::json;
use std::path::Path;
use std::sync::Arc;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use url::Url;

use crate::config::settings::ScraperSettings;
use crate::domain::models::log_entry::extra_fields;
use crate::engines::traits::ImageDownloader;
use crate::infrastructure::observability::metrics;
use crate::infrastructure::observability::scraping_logger::ScrapingLogger;
use crate::infrastructure::storage::{self, IMAGE_EXTENSIONS};
use crate::utils::errors::ScraperError;
use crate::utils::url_utils::{short_hash, url_prefix};

const LOG_URL_CHARS: usize = 80;

/// 图片下载器
///
/// 基于reqwest实现，一个实例在整个运行期间复用同一个 HTTP 客户端
pub struct ImageFetcher {
    client: reqwest::Client,
    min_image_bytes: u64,
    logger: Arc<ScrapingLogger>,
}

impl ImageFetcher {
    /// 创建下载器
    ///
    /// # 参数
    ///
    /// * `settings` - 下载配置（超时、最小文件大小、User-Agent）
    /// * `logger` - 抓取日志
    pub fn new(settings: &ScraperSettings, logger: Arc<ScrapingLogger>) -> Result<Self, ScraperError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("image/avif,image/webp,image/apng,image/*,*/*;q=0.8"),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));
        headers.insert(REFERER, HeaderValue::from_static("https://www.google.com/"));

        let client = reqwest::Client::builder()
            .user_agent(settings.user_agent.as_str())
            .default_headers(headers)
            .timeout(settings.download_timeout())
            .cookie_store(true)
            .build()
            .map_err(|e| ScraperError::Setup(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            min_image_bytes: settings.min_image_bytes,
            logger,
        })
    }

    async fn write_body(
        mut response: reqwest::Response,
        mut file: fs::File,
    ) -> Result<u64, ScraperError> {
        let mut written = 0u64;
        while let Some(chunk) = response.chunk().await? {
            file.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }
        file.flush().await?;
        Ok(written)
    }

    async fn discard(path: &Path) {
        if let Err(e) = fs::remove_file(path).await {
            tracing::warn!("Failed to remove rejected file {}: {}", path.display(), e);
        }
    }

    async fn download(
        &self,
        url: &str,
        dest_folder: &Path,
        filename_prefix: &str,
    ) -> Option<String> {
        let short_url = url_prefix(url, LOG_URL_CHARS);

        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(e) => {
                self.logger.error_with(
                    format!("Error downloading image: {}", e),
                    extra_fields([("url", json!(short_url))]),
                );
                return None;
            }
        };

        let status = response.status();
        if !status.is_success() {
            self.logger.warning_with(
                format!("HTTP {} while downloading image", status.as_u16()),
                extra_fields([("url", json!(short_url))]),
            );
            return None;
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .trim()
            .to_ascii_lowercase();
        if !content_type.starts_with("image/") {
            self.logger.warning_with(
                "Skipping URL with non-image content type",
                extra_fields([
                    ("url", json!(short_url)),
                    ("content_type", json!(content_type)),
                ]),
            );
            return None;
        }

        let extension = infer_extension(url, &content_type);
        let base_name = format!("{}_{}{}", filename_prefix, short_hash(url), extension);
        let (filename, file) = match storage::claim_unique_file(&base_name, dest_folder).await {
            Ok(claimed) => claimed,
            Err(e) => {
                self.logger.error_with(
                    format!("Could not create image file: {}", e),
                    extra_fields([("url", json!(short_url))]),
                );
                return None;
            }
        };
        let file_path = dest_folder.join(&filename);

        let size = match Self::write_body(response, file).await {
            Ok(size) => size,
            Err(e) => {
                Self::discard(&file_path).await;
                self.logger.error_with(
                    format!("Error writing image body: {}", e),
                    extra_fields([("url", json!(short_url))]),
                );
                return None;
            }
        };

        if size < self.min_image_bytes {
            Self::discard(&file_path).await;
            self.logger.warning_with(
                format!("Image too small ({} bytes), discarded", size),
                extra_fields([("url", json!(short_url))]),
            );
            return None;
        }

        let check_path = file_path.clone();
        let decodable = tokio::task::spawn_blocking(move || storage::validate_image(&check_path))
            .await
            .unwrap_or(false);
        if !decodable {
            Self::discard(&file_path).await;
            self.logger.warning_with(
                "Downloaded file is not a valid image, discarded",
                extra_fields([("url", json!(short_url))]),
            );
            return None;
        }

        self.logger.debug_with(
            format!("Saved {} ({} bytes)", filename, size),
            extra_fields([("url", json!(short_url))]),
        );
        Some(filename)
    }
}

#[async_trait]
impl ImageDownloader for ImageFetcher {
    async fn fetch(&self, url: &str, dest_folder: &Path, filename_prefix: &str) -> Option<String> {
        let result = self.download(url, dest_folder, filename_prefix).await;
        metrics::record_download(result.is_some());
        result
    }
}

/// 由 URL 路径或 Content-Type 推断文件扩展名（含前导点）
pub fn infer_extension(url: &str, content_type: &str) -> String {
    let from_path = Url::parse(url).ok().and_then(|parsed| {
        Path::new(parsed.path())
            .extension()
            .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
    });
    if let Some(ext) = from_path {
        if IMAGE_EXTENSIONS.contains(&ext.as_str()) {
            return format!(".{}", ext);
        }
    }

    let content_type = content_type.to_ascii_lowercase();
    let ext = if content_type.contains("jpeg") || content_type.contains("jpg") {
        ".jpg"
    } else if content_type.contains("png") {
        ".png"
    } else if content_type.contains("gif") {
        ".gif"
    } else if content_type.contains("webp") {
        ".webp"
    } else {
        ".jpg"
    };
    ext.to_string()
}

#[cfg(test)]
#[path = "image_fetcher_test.rs"]
mod tests;
