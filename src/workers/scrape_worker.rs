// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde_json::json;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, instrument};

use crate::config::settings::Settings;
use crate::domain::models::log_entry::extra_fields;
use crate::domain::models::scrape::{BatchEntry, BatchSummary, EntryOutcome, ScrapeResult};
use crate::engines::image_fetcher::ImageFetcher;
use crate::engines::search_extractor::SearchExtractor;
use crate::engines::traits::{CandidateSource, ImageDownloader};
use crate::infrastructure::observability::scraping_logger::ScrapingLogger;
use crate::infrastructure::storage;
use crate::utils::errors::ScraperError;

/// 进度回调，按发出顺序接收人类可读的进度消息
pub type ProgressCallback = Arc<dyn Fn(&str) + Send + Sync>;

/// 不关心进度时使用的空回调
pub fn silent_progress() -> ProgressCallback {
    Arc::new(|_: &str| {})
}

/// 图片抓取器
///
/// 串联 搜索结果提取 → 逐个下载，一个实例对应一次运行，
/// 浏览器会话与 HTTP 客户端在实例内复用，结束后必须调用 [`ImageScraper::close`]
pub struct ImageScraper {
    source: Box<dyn CandidateSource>,
    fetcher: Box<dyn ImageDownloader>,
    logger: Arc<ScrapingLogger>,
    download_delay: Duration,
}

impl ImageScraper {
    /// 启动浏览器并创建 HTTP 客户端
    pub async fn launch(
        settings: &Settings,
        logger: Arc<ScrapingLogger>,
    ) -> Result<Self, ScraperError> {
        let fetcher = ImageFetcher::new(&settings.scraper, logger.clone())?;
        let source = SearchExtractor::launch(&settings.browser, logger.clone()).await?;
        info!("Image scraper ready (source: {})", source.name());

        Ok(Self::with_components(
            Box::new(source),
            Box::new(fetcher),
            logger,
            settings.scraper.download_delay(),
        ))
    }

    pub fn with_components(
        source: Box<dyn CandidateSource>,
        fetcher: Box<dyn ImageDownloader>,
        logger: Arc<ScrapingLogger>,
        download_delay: Duration,
    ) -> Self {
        Self {
            source,
            fetcher,
            logger,
            download_delay,
        }
    }

    /// 抓取单个关键词
    ///
    /// 任何错误都会被记录并通过回调报告，此时返回空结果（`class_folder` 为 `None`）
    ///
    /// # 参数
    ///
    /// * `query` - 搜索关键词
    /// * `destination` - 目标根目录
    /// * `class_name` - 类别名称，同时作为文件名前缀
    /// * `max_images` - 最多下载数量
    /// * `on_progress` - 进度回调
    #[instrument(skip(self, destination, on_progress))]
    pub async fn scrape_one(
        &self,
        query: &str,
        destination: &Path,
        class_name: &str,
        max_images: usize,
        on_progress: &ProgressCallback,
    ) -> ScrapeResult {
        match self
            .run_query(query, destination, class_name, max_images, on_progress)
            .await
        {
            Ok(result) => result,
            Err(e) => {
                let message = format!("Error during scraping: {}", e);
                self.logger.error_with(
                    message.clone(),
                    extra_fields([("query", json!(query)), ("class_name", json!(class_name))]),
                );
                on_progress(&message);
                ScrapeResult::empty()
            }
        }
    }

    /// 依次抓取多个关键词，单条失败只记录并跳过
    pub async fn scrape_batch(
        &self,
        entries: &[BatchEntry],
        images_per_entry: usize,
        default_destination: &Path,
        on_progress: &ProgressCallback,
    ) -> BatchSummary {
        let total_entries = entries.len();
        let mut summary = BatchSummary::default();
        self.logger.info_with(
            format!("Starting batch of {} entries", total_entries),
            extra_fields([("images_per_entry", json!(images_per_entry))]),
        );

        for (i, entry) in entries.iter().enumerate() {
            let index = i + 1;
            on_progress(&format!(
                "Processing entry {}/{}: {}",
                index, total_entries, entry.query
            ));

            let destination = entry
                .destination
                .as_deref()
                .filter(|d| !d.as_os_str().is_empty())
                .unwrap_or(default_destination);

            let outcome = match self
                .run_query(
                    &entry.query,
                    destination,
                    &entry.class_name,
                    images_per_entry,
                    on_progress,
                )
                .await
            {
                Ok(result) => {
                    summary.total_downloaded += result.downloaded;
                    EntryOutcome {
                        index,
                        query: entry.query.clone(),
                        class_name: entry.class_name.clone(),
                        downloaded: result.downloaded,
                        class_folder: result.class_folder,
                        error: None,
                    }
                }
                Err(e) => {
                    let message = format!(
                        "Error processing entry {} ('{}'): {}",
                        index, entry.query, e
                    );
                    self.logger.error_with(
                        message.clone(),
                        extra_fields([
                            ("entry", json!(index)),
                            ("query", json!(entry.query)),
                            ("class_name", json!(entry.class_name)),
                        ]),
                    );
                    on_progress(&message);
                    EntryOutcome {
                        index,
                        query: entry.query.clone(),
                        class_name: entry.class_name.clone(),
                        downloaded: 0,
                        class_folder: None,
                        error: Some(e.to_string()),
                    }
                }
            };
            summary.entries.push(outcome);
        }

        let message = format!(
            "Batch complete! {} images downloaded across {} entries",
            summary.total_downloaded, total_entries
        );
        self.logger.success_with(
            message.clone(),
            extra_fields([("failed_entries", json!(summary.failed_entries()))]),
        );
        on_progress(&message);
        summary
    }

    /// 释放浏览器会话
    pub async fn close(mut self) -> Result<(), ScraperError> {
        self.source.shutdown().await
    }

    async fn run_query(
        &self,
        query: &str,
        destination: &Path,
        class_name: &str,
        max_images: usize,
        on_progress: &ProgressCallback,
    ) -> Result<ScrapeResult, ScraperError> {
        let class_folder: PathBuf = storage::create_class_folder(destination, class_name).await?;

        self.logger.info_with(
            format!("Searching for images: {}", query),
            extra_fields([
                ("class_name", json!(class_name)),
                ("max_images", json!(max_images)),
            ]),
        );
        on_progress(&format!("Searching for images: {}", query));

        let urls = self.source.collect_urls(query, max_images).await?;
        let total = urls.len();

        self.logger.info(format!("Found {} candidate image URLs", total));
        on_progress(&format!("Found {} images. Starting download...", total));

        let mut result = ScrapeResult {
            candidates: total,
            ..ScrapeResult::default()
        };
        for (i, url) in urls.iter().enumerate() {
            on_progress(&format!("Downloading image {}/{}", i + 1, total));

            match self.fetcher.fetch(url, &class_folder, class_name).await {
                Some(_) => result.downloaded += 1,
                None => result.failed += 1,
            }

            if i + 1 < total && !self.download_delay.is_zero() {
                sleep(self.download_delay).await;
            }
        }

        let message = format!(
            "Download complete! {} images saved to {}",
            result.downloaded,
            class_folder.display()
        );
        self.logger.success_with(
            message.clone(),
            extra_fields([
                ("downloaded", json!(result.downloaded)),
                ("failed", json!(result.failed)),
            ]),
        );
        on_progress(&message);

        result.class_folder = Some(class_folder);
        Ok(result)
    }
}

#[cfg(test)]
#[path = "scrape_worker_test.rs"]
mod tests;
