// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use axum_test::TestServer;
use image::{ImageFormat, Rgb, RgbImage};
use pixharvest::config::settings::Settings;
use pixharvest::engines::image_fetcher::ImageFetcher;
use pixharvest::engines::traits::CandidateSource;
use pixharvest::infrastructure::observability::scraping_logger::ScrapingLogger;
use pixharvest::presentation::routes;
use pixharvest::utils::errors::ScraperError;
use pixharvest::workers::run_manager::{RunManager, ScraperFactory};
use pixharvest::workers::scrape_worker::ImageScraper;
use std::collections::HashMap;
use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio::sync::Semaphore;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// 按关键词返回固定 URL 列表，用来替代浏览器
#[derive(Clone, Default)]
pub struct StaticSource {
    pub by_query: HashMap<String, Vec<String>>,
}

#[async_trait]
impl CandidateSource for StaticSource {
    async fn collect_urls(
        &self,
        query: &str,
        max_images: usize,
    ) -> Result<Vec<String>, ScraperError> {
        match self.by_query.get(query) {
            Some(urls) => Ok(urls.iter().take(max_images).cloned().collect()),
            None => Err(ScraperError::Navigation(format!(
                "no results page for '{}'",
                query
            ))),
        }
    }

    async fn shutdown(&mut self) -> Result<(), ScraperError> {
        Ok(())
    }

    fn name(&self) -> &'static str {
        "static"
    }
}

/// 使用真实 [`ImageFetcher`] 与固定候选 URL 的工厂
pub struct StaticFactory {
    pub source: StaticSource,
    pub settings: Arc<Settings>,
    pub gate: Option<Arc<Semaphore>>,
}

#[async_trait]
impl ScraperFactory for StaticFactory {
    async fn create(&self, logger: Arc<ScrapingLogger>) -> Result<ImageScraper, ScraperError> {
        if let Some(gate) = &self.gate {
            let _permit = gate
                .acquire()
                .await
                .map_err(|e| ScraperError::Setup(e.to_string()))?;
        }
        let fetcher = ImageFetcher::new(&self.settings.scraper, logger.clone())?;
        Ok(ImageScraper::with_components(
            Box::new(self.source.clone()),
            Box::new(fetcher),
            logger,
            Duration::ZERO,
        ))
    }
}

pub fn test_settings(root: &Path) -> Arc<Settings> {
    let mut settings = Settings::defaults().unwrap();
    settings.storage.root = root.to_path_buf();
    settings.scraper.download_delay_ms = 0;
    Arc::new(settings)
}

pub fn manager_with(
    settings: Arc<Settings>,
    source: StaticSource,
    gate: Option<Arc<Semaphore>>,
) -> Arc<RunManager> {
    let factory = StaticFactory {
        source,
        settings: settings.clone(),
        gate,
    };
    Arc::new(RunManager::with_factory(
        Arc::new(factory),
        Arc::new(ScrapingLogger::new()),
        settings.storage.root.clone(),
        settings.scraper.default_max_images,
    ))
}

#[allow(dead_code)]
pub struct TestApp {
    pub server: TestServer,
    pub root: TempDir,
    pub settings: Arc<Settings>,
    pub manager: Arc<RunManager>,
}

pub fn create_test_app(source: StaticSource, gate: Option<Arc<Semaphore>>) -> TestApp {
    let root = TempDir::new().unwrap();
    let settings = test_settings(root.path());
    let manager = manager_with(settings.clone(), source, gate);
    let server = TestServer::new(routes::app(settings.clone(), manager.clone())).unwrap();
    TestApp {
        server,
        root,
        settings,
        manager,
    }
}

/// 带噪声的 PNG，压缩后仍大于 1KB
pub fn noisy_png() -> Vec<u8> {
    let mut seed: u32 = 0x9e37_79b9;
    let img = RgbImage::from_fn(48, 48, |_, _| {
        seed = seed.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
        let bytes = seed.to_le_bytes();
        Rgb([bytes[1], bytes[2], bytes[3]])
    });
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, ImageFormat::Png).unwrap();
    buf.into_inner()
}

pub async fn mount(server: &MockServer, route: &str, status: u16, content_type: &str, body: Vec<u8>) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(status)
                .insert_header("content-type", content_type)
                .set_body_bytes(body),
        )
        .mount(server)
        .await;
}

/// 等待后台任务结束
pub async fn wait_until_idle(manager: &RunManager) {
    for _ in 0..200 {
        if !manager.get_status().is_running {
            return;
        }
        tokio::time::sleep(Duration::from_millis(25)).await;
    }
    panic!("run did not finish in time");
}

pub fn write_image(root: &Path, class_name: &str, filename: &str) {
    let folder = root.join(class_name);
    std::fs::create_dir_all(&folder).unwrap();
    std::fs::write(folder.join(filename), b"not really a jpeg").unwrap();
}
