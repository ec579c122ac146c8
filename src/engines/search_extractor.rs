// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use serde_json::json;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{sleep, Instant};
use url::Url;

use crate::config::settings::BrowserSettings;
use crate::domain::models::log_entry::extra_fields;
use crate::engines::browser::BrowserSession;
use crate::engines::traits::{CandidateSource, SearchPage};
use crate::engines::url_classifier::is_valid_image_url;
use crate::infrastructure::observability::scraping_logger::ScrapingLogger;
use crate::utils::errors::ScraperError;
use crate::utils::url_utils::{build_search_url, resolve_url};

/// 图片结果的备选选择器，兼容不同版本的结果页结构
pub const IMAGE_SELECTORS: &[&str] = &[
    "img.rg_i",
    "img.Q4LuWd",
    "img.YQ4gaf",
    "div[data-ri] img",
    "div.isv-r img",
    "img[data-src]",
];

/// 按优先级读取的 URL 属性，懒加载属性优先于 `src`
pub const SOURCE_ATTRIBUTES: &[&str] = &["data-src", "data-iurl", "data-lazy-src", "src"];

/// Cookie 同意弹窗按钮
pub const CONSENT_SELECTORS: &[&str] = &[
    "button[aria-label='Accept all']",
    "#L2AGLb",
    "form[action*='consent'] button",
    "div[role='dialog'] button:nth-of-type(2)",
];

/// "显示更多结果"按钮
pub const SHOW_MORE_SELECTORS: &[&str] = &[
    "input.mye4qd",
    "input[value='Show more results']",
    "button[aria-label='Show more results']",
];

const CONSENT_POLL_INTERVAL: Duration = Duration::from_millis(500);
const CONSENT_SETTLE: Duration = Duration::from_secs(1);

/// 提取循环参数
#[derive(Debug, Clone)]
pub struct ExtractorOptions {
    pub search_url_template: String,
    pub max_scroll_attempts: u32,
    pub scroll_wait: Duration,
    pub consent_wait: Duration,
}

impl From<&BrowserSettings> for ExtractorOptions {
    fn from(settings: &BrowserSettings) -> Self {
        Self {
            search_url_template: settings.search_url_template.clone(),
            max_scroll_attempts: settings.max_scroll_attempts,
            scroll_wait: settings.scroll_wait(),
            consent_wait: settings.consent_wait(),
        }
    }
}

/// 在已打开的页面上执行 导航 → 提取 → 滚动 循环
///
/// 达到 `max_images` 或滚动次数用尽时结束。单次提取或滚动失败只记录日志，
/// 视为本轮没有新 URL；只有导航失败会返回错误。
///
/// # 返回值
///
/// 按发现顺序排列、去重后的至多 `max_images` 个 URL
pub async fn extract_candidates<P>(
    page: &P,
    query: &str,
    max_images: usize,
    options: &ExtractorOptions,
    logger: &ScrapingLogger,
) -> Result<Vec<String>, ScraperError>
where
    P: SearchPage + ?Sized,
{
    let search_url = build_search_url(&options.search_url_template, query);
    logger.info_with(
        format!("Loading search results for '{}'", query),
        extra_fields([("url", json!(search_url))]),
    );
    page.goto(&search_url).await?;

    if dismiss_consent(page, options.consent_wait, logger).await {
        logger.debug("Dismissed consent dialog");
    }

    let base = Url::parse(&search_url).ok();
    let mut seen: HashSet<String> = HashSet::new();
    let mut urls: Vec<String> = Vec::new();
    let mut scrolls = 0u32;
    let mut pass = 0u32;

    while urls.len() < max_images {
        pass += 1;
        match extract_pass(page, base.as_ref()).await {
            Ok(found) => {
                let before = urls.len();
                for url in found {
                    if urls.len() >= max_images {
                        break;
                    }
                    if seen.insert(url.clone()) {
                        urls.push(url);
                    }
                }
                logger.debug_with(
                    format!("Extraction pass {} added {} new URLs", pass, urls.len() - before),
                    extra_fields([("total", json!(urls.len())), ("query", json!(query))]),
                );
            }
            Err(e) => {
                logger.warning_with(
                    format!("Extraction pass {} failed: {}", pass, e),
                    extra_fields([("query", json!(query))]),
                );
            }
        }

        if urls.len() >= max_images {
            break;
        }
        if scrolls >= options.max_scroll_attempts {
            logger.info_with(
                format!(
                    "Stopped after {} scroll attempts with {} of {} URLs",
                    scrolls,
                    urls.len(),
                    max_images
                ),
                extra_fields([("query", json!(query))]),
            );
            break;
        }

        scrolls += 1;
        if let Err(e) = page.scroll_to_bottom().await {
            logger.warning(format!("Scroll attempt {} failed: {}", scrolls, e));
        }
        for selector in SHOW_MORE_SELECTORS {
            if let Ok(true) = page.click(selector).await {
                logger.debug("Clicked 'show more results'");
                break;
            }
        }
        if !options.scroll_wait.is_zero() {
            sleep(options.scroll_wait).await;
        }
    }

    Ok(urls)
}

/// 一轮提取：遍历所有选择器，返回通过分类器的 URL（未去重）
async fn extract_pass<P>(page: &P, base: Option<&Url>) -> Result<Vec<String>, ScraperError>
where
    P: SearchPage + ?Sized,
{
    let mut found = Vec::new();
    for selector in IMAGE_SELECTORS {
        for source in page.image_sources(selector, SOURCE_ATTRIBUTES).await? {
            let absolute = match base {
                Some(base) => resolve_url(base, source.trim()).map(|u| u.to_string()),
                None => Url::parse(source.trim()).map(|u| u.to_string()),
            };
            if let Ok(url) = absolute {
                if is_valid_image_url(&url) {
                    found.push(url);
                }
            }
        }
    }
    Ok(found)
}

/// 在 `wait` 时间内轮询并点击同意按钮，没有弹窗不算错误
async fn dismiss_consent<P>(page: &P, wait: Duration, logger: &ScrapingLogger) -> bool
where
    P: SearchPage + ?Sized,
{
    let deadline = Instant::now() + wait;
    loop {
        for selector in CONSENT_SELECTORS {
            match page.click(selector).await {
                Ok(true) => {
                    sleep(CONSENT_SETTLE.min(wait)).await;
                    return true;
                }
                Ok(false) => {}
                Err(e) => logger.debug(format!("Consent probe {} failed: {}", selector, e)),
            }
        }

        let now = Instant::now();
        if now >= deadline {
            return false;
        }
        sleep(CONSENT_POLL_INTERVAL.min(deadline - now)).await;
    }
}

/// 基于浏览器的搜索结果提取器
///
/// 持有一个浏览器会话，每个关键词使用一个新页面，页面在所有路径上都会关闭
pub struct SearchExtractor {
    session: Option<BrowserSession>,
    options: ExtractorOptions,
    logger: Arc<ScrapingLogger>,
}

impl SearchExtractor {
    pub async fn launch(
        settings: &BrowserSettings,
        logger: Arc<ScrapingLogger>,
    ) -> Result<Self, ScraperError> {
        let session = BrowserSession::launch(settings).await?;
        Ok(Self {
            session: Some(session),
            options: ExtractorOptions::from(settings),
            logger,
        })
    }
}

#[async_trait]
impl CandidateSource for SearchExtractor {
    async fn collect_urls(
        &self,
        query: &str,
        max_images: usize,
    ) -> Result<Vec<String>, ScraperError> {
        let session = self
            .session
            .as_ref()
            .ok_or_else(|| ScraperError::Setup("browser session is closed".to_string()))?;

        let page = session.new_page().await?;
        let result = extract_candidates(&page, query, max_images, &self.options, &self.logger).await;
        page.close().await;
        result
    }

    async fn shutdown(&mut self) -> Result<(), ScraperError> {
        match self.session.take() {
            Some(session) => session.close().await,
            None => Ok(()),
        }
    }

    fn name(&self) -> &'static str {
        "chromium"
    }
}

#[cfg(test)]
#[path = "search_extractor_test.rs"]
mod tests;
