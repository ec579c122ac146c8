// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use chromiumoxide::{Browser, BrowserConfig, Page};
use futures::StreamExt;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::config::settings::BrowserSettings;
use crate::engines::traits::SearchPage;
use crate::utils::errors::ScraperError;

/// 浏览器会话
///
/// 每个抓取器实例持有一个会话，会话不在多个运行之间共享。
/// 用完后必须调用 [`BrowserSession::close`]。
pub struct BrowserSession {
    browser: Browser,
    handler: JoinHandle<()>,
}

impl BrowserSession {
    /// 启动本地 Chrome，或在配置了 `remote_debugging_url` 时连接远程实例
    pub async fn launch(settings: &BrowserSettings) -> Result<Self, ScraperError> {
        let remote_debugging_url = settings
            .remote_debugging_url
            .clone()
            .or_else(|| std::env::var("CHROMIUM_REMOTE_DEBUGGING_URL").ok());

        let (browser, mut handler) = if let Some(ref url) = remote_debugging_url {
            info!("Connecting to remote Chrome instance at: {}", url);
            Browser::connect(url)
                .await
                .map_err(|e| ScraperError::Setup(format!("Failed to connect to remote Chrome: {}", e)))?
        } else {
            let mut builder = BrowserConfig::builder()
                .no_sandbox()
                .request_timeout(settings.request_timeout())
                .window_size(1366, 900)
                .arg("--disable-gpu")
                .arg("--disable-dev-shm-usage");
            if !settings.headless {
                builder = builder.with_head();
            }

            let config = builder.build().map_err(ScraperError::Setup)?;
            Browser::launch(config)
                .await
                .map_err(|e| ScraperError::Setup(format!("Failed to launch Chrome: {}", e)))?
        };

        // Spawn a handler to process browser events
        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        Ok(Self { browser, handler })
    }

    pub async fn new_page(&self) -> Result<ChromiumPage, ScraperError> {
        let page = self
            .browser
            .new_page("about:blank")
            .await
            .map_err(|e| ScraperError::Page(format!("Failed to create new page: {}", e)))?;
        Ok(ChromiumPage { page })
    }

    /// 关闭浏览器并停止事件处理任务
    pub async fn close(mut self) -> Result<(), ScraperError> {
        let closed = self.browser.close().await;
        if let Err(e) = self.browser.wait().await {
            warn!("Browser process did not exit cleanly: {}", e);
        }
        self.handler.abort();
        closed
            .map(|_| ())
            .map_err(|e| ScraperError::Page(format!("Failed to close browser: {}", e)))
    }
}

/// chromiumoxide 页面
pub struct ChromiumPage {
    page: Page,
}

impl ChromiumPage {
    pub async fn close(self) {
        if let Err(e) = self.page.close().await {
            debug!("Failed to close page: {}", e);
        }
    }
}

#[async_trait]
impl SearchPage for ChromiumPage {
    async fn goto(&self, url: &str) -> Result<(), ScraperError> {
        self.page
            .goto(url)
            .await
            .map_err(|e| ScraperError::Navigation(format!("{}: {}", url, e)))?;
        // Allow this to fail gracefully
        self.page.wait_for_navigation().await.ok();
        Ok(())
    }

    async fn click(&self, selector: &str) -> Result<bool, ScraperError> {
        let element = match self.page.find_element(selector).await {
            Ok(element) => element,
            Err(_) => return Ok(false),
        };
        match element.click().await {
            Ok(_) => Ok(true),
            Err(e) => {
                debug!("Element {} found but not clickable: {}", selector, e);
                Ok(false)
            }
        }
    }

    async fn image_sources(
        &self,
        selector: &str,
        attributes: &[&str],
    ) -> Result<Vec<String>, ScraperError> {
        let elements = match self.page.find_elements(selector).await {
            Ok(elements) => elements,
            // no match is reported as an error by CDP
            Err(_) => return Ok(Vec::new()),
        };

        let mut sources = Vec::with_capacity(elements.len());
        for element in elements {
            for attribute in attributes {
                let value = element
                    .attribute(*attribute)
                    .await
                    .map_err(|e| ScraperError::Page(format!("Failed to read {}: {}", attribute, e)))?;
                if let Some(value) = value.filter(|v| !v.trim().is_empty()) {
                    sources.push(value);
                    break;
                }
            }
        }
        Ok(sources)
    }

    async fn scroll_to_bottom(&self) -> Result<(), ScraperError> {
        self.page
            .evaluate("window.scrollTo(0, document.body.scrollHeight);")
            .await
            .map_err(|e| ScraperError::Page(format!("Scroll failed: {}", e)))?;
        Ok(())
    }
}
