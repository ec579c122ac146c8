// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use std::path::Path;

use crate::utils::errors::ScraperError;

/// 搜索结果页
///
/// 提取循环只依赖这几个页面操作，浏览器实现见 [`crate::engines::browser`]
#[async_trait]
pub trait SearchPage: Send + Sync {
    /// 加载指定 URL
    async fn goto(&self, url: &str) -> Result<(), ScraperError>;

    /// 点击第一个匹配选择器的元素
    ///
    /// 没有匹配元素或元素不可点击时返回 `Ok(false)`
    async fn click(&self, selector: &str) -> Result<bool, ScraperError>;

    /// 对每个匹配选择器的元素，按 `attributes` 顺序返回第一个非空属性值
    async fn image_sources(
        &self,
        selector: &str,
        attributes: &[&str],
    ) -> Result<Vec<String>, ScraperError>;

    /// 滚动到页面底部以触发懒加载
    async fn scroll_to_bottom(&self) -> Result<(), ScraperError>;
}

/// 候选图片 URL 来源
#[async_trait]
pub trait CandidateSource: Send + Sync {
    /// 为关键词收集至多 `max_images` 个去重后的候选 URL（保持发现顺序）
    async fn collect_urls(&self, query: &str, max_images: usize)
        -> Result<Vec<String>, ScraperError>;

    /// 释放底层资源（浏览器会话等）
    async fn shutdown(&mut self) -> Result<(), ScraperError>;

    /// 来源名称
    fn name(&self) -> &'static str;
}

/// 图片下载器
#[async_trait]
pub trait ImageDownloader: Send + Sync {
    /// 下载并校验一张图片
    ///
    /// # 返回值
    ///
    /// * `Some(filename)` - 已保存到 `dest_folder` 的文件名
    /// * `None` - 下载或校验失败，磁盘上不留残余文件
    async fn fetch(&self, url: &str, dest_folder: &Path, filename_prefix: &str) -> Option<String>;
}
