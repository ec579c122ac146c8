// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use thiserror::Error;

/// 抓取流水线错误类型
#[derive(Error, Debug)]
pub enum ScraperError {
    /// 浏览器会话或 HTTP 客户端无法创建
    #[error("Setup failed: {0}")]
    Setup(String),
    /// 搜索结果页加载失败
    #[error("Navigation failed: {0}")]
    Navigation(String),
    /// 页面交互（查询元素、滚动、点击）失败
    #[error("Page operation failed: {0}")]
    Page(String),
    /// HTTP 请求失败
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// 文件系统错误
    #[error(transparent)]
    Storage(#[from] StorageError),
    /// 写入文件失败
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// 后台任务异常退出
    #[error("Worker task failed: {0}")]
    Worker(String),
}

/// 存储层错误类型
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid name: {0}")]
    InvalidName(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Already exists: {0}")]
    AlreadyExists(String),

    #[error("Metadata error: {0}")]
    Metadata(#[from] serde_json::Error),
}

/// 任务调度错误类型
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RunError {
    #[error("Scraping is already in progress. Please wait for it to complete.")]
    AlreadyRunning,

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}
