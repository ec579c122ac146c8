// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// 单次抓取请求
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrapeRequest {
    /// 搜索关键词
    pub query: String,
    /// 目标根目录
    pub destination: PathBuf,
    /// 类别名称（即类别文件夹名）
    pub class_name: String,
    /// 最多下载的图片数量
    pub max_images: usize,
}

/// 批量抓取中的一条记录
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchEntry {
    pub query: String,
    pub class_name: String,
    /// 覆盖批量任务的默认目标目录
    #[serde(default)]
    pub destination: Option<PathBuf>,
}

impl BatchEntry {
    pub fn new(query: impl Into<String>, class_name: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            class_name: class_name.into(),
            destination: None,
        }
    }

    pub fn with_destination(mut self, destination: impl Into<PathBuf>) -> Self {
        self.destination = Some(destination.into());
        self
    }
}

/// 单次抓取结果
///
/// `downloaded + failed <= candidates` 始终成立；任务失败时 `class_folder` 为空
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScrapeResult {
    pub downloaded: usize,
    pub failed: usize,
    pub candidates: usize,
    pub class_folder: Option<PathBuf>,
}

impl ScrapeResult {
    /// 表示"本次任务没有产出"的结果
    pub fn empty() -> Self {
        Self::default()
    }
}

/// 批量任务中单条记录的执行结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryOutcome {
    /// 从 1 开始的序号
    pub index: usize,
    pub query: String,
    pub class_name: String,
    pub downloaded: usize,
    pub class_folder: Option<PathBuf>,
    pub error: Option<String>,
}

/// 批量任务汇总
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub total_downloaded: usize,
    pub entries: Vec<EntryOutcome>,
}

impl BatchSummary {
    pub fn failed_entries(&self) -> usize {
        self.entries.iter().filter(|e| e.error.is_some()).count()
    }
}

/// 一次运行的最终产出
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RunOutcome {
    Single(ScrapeResult),
    Batch(BatchSummary),
}

impl RunOutcome {
    pub fn downloaded(&self) -> usize {
        match self {
            RunOutcome::Single(result) => result.downloaded,
            RunOutcome::Batch(summary) => summary.total_downloaded,
        }
    }
}

/// 当前运行状态快照
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStatus {
    pub is_running: bool,
    pub progress: String,
}
