// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use uuid::Uuid;
use validator::Validate;

use crate::domain::models::scrape::{BatchEntry, ScrapeRequest};

/// 单关键词抓取请求
#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct ScrapeRequestDto {
    /// 搜索关键词
    #[validate(length(min = 1, message = "Search keywords are required"))]
    pub keywords: String,
    /// 类别名称
    #[validate(length(min = 1, message = "Class name is required"))]
    pub class_name: String,
    /// 目标根目录，为空时使用存储根目录
    #[serde(default)]
    pub destination_folder: Option<String>,
    /// 下载数量，越界时回退到默认值
    #[serde(default)]
    pub max_images: Option<usize>,
}

impl ScrapeRequestDto {
    pub fn into_request(self, default_max_images: usize) -> ScrapeRequest {
        ScrapeRequest {
            query: self.keywords,
            destination: PathBuf::from(self.destination_folder.unwrap_or_default()),
            class_name: self.class_name,
            max_images: self.max_images.unwrap_or(default_max_images),
        }
    }
}

/// 批量请求中的一条记录
#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct BulkEntryDto {
    #[serde(alias = "keywords")]
    #[validate(length(min = 1, message = "Search keywords are required"))]
    pub keyword: String,
    #[serde(rename = "className", alias = "class_name")]
    #[validate(length(min = 1, message = "Class name is required"))]
    pub class_name: String,
    #[serde(default)]
    pub destination_folder: Option<String>,
}

/// 批量抓取请求
#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct BulkScrapeRequestDto {
    #[validate(length(min = 1, message = "No valid search entries provided"), nested)]
    pub search_entries: Vec<BulkEntryDto>,
    #[serde(default)]
    pub images_per_class: Option<usize>,
    #[serde(default)]
    pub destination_folder: Option<String>,
}

impl BulkScrapeRequestDto {
    pub fn entries(&self) -> Vec<BatchEntry> {
        self.search_entries
            .iter()
            .map(|entry| {
                let batch_entry = BatchEntry::new(entry.keyword.trim(), entry.class_name.trim());
                match entry.destination_folder.as_deref().map(str::trim) {
                    Some(dest) if !dest.is_empty() => batch_entry.with_destination(dest),
                    _ => batch_entry,
                }
            })
            .collect()
    }

    pub fn default_destination(&self) -> Option<PathBuf> {
        self.destination_folder
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(PathBuf::from)
    }
}

/// 任务已启动的响应
#[derive(Debug, Serialize, Deserialize)]
pub struct ScrapeStartedDto {
    pub status: String,
    pub run_id: Uuid,
    pub message: String,
}

impl ScrapeStartedDto {
    pub fn new(run_id: Uuid, message: impl Into<String>) -> Self {
        Self {
            status: "success".to_string(),
            run_id,
            message: message.into(),
        }
    }
}
