// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct CreateFolderDto {
    #[validate(length(min = 1, message = "Folder name is required"))]
    pub folder_name: String,
}

/// 批量移动请求，`images` 中每一项为 `<class>/<filename>`
#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct MoveImagesDto {
    #[validate(length(min = 1, message = "No images selected"))]
    pub images: Vec<String>,
    #[validate(length(min = 1, message = "Destination folder is required"))]
    pub destination_folder: String,
    #[serde(default)]
    pub create_new: bool,
}

#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct DeleteImagesDto {
    #[validate(length(min = 1, message = "No images selected"))]
    pub images: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TabAction {
    Add,
    Remove,
}

/// 修改类别文件夹的标签页归属
#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct TabOverrideDto {
    #[validate(length(min = 1, message = "Tab name is required"))]
    pub tab: String,
    pub action: TabAction,
}

/// 批量操作结果
#[derive(Debug, Serialize, Deserialize)]
pub struct BulkOperationDto {
    pub status: String,
    pub processed: usize,
    pub errors: Vec<String>,
    pub message: String,
}
