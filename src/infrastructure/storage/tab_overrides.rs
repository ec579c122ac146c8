// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::utils::errors::StorageError;

/// 根目录下保存手动分组覆盖的隐藏文件
pub const TAB_OVERRIDES_FILE: &str = ".tab_overrides.json";

/// 单个名称的手动分组调整
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabAssignment {
    #[serde(default)]
    pub added_to: Vec<String>,
    #[serde(default)]
    pub removed_from: Vec<String>,
}

/// 名称到手动分组调整的映射
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TabOverrides {
    entries: BTreeMap<String, TabAssignment>,
}

impl TabOverrides {
    pub fn path(root: &Path) -> PathBuf {
        root.join(TAB_OVERRIDES_FILE)
    }

    /// 读取覆盖文件，文件不存在时返回空映射
    pub async fn load(root: &Path) -> Result<Self, StorageError> {
        match fs::read(Self::path(root)).await {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(StorageError::Io(e)),
        }
    }

    /// 写入临时文件后重命名，避免读到半写的内容
    pub async fn save(&self, root: &Path) -> Result<(), StorageError> {
        fs::create_dir_all(root).await?;
        let target = Self::path(root);
        let tmp = root.join(format!("{}.tmp", TAB_OVERRIDES_FILE));
        fs::write(&tmp, serde_json::to_vec_pretty(self)?).await?;
        fs::rename(&tmp, &target).await?;
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&TabAssignment> {
        self.entries.get(name)
    }

    pub fn entries(&self) -> &BTreeMap<String, TabAssignment> {
        &self.entries
    }

    pub fn add_to(&mut self, name: &str, tab: &str) {
        let assignment = self.entries.entry(name.to_string()).or_default();
        assignment.removed_from.retain(|t| t != tab);
        if !assignment.added_to.iter().any(|t| t == tab) {
            assignment.added_to.push(tab.to_string());
        }
    }

    pub fn remove_from(&mut self, name: &str, tab: &str) {
        let assignment = self.entries.entry(name.to_string()).or_default();
        assignment.added_to.retain(|t| t != tab);
        if !assignment.removed_from.iter().any(|t| t == tab) {
            assignment.removed_from.push(tab.to_string());
        }
    }
}
