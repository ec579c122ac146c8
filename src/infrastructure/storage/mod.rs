// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! 本地图片库
//!
//! 根目录下每个直接子目录是一个类别文件夹，图片是类别文件夹的直接子文件。

pub mod tab_overrides;

use image::ImageReader;
use serde::Serialize;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::utils::errors::StorageError;

/// 识别为图片的文件扩展名（不区分大小写）
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp"];

/// 类别文件夹信息
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassFolder {
    pub name: String,
    pub path: PathBuf,
    pub image_count: usize,
}

/// 类别文件夹中的一张图片
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageInfo {
    pub filename: String,
    pub path: PathBuf,
    /// `<class>/<filename>`，始终使用 `/` 分隔
    pub relative_path: String,
}

/// 批量移动/删除的结果
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BulkReport {
    pub processed: usize,
    pub errors: Vec<String>,
}

pub fn has_image_extension(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    IMAGE_EXTENSIONS
        .iter()
        .any(|ext| lower.ends_with(&format!(".{}", ext)))
}

/// 校验文件夹或文件名只包含单个路径分量
pub fn validate_component(name: &str) -> Result<(), StorageError> {
    let trimmed = name.trim();
    if trimmed.is_empty()
        || trimmed != name
        || name.starts_with('.')
        || name.contains('/')
        || name.contains('\\')
        || name.contains('\0')
    {
        return Err(StorageError::InvalidName(name.to_string()));
    }
    Ok(())
}

/// 确保 `<base>/<class_name>` 存在并返回其路径
///
/// 目录已存在时直接返回；权限等错误向上传播
pub async fn create_class_folder(base: &Path, class_name: &str) -> Result<PathBuf, StorageError> {
    validate_component(class_name)?;
    let class_path = base.join(class_name);
    fs::create_dir_all(&class_path).await?;
    Ok(class_path)
}

/// 创建新的空类别文件夹，已存在时报错
pub async fn create_folder(base: &Path, name: &str) -> Result<PathBuf, StorageError> {
    validate_component(name)?;
    let path = base.join(name);
    if fs::try_exists(&path).await? {
        return Err(StorageError::AlreadyExists(name.to_string()));
    }
    fs::create_dir_all(&path).await?;
    Ok(path)
}

fn split_name(base_name: &str) -> (String, String) {
    let path = Path::new(base_name);
    match (path.file_stem(), path.extension()) {
        (Some(stem), Some(ext)) => (
            stem.to_string_lossy().to_string(),
            format!(".{}", ext.to_string_lossy()),
        ),
        _ => (base_name.to_string(), String::new()),
    }
}

fn numbered_name(stem: &str, ext: &str, counter: usize) -> String {
    if counter == 0 {
        format!("{}{}", stem, ext)
    } else {
        format!("{}_{}{}", stem, counter, ext)
    }
}

/// 生成在 `folder` 中不冲突的文件名
///
/// 依次尝试 `name.ext`、`name_1.ext`、`name_2.ext` ……
/// 只做存在性探测，并发写入同一目录时请使用 [`claim_unique_file`]
pub fn generate_unique_filename(base_name: &str, folder: &Path) -> String {
    let (stem, ext) = split_name(base_name);
    let mut counter = 0;
    loop {
        let candidate = numbered_name(&stem, &ext, counter);
        if !folder.join(&candidate).exists() {
            return candidate;
        }
        counter += 1;
    }
}

/// 以独占方式创建不冲突的文件
///
/// 与 [`generate_unique_filename`] 使用相同的命名规则，但通过 `create_new`
/// 原子地占用文件名
pub async fn claim_unique_file(
    base_name: &str,
    folder: &Path,
) -> Result<(String, fs::File), StorageError> {
    let (stem, ext) = split_name(base_name);
    let mut counter = 0;
    loop {
        let candidate = numbered_name(&stem, &ext, counter);
        match fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(folder.join(&candidate))
            .await
        {
            Ok(file) => return Ok((candidate, file)),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => counter += 1,
            Err(e) => return Err(StorageError::Io(e)),
        }
    }
}

/// 文件能否被完整解码为受支持的位图格式
///
/// 任何读取、截断或格式错误都返回 `false`
pub fn validate_image(path: &Path) -> bool {
    let reader = match ImageReader::open(path).and_then(|r| r.with_guessed_format()) {
        Ok(reader) => reader,
        Err(_) => return false,
    };
    reader.decode().is_ok()
}

/// 列出文件夹中的图片文件名（不递归，按名称排序）
///
/// 文件夹不存在时返回空列表
pub async fn list_images(folder: &Path) -> Result<Vec<String>, StorageError> {
    let mut dir = match fs::read_dir(folder).await {
        Ok(dir) => dir,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(StorageError::Io(e)),
    };

    let mut names = Vec::new();
    while let Some(entry) = dir.next_entry().await? {
        if !entry.file_type().await?.is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().to_string();
        if has_image_extension(&name) {
            names.push(name);
        }
    }
    names.sort();
    Ok(names)
}

pub async fn count_images(folder: &Path) -> Result<usize, StorageError> {
    Ok(list_images(folder).await?.len())
}

/// 列出根目录下的类别文件夹及其图片数量（跳过隐藏目录）
pub async fn list_classes(base: &Path) -> Result<Vec<ClassFolder>, StorageError> {
    let mut dir = match fs::read_dir(base).await {
        Ok(dir) => dir,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(StorageError::Io(e)),
    };

    let mut classes = Vec::new();
    while let Some(entry) = dir.next_entry().await? {
        if !entry.file_type().await?.is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().to_string();
        if name.starts_with('.') {
            continue;
        }
        let path = entry.path();
        let image_count = count_images(&path).await?;
        classes.push(ClassFolder {
            name,
            path,
            image_count,
        });
    }
    classes.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(classes)
}

pub async fn images_in_class(base: &Path, class_name: &str) -> Result<Vec<ImageInfo>, StorageError> {
    validate_component(class_name)?;
    let class_path = base.join(class_name);
    Ok(list_images(&class_path)
        .await?
        .into_iter()
        .map(|filename| ImageInfo {
            path: class_path.join(&filename),
            relative_path: format!("{}/{}", class_name, filename),
            filename,
        })
        .collect())
}

/// 删除单张图片；文件不存在时返回 `false`
pub async fn delete_image(base: &Path, class_name: &str, filename: &str) -> Result<bool, StorageError> {
    validate_component(class_name)?;
    validate_component(filename)?;
    match fs::remove_file(base.join(class_name).join(filename)).await {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(e) => Err(StorageError::Io(e)),
    }
}

fn parse_image_ref(image: &str) -> Result<(&str, &str), StorageError> {
    let (class_name, filename) = image
        .split_once('/')
        .ok_or_else(|| StorageError::InvalidName(image.to_string()))?;
    validate_component(class_name)?;
    validate_component(filename)?;
    Ok((class_name, filename))
}

/// 将 `<class>/<filename>` 形式的图片移动到目标类别文件夹
///
/// 目标中已有同名文件时按唯一文件名规则重命名。单张失败不影响其余图片。
pub async fn move_images(
    base: &Path,
    images: &[String],
    destination: &str,
    create_new: bool,
) -> Result<BulkReport, StorageError> {
    validate_component(destination)?;
    let dest_path = base.join(destination);
    if create_new {
        fs::create_dir_all(&dest_path).await?;
    } else if !fs::try_exists(&dest_path).await? {
        return Err(StorageError::NotFound(destination.to_string()));
    }

    let mut report = BulkReport::default();
    for image in images {
        let (class_name, filename) = match parse_image_ref(image) {
            Ok(parts) => parts,
            Err(e) => {
                report.errors.push(format!("{}: {}", image, e));
                continue;
            }
        };
        if class_name == destination {
            continue;
        }

        let source = base.join(class_name).join(filename);
        if !fs::try_exists(&source).await.unwrap_or(false) {
            report.errors.push(format!("{}: source not found", image));
            continue;
        }

        let target_name = generate_unique_filename(filename, &dest_path);
        match fs::rename(&source, dest_path.join(&target_name)).await {
            Ok(()) => report.processed += 1,
            Err(e) => report.errors.push(format!("{}: {}", image, e)),
        }
    }
    Ok(report)
}

/// 批量删除 `<class>/<filename>` 形式的图片
pub async fn delete_images(base: &Path, images: &[String]) -> BulkReport {
    let mut report = BulkReport::default();
    for image in images {
        let result = match parse_image_ref(image) {
            Ok((class_name, filename)) => delete_image(base, class_name, filename).await,
            Err(e) => Err(e),
        };
        match result {
            Ok(true) => report.processed += 1,
            Ok(false) => report.errors.push(format!("{}: not found", image)),
            Err(e) => report.errors.push(format!("{}: {}", image, e)),
        }
    }
    report
}
