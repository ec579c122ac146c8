// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::info;
use validator::Validate;

use crate::application::dto::library_request::{
    BulkOperationDto, CreateFolderDto, DeleteImagesDto, MoveImagesDto, TabAction, TabOverrideDto,
};
use crate::config::settings::Settings;
use crate::infrastructure::storage::{self, tab_overrides::TabOverrides, BulkReport};
use crate::presentation::errors::AppError;
use crate::utils::errors::StorageError;

fn bulk_response(report: BulkReport, verb: &str) -> Json<BulkOperationDto> {
    let status = if report.errors.is_empty() { "success" } else { "partial" };
    Json(BulkOperationDto {
        status: status.to_string(),
        message: format!("{} {} images", verb, report.processed),
        processed: report.processed,
        errors: report.errors,
    })
}

/// 列出所有类别文件夹
pub async fn list_classes(
    Extension(settings): Extension<Arc<Settings>>,
) -> Result<Json<Value>, AppError> {
    let classes = storage::list_classes(&settings.storage.root).await?;
    let total_images: usize = classes.iter().map(|c| c.image_count).sum();
    Ok(Json(json!({ "classes": classes, "total_images": total_images })))
}

pub async fn list_class_images(
    Extension(settings): Extension<Arc<Settings>>,
    Path(class_name): Path<String>,
) -> Result<Json<Value>, AppError> {
    let images = storage::images_in_class(&settings.storage.root, &class_name).await?;
    Ok(Json(json!({ "class_name": class_name, "count": images.len(), "images": images })))
}

pub async fn delete_image(
    Extension(settings): Extension<Arc<Settings>>,
    Path((class_name, filename)): Path<(String, String)>,
) -> Result<Json<Value>, AppError> {
    if !storage::delete_image(&settings.storage.root, &class_name, &filename).await? {
        return Err(StorageError::NotFound(format!("{}/{}", class_name, filename)).into());
    }
    info!("Deleted image {}/{}", class_name, filename);
    Ok(Json(json!({
        "status": "success",
        "message": format!("Image {} deleted successfully.", filename)
    })))
}

pub async fn create_folder(
    Extension(settings): Extension<Arc<Settings>>,
    Json(payload): Json<CreateFolderDto>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    payload.validate()?;
    let folder_name = payload.folder_name.trim();
    storage::create_folder(&settings.storage.root, folder_name).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "status": "success", "folder_name": folder_name })),
    ))
}

pub async fn move_images(
    Extension(settings): Extension<Arc<Settings>>,
    Json(payload): Json<MoveImagesDto>,
) -> Result<Json<BulkOperationDto>, AppError> {
    payload.validate()?;
    let report = storage::move_images(
        &settings.storage.root,
        &payload.images,
        payload.destination_folder.trim(),
        payload.create_new,
    )
    .await?;
    Ok(bulk_response(report, "Moved"))
}

pub async fn delete_images(
    Extension(settings): Extension<Arc<Settings>>,
    Json(payload): Json<DeleteImagesDto>,
) -> Result<Json<BulkOperationDto>, AppError> {
    payload.validate()?;
    let report = storage::delete_images(&settings.storage.root, &payload.images).await;
    Ok(bulk_response(report, "Deleted"))
}

pub async fn get_tab_overrides(
    Extension(settings): Extension<Arc<Settings>>,
) -> Result<Json<TabOverrides>, AppError> {
    Ok(Json(TabOverrides::load(&settings.storage.root).await?))
}

/// 把类别文件夹加入或移出某个标签页
pub async fn update_tab_override(
    Extension(settings): Extension<Arc<Settings>>,
    Path(name): Path<String>,
    Json(payload): Json<TabOverrideDto>,
) -> Result<Json<Value>, AppError> {
    payload.validate()?;
    storage::validate_component(&name)?;

    let root = &settings.storage.root;
    let mut overrides = TabOverrides::load(root).await?;
    match payload.action {
        TabAction::Add => overrides.add_to(&name, &payload.tab),
        TabAction::Remove => overrides.remove_from(&name, &payload.tab),
    }
    overrides.save(root).await?;

    Ok(Json(json!({
        "status": "success",
        "name": name,
        "assignment": overrides.get(&name),
    })))
}
