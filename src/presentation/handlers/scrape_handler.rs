// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{extract::Extension, http::StatusCode, Json};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::info;
use validator::Validate;

use crate::application::dto::scrape_request::{
    BulkScrapeRequestDto, ScrapeRequestDto, ScrapeStartedDto,
};
use crate::config::settings::Settings;
use crate::domain::models::scrape::RunStatus;
use crate::presentation::errors::AppError;
use crate::workers::run_manager::RunManager;

/// 启动单关键词抓取
///
/// 任务在后台运行，客户端通过 `/api/scraping_status` 与 `/api/scraping_logs/new` 轮询进度
pub async fn start_scrape(
    Extension(manager): Extension<Arc<RunManager>>,
    Extension(settings): Extension<Arc<Settings>>,
    Json(payload): Json<ScrapeRequestDto>,
) -> Result<(StatusCode, Json<ScrapeStartedDto>), AppError> {
    payload.validate()?;

    let request = payload.into_request(settings.scraper.default_max_images);
    info!(
        "Scrape requested: '{}' -> {} (max {})",
        request.query, request.class_name, request.max_images
    );
    let handle = manager.start_run(request, None)?;

    Ok((
        StatusCode::ACCEPTED,
        Json(ScrapeStartedDto::new(
            handle.id,
            "Image scraping started! You can monitor progress below.",
        )),
    ))
}

/// 启动批量抓取
pub async fn start_bulk_scrape(
    Extension(manager): Extension<Arc<RunManager>>,
    Extension(settings): Extension<Arc<Settings>>,
    Json(payload): Json<BulkScrapeRequestDto>,
) -> Result<(StatusCode, Json<ScrapeStartedDto>), AppError> {
    payload.validate()?;

    let entries = payload.entries();
    let total = entries.len();
    let images_per_entry = payload
        .images_per_class
        .unwrap_or(settings.scraper.default_max_images);
    let handle = manager.start_batch(
        entries,
        images_per_entry,
        payload.default_destination(),
        None,
    )?;

    Ok((
        StatusCode::ACCEPTED,
        Json(ScrapeStartedDto::new(
            handle.id,
            format!("Bulk search started for {} entries.", total),
        )),
    ))
}

pub async fn get_status(Extension(manager): Extension<Arc<RunManager>>) -> Json<RunStatus> {
    Json(manager.get_status())
}

/// 清除残留状态，不会中断正在运行的任务
pub async fn reset_status(
    Extension(manager): Extension<Arc<RunManager>>,
) -> (StatusCode, Json<Value>) {
    if manager.reset_status() {
        (
            StatusCode::OK,
            Json(json!({ "status": "success", "scraping_status": manager.get_status() })),
        )
    } else {
        (
            StatusCode::CONFLICT,
            Json(json!({
                "status": "error",
                "error": "A scraping run is in progress; status was not reset."
            })),
        )
    }
}
