// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{
    extract::Extension,
    http::header,
    response::IntoResponse,
    Json,
};
use chrono::Local;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::infrastructure::observability::scraping_logger::ScrapingLogger;

/// 完整日志历史
pub async fn get_logs(Extension(logger): Extension<Arc<ScrapingLogger>>) -> Json<Value> {
    let logs = logger.get_logs();
    Json(json!({ "total_count": logs.len(), "logs": logs }))
}

/// 自上次读取以来的新日志（读取后即清空未读队列）
pub async fn get_new_logs(Extension(logger): Extension<Arc<ScrapingLogger>>) -> Json<Value> {
    let logs = logger.get_new_logs();
    Json(json!({ "count": logs.len(), "logs": logs }))
}

pub async fn clear_logs(Extension(logger): Extension<Arc<ScrapingLogger>>) -> Json<Value> {
    logger.clear_logs();
    Json(json!({ "status": "success", "message": "Logs cleared" }))
}

/// 以纯文本附件下载日志
pub async fn download_logs(
    Extension(logger): Extension<Arc<ScrapingLogger>>,
) -> impl IntoResponse {
    let filename = format!(
        "scraping_logs_{}.txt",
        Local::now().format("%Y%m%d_%H%M%S")
    );
    (
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        logger.export_to_text(),
    )
}
