// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{
    routing::{delete, get, post, put},
    Extension, Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::config::settings::Settings;
use crate::presentation::handlers::{library_handler, log_handler, scrape_handler};
use crate::workers::run_manager::RunManager;

/// 创建应用路由
///
/// # 返回值
///
/// 返回未注入共享状态的路由，状态由 [`app`] 通过 `Extension` 注入
pub fn routes() -> Router {
    let public_routes = Router::new()
        .route("/health", get(health_check))
        .route("/version", get(version));

    let scrape_routes = Router::new()
        .route("/api/scrape", post(scrape_handler::start_scrape))
        .route("/api/bulk-scrape", post(scrape_handler::start_bulk_scrape))
        .route("/api/scraping_status", get(scrape_handler::get_status))
        .route(
            "/api/scraping_status/reset",
            post(scrape_handler::reset_status),
        )
        .route("/api/scraping_logs", get(log_handler::get_logs))
        .route("/api/scraping_logs/new", get(log_handler::get_new_logs))
        .route("/api/scraping_logs/clear", post(log_handler::clear_logs))
        .route(
            "/api/scraping_logs/download",
            get(log_handler::download_logs),
        );

    let library_routes = Router::new()
        .route("/api/classes", get(library_handler::list_classes))
        .route(
            "/api/classes/{class_name}/images",
            get(library_handler::list_class_images),
        )
        .route(
            "/api/classes/{class_name}/images/{filename}",
            delete(library_handler::delete_image),
        )
        .route("/api/folders", post(library_handler::create_folder))
        .route("/api/move-images", post(library_handler::move_images))
        .route("/api/delete-images", post(library_handler::delete_images))
        .route(
            "/api/tab-overrides",
            get(library_handler::get_tab_overrides),
        )
        .route(
            "/api/tab-overrides/{name}",
            put(library_handler::update_tab_override),
        );

    Router::new()
        .merge(public_routes)
        .merge(scrape_routes)
        .merge(library_routes)
}

/// 组装完整应用：路由、共享状态与请求追踪
pub fn app(settings: Arc<Settings>, manager: Arc<RunManager>) -> Router {
    let logger = manager.logger().clone();
    routes()
        .layer(Extension(settings))
        .layer(Extension(manager))
        .layer(Extension(logger))
        .layer(TraceLayer::new_for_http())
}

/// 健康检查端点
///
/// # 返回值
///
/// 返回"OK"字符串
pub async fn health_check() -> &'static str {
    "OK"
}

/// 版本信息端点
///
/// # 返回值
///
/// 返回应用版本号
pub async fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
