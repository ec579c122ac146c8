// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use pixharvest::config::settings::Settings;
use pixharvest::infrastructure::observability::metrics;
use pixharvest::infrastructure::observability::scraping_logger::ScrapingLogger;
use pixharvest::presentation::routes;
use pixharvest::utils::telemetry;
use pixharvest::workers::run_manager::RunManager;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

/// 主函数
///
/// 应用程序入口点，负责初始化所有组件并启动服务
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize logging
    telemetry::init_telemetry();
    info!("Starting pixharvest...");

    // 2. Load configuration
    let settings = Arc::new(Settings::new()?);
    info!("Configuration loaded");

    // Initialize Prometheus Metrics
    metrics::init_metrics(&settings.metrics);

    // 3. Prepare the image library root
    tokio::fs::create_dir_all(&settings.storage.root).await?;
    info!("Image library at {}", settings.storage.root.display());

    // 4. Shared scrape log and run manager
    let logger = Arc::new(ScrapingLogger::new());
    let manager = Arc::new(RunManager::new(settings.clone(), logger));

    let app = routes::app(settings.clone(), manager);

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
