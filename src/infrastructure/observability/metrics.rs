// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use metrics_exporter_prometheus::PrometheusBuilder;
use tracing::{info, warn};

use crate::config::settings::MetricsSettings;

pub const IMAGES_DOWNLOADED: &str = "pixharvest_images_downloaded_total";
pub const IMAGES_FAILED: &str = "pixharvest_images_failed_total";
pub const RUNS_STARTED: &str = "pixharvest_runs_total";

/// 安装 Prometheus 导出器
///
/// 未启用或地址无效时只记录日志；未安装导出器时计数器调用为空操作
pub fn init_metrics(settings: &MetricsSettings) {
    if !settings.enabled {
        return;
    }

    let addr = match settings.socket_addr() {
        Ok(addr) => addr,
        Err(e) => {
            warn!("Invalid metrics address {}: {}", settings.listen_address, e);
            return;
        }
    };

    // Ignore error if address is already in use (for development/testing)
    if let Err(e) = PrometheusBuilder::new().with_http_listener(addr).install() {
        warn!("Failed to install Prometheus recorder: {}", e);
        return;
    }

    info!("Metrics exporter listening on {}", addr);
}

pub fn record_download(success: bool) {
    if success {
        metrics::counter!(IMAGES_DOWNLOADED).increment(1);
    } else {
        metrics::counter!(IMAGES_FAILED).increment(1);
    }
}

pub fn record_run(kind: &'static str) {
    metrics::counter!(RUNS_STARTED, "kind" => kind).increment(1);
}
