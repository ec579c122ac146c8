// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// 初始化控制台日志
///
/// 日志级别可通过 `RUST_LOG` 覆盖。重复调用时保留第一次安装的订阅者。
pub fn init_telemetry() {
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,pixharvest=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}
