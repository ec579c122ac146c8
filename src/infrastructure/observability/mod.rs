// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 可观测性模块
///
/// 提供抓取日志与指标收集功能
pub mod metrics;
pub mod scraping_logger;
