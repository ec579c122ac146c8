// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 工作器模块
///
/// 抓取任务的编排与后台运行管理
pub mod run_manager;
pub mod scrape_worker;

pub use run_manager::{RunHandle, RunManager};
pub use scrape_worker::{ImageScraper, ProgressCallback};
