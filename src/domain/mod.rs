// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域层模块
///
/// 该模块包含系统的核心数据结构：
/// - 日志条目（log_entry）：抓取过程中产生的结构化事件
/// - 抓取模型（scrape）：请求、结果与运行状态
///
/// 领域层不依赖于浏览器、HTTP 客户端或文件系统实现。
pub mod models;
