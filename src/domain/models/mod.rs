// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域模型模块
///
/// - 日志条目（log_entry）：带级别和附加字段的不可变日志
/// - 抓取模型（scrape）：抓取请求、批量记录、结果与运行状态
pub mod log_entry;
pub mod scrape;
