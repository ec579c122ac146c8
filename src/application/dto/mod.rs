// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 数据传输对象模块
///
/// 定义 API 请求与响应体，并负责转换为领域模型
pub mod library_request;
pub mod scrape_request;
