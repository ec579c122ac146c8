// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 应用程序模块
///
/// 定义 API 请求与响应的数据传输对象
pub mod application;

/// 配置模块
///
/// 处理应用程序的配置设置和环境变量
pub mod config;

/// 领域模块
///
/// 包含日志条目与抓取任务的核心数据结构
pub mod domain;

/// 引擎模块
///
/// 浏览器驱动的搜索结果提取、URL 分类与图片下载
pub mod engines;

/// 基础设施模块
///
/// 提供抓取日志、指标与本地图片库
pub mod infrastructure;

/// 表示层模块
///
/// 处理HTTP请求和响应，包括路由和处理器
pub mod presentation;

/// 工具模块
///
/// 提供通用的工具函数和辅助功能
pub mod utils;

/// 工作器模块
///
/// 抓取任务编排与后台运行管理
pub mod workers;
