// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::Local;
use parking_lot::Mutex;
use std::collections::VecDeque;

use crate::domain::models::log_entry::{ExtraFields, LogEntry, LogLevel};

#[derive(Default)]
struct LogState {
    history: Vec<LogEntry>,
    pending: VecDeque<LogEntry>,
}

/// 抓取日志
///
/// 进程内共享（通过 `Arc`）的只追加日志，供状态轮询与实时查看使用。
/// 每条日志同时写入完整历史与"未读"队列，并同步输出到 `tracing`。
///
/// `get_new_logs` 假定只有一个消费者：多个调用方并发读取时，
/// 新日志会在它们之间任意分配，但 `get_logs` 总能看到全部日志。
#[derive(Default)]
pub struct ScrapingLogger {
    state: Mutex<LogState>,
}

impl ScrapingLogger {
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加一条日志
    ///
    /// # 参数
    ///
    /// * `level` - 日志级别
    /// * `message` - 日志内容
    /// * `extra` - 可选的附加字段
    pub fn log(&self, level: LogLevel, message: impl Into<String>, extra: Option<ExtraFields>) {
        let message = message.into();
        let extra = extra.unwrap_or_default();

        // timestamp is taken under the lock so history stays monotonic
        let entry = {
            let mut state = self.state.lock();
            let entry = LogEntry::new(level, message, extra);
            state.pending.push_back(entry.clone());
            state.history.push(entry.clone());
            entry
        };
        emit_console(&entry);
    }

    pub fn debug(&self, message: impl Into<String>) {
        self.log(LogLevel::Debug, message, None);
    }

    pub fn info(&self, message: impl Into<String>) {
        self.log(LogLevel::Info, message, None);
    }

    pub fn success(&self, message: impl Into<String>) {
        self.log(LogLevel::Success, message, None);
    }

    pub fn warning(&self, message: impl Into<String>) {
        self.log(LogLevel::Warning, message, None);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.log(LogLevel::Error, message, None);
    }

    pub fn debug_with(&self, message: impl Into<String>, extra: ExtraFields) {
        self.log(LogLevel::Debug, message, Some(extra));
    }

    pub fn info_with(&self, message: impl Into<String>, extra: ExtraFields) {
        self.log(LogLevel::Info, message, Some(extra));
    }

    pub fn success_with(&self, message: impl Into<String>, extra: ExtraFields) {
        self.log(LogLevel::Success, message, Some(extra));
    }

    pub fn warning_with(&self, message: impl Into<String>, extra: ExtraFields) {
        self.log(LogLevel::Warning, message, Some(extra));
    }

    pub fn error_with(&self, message: impl Into<String>, extra: ExtraFields) {
        self.log(LogLevel::Error, message, Some(extra));
    }

    /// 返回完整历史的快照
    pub fn get_logs(&self) -> Vec<LogEntry> {
        self.state.lock().history.clone()
    }

    /// 取出自上次读取以来新增的日志
    pub fn get_new_logs(&self) -> Vec<LogEntry> {
        self.state.lock().pending.drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.state.lock().history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 同时清空历史与未读队列
    pub fn clear_logs(&self) {
        let mut state = self.state.lock();
        state.history.clear();
        state.pending.clear();
    }

    pub fn format_for_display(entry: &LogEntry) -> String {
        entry.format_for_display()
    }

    /// 导出为带页眉页脚的文本报告
    pub fn export_to_text(&self) -> String {
        let rule = "=".repeat(80);
        let state = self.state.lock();

        let mut lines = Vec::with_capacity(state.history.len() + 11);
        lines.push(rule.clone());
        lines.push("IMAGE SCRAPER - SESSION LOGS".to_string());
        lines.push(rule.clone());
        lines.push(format!(
            "Generated: {}",
            Local::now().format("%Y-%m-%d %H:%M:%S")
        ));
        lines.push(format!("Total Log Entries: {}", state.history.len()));
        lines.push(rule.clone());
        lines.push(String::new());

        lines.extend(state.history.iter().map(LogEntry::format_for_display));

        lines.push(String::new());
        lines.push(rule.clone());
        lines.push("END OF LOGS".to_string());
        lines.push(rule);

        lines.join("\n")
    }
}

fn emit_console(entry: &LogEntry) {
    let message = entry.message.as_str();
    match entry.level {
        LogLevel::Debug => tracing::debug!(target: "pixharvest::scrape", "{}", message),
        LogLevel::Info => tracing::info!(target: "pixharvest::scrape", "{}", message),
        LogLevel::Success => {
            tracing::info!(target: "pixharvest::scrape", level = "SUCCESS", "{}", message)
        }
        LogLevel::Warning => tracing::warn!(target: "pixharvest::scrape", "{}", message),
        LogLevel::Error => tracing::error!(target: "pixharvest::scrape", "{}", message),
    }
}
