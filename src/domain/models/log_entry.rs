// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::Local;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// 日志条目的附加字段
pub type ExtraFields = BTreeMap<String, serde_json::Value>;

/// 由键值对构建附加字段
pub fn extra_fields<'a, I>(pairs: I) -> ExtraFields
where
    I: IntoIterator<Item = (&'a str, serde_json::Value)>,
{
    pairs
        .into_iter()
        .map(|(key, value)| (key.to_string(), value))
        .collect()
}

/// 日志级别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    Debug,
    Info,
    Success,
    Warning,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Success => "SUCCESS",
            LogLevel::Warning => "WARNING",
            LogLevel::Error => "ERROR",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "DEBUG" => Ok(LogLevel::Debug),
            "INFO" => Ok(LogLevel::Info),
            "SUCCESS" => Ok(LogLevel::Success),
            "WARNING" | "WARN" => Ok(LogLevel::Warning),
            "ERROR" => Ok(LogLevel::Error),
            other => Err(format!("unknown log level: {}", other)),
        }
    }
}

/// 抓取日志条目
///
/// 创建后不可变，时间戳精确到毫秒
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    /// 本地时间，格式 `YYYY-mm-dd HH:MM:SS.fff`
    pub timestamp: String,
    pub level: LogLevel,
    pub message: String,
    #[serde(default)]
    pub extra_data: ExtraFields,
}

impl LogEntry {
    pub fn new(level: LogLevel, message: impl Into<String>, extra_data: ExtraFields) -> Self {
        Self {
            timestamp: Local::now().format("%Y-%m-%d %H:%M:%S%.3f").to_string(),
            level,
            message: message.into(),
            extra_data,
        }
    }

    /// 渲染为 `<timestamp> [<LEVEL>] <message> [<key=value, ...>]`
    pub fn format_for_display(&self) -> String {
        let mut line = format!("{} [{}] {}", self.timestamp, self.level, self.message);
        if !self.extra_data.is_empty() {
            let parts: Vec<String> = self
                .extra_data
                .iter()
                .map(|(key, value)| match value {
                    serde_json::Value::String(s) => format!("{}={}", key, s),
                    other => format!("{}={}", key, other),
                })
                .collect();
            line.push_str(&format!(" [{}]", parts.join(", ")));
        }
        line
    }
}
