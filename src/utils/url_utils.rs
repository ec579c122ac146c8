// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use sha2::{Digest, Sha256};
use url::{ParseError, Url};

/// 将可能为相对路径的URL转换为绝对路径URL
pub fn resolve_url(base_url: &Url, path: &str) -> Result<Url, ParseError> {
    base_url.join(path)
}

/// URL 的短哈希（SHA-256 前 8 位十六进制），用于生成图片文件名
pub fn short_hash(url: &str) -> String {
    let digest = Sha256::digest(url.as_bytes());
    hex::encode(digest)[..8].to_string()
}

/// 截断 URL 便于写入日志
pub fn url_prefix(url: &str, max_chars: usize) -> String {
    if url.chars().count() <= max_chars {
        return url.to_string();
    }
    let truncated: String = url.chars().take(max_chars).collect();
    format!("{}...", truncated)
}

/// 用 URL 编码后的关键词填充搜索 URL 模板
pub fn build_search_url(template: &str, query: &str) -> String {
    template.replace("{query}", &urlencoding::encode(query))
}
