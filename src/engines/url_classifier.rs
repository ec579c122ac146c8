// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use url::Url;

/// 品牌素材、图标与内联 SVG
const DENY_SUBSTRINGS: &[&str] = &[
    "/images/branding/",
    "googlelogo",
    "favicon",
    "logo.png",
    "/icons/",
    "icon.png",
    "data:image/svg",
    "image/svg+xml",
];

const IMAGE_EXTENSIONS: &[&str] = &[".jpg", ".jpeg", ".png", ".gif", ".webp", ".bmp"];

/// 已知的缩略图 CDN 与媒体路径片段
const ALLOW_SUBSTRINGS: &[&str] = &[
    "encrypted-tbn",
    "gstatic.com/images",
    "googleusercontent",
    "wikimedia",
    "/thumb",
    "/media/",
    "images?q=",
    "imgurl",
    "cdn",
];

/// 超过该长度的 URL 直接放行（动态生成的缩略图地址）
const LONG_URL_THRESHOLD: usize = 50;

/// 判断 URL 是否像一张真实图片
///
/// 这是宽松的第一道过滤：误判的 URL 会在下载时因 Content-Type 或解码校验被剔除
pub fn is_valid_image_url(url: &str) -> bool {
    if url.is_empty() {
        return false;
    }

    match Url::parse(url) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => {}
        _ => return false,
    }

    let lower = url.to_ascii_lowercase();
    if DENY_SUBSTRINGS.iter().any(|s| lower.contains(s)) {
        return false;
    }

    if IMAGE_EXTENSIONS.iter().any(|ext| lower.contains(ext)) {
        return true;
    }

    if ALLOW_SUBSTRINGS.iter().any(|s| lower.contains(s)) {
        return true;
    }

    url.len() > LONG_URL_THRESHOLD
}
