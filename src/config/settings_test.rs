// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::Settings;
use std::path::PathBuf;
use std::time::Duration;

#[test]
fn test_defaults_match_documented_values() {
    let settings = Settings::defaults().expect("defaults should deserialize");

    assert_eq!(settings.server.port, 5000);
    assert_eq!(settings.storage.root, PathBuf::from("scraped_images"));
    assert_eq!(settings.scraper.default_max_images, 20);
    assert_eq!(settings.scraper.min_image_bytes, 1024);
    assert_eq!(settings.scraper.download_delay(), Duration::from_millis(500));
    assert_eq!(settings.scraper.download_timeout(), Duration::from_secs(15));
    assert_eq!(settings.browser.max_scroll_attempts, 10);
    assert!(settings.browser.headless);
    assert!(settings.browser.remote_debugging_url.is_none());
    assert!(settings.browser.search_url_template.contains("{query}"));
    assert!(!settings.metrics.enabled);
}

#[test]
fn test_metrics_address_parses() {
    let settings = Settings::defaults().unwrap();
    let addr = settings.metrics.socket_addr().unwrap();
    assert_eq!(addr.port(), 9000);
}
