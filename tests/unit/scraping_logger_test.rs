// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use pixharvest::domain::models::log_entry::LogLevel;
use pixharvest::infrastructure::observability::scraping_logger::ScrapingLogger;
use std::collections::HashSet;
use std::sync::Arc;
use std::thread;

/// 写入方与单个轮询方并发时，轮询方拿到的日志不重不漏
#[test]
fn test_drained_entries_are_unique_and_complete() {
    let logger = Arc::new(ScrapingLogger::new());
    let writers: Vec<_> = (0..3)
        .map(|t| {
            let logger = logger.clone();
            thread::spawn(move || {
                for i in 0..100 {
                    logger.info(format!("w{}-{}", t, i));
                }
            })
        })
        .collect();

    let mut drained = Vec::new();
    while writers.iter().any(|w| !w.is_finished()) {
        drained.extend(logger.get_new_logs());
    }
    for writer in writers {
        writer.join().unwrap();
    }
    drained.extend(logger.get_new_logs());

    let unique: HashSet<&str> = drained.iter().map(|e| e.message.as_str()).collect();
    assert_eq!(drained.len(), 300);
    assert_eq!(unique.len(), 300);
    assert_eq!(logger.get_logs().len(), 300);
}

#[test]
fn test_export_reports_count_and_keeps_order() {
    let logger = ScrapingLogger::new();
    logger.info("Searching for images: cats");
    logger.warning("HTTP 404 while downloading image");
    logger.success("Download complete! 1 images saved to scraped_images/cats");

    let text = logger.export_to_text();
    let lines: Vec<&str> = text.lines().collect();

    assert!(lines.contains(&"Total Log Entries: 3"));
    let positions: Vec<usize> = ["[INFO]", "[WARNING]", "[SUCCESS]"]
        .iter()
        .map(|tag| lines.iter().position(|l| l.contains(tag)).unwrap())
        .collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]));
    assert_eq!(lines.iter().filter(|l| l.contains("END OF LOGS")).count(), 1);
}

#[test]
fn test_log_entries_serialize_with_uppercase_levels() {
    let logger = ScrapingLogger::new();
    logger.error("boom");

    let value = serde_json::to_value(logger.get_logs()).unwrap();
    assert_eq!(value[0]["level"], "ERROR");
    assert_eq!(value[0]["message"], "boom");
    assert_eq!(logger.get_logs()[0].level, LogLevel::Error);
}
