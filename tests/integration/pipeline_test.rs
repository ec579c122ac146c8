// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use pixharvest::domain::models::log_entry::LogLevel;
use pixharvest::domain::models::scrape::{BatchEntry, RunOutcome, ScrapeRequest};
use pixharvest::infrastructure::storage;
use tempfile::TempDir;
use wiremock::MockServer;

use super::helpers::{manager_with, mount, noisy_png, test_settings, StaticSource};

/// 一次运行中混合成功与各类失败的候选 URL
#[tokio::test]
async fn test_single_run_keeps_only_valid_images() {
    let images = MockServer::start().await;
    mount(&images, "/good.png", 200, "image/png", noisy_png()).await;
    mount(&images, "/page.html", 200, "text/html", b"<html></html>".repeat(200)).await;
    mount(&images, "/gone.jpg", 404, "text/plain", Vec::new()).await;
    mount(&images, "/corrupt.jpg", 200, "image/jpeg", vec![0xAB; 4096]).await;

    let root = TempDir::new().unwrap();
    let settings = test_settings(root.path());
    let mut source = StaticSource::default();
    source.by_query.insert(
        "red fox".to_string(),
        ["/good.png", "/page.html", "/gone.jpg", "/corrupt.jpg"]
            .iter()
            .map(|p| format!("{}{}", images.uri(), p))
            .collect(),
    );
    let manager = manager_with(settings, source, None);

    let request = ScrapeRequest {
        query: "red fox".to_string(),
        destination: root.path().to_path_buf(),
        class_name: "foxes".to_string(),
        max_images: 10,
    };
    let outcome = manager.start_run(request, None).unwrap().wait().await.unwrap();

    let result = match outcome {
        RunOutcome::Single(result) => result,
        other => panic!("unexpected outcome: {:?}", other),
    };
    assert_eq!(result.candidates, 4);
    assert_eq!(result.downloaded, 1);
    assert_eq!(result.failed, 3);

    let folder = root.path().join("foxes");
    let files: Vec<_> = std::fs::read_dir(&folder).unwrap().collect();
    assert_eq!(files.len(), 1);
    let saved = storage::list_images(&folder).await.unwrap();
    assert!(storage::validate_image(&folder.join(&saved[0])));

    let warnings = manager
        .logger()
        .get_logs()
        .into_iter()
        .filter(|e| e.level == LogLevel::Warning)
        .count();
    assert_eq!(warnings, 3);
}

#[tokio::test]
async fn test_batch_run_continues_after_failed_entry() {
    let images = MockServer::start().await;
    mount(&images, "/one.png", 200, "image/png", noisy_png()).await;
    mount(&images, "/two.png", 200, "image/png", noisy_png()).await;

    let root = TempDir::new().unwrap();
    let settings = test_settings(root.path());
    let mut source = StaticSource::default();
    source
        .by_query
        .insert("cats".to_string(), vec![format!("{}/one.png", images.uri())]);
    source
        .by_query
        .insert("birds".to_string(), vec![format!("{}/two.png", images.uri())]);
    // "dogs" has no results page, so the second entry fails
    let manager = manager_with(settings, source, None);

    let entries = vec![
        BatchEntry::new("cats", "cats"),
        BatchEntry::new("dogs", "dogs"),
        BatchEntry::new("birds", "birds"),
    ];
    let outcome = manager
        .start_batch(entries, 5, None, None)
        .unwrap()
        .wait()
        .await
        .unwrap();

    let summary = match outcome {
        RunOutcome::Batch(summary) => summary,
        other => panic!("unexpected outcome: {:?}", other),
    };
    assert_eq!(summary.total_downloaded, 2);
    assert_eq!(summary.failed_entries(), 1);
    assert_eq!(storage::count_images(&root.path().join("cats")).await.unwrap(), 1);
    assert_eq!(storage::count_images(&root.path().join("birds")).await.unwrap(), 1);

    let errors: Vec<String> = manager
        .logger()
        .get_logs()
        .into_iter()
        .filter(|e| e.level == LogLevel::Error)
        .map(|e| e.message)
        .collect();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("entry 2"));
    assert_eq!(
        manager.get_status().progress,
        "Completed! Downloaded 2 images."
    );
}
