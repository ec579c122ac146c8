// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::http::StatusCode;
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::sync::Semaphore;
use wiremock::MockServer;

use super::helpers::{create_test_app, mount, noisy_png, wait_until_idle, write_image, StaticSource};

fn source(query: &str, urls: Vec<String>) -> StaticSource {
    let mut source = StaticSource::default();
    source.by_query.insert(query.to_string(), urls);
    source
}

#[tokio::test]
async fn test_scrape_run_is_visible_through_status_logs_and_library() {
    let images = MockServer::start().await;
    mount(&images, "/a.png", 200, "image/png", noisy_png()).await;
    mount(&images, "/b.png", 404, "text/plain", b"gone".to_vec()).await;
    let app = create_test_app(
        source(
            "cats",
            vec![
                format!("{}/a.png", images.uri()),
                format!("{}/b.png", images.uri()),
            ],
        ),
        None,
    );

    let response = app
        .server
        .post("/api/scrape")
        .json(&json!({ "keywords": "cats", "class_name": "cats", "max_images": 5 }))
        .await;
    response.assert_status(StatusCode::ACCEPTED);
    assert_eq!(response.json::<Value>()["status"], "success");

    wait_until_idle(&app.manager).await;

    let status = app.server.get("/api/scraping_status").await.json::<Value>();
    assert_eq!(status["is_running"], false);
    assert_eq!(status["progress"], "Completed! Downloaded 1 images.");

    let classes = app.server.get("/api/classes").await.json::<Value>();
    assert_eq!(classes["classes"][0]["name"], "cats");
    assert_eq!(classes["classes"][0]["image_count"], 1);
    assert_eq!(classes["total_images"], 1);

    let images = app
        .server
        .get("/api/classes/cats/images")
        .await
        .json::<Value>();
    assert_eq!(images["count"], 1);
    assert!(images["images"][0]["relative_path"]
        .as_str()
        .unwrap()
        .starts_with("cats/cats_"));

    let logs = app.server.get("/api/scraping_logs").await.json::<Value>();
    let total = logs["total_count"].as_u64().unwrap();
    assert!(total > 0);
    assert!(logs["logs"]
        .as_array()
        .unwrap()
        .iter()
        .any(|e| e["message"] == "HTTP 404 while downloading image"));

    let new_logs = app.server.get("/api/scraping_logs/new").await.json::<Value>();
    assert_eq!(new_logs["count"].as_u64().unwrap(), total);
    let again = app.server.get("/api/scraping_logs/new").await.json::<Value>();
    assert_eq!(again["count"], 0);

    let download = app.server.get("/api/scraping_logs/download").await;
    download.assert_status_ok();
    assert!(download
        .header("content-type")
        .to_str()
        .unwrap()
        .starts_with("text/plain"));
    assert!(download
        .header("content-disposition")
        .to_str()
        .unwrap()
        .starts_with("attachment"));
    assert!(download
        .text()
        .contains(&format!("Total Log Entries: {}", total)));

    app.server
        .post("/api/scraping_logs/clear")
        .await
        .assert_status_ok();
    let cleared = app.server.get("/api/scraping_logs").await.json::<Value>();
    assert_eq!(cleared["total_count"], 0);
}

#[tokio::test]
async fn test_scrape_rejects_missing_fields() {
    let app = create_test_app(StaticSource::default(), None);

    let response = app
        .server
        .post("/api/scrape")
        .json(&json!({ "keywords": "", "class_name": "cats" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["status"], "error");
    assert!(!app.manager.get_status().is_running);
}

#[tokio::test]
async fn test_second_scrape_while_running_returns_conflict() {
    let gate = Arc::new(Semaphore::new(0));
    let app = create_test_app(source("cats", Vec::new()), Some(gate.clone()));
    let body = json!({ "keywords": "cats", "class_name": "cats" });

    app.server
        .post("/api/scrape")
        .json(&body)
        .await
        .assert_status(StatusCode::ACCEPTED);

    let busy = app.server.post("/api/scrape").json(&body).await;
    busy.assert_status(StatusCode::CONFLICT);
    assert_eq!(
        busy.json::<Value>()["error"],
        "Scraping is already in progress. Please wait for it to complete."
    );
    app.server
        .post("/api/scraping_status/reset")
        .await
        .assert_status(StatusCode::CONFLICT);

    gate.add_permits(1);
    wait_until_idle(&app.manager).await;

    app.server
        .post("/api/scraping_status/reset")
        .await
        .assert_status_ok();
    let status = app.server.get("/api/scraping_status").await.json::<Value>();
    assert_eq!(status["progress"], "");
}

#[tokio::test]
async fn test_bulk_scrape_validates_and_starts() {
    let app = create_test_app(source("cats", Vec::new()), None);

    app.server
        .post("/api/bulk-scrape")
        .json(&json!({ "search_entries": [], "images_per_class": 5 }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    let started = app
        .server
        .post("/api/bulk-scrape")
        .json(&json!({
            "search_entries": [{ "keyword": "cats", "className": "animals" }],
            "images_per_class": 1000
        }))
        .await;
    started.assert_status(StatusCode::ACCEPTED);

    wait_until_idle(&app.manager).await;
    assert!(app.root.path().join("animals").is_dir());
}

#[tokio::test]
async fn test_folder_and_bulk_image_management() {
    let app = create_test_app(StaticSource::default(), None);
    let root = app.root.path();
    write_image(root, "cats", "cat_1.jpg");
    write_image(root, "cats", "cat_2.jpg");
    write_image(root, "dogs", "cat_1.jpg");

    app.server
        .post("/api/folders")
        .json(&json!({ "folder_name": "pets" }))
        .await
        .assert_status(StatusCode::CREATED);
    app.server
        .post("/api/folders")
        .json(&json!({ "folder_name": "pets" }))
        .await
        .assert_status(StatusCode::CONFLICT);
    app.server
        .post("/api/folders")
        .json(&json!({ "folder_name": "../outside" }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    let moved = app
        .server
        .post("/api/move-images")
        .json(&json!({
            "images": ["cats/cat_1.jpg", "dogs/cat_1.jpg", "cats/missing.jpg"],
            "destination_folder": "pets"
        }))
        .await
        .json::<Value>();
    assert_eq!(moved["processed"], 2);
    assert_eq!(moved["status"], "partial");
    assert!(root.join("pets/cat_1.jpg").exists());
    assert!(root.join("pets/cat_1_1.jpg").exists());

    app.server
        .post("/api/move-images")
        .json(&json!({ "images": ["cats/cat_2.jpg"], "destination_folder": "birds" }))
        .await
        .assert_status(StatusCode::NOT_FOUND);

    let deleted = app
        .server
        .post("/api/delete-images")
        .json(&json!({ "images": ["pets/cat_1.jpg", "pets/cat_1_1.jpg"] }))
        .await
        .json::<Value>();
    assert_eq!(deleted["processed"], 2);
    assert_eq!(deleted["status"], "success");

    app.server
        .delete("/api/classes/cats/images/cat_2.jpg")
        .await
        .assert_status_ok();
    app.server
        .delete("/api/classes/cats/images/cat_2.jpg")
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_tab_overrides_round_trip_through_api() {
    let app = create_test_app(StaticSource::default(), None);

    let empty = app.server.get("/api/tab-overrides").await.json::<Value>();
    assert_eq!(empty, json!({}));

    app.server
        .put("/api/tab-overrides/cats")
        .json(&json!({ "tab": "favourites", "action": "add" }))
        .await
        .assert_status_ok();
    app.server
        .put("/api/tab-overrides/cats")
        .json(&json!({ "tab": "archive", "action": "remove" }))
        .await
        .assert_status_ok();

    let overrides = app.server.get("/api/tab-overrides").await.json::<Value>();
    assert_eq!(overrides["cats"]["added_to"], json!(["favourites"]));
    assert_eq!(overrides["cats"]["removed_from"], json!(["archive"]));
    assert!(app.root.path().join(".tab_overrides.json").exists());
}
