// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use pixharvest::engines::url_classifier::is_valid_image_url;

#[test]
fn test_accepts_thumbnail_and_direct_image_urls() {
    assert!(is_valid_image_url(
        "https://encrypted-tbn0.gstatic.com/images?q=test"
    ));
    assert!(is_valid_image_url("https://upload.wikimedia.org/image.png"));
    assert!(is_valid_image_url("https://example.com/photos/cat.jpg"));
}

#[test]
fn test_rejects_empty_malformed_and_branding_urls() {
    assert!(!is_valid_image_url(""));
    assert!(!is_valid_image_url("not_a_url"));
    assert!(!is_valid_image_url(
        "https://google.com/images/branding/logo.png"
    ));
    assert!(!is_valid_image_url("https://www.google.com/favicon.ico"));
    assert!(!is_valid_image_url("ftp://example.com/cat.jpg"));
}
