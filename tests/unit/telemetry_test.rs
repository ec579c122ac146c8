// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use pixharvest::infrastructure::observability::scraping_logger::ScrapingLogger;
use pixharvest::utils::telemetry;

#[test]
fn test_telemetry_initialization_is_idempotent() {
    telemetry::init_telemetry();
    telemetry::init_telemetry();

    // scrape log entries are mirrored to tracing once a subscriber exists
    let logger = ScrapingLogger::new();
    logger.info("telemetry smoke test");
    logger.success("mirrored with SUCCESS marker");

    assert_eq!(logger.len(), 2);
}
