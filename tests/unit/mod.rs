// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

mod scraping_logger_test;
mod telemetry_test;
mod url_classifier_test;
