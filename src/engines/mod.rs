// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

pub mod browser;
pub mod image_fetcher;
pub mod search_extractor;
pub mod traits;
pub mod url_classifier;
