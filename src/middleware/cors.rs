// ABOUTME: CORS middleware configuration for the chat API
// ABOUTME: Builds the tower-http CorsLayer from the configured allowed origins
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use http::{header::HeaderName, HeaderValue, Method};
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::config::HttpConfig;

/// Configure CORS from `CORS_ALLOWED_ORIGINS`
///
/// `*` (the default) allows any origin. Otherwise only the listed origins are
/// allowed; if none of them parse as header values, any origin is allowed.
///
/// ```bash
/// # Browser UI served from another port during development
/// export CORS_ALLOWED_ORIGINS="http://localhost:3000"
/// ```
#[must_use]
pub fn setup_cors(config: &HttpConfig) -> CorsLayer {
    let wildcard = config.cors_allowed_origins.is_empty()
        || config.cors_allowed_origins.iter().any(|origin| origin == "*");

    let allow_origin = if wildcard {
        AllowOrigin::any()
    } else {
        let origins: Vec<HeaderValue> = config
            .cors_allowed_origins
            .iter()
            .filter_map(|origin| HeaderValue::from_str(origin.trim()).ok())
            .collect();

        if origins.is_empty() {
            AllowOrigin::any()
        } else {
            AllowOrigin::list(origins)
        }
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_headers([
            HeaderName::from_static("content-type"),
            HeaderName::from_static("accept"),
            HeaderName::from_static("origin"),
            HeaderName::from_static("x-requested-with"),
            HeaderName::from_static("x-request-id"),
        ])
        .expose_headers([HeaderName::from_static("x-request-id")])
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
}
