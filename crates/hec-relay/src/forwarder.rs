// Copyright 2025-Present hec-relay contributors
// SPDX-License-Identifier: Apache-2.0

use core::time::Duration;
use std::sync::Arc;

use hyper::{header, http, Response, StatusCode};
use tracing::{debug, error};

use crate::config::Config;
use crate::http_utils::{build_client, log_and_create_http_response, Body, HttpResponse};

/// Forwards serialized HEC envelopes to the configured Splunk HEC endpoint and relays the
/// downstream response back to the caller. Fire-and-forget per request: no retries, no
/// buffering; every outcome resolves within the inbound request cycle.
pub struct Forwarder {
    config: Arc<Config>,
    client: reqwest::Client,
}

impl Forwarder {
    pub fn new(config: Arc<Config>) -> Self {
        let client = build_client(
            config.proxy_url.as_deref(),
            Duration::from_secs(config.forward_timeout_secs),
        )
        .unwrap_or_else(|e| {
            error!(
                "Unable to parse proxy configuration: {}, no proxy will be used",
                e
            );
            reqwest::Client::new()
        });
        Forwarder { config, client }
    }

    /// Sends the payload and maps the outcome to the caller-visible response:
    /// - a downstream response is relayed verbatim, status and body, 2xx or not;
    /// - a transport error that still carries a response status relays that status;
    /// - a transport error with no response at all yields 503 with a diagnostic body.
    pub async fn forward(&self, payload: Vec<u8>) -> http::Result<HttpResponse> {
        let request = self
            .client
            .post(self.config.hec_url.clone())
            .header(
                header::AUTHORIZATION,
                format!("Splunk {}", self.config.hec_token),
            )
            .header(header::CONNECTION, "close")
            .header(header::CONTENT_TYPE, "application/json")
            .body(payload);

        match request.send().await {
            Ok(response) => {
                let status = response.status();
                match response.bytes().await {
                    Ok(body) => {
                        debug!("Relaying HEC response with status {status}");
                        Response::builder().status(status).body(Body::from(body))
                    }
                    Err(e) => log_and_create_http_response(
                        &format!("Error reading response body from the HEC endpoint: {e}"),
                        StatusCode::SERVICE_UNAVAILABLE,
                    ),
                }
            }
            Err(e) => match e.status() {
                Some(status) => log_and_create_http_response(
                    &format!("Request to the HEC endpoint failed: {e}"),
                    status,
                ),
                None => log_and_create_http_response(
                    &format!("Error sending event to the HEC endpoint: {e}"),
                    StatusCode::SERVICE_UNAVAILABLE,
                ),
            },
        }
    }
}
