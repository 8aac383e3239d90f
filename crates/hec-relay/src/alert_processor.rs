// Copyright 2025-Present hec-relay contributors
// SPDX-License-Identifier: Apache-2.0

use std::sync::Arc;

use async_trait::async_trait;
use http_body_util::BodyExt;
use hyper::{http, StatusCode};
use tracing::debug;

use crate::config::Config;
use crate::forwarder::Forwarder;
use crate::hec::HecMessage;
use crate::http_utils::{
    log_and_create_http_response, verify_request_content_length, HttpRequest, HttpResponse,
};

#[async_trait]
pub trait AlertProcessor {
    /// Reshapes an inbound webhook request into a HEC envelope, forwards it, and returns the
    /// relayed downstream response.
    async fn process_alert(
        &self,
        config: Arc<Config>,
        req: HttpRequest,
    ) -> http::Result<HttpResponse>;
}

pub struct RelayAlertProcessor {
    forwarder: Forwarder,
}

impl RelayAlertProcessor {
    pub fn new(forwarder: Forwarder) -> Self {
        RelayAlertProcessor { forwarder }
    }
}

#[async_trait]
impl AlertProcessor for RelayAlertProcessor {
    async fn process_alert(
        &self,
        config: Arc<Config>,
        req: HttpRequest,
    ) -> http::Result<HttpResponse> {
        debug!("Received alert webhook request");
        let (parts, body) = req.into_parts();

        if let Some(response) = verify_request_content_length(
            &parts.headers,
            config.max_request_content_length,
            "Error processing alert",
        ) {
            return response;
        }

        let body_bytes = match body.collect().await {
            Ok(collected) => collected.to_bytes(),
            Err(e) => {
                return log_and_create_http_response(
                    &format!("Error reading alert request body: {e}"),
                    StatusCode::BAD_REQUEST,
                );
            }
        };

        let message = HecMessage::from_body(&config, &body_bytes);

        let payload = match serde_json::to_vec(&message) {
            Ok(payload) => payload,
            Err(e) => {
                return log_and_create_http_response(
                    &format!("Error serializing HEC message: {e}"),
                    StatusCode::INTERNAL_SERVER_ERROR,
                );
            }
        };

        self.forwarder.forward(payload).await
    }
}
