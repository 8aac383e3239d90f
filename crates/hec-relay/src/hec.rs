// Copyright 2025-Present hec-relay contributors
// SPDX-License-Identifier: Apache-2.0

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::debug;

use crate::config::Config;

/// Top-level key carrying the substantive alert content in an Alertmanager-style webhook payload.
const ALERTS_KEY: &str = "Alerts";
/// Top-level key carrying the URL of the upstream alerting system.
const EXTERNAL_URL_KEY: &str = "externalURL";

/// A Splunk HTTP Event Collector event envelope.
///
/// Metadata fields are omitted from the serialized form when unset; `event` is always present.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HecMessage {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sourcetype: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<String>,
    pub event: Value,
}

impl HecMessage {
    /// Builds the envelope for a raw inbound body.
    ///
    /// A body that decodes as a JSON object contributes `host`/`source` (derived from its
    /// `externalURL` key) and its `Alerts` value as the event; an object without an `Alerts` key
    /// is forwarded whole. Anything that does not decode as a JSON object is forwarded as an
    /// opaque string. Exactly one of {decoded object, raw string} becomes the basis for `event`.
    pub fn from_body(config: &Config, body: &[u8]) -> HecMessage {
        debug!("Building HEC message from body: {:?}", body);

        let (host, source, event) = match serde_json::from_slice::<Map<String, Value>>(body) {
            Ok(mut data) => {
                let (host, source) = data
                    .get(EXTERNAL_URL_KEY)
                    .and_then(Value::as_str)
                    .map(derive_origin)
                    .unwrap_or_default();
                // A missing Alerts key falls back to the whole decoded object.
                let event = match data.remove(ALERTS_KEY) {
                    Some(alerts) => alerts,
                    None => Value::Object(data),
                };
                (host, source, event)
            }
            // if the body is not a valid json object we forward it as a string
            Err(_) => (
                None,
                None,
                Value::String(String::from_utf8_lossy(body).into_owned()),
            ),
        };

        debug!("Derived event: {:?}", event);

        HecMessage {
            time: None,
            host,
            source,
            sourcetype: non_empty(&config.hec_sourcetype),
            index: non_empty(&config.hec_index),
            event,
        }
    }
}

/// Derives the envelope's `host` and `source` from the payload's `externalURL` value: the URL's
/// host, and its path with leading slashes stripped. An unparseable URL or empty components
/// yield `None` rather than an error.
fn derive_origin(external_url: &str) -> (Option<String>, Option<String>) {
    let url = match reqwest::Url::parse(external_url) {
        Ok(url) => url,
        Err(_) => return (None, None),
    };
    let host = url.host_str().map(str::to_owned);
    let source = non_empty(url.path().trim_start_matches('/'));
    (host, source)
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};

    use super::{derive_origin, HecMessage};
    use crate::config::Config;

    fn test_config(sourcetype: &str, index: &str) -> Config {
        Config {
            listening_address: "127.0.0.1".parse().unwrap(),
            listening_port: 8080,
            hec_url: reqwest::Url::parse("http://127.0.0.1:8088/services/collector").unwrap(),
            hec_token: "_not_a_real_token_".to_string(),
            hec_sourcetype: sourcetype.to_string(),
            hec_index: index.to_string(),
            max_request_content_length: 10 * 1024 * 1024,
            forward_timeout_secs: 30,
            proxy_url: None,
        }
    }

    #[test]
    fn test_alerts_value_becomes_event() {
        let config = test_config("alertmanager", "alerts");
        let body = json!({
            "externalURL": "https://example.com/foo/bar",
            "Alerts": {"status": "firing", "labels": {"severity": "page"}},
        })
        .to_string();

        let message = HecMessage::from_body(&config, body.as_bytes());
        assert_eq!(
            message.event,
            json!({"status": "firing", "labels": {"severity": "page"}})
        );
        assert_eq!(message.host.as_deref(), Some("example.com"));
        assert_eq!(message.source.as_deref(), Some("foo/bar"));
        assert_eq!(message.sourcetype.as_deref(), Some("alertmanager"));
        assert_eq!(message.index.as_deref(), Some("alerts"));
        assert_eq!(message.time, None);
    }

    #[test]
    fn test_missing_alerts_key_forwards_whole_object() {
        let config = test_config("alertmanager", "alerts");
        let body = json!({"status": "firing", "receiver": "splunk"}).to_string();

        let message = HecMessage::from_body(&config, body.as_bytes());
        assert_eq!(message.event, json!({"status": "firing", "receiver": "splunk"}));
        assert_eq!(message.host, None);
        assert_eq!(message.source, None);
    }

    #[test]
    fn test_non_json_body_becomes_string_event() {
        let config = test_config("alertmanager", "alerts");
        let body = b"not json at all";

        let message = HecMessage::from_body(&config, body);
        assert_eq!(message.event, Value::String("not json at all".to_string()));
        assert_eq!(message.host, None);
        assert_eq!(message.source, None);
    }

    #[test]
    fn test_non_object_json_becomes_string_event() {
        let config = test_config("alertmanager", "alerts");
        let body = b"[1, 2, 3]";

        let message = HecMessage::from_body(&config, body);
        assert_eq!(message.event, Value::String("[1, 2, 3]".to_string()));
    }

    #[test]
    fn test_unparseable_external_url_leaves_origin_empty() {
        let config = test_config("alertmanager", "alerts");
        let body = json!({
            "externalURL": "::not a url::",
            "Alerts": {"status": "resolved"},
        })
        .to_string();

        let message = HecMessage::from_body(&config, body.as_bytes());
        assert_eq!(message.host, None);
        assert_eq!(message.source, None);
        assert_eq!(message.event, json!({"status": "resolved"}));
    }

    #[test]
    fn test_non_string_external_url_is_ignored() {
        let config = test_config("alertmanager", "alerts");
        let body = json!({"externalURL": 42, "Alerts": {}}).to_string();

        let message = HecMessage::from_body(&config, body.as_bytes());
        assert_eq!(message.host, None);
        assert_eq!(message.source, None);
    }

    #[test]
    fn test_empty_metadata_fields_are_omitted_when_serialized() {
        let config = test_config("", "");
        let body = json!({"Alerts": {"status": "firing"}}).to_string();

        let message = HecMessage::from_body(&config, body.as_bytes());
        let serialized = serde_json::to_value(&message).unwrap();
        let object = serialized.as_object().unwrap();
        assert!(!object.contains_key("time"));
        assert!(!object.contains_key("host"));
        assert!(!object.contains_key("source"));
        assert!(!object.contains_key("sourcetype"));
        assert!(!object.contains_key("index"));
        assert_eq!(object["event"], json!({"status": "firing"}));
    }

    #[test]
    fn test_derive_origin_strips_leading_slashes_only() {
        let (host, source) = derive_origin("https://example.com/foo/bar");
        assert_eq!(host.as_deref(), Some("example.com"));
        assert_eq!(source.as_deref(), Some("foo/bar"));
    }

    #[test]
    fn test_derive_origin_empty_path() {
        let (host, source) = derive_origin("https://example.com");
        assert_eq!(host.as_deref(), Some("example.com"));
        assert_eq!(source, None);
    }
}
