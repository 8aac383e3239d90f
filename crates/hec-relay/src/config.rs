// Copyright 2025-Present hec-relay contributors
// SPDX-License-Identifier: Apache-2.0

use std::env;
use std::net::IpAddr;

const DEFAULT_LISTENING_ADDRESS: &str = "0.0.0.0";
const DEFAULT_LISTENING_PORT: u16 = 8080;
const DEFAULT_MAX_CONTENT_LENGTH: usize = 10 * 1024 * 1024; // 10MB in Bytes
const DEFAULT_FORWARD_TIMEOUT_SECS: u64 = 30;

#[derive(Debug)]
pub struct Config {
    pub listening_address: IpAddr,
    pub listening_port: u16,
    /// Splunk HTTP Event Collector endpoint events are forwarded to
    pub hec_url: reqwest::Url,
    pub hec_token: String,
    /// sourcetype stamped on every forwarded event; omitted from the envelope when empty
    pub hec_sourcetype: String,
    /// index stamped on every forwarded event; omitted from the envelope when empty
    pub hec_index: String,
    pub max_request_content_length: usize,
    /// timeout for each forwarded request, in seconds
    pub forward_timeout_secs: u64,
    pub proxy_url: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Config, Box<dyn std::error::Error>> {
        let hec_url = env::var("SPLUNK_HEC_URL")
            .map_err(|_| anyhow::anyhow!("SPLUNK_HEC_URL environment variable is not set"))?;
        let hec_url = reqwest::Url::parse(&hec_url)
            .map_err(|err| anyhow::anyhow!("SPLUNK_HEC_URL is not a valid URL: {err}"))?;

        let hec_token = env::var("SPLUNK_HEC_TOKEN")
            .map_err(|_| anyhow::anyhow!("SPLUNK_HEC_TOKEN environment variable is not set"))?;

        let listening_address: IpAddr = env::var("RELAY_LISTENING_ADDRESS")
            .unwrap_or_else(|_| DEFAULT_LISTENING_ADDRESS.to_string())
            .parse()
            .map_err(|err| {
                anyhow::anyhow!("RELAY_LISTENING_ADDRESS is not a valid IP address: {err}")
            })?;

        let listening_port: u16 = env::var("RELAY_LISTENING_PORT")
            .ok()
            .and_then(|port| port.parse::<u16>().ok())
            .unwrap_or(DEFAULT_LISTENING_PORT);

        let max_request_content_length: usize = env::var("RELAY_MAX_CONTENT_LENGTH")
            .ok()
            .and_then(|len| len.parse::<usize>().ok())
            .unwrap_or(DEFAULT_MAX_CONTENT_LENGTH);

        let forward_timeout_secs: u64 = env::var("RELAY_FORWARD_TIMEOUT_SECS")
            .ok()
            .and_then(|secs| secs.parse::<u64>().ok())
            .unwrap_or(DEFAULT_FORWARD_TIMEOUT_SECS);

        Ok(Config {
            listening_address,
            listening_port,
            hec_url,
            hec_token,
            hec_sourcetype: env::var("SPLUNK_SOURCETYPE").unwrap_or_default(),
            hec_index: env::var("SPLUNK_INDEX").unwrap_or_default(),
            max_request_content_length,
            forward_timeout_secs,
            proxy_url: env::var("RELAY_PROXY_HTTPS")
                .or_else(|_| env::var("HTTPS_PROXY"))
                .ok(),
        })
    }
}
