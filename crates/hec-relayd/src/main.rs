// Copyright 2025-Present hec-relay contributors
// SPDX-License-Identifier: Apache-2.0

#![cfg_attr(not(test), deny(clippy::panic))]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::todo))]
#![cfg_attr(not(test), deny(clippy::unimplemented))]

use std::{env, sync::Arc};
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

use hec_relay::{
    alert_processor::RelayAlertProcessor, config::Config, forwarder::Forwarder,
    relay_server::RelayServer,
};

#[tokio::main]
pub async fn main() {
    let log_level = env::var("RELAY_LOG_LEVEL")
        .map(|val| val.to_lowercase())
        .unwrap_or("info".to_string());

    let env_filter = format!("h2=off,hyper=off,rustls=off,{}", log_level);

    #[allow(clippy::expect_used)]
    let subscriber = tracing_subscriber::fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_new(env_filter).expect("could not parse log level in configuration"),
        )
        .with_level(true)
        .with_thread_names(false)
        .with_thread_ids(false)
        .with_line_number(false)
        .with_file(false)
        .with_target(true)
        .without_time()
        .finish();

    #[allow(clippy::expect_used)]
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    debug!("Logging subsystem enabled");

    let config = match Config::from_env() {
        Ok(c) => Arc::new(c),
        Err(e) => {
            error!("Error creating config on relay startup: {e}");
            return;
        }
    };

    let forwarder = Forwarder::new(Arc::clone(&config));
    let alert_processor = Arc::new(RelayAlertProcessor::new(forwarder));

    let server = RelayServer {
        config,
        alert_processor,
    };

    if let Err(e) = server.start().await {
        error!("Error when starting the relay server: {e:?}");
    }
}
