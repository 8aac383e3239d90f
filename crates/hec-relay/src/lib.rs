// Copyright 2025-Present hec-relay contributors
// SPDX-License-Identifier: Apache-2.0

#![cfg_attr(not(test), deny(clippy::panic))]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::todo))]
#![cfg_attr(not(test), deny(clippy::unimplemented))]

pub mod alert_processor;
pub mod config;
pub mod forwarder;
pub mod hec;
pub mod http_utils;
pub mod relay_server;
