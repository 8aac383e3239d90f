// Copyright 2025-Present hec-relay contributors
// SPDX-License-Identifier: Apache-2.0

use hyper::service::service_fn;
use hyper::{http, StatusCode};
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{debug, error};

use crate::alert_processor::AlertProcessor;
use crate::config;
use crate::http_utils::{log_and_create_http_response, HttpRequest, HttpResponse};

pub struct RelayServer {
    pub config: Arc<config::Config>,
    pub alert_processor: Arc<dyn AlertProcessor + Send + Sync>,
}

impl RelayServer {
    /// Binds the listening socket and serves inbound webhook requests until a fatal accept
    /// error occurs.
    pub async fn start(&self) -> Result<(), Box<dyn std::error::Error>> {
        let addr = SocketAddr::new(self.config.listening_address, self.config.listening_port);
        let listener = tokio::net::TcpListener::bind(&addr).await?;

        // called for each http request
        let alert_processor = self.alert_processor.clone();
        let endpoint_config = self.config.clone();
        let service = service_fn(move |req| {
            let alert_processor = alert_processor.clone();
            let endpoint_config = endpoint_config.clone();

            RelayServer::endpoint_handler(endpoint_config, req, alert_processor)
        });

        debug!(
            "Relay started: listening on {}:{}",
            self.config.listening_address, self.config.listening_port
        );

        Self::serve_tcp(listener, service).await
    }

    async fn serve_tcp<S>(
        listener: tokio::net::TcpListener,
        service: S,
    ) -> Result<(), Box<dyn std::error::Error>>
    where
        S: hyper::service::Service<
                hyper::Request<hyper::body::Incoming>,
                Response = HttpResponse,
            > + Clone
            + Send
            + 'static,
        S::Future: Send,
        S::Error: std::error::Error + Send + Sync + 'static,
    {
        let server = hyper::server::conn::http1::Builder::new();
        let mut joinset = tokio::task::JoinSet::new();

        loop {
            let conn = tokio::select! {
                con_res = listener.accept() => match con_res {
                    Err(e)
                        if matches!(
                            e.kind(),
                            io::ErrorKind::ConnectionAborted
                                | io::ErrorKind::ConnectionReset
                                | io::ErrorKind::ConnectionRefused
                        ) =>
                    {
                        continue;
                    }
                    Err(e) => {
                        error!("Server error: {e}");
                        return Err(e.into());
                    }
                    Ok((conn, _)) => conn,
                },
                finished = async {
                    match joinset.join_next().await {
                        Some(finished) => finished,
                        None => std::future::pending().await,
                    }
                } => match finished {
                    Err(e) if e.is_panic() => {
                        // Don't kill server on panic - log and continue
                        error!("Connection handler panicked: {:?}", e);
                        continue;
                    },
                    Ok(()) | Err(_) => continue,
                },
            };
            let conn = hyper_util::rt::TokioIo::new(conn);
            let server = server.clone();
            let service = service.clone();
            joinset.spawn(async move {
                if let Err(e) = server.serve_connection(conn, service).await {
                    error!("Connection error: {e}");
                }
            });
        }
    }

    /// Every method and path reaches the alert processor; the reference receiver registers a
    /// catch-all route and never checks the method.
    async fn endpoint_handler(
        config: Arc<config::Config>,
        req: HttpRequest,
        alert_processor: Arc<dyn AlertProcessor + Send + Sync>,
    ) -> http::Result<HttpResponse> {
        match alert_processor.process_alert(config, req).await {
            Ok(res) => Ok(res),
            Err(err) => log_and_create_http_response(
                &format!("Error processing alert: {err}"),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        }
    }
}
