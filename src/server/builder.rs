// ────────────────────────────────
// src/server/builder.rs
// ────────────────────────────────
use crate::config::ProbeConfig;
use crate::health::HealthAggregator;
use crate::server::handler::ProbeHandler;
use crate::server::listener::bind_tcp;
use anyhow::{anyhow, Result};
use hyper::{server::conn::Http, Body, Request, Response};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::Service;

/// Builder for the probe server; any tower service can be injected as handler.
pub struct ProbeServer<H>
where
    H: Service<Request<Body>, Response = Response<Body>> + Send + Clone + 'static,
    H::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
    H::Future: Send + 'static,
{
    addr: SocketAddr,
    handler: Option<H>,
}

impl ProbeServer<ProbeHandler> {
    /// Probe server answering for `aggregator` on the configured port and paths.
    pub fn for_aggregator(config: &ProbeConfig, aggregator: Arc<HealthAggregator>) -> Self {
        Self::new(config.addr()).with_handler(ProbeHandler::new(aggregator, config.clone()))
    }
}

impl<H> ProbeServer<H>
where
    H: Service<Request<Body>, Response = Response<Body>> + Send + Clone + 'static,
    H::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
    H::Future: Send + 'static,
{
    pub fn new(addr: SocketAddr) -> Self {
        Self { addr, handler: None }
    }

    pub fn with_handler(mut self, handler: H) -> Self {
        self.handler = Some(handler);
        self
    }

    /// Serve until the process stops.
    pub async fn serve(self) -> Result<()> {
        self.serve_with_shutdown(std::future::pending()).await
    }

    /// Bind the configured address and serve until `signal` resolves.
    pub async fn serve_with_shutdown<F>(self, signal: F) -> Result<()>
    where
        F: Future<Output = ()>,
    {
        let listener = bind_tcp(self.addr).await?;
        self.serve_listener(listener, signal).await
    }

    /// Serve on an already bound listener until `signal` resolves.
    /// Connections already accepted keep running to completion; a failed
    /// accept is logged and the server keeps listening.
    pub async fn serve_listener<F>(self, listener: TcpListener, signal: F) -> Result<()>
    where
        F: Future<Output = ()>,
    {
        let handler = self
            .handler
            .ok_or_else(|| anyhow!("handler must be set via with_handler()"))?;
        tracing::info!("Probe server listening on {}", listener.local_addr()?);

        tokio::pin!(signal);
        loop {
            tokio::select! {
                accepted = listener.accept() => {
                    let Some((stream, peer)) = connection(accepted) else {
                        continue;
                    };
                    let svc = handler.clone();

                    tokio::spawn(async move {
                        if let Err(err) = Http::new().serve_connection(stream, svc).await {
                            tracing::warn!(%peer, %err, "connection error");
                        }
                    });
                }
                _ = &mut signal => {
                    tracing::info!("Probe server shutting down");
                    break;
                }
            }
        }

        Ok(())
    }
}

// Accept failures such as EMFILE are transient; the probes must stay up.
fn connection<T>(accepted: std::io::Result<T>) -> Option<T> {
    match accepted {
        Ok(conn) => Some(conn),
        Err(err) => {
            tracing::warn!(%err, "failed to accept probe connection");
            None
        }
    }
}
