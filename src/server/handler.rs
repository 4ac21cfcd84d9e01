// src/server/handler.rs
use hyper::header::{HeaderValue, CONTENT_TYPE};
use hyper::{Body, Method, Request, Response, StatusCode};
use serde_json::json;
use std::convert::Infallible;
use std::sync::Arc;
use tower::Service;

use crate::config::ProbeConfig;
use crate::health::HealthAggregator;

/// Serves the liveness, readiness and status probes of one aggregator.
#[derive(Clone)]
pub struct ProbeHandler {
    aggregator: Arc<HealthAggregator>,
    config: Arc<ProbeConfig>,
}

#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    #[error("Service is not healthy")]
    NotHealthy,

    #[error("Service is not ready")]
    NotReady,

    #[error("No probe at {0}")]
    NotFound(String),

    #[error("Method {0} not allowed")]
    MethodNotAllowed(Method),

    #[error("Failed to encode status report: {0}")]
    Encode(#[from] serde_json::Error),
}

impl ProbeHandler {
    pub fn new(aggregator: Arc<HealthAggregator>, config: ProbeConfig) -> Self {
        Self {
            aggregator,
            config: Arc::new(config),
        }
    }

    pub fn handle(&self, req: &Request<Body>) -> Result<Response<Body>, ProbeError> {
        if req.method() != Method::GET && req.method() != Method::HEAD {
            return Err(ProbeError::MethodNotAllowed(req.method().clone()));
        }

        let path = req.uri().path();
        if path == self.config.health_path {
            if !self.aggregator.is_healthy() {
                return Err(ProbeError::NotHealthy);
            }
            Ok(json_response(StatusCode::OK, json!({ "status": "OK" }).to_string()))
        } else if path == self.config.ready_path {
            if !self.aggregator.is_ready() {
                return Err(ProbeError::NotReady);
            }
            Ok(json_response(StatusCode::OK, json!({ "status": "OK" }).to_string()))
        } else if path == self.config.status_path {
            let body = serde_json::to_string(&self.aggregator.report())?;
            Ok(json_response(StatusCode::OK, body))
        } else {
            Err(ProbeError::NotFound(path.to_string()))
        }
    }
}

impl Service<Request<Body>> for ProbeHandler {
    type Response = Response<Body>;
    type Error = Infallible;
    type Future = futures::future::BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &mut self,
        _cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        std::task::Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let handler = self.clone();
        Box::pin(async move {
            Ok(handler.handle(&req).unwrap_or_else(|e| {
                tracing::debug!(path = %req.uri().path(), %e, "probe failed");
                e.into()
            }))
        })
    }
}

impl From<ProbeError> for Response<Body> {
    fn from(err: ProbeError) -> Self {
        let status = match err {
            ProbeError::NotHealthy | ProbeError::NotReady => StatusCode::SERVICE_UNAVAILABLE,
            ProbeError::NotFound(_) => StatusCode::NOT_FOUND,
            ProbeError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            ProbeError::Encode(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        json_response(status, json!({ "status": "KO", "error": err.to_string() }).to_string())
    }
}

fn json_response(status: StatusCode, body: String) -> Response<Body> {
    let mut response = Response::new(Body::from(body));
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    response
}
