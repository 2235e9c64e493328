pub mod admission;
mod api;
mod certs;
pub mod cli;
pub mod config;
pub mod decoder;
pub mod dispatcher;
pub mod encoder;
pub mod errors;
pub mod policy;
pub mod tracing;

#[cfg(test)]
mod test_utils;

use std::{net::SocketAddr, sync::Arc};

use ::tracing::{info, Level};
use anyhow::Result;
use axum::{
    routing::{get, post},
    Router,
};
use axum_server::tls_rustls::RustlsConfig;
use tokio::net::TcpListener;
use tower_http::trace::{self, TraceLayer};

use crate::api::{
    handlers::{admission_handler, readiness_handler},
    state::ApiServerState,
};
use crate::config::Config;
use crate::decoder::ReviewDecoder;
use crate::dispatcher::{Dispatcher, Phase};
use crate::encoder::ResponseEncoder;
use crate::policy::{AllowAll, Mutator, PodPolicy, Validator};

pub struct AdmissionServer {
    router: Router,
    tls_config: Option<RustlsConfig>,
    addr: SocketAddr,
}

impl AdmissionServer {
    /// Build the server with the policy shipped by default, which allows
    /// every Pod.
    pub async fn new_from_config(config: Config) -> Result<Self> {
        Self::new_with_policy(config, Arc::new(AllowAll)).await
    }

    pub async fn new_with_policy(config: Config, policy: Arc<dyn PodPolicy>) -> Result<Self> {
        let state = Arc::new(ApiServerState {
            decoder: ReviewDecoder::new(),
            dispatcher: Dispatcher::new(
                Validator::new(policy),
                Mutator::new(config.label_patch_mode),
            ),
            encoder: ResponseEncoder::new(),
        });

        let tls_config = match config.tls_config {
            Some(tls_config) => {
                Some(certs::create_tls_config_and_watch_certificate_changes(tls_config).await?)
            }
            None => None,
        };

        info!(
            label_patch_mode = ?config.label_patch_mode,
            tls = tls_config.is_some(),
            "admission server configured"
        );

        Ok(Self {
            router: build_router(state),
            tls_config,
            addr: config.addr,
        })
    }

    pub async fn run(self) -> Result<()> {
        match self.tls_config {
            Some(tls_config) => {
                info!(address = self.addr.to_string().as_str(), "started HTTPS server");
                let handle = axum_server::Handle::new();
                tokio::spawn(shutdown_on_signal(handle.clone()));
                axum_server::bind_rustls(self.addr, tls_config)
                    .handle(handle)
                    .serve(self.router.into_make_service())
                    .await?;
            }
            None => {
                info!(address = self.addr.to_string().as_str(), "started HTTP server");
                let listener = TcpListener::bind(self.addr).await?;
                axum::serve(listener, self.router)
                    .with_graceful_shutdown(shutdown_signal())
                    .await?;
            }
        }
        info!("server stopped");
        Ok(())
    }

    pub fn router(&self) -> Router {
        self.router.clone()
    }
}

fn build_router(state: Arc<ApiServerState>) -> Router {
    Router::new()
        .route(Phase::VALIDATE_PATH, post(admission_handler))
        .route(Phase::MUTATE_PATH, post(admission_handler))
        .with_state(state)
        .route("/readiness", get(readiness_handler))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(trace::DefaultMakeSpan::new().level(Level::INFO))
                .on_response(trace::DefaultOnResponse::new().level(Level::INFO)),
        )
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            ::tracing::error!(error = %e, "cannot listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                ::tracing::error!(error = %e, "cannot listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("shutdown signal received");
}

async fn shutdown_on_signal(handle: axum_server::Handle) {
    shutdown_signal().await;
    handle.graceful_shutdown(None);
}
