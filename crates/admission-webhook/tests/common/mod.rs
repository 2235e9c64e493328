use admission_webhook::{config::Config, policy::LabelPatchMode, AdmissionServer};
use axum::Router;
use std::net::SocketAddr;

pub(crate) fn default_test_config() -> Config {
    Config {
        addr: SocketAddr::from(([127, 0, 0, 1], 3001)),
        tls_config: None,
        label_patch_mode: LabelPatchMode::Replace,
        log_level: "info".to_owned(),
        log_fmt: "json".to_owned(),
        log_no_color: false,
    }
}

pub(crate) async fn app(config: Config) -> Router {
    let server = AdmissionServer::new_from_config(config).await.unwrap();

    server.router()
}
