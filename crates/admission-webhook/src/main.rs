use std::process;

use admission_webhook::{cli, config::Config, tracing::setup_tracing, AdmissionServer};
use anyhow::Result;
use tracing::{debug, error};

#[tokio::main]
async fn main() -> Result<()> {
    let matches = cli::build_cli().get_matches();
    let config = Config::from_args(&matches)?;

    // rustls requires the crypto provider to be picked explicitly when more
    // than one is compiled in
    if rustls::crypto::ring::default_provider()
        .install_default()
        .is_err()
    {
        eprintln!("Failed to install the rustls crypto provider");
        process::exit(1);
    }

    setup_tracing(&config.log_level, &config.log_fmt, config.log_no_color)?;
    debug!("tracing system ready");

    let server = match AdmissionServer::new_from_config(config).await {
        Ok(server) => server,
        Err(e) => fatal_error(e.to_string()),
    };

    if let Err(e) = server.run().await {
        fatal_error(e.to_string());
    }

    Ok(())
}

fn fatal_error(msg: String) -> ! {
    error!("{}", msg);
    process::exit(1);
}
