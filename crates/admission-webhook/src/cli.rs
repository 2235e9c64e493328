use clap::builder::PossibleValue;
use clap::{crate_authors, crate_description, crate_name, crate_version, Arg, ArgAction, Command};

pub fn build_cli() -> Command {
    let mut args = vec![
        Arg::new("log-level")
            .long("log-level")
            .value_name("LOG_LEVEL")
            .env("ADMISSION_WEBHOOK_LOG_LEVEL")
            .default_value("info")
            .value_parser([
                PossibleValue::new("trace"),
                PossibleValue::new("debug"),
                PossibleValue::new("info"),
                PossibleValue::new("warn"),
                PossibleValue::new("error"),
            ])
            .help("Log level"),
        Arg::new("log-fmt")
            .long("log-fmt")
            .value_name("LOG_FMT")
            .env("ADMISSION_WEBHOOK_LOG_FMT")
            .default_value("text")
            .value_parser([PossibleValue::new("text"), PossibleValue::new("json")])
            .help("Log output format"),
        Arg::new("log-no-color")
            .long("log-no-color")
            .env("NO_COLOR")
            .action(ArgAction::SetTrue)
            .help("Disable colored output for logs"),
        Arg::new("address")
            .long("addr")
            .value_name("BIND_ADDRESS")
            .default_value("0.0.0.0")
            .env("ADMISSION_WEBHOOK_BIND_ADDRESS")
            .help("Bind against ADDRESS"),
        Arg::new("port")
            .long("port")
            .value_name("PORT")
            .default_value("8999")
            .env("ADMISSION_WEBHOOK_PORT")
            .help("Listen on PORT"),
        Arg::new("tls-cert-file")
            .long("tls-cert-file")
            .value_name("CERT_FILE")
            .default_value("/etc/pki/server.crt")
            .env("ADMISSION_WEBHOOK_TLS_CERT_FILE")
            .help("File containing the x509 Certificate used for serving HTTPS. Leave empty, together with --tls-private-key-file, to serve plain HTTP"),
        Arg::new("tls-private-key-file")
            .long("tls-private-key-file")
            .value_name("KEY_FILE")
            .default_value("/etc/pki/server.key")
            .env("ADMISSION_WEBHOOK_TLS_PRIVATE_KEY_FILE")
            .help("File containing the x509 private key matching --tls-cert-file"),
        Arg::new("label-patch-mode")
            .long("label-patch-mode")
            .value_name("MODE")
            .env("ADMISSION_WEBHOOK_LABEL_PATCH_MODE")
            .default_value("replace")
            .value_parser([
                PossibleValue::new("replace").help("Overwrite all the Pod labels with the vGPU one"),
                PossibleValue::new("merge").help("Add the vGPU label to the existing ones"),
            ])
            .help("How the vGPU label is written into mutated Pods"),
    ];
    args.sort_by(|a, b| a.get_id().cmp(b.get_id()));

    Command::new(crate_name!())
        .author(crate_authors!())
        .version(crate_version!())
        .about(crate_description!())
        .args(args)
}
