//! PrintNet dashboard - Entry Point
//!
//! Drives the dashboard views from the command line, or serves the local
//! session proxy with `--serve`.

use std::env;

use printnet::app::options::AppOptions;
use printnet::app::run::run;
use printnet::commands::{arg_value, dispatch, parse_args, Context};
use printnet::logs::{init_logging, LogLevel, LogOptions};
use printnet::storage::layout::StorageLayout;
use printnet::storage::settings::Settings;
use printnet::utils::version_info;

use tracing::{error, info};

const USAGE: &str = "\
Usage: printnet [--api-url=<url>] [--log-level=<level>] <command>

Commands:
  --version
  --serve [--host=<host>] [--port=<port>] [--guard]
  --login --email=<email> --password=<password>
  --register --email=<email> --password=<password> [--nickname=<name>]
  --logout
  --whoami
  --printers
  --add-printer --name=<name> [--model=<model>] [--interface=LAN|OCTOPRINT|TROUBLES]
  --test-connection[=<printer id>]
  --printer=<printer id> [--job=<job id>]
  --start=<printer id>
  --new-job=<printer id> --file=<path> [--name=..] [--material=..] [--color=..] [--schedule[=<time>]]";

#[tokio::main]
async fn main() {
    let cli_args = parse_args(env::args().skip(1));

    // Print version and exit
    let version = version_info();
    if cli_args.contains_key("version") {
        match serde_json::to_string_pretty(&version) {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("Failed to render version info: {}", e),
        }
        return;
    }

    // Retrieve the settings file
    let layout = StorageLayout::default();
    let settings = match Settings::load(&layout.settings_file()).await {
        Ok(settings) => settings.with_env_overrides(),
        Err(e) => {
            eprintln!("Unable to read settings file: {}", e);
            std::process::exit(1);
        }
    };

    // Initialize logging
    let log_level = match arg_value(&cli_args, "log-level").map(str::parse::<LogLevel>) {
        Some(Ok(level)) => level,
        Some(Err(e)) => {
            eprintln!("{}", e);
            std::process::exit(2);
        }
        None => settings.log_level.clone(),
    };
    let log_dir = settings.log_to_file.then(|| layout.logs_dir().path().to_path_buf());
    if let Some(dir) = &log_dir {
        if let Err(e) = tokio::fs::create_dir_all(dir).await {
            eprintln!("Failed to create log directory {:?}: {}", dir, e);
        }
    }
    let log_options = LogOptions {
        log_level,
        json_format: settings.log_json,
        log_dir,
        ..Default::default()
    };
    let _log_guard = match init_logging(log_options) {
        Ok(guard) => guard,
        Err(e) => {
            println!("Failed to initialize logging: {e}");
            None
        }
    };

    let mut options = AppOptions::from_settings(&settings, layout);
    if let Some(url) = arg_value(&cli_args, "api-url") {
        options.backend_base_url = url.to_string();
    }

    if cli_args.contains_key("serve") {
        if let Some(host) = arg_value(&cli_args, "host") {
            options.server.host = host.to_string();
        }
        if let Some(port) = arg_value(&cli_args, "port") {
            match port.parse() {
                Ok(port) => options.server.port = port,
                Err(_) => {
                    eprintln!("Invalid --port: {}", port);
                    std::process::exit(2);
                }
            }
        }
        if cli_args.contains_key("guard") {
            options.route_guard.enabled = true;
        }

        info!("Running PrintNet dashboard server with options: {:?}", options);
        if let Err(e) = run(options, await_shutdown_signal()).await {
            error!("Failed to run the dashboard server: {e}");
            std::process::exit(1);
        }
        return;
    }

    let ctx = match Context::new(options) {
        Ok(ctx) => ctx,
        Err(e) => {
            error!("Failed to create backend client: {e}");
            std::process::exit(1);
        }
    };

    match dispatch(&ctx, &cli_args).await {
        Ok(true) => {}
        Ok(false) => {
            println!("{}", USAGE);
        }
        Err(e) => {
            error!("Command failed: {}", e);
            if e.is_unauthorized() {
                eprintln!("[ERROR] Not logged in or session expired, run printnet --login");
            }
            std::process::exit(1);
        }
    }
}

async fn await_shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let (mut sigterm, mut sigint) =
            match (signal(SignalKind::terminate()), signal(SignalKind::interrupt())) {
                (Ok(sigterm), Ok(sigint)) => (sigterm, sigint),
                _ => {
                    error!("Unable to install signal handlers, waiting for Ctrl+C only");
                    let _ = tokio::signal::ctrl_c().await;
                    return;
                }
            };

        tokio::select! {
            _ = sigterm.recv() => {
                info!("SIGTERM received, shutting down...");
            }
            _ = sigint.recv() => {
                info!("SIGINT received, shutting down...");
            }
        }
    }

    #[cfg(not(unix))]
    {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
        }
        info!("Ctrl+C received, shutting down...");
    }
}
