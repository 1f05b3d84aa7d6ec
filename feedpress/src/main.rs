// This file is part of the product FeedPress.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use actix_web::rt::System;
use actix_web::{App, HttpServer, middleware::Logger, web};
use log::info;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use feedpress::api;
use feedpress::app_state::AppState;
use feedpress::bootstrap::{self, BootstrapResult};
use feedpress::config::{DatabaseTarget, ValidatedConfig};
use feedpress::iam::AuthMiddlewareFactory;
use feedpress::notify::ArticleNotifier;
use feedpress::runtime_paths::RuntimePaths;
use feedpress::store::open_post_store;
use feedpress::util::{self, log_level_changer::default_rules};

const HELP_TEXT: &str = "\
Usage: feedpress [-C <root>]

Starts the FeedPress content API.

Options:
  -C <root>   runtime directory holding config.yaml and data/ (default: .)
  -h, --help  print this help

Environment overrides: DATABASE_URI, CMS_SECRET, WORKER_WEBHOOK_URL,
WORKER_API_KEY, REVALIDATION_SECRET, SERVER_URL
";

fn main() {
    let exit_code = run();
    std::process::exit(exit_code);
}

fn run() -> i32 {
    let parsed_args = match parse_args() {
        Ok(args) => args,
        Err(error) => {
            eprintln!("❌ Invalid command line arguments: {}", error);
            eprintln!("❌ Use -C <root> to set the runtime directory.");
            return 1;
        }
    };

    if matches!(parsed_args.mode, RunMode::Help) {
        print!("{}", HELP_TEXT);
        return 0;
    }

    let bootstrap = match bootstrap::bootstrap_runtime(&parsed_args.runtime_root) {
        Ok(result) => result,
        Err(error) => {
            eprintln!("❌ Bootstrap error: {}", error);
            eprintln!("❌ Application cannot start with invalid configuration.");
            return 1;
        }
    };

    match System::new().block_on(run_server(bootstrap)) {
        Ok(()) => 0,
        Err(error) => {
            eprintln!("❌ Server failed to start: {}", error);
            1
        }
    }
}

async fn run_server(bootstrap: BootstrapResult) -> std::io::Result<()> {
    let BootstrapResult {
        validated_config,
        runtime_paths,
        user_services,
        ..
    } = bootstrap;
    let validated_config = Arc::new(validated_config);

    let logger = env_logger::Builder::from_default_env()
        .filter_level(validated_config.logging.level_filter())
        .target(env_logger::Target::Stdout)
        .format(|buf, record| {
            writeln!(
                buf,
                "{} [{}] {}: {}",
                chrono::Utc::now().format("%Y-%m-%d %H:%M:%S%.3f UTC"),
                record.level(),
                record.target(),
                record.args()
            )
        })
        .build();

    util::init_logger(default_rules(), logger).map_err(|error| {
        eprintln!("❌ Failed to initialize logger: {}", error);
        std::io::Error::other(error.to_string())
    })?;

    log_startup_info(&validated_config, &runtime_paths);

    let posts = open_post_store(&runtime_paths).map_err(|error| {
        eprintln!("❌ Failed to open post store: {}", error);
        std::io::Error::other(error.to_string())
    })?;
    info!("✅ Post store opened");

    let user_services = Arc::new(user_services);
    info!("✅ User services initialized successfully");

    let notifier = ArticleNotifier::new(&validated_config).map_err(|error| {
        eprintln!("❌ Failed to initialize worker notifier: {}", error);
        std::io::Error::other(error.to_string())
    })?;
    if notifier.is_configured() {
        info!("✅ Worker notifications enabled");
    } else {
        info!("Worker notifications disabled (no webhook URL or API key)");
    }

    let app_state = Arc::new(AppState::new(posts, notifier));
    info!(
        "✅ Release tracker initialized with X-Release {}",
        app_state.releases.release_hex_for("/")
    );

    let workers = validated_config.server.workers;
    let (host, port) = validated_config.server.address_tuple();
    let bind_address = (host.to_string(), port);

    let factory = {
        let config = validated_config.clone();
        let app_state = app_state.clone();
        let user_services = user_services.clone();
        move || {
            App::new()
                .app_data(web::Data::from(config.clone()))
                .app_data(web::Data::from(app_state.clone()))
                .app_data(web::Data::from(user_services.clone()))
                .wrap(AuthMiddlewareFactory)
                .wrap(Logger::new(
                    r#"%a "%r" %s %b "%{Referer}i" "%{User-Agent}i" %T"#,
                ))
                .configure(api::configure)
        }
    };

    HttpServer::new(factory)
        .workers(workers)
        .bind(bind_address)?
        .run()
        .await
}

fn log_startup_info(config: &ValidatedConfig, runtime_paths: &RuntimePaths) {
    info!("Starting {} - {}", config.app.name, config.app.description);
    info!("Workers: {}", config.server.workers);
    info!(
        "API available at: http://{}:{}/api",
        config.server.host, config.server.port
    );
    match &config.database {
        DatabaseTarget::Memory => info!("Database: in memory (nothing is persisted)"),
        DatabaseTarget::Directory(_) => {
            if let Some(data_dir) = runtime_paths.data_dir.as_ref() {
                info!("Data directory (canonical): {}", data_dir.display());
            }
        }
    }
    if let Some(server_url) = config.app.server_url.as_deref() {
        info!("Front end: {}", server_url);
    }
    info!("Config file: {}", runtime_paths.config_file.display());
    info!("Runtime root: {}", runtime_paths.root.display());
    if let Ok(current_dir) = std::env::current_dir() {
        info!("Working directory: {}", current_dir.display());
    }
}

#[derive(Debug)]
enum RunMode {
    Serve,
    Help,
}

struct ParsedArgs {
    runtime_root: PathBuf,
    mode: RunMode,
}

fn parse_args() -> Result<ParsedArgs, String> {
    parse_args_from(std::env::args().skip(1))
}

fn parse_args_from<I>(args: I) -> Result<ParsedArgs, String>
where
    I: IntoIterator<Item = String>,
{
    let args: Vec<String> = args.into_iter().collect();
    if args.iter().any(|arg| is_help_flag(arg)) {
        return Ok(ParsedArgs {
            runtime_root: PathBuf::from("."),
            mode: RunMode::Help,
        });
    }

    let mut args = args.into_iter();
    let mut runtime_root = PathBuf::from(".");

    while let Some(arg) = args.next() {
        if arg == "--" {
            continue;
        } else if arg == "-C" {
            let value = args
                .next()
                .ok_or_else(|| "Missing value for -C".to_string())?;
            runtime_root = PathBuf::from(value);
        } else {
            return Err(format!("Unexpected argument: {}", arg));
        }
    }

    Ok(ParsedArgs {
        runtime_root: make_runtime_root_absolute(runtime_root)?,
        mode: RunMode::Serve,
    })
}

fn is_help_flag(arg: &str) -> bool {
    arg == "-h" || arg == "--help"
}

fn make_runtime_root_absolute(runtime_root: PathBuf) -> Result<PathBuf, String> {
    if runtime_root.is_absolute() {
        return Ok(runtime_root);
    }

    let current_dir = std::env::current_dir()
        .map_err(|error| format!("Failed to resolve current directory: {}", error))?;
    Ok(current_dir.join(runtime_root))
}

#[cfg(test)]
mod tests {
    use super::{RunMode, parse_args_from};

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn parse_args_defaults_to_serving_from_current_dir() {
        let parsed = parse_args_from(Vec::new()).expect("parse args");
        assert!(matches!(parsed.mode, RunMode::Serve));
        assert!(parsed.runtime_root.is_absolute());
    }

    #[test]
    fn parse_args_accepts_runtime_root() {
        let parsed = parse_args_from(args(&["-C", "runtime"])).expect("parse args");
        assert!(matches!(parsed.mode, RunMode::Serve));
        assert!(parsed.runtime_root.ends_with("runtime"));
    }

    #[test]
    fn parse_args_ignores_double_dash() {
        let parsed = parse_args_from(args(&["--", "-C", "runtime"])).expect("parse args");
        assert!(parsed.runtime_root.ends_with("runtime"));
    }

    #[test]
    fn parse_args_requires_value_for_runtime_root() {
        match parse_args_from(args(&["-C"])) {
            Err(error) => assert!(error.contains("-C")),
            Ok(_) => panic!("expected missing value error"),
        }
    }

    #[test]
    fn parse_args_rejects_unknown_arguments() {
        match parse_args_from(args(&["serve"])) {
            Err(error) => assert!(error.contains("serve")),
            Ok(_) => panic!("expected rejection"),
        }
    }

    #[test]
    fn parse_args_accepts_help_flag() {
        let parsed = parse_args_from(args(&["-C", "runtime", "--help"])).expect("parse args");
        assert!(matches!(parsed.mode, RunMode::Help));
    }
}
