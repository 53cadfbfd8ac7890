//! svcctl Daemon - control systemd services on a remote host over SSH.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{ArgGroup, Parser, Subcommand};
use serde_json::json;
use tracing::{info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use svcctl_daemon::commands::{CommandParams, CommandRegistry, CommandResult, ExecutionContext};
use svcctl_daemon::config::{ConfigSource, Settings, DEFAULT_CONFIG_PATH};
use svcctl_daemon::engine::ServiceManager;

const VERSION: &str = env!("CARGO_PKG_VERSION");
const NAME: &str = env!("CARGO_PKG_NAME");

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    #[command(subcommand)]
    operation: Operation,
}

#[derive(Subcommand, Debug)]
enum Operation {
    /// List services with their active and enabled states
    List,
    /// Apply an action to a service
    Control {
        /// Service name, with or without the .service suffix
        name: String,
        /// start, stop, restart, status, enable or disable
        action: String,
    },
    /// Install a unit file
    #[command(group(ArgGroup::new("source").required(true).args(["file", "content"])))]
    Create {
        /// Unit file name, used as given
        name: String,
        /// Read the unit content from a local file
        #[arg(long)]
        file: Option<PathBuf>,
        /// Unit content
        #[arg(long)]
        content: Option<String>,
        /// Free text recorded in the logs
        #[arg(long)]
        description: Option<String>,
    },
    /// Stop, disable and remove a service unit
    Delete {
        /// Service name, with or without the .service suffix
        name: String,
    },
}

impl Operation {
    /// Registry command name and parameters.
    fn into_request(self) -> Result<(&'static str, CommandParams), std::io::Error> {
        let request = match self {
            Operation::List => ("service.list", json!({})),
            Operation::Control { name, action } => {
                ("service.control", json!({ "name": name, "action": action }))
            }
            Operation::Create {
                name,
                file,
                content,
                description,
            } => {
                let content = match (file, content) {
                    (Some(path), _) => std::fs::read_to_string(path)?,
                    (None, Some(content)) => content,
                    (None, None) => String::new(),
                };
                (
                    "unit.create",
                    json!({ "name": name, "content": content, "description": description }),
                )
            }
            Operation::Delete { name } => ("unit.delete", json!({ "name": name })),
        };
        Ok((request.0, CommandParams::new(request.1)))
    }
}

fn main() -> ExitCode {
    // A .env file is optional
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Load configuration
    let settings = match Settings::load(&cli.config) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error loading configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    // Initialize logging based on configuration
    if let Err(e) = init_logging(&settings) {
        eprintln!("Error initializing logging: {}", e);
        return ExitCode::FAILURE;
    }

    info!("Starting {} v{}", NAME, VERSION);
    match &settings.source {
        ConfigSource::File(path) => info!("Configuration loaded from: {}", path.display()),
        ConfigSource::Defaults => warn!("No configuration file found, using defaults"),
    }
    info!(
        "Managed host: {}@{}:{}",
        settings.ssh.username, settings.ssh.host, settings.ssh.port
    );
    if settings.ssh.password.is_empty() {
        warn!("SSH password is empty; authentication and sudo elevation will likely fail");
    }

    let (command, params) = match cli.operation.into_request() {
        Ok(request) => request,
        Err(e) => {
            eprintln!("Error reading unit file: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let runtime = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Error creating Tokio runtime: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let result = runtime.block_on(async_main(settings, command, params));

    match serde_json::to_string_pretty(&result) {
        Ok(rendered) => println!("{}", rendered),
        Err(e) => {
            eprintln!("Error rendering result: {}", e);
            return ExitCode::FAILURE;
        }
    }

    if result.success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

/// Async main function.
async fn async_main(settings: Settings, command: &str, params: CommandParams) -> CommandResult {
    let manager = match ServiceManager::from_settings(&settings) {
        Ok(manager) => Arc::new(manager),
        Err(e) => return CommandResult::from_error(&e),
    };
    let registry = CommandRegistry::new(manager);
    let ctx = ExecutionContext::for_command(command);

    registry.handle(&ctx, command, params).await
}

/// Initialize logging based on settings. Logs go to stderr; stdout carries
/// the command result.
fn init_logging(settings: &Settings) -> Result<(), Box<dyn std::error::Error>> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.logging.level));

    match settings.logging.format.to_lowercase().as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json().with_writer(std::io::stderr))
                .try_init()?;
        }
        _ => {
            // Default to pretty format
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().pretty().with_writer(std::io::stderr))
                .try_init()?;
        }
    }

    Ok(())
}
