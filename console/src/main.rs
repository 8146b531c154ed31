use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use rimeproto_console::{format_notification, Console, OutputFormat};
use rimeproto_core::{HostConfig, HostControl, SessionId, TableHost};

#[derive(Parser)]
#[command(name = "rimeproto-console")]
#[command(about = "Drive an input-method session from stdin and print its snapshots")]
#[command(version)]
struct Cli {
    /// Host configuration (TOML); built-in demo tables when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Snapshot output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Skip the startup maintenance; schemas are compiled on first use
    #[arg(long)]
    no_maintenance: bool,

    /// Debug logging on stderr
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    // a subscriber may already be installed by an embedding process
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = match &cli.config {
        Some(path) => HostConfig::load_toml(path)?,
        None => HostConfig::demo(),
    };
    info!(app = %config.app_name, "starting console");

    let mut host = TableHost::new(config);
    let format = cli.format;
    host.set_notification_handler(Box::new(
        move |session_id: Option<SessionId>, message_type: &str, message_value: &str| {
            println!(
                "{}",
                format_notification(format, session_id, message_type, message_value)
            );
        },
    ));

    eprintln!("initializing...");
    host.initialize();
    if !cli.no_maintenance && host.start_maintenance(true) {
        host.join_maintenance_thread();
    }
    eprintln!("ready.");

    let Some(session_id) = host.create_session() else {
        eprintln!("Error creating rime session.");
        host.finalize();
        return Ok(ExitCode::FAILURE);
    };

    let mut console =
        Console::new(host, session_id, io::stdout().lock(), io::stderr()).with_format(cli.format);
    console.run(io::stdin().lock())?;

    let mut host = console.into_host();
    host.destroy_session(session_id);
    host.finalize();
    Ok(ExitCode::SUCCESS)
}
