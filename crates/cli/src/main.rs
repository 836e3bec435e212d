//! Courier CLI
//!
//! Runs one bulk dispatch from a TOML configuration file.

use std::path::PathBuf;

use clap::Parser;
use courier_dispatch::{DispatchConfig, DispatchReport, Dispatcher};
use courier_transport::{LogTransport, SmtpTransport, Transport};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

/// Courier — bulk email dispatcher with rate limiting and sampled QA copies.
#[derive(Parser, Debug)]
#[command(name = "courier", version, about)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(long, env = "COURIER_CONFIG", default_value = "courier.toml")]
    config: PathBuf,

    /// Build and log every message without delivering anything.
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = DispatchConfig::load(&cli.config)?;

    print_banner();

    let report = if cli.dry_run {
        info!("dry run: using log transport");
        Dispatcher::new(config, LogTransport::new()).run().await?
    } else {
        let transport = SmtpTransport::new(config.smtp.clone())?;
        transport.health_check().await?;
        Dispatcher::new(config, transport).run().await?
    };

    print_report(&report);
    Ok(())
}

fn print_banner() {
    println!("____________________________________________________________");
    println!("|                                                          |");
    println!("|  Courier bulk mailer                                     |");
    println!("|__________________________________________________________|");
}

fn print_report(report: &DispatchReport) {
    println!(
        "Done. Attempted: {}  Delivered: {}  Failed: {}",
        report.attempted,
        report.succeeded,
        report.attempted - report.succeeded
    );
}
