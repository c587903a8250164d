use std::{path::PathBuf, sync::Arc};

use {
    anyhow::Context,
    clap::{Parser, Subcommand},
    secrecy::Secret,
    tracing::info,
    tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt},
};

use {
    groupcast_channels::ChatSession,
    groupcast_config::{GroupcastConfig, discover_and_load, load_config},
    groupcast_discovery::reconcile,
    groupcast_gateway::start_facade,
    groupcast_ledger::SheetsLedger,
    groupcast_whatsapp::WhatsAppSession,
};

#[derive(Parser)]
#[command(
    name = "groupcast",
    about = "groupcast — WhatsApp group ledger + broadcast facade"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Output logs as JSON instead of human-readable.
    #[arg(long, global = true, default_value_t = false)]
    json_logs: bool,

    /// Config file path (skips discovery).
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Connect, reconcile the group ledger, then serve the HTTP facade.
    Serve {
        #[arg(long)]
        bind: Option<String>,
        #[arg(long)]
        port: Option<u16>,
    },
    /// Run the ledger reconciliation pass once and exit.
    Sync,
    /// Send a one-off text message over a fresh session.
    Send {
        #[arg(long)]
        to: String,
        #[arg(short, long)]
        message: String,
    },
}

fn init_telemetry(cli: &Cli) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    if cli.json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_target(true).with_thread_ids(false))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_ansi(true),
            )
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_telemetry(&cli);

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => discover_and_load(),
    };

    match cli.command {
        Commands::Serve { bind, port } => serve(config, bind, port).await,
        Commands::Sync => sync(config).await,
        Commands::Send { to, message } => send(config, &to, &message).await,
    }
}

/// Connect the session. Failure is fatal: the error propagates out of `main`
/// and the process exits nonzero.
async fn connect(config: &GroupcastConfig) -> anyhow::Result<Arc<dyn ChatSession>> {
    let session = WhatsAppSession::connect(&config.whatsapp)
        .await
        .context("connecting WhatsApp session")?;
    Ok(Arc::new(session))
}

fn build_ledger(config: &GroupcastConfig) -> anyhow::Result<SheetsLedger> {
    anyhow::ensure!(
        !config.ledger.spreadsheet_id.is_empty(),
        "ledger.spreadsheet_id is not configured"
    );
    anyhow::ensure!(
        !config.ledger.access_token.is_empty(),
        "ledger.access_token is not configured"
    );
    Ok(SheetsLedger::new(
        config.ledger.spreadsheet_id.clone(),
        config.ledger.tab.clone(),
        Secret::new(config.ledger.access_token.clone()),
    ))
}

async fn serve(
    config: GroupcastConfig,
    bind: Option<String>,
    port: Option<u16>,
) -> anyhow::Result<()> {
    let session = connect(&config).await?;
    let ledger = build_ledger(&config)?;

    // Reconciliation failure is fatal; the facade never starts on a ledger
    // that could not be synchronized.
    let appended = reconcile(session.as_ref(), &ledger)
        .await
        .context("reconciling group ledger")?;
    info!(appended, "group ledger reconciled");

    let bind = bind.unwrap_or(config.gateway.bind);
    let port = port.unwrap_or(config.gateway.port);
    start_facade(&bind, port, session).await
}

async fn sync(config: GroupcastConfig) -> anyhow::Result<()> {
    let session = connect(&config).await?;
    let ledger = build_ledger(&config)?;
    let appended = reconcile(session.as_ref(), &ledger).await?;
    println!("{appended} new group(s) appended to the ledger");
    Ok(())
}

async fn send(config: GroupcastConfig, to: &str, message: &str) -> anyhow::Result<()> {
    let session = connect(&config).await?;
    session
        .send_text(to, message)
        .await
        .context("sending message")?;
    println!("message sent to {to}");
    Ok(())
}
