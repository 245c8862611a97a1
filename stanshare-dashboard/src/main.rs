//! stanshare - terminal front end for the StanShareAI extraction API

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;
use stanshare_client::{ApiVersion, ClientConfig, FormType, PageQuery, PollOutcome, StanShareClient};
use stanshare_dashboard::session::{KEY_API_URL, KEY_IS_GUEST, KEY_LOGIN_TIME, KEY_USER_EMAIL, KEY_USER_NAME};
use stanshare_dashboard::{DashboardController, FileStore, Session, SessionStore, ViewRegistry};
use tracing::{info, warn};

const CONFIG_FILE: &str = "stanshare.toml";

#[derive(Parser)]
#[command(name = "stanshare")]
#[command(about = "StanShareAI SEC EDGAR fund extraction client")]
#[command(version)]
struct Cli {
    /// Config file (defaults to ./stanshare.toml when present, else environment)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Backend base URL (overrides config and session)
    #[arg(long, global = true, env = "STANSHARE_API_URL")]
    api_url: Option<String>,

    /// Backend endpoint table: current or legacy
    #[arg(long, global = true)]
    api_version: Option<ApiVersion>,

    /// Session file
    #[arg(long, global = true, env = "STANSHARE_SESSION", default_value = ".stanshare/session.json")]
    session: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check backend health
    Health,

    /// Start an extraction batch
    Extract {
        /// Number of funds (clamped to the backend's range)
        #[arg(short = 'n', long, default_value = "50")]
        count: u32,
        /// Filing form type, e.g. N-PORT or 10-K
        #[arg(short, long, default_value = "N-PORT")]
        form_type: FormType,
        #[arg(short, long)]
        batch_name: Option<String>,
        /// Poll the new batch until it completes or fails
        #[arg(short, long)]
        watch: bool,
    },

    /// Show the status of a batch
    Status { batch_id: String },

    /// Poll a batch until it completes or fails
    Watch {
        batch_id: String,
        /// Poll interval in milliseconds (defaults to config)
        #[arg(short, long, value_parser = clap::value_parser!(u64).range(1..))]
        interval_ms: Option<u64>,
    },

    /// List extracted funds
    Funds {
        #[arg(short, long, default_value = "100")]
        limit: u32,
        #[arg(short, long, default_value = "0")]
        offset: u32,
        #[arg(long)]
        fund_type: Option<String>,
    },

    /// List annotations
    Annotations {
        #[arg(short, long, default_value = "100")]
        limit: u32,
        #[arg(short, long, default_value = "0")]
        offset: u32,
        #[arg(long)]
        batch_id: Option<String>,
    },

    /// Quality metrics, overall or for one batch
    Quality {
        #[arg(long)]
        batch_id: Option<String>,
        /// Show aggregate quality statistics instead
        #[arg(long)]
        stats: bool,
    },

    /// Extraction scheduler
    Scheduler {
        #[command(subcommand)]
        command: SchedulerCommands,
    },

    /// Delta detection
    Delta {
        #[command(subcommand)]
        command: DeltaCommands,
    },

    /// Render a dashboard page as HTML
    Page {
        /// Page name, e.g. funds.html
        #[arg(default_value = "dashboard")]
        name: String,
        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Store the dashboard identity in the session file
    Login {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        guest: bool,
    },

    /// Clear the dashboard identity
    Logout,
}

#[derive(Subcommand)]
enum SchedulerCommands {
    Status,
    Start,
    Stop,
    Jobs,
}

#[derive(Subcommand)]
enum DeltaCommands {
    /// Run delta detection now
    Detect,
    Report,
    /// Records that have gone stale
    Stale,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let config = load_config(&cli)?;
    init_logging(&config);

    let mut store = FileStore::open(&cli.session)
        .with_context(|| format!("failed to open session {}", cli.session.display()))?;
    let session = Session::load(&store);

    let mut client = StanShareClient::new(&config);
    // Explicit flag beats the stored session URL
    if cli.api_url.is_none() {
        if let Some(url) = &session.api_url {
            client = client.with_base_url(url.clone());
        }
    }

    info!(base_url = client.base_url(), version = %client.api_version(), "stanshare starting");

    match cli.command {
        Commands::Health => print_json(&client.check_health().await?)?,

        Commands::Extract {
            count,
            form_type,
            batch_name,
            watch,
        } => {
            let started = client
                .start_extraction(count, form_type, batch_name.as_deref())
                .await?;
            print_json(&started)?;
            if watch {
                watch_batch(&client, &started.batch_id, None).await?;
            }
        }

        Commands::Status { batch_id } => print_json(&client.get_extraction_status(&batch_id).await?)?,

        Commands::Watch { batch_id, interval_ms } => {
            watch_batch(&client, &batch_id, interval_ms.map(Duration::from_millis)).await?;
        }

        Commands::Funds {
            limit,
            offset,
            fund_type,
        } => {
            let mut query = PageQuery::new(limit, offset);
            query.filter = fund_type;
            print_json(&client.list_funds(&query).await?)?;
        }

        Commands::Annotations {
            limit,
            offset,
            batch_id,
        } => {
            let mut query = PageQuery::new(limit, offset);
            query.filter = batch_id;
            print_json(&client.list_annotations(&query).await?)?;
        }

        Commands::Quality { batch_id, stats } => {
            if stats {
                print_json(&client.get_quality_stats().await?)?;
            } else {
                match client.get_quality_metrics(batch_id.as_deref()).await? {
                    Some(metrics) => print_json(&metrics)?,
                    None => println!("Quality metrics not available yet"),
                }
            }
        }

        Commands::Scheduler { command } => {
            let result = match command {
                SchedulerCommands::Status => client.get_scheduler_status().await?,
                SchedulerCommands::Start => client.start_scheduler().await?,
                SchedulerCommands::Stop => client.stop_scheduler().await?,
                SchedulerCommands::Jobs => client.get_scheduler_jobs().await?,
            };
            print_json(&result)?;
        }

        Commands::Delta { command } => {
            let result = match command {
                DeltaCommands::Detect => client.run_delta_detection().await?,
                DeltaCommands::Report => client.get_delta_report().await?,
                DeltaCommands::Stale => client.get_stale_data().await?,
            };
            print_json(&result)?;
        }

        Commands::Page { name, output } => {
            let mut controller = DashboardController::new(session, client, ViewRegistry::standard())
                .await
                .with_thresholds(config.score_thresholds);

            // The error panel is still rendered; report and carry on
            if let Err(e) = controller.load_page(&name).await {
                warn!(page = %name, error = %e, "Page failed to load");
            }

            let html = controller.render_shell();
            match output {
                Some(path) => {
                    std::fs::write(&path, html).with_context(|| format!("failed to write {}", path.display()))?;
                    info!(path = %path.display(), "Page written");
                }
                None => println!("{html}"),
            }
        }

        Commands::Login { name, email, guest } => {
            if let Some(name) = &name {
                store.set(KEY_USER_NAME, name)?;
            }
            if let Some(email) = &email {
                store.set(KEY_USER_EMAIL, email)?;
            }
            store.set(KEY_IS_GUEST, if guest { "true" } else { "false" })?;
            store.set(KEY_LOGIN_TIME, &chrono::Utc::now().to_rfc3339())?;
            if let Some(url) = &cli.api_url {
                store.set(KEY_API_URL, url)?;
            }

            let info = Session::load(&store).user_info();
            println!("Logged in as: {} <{}>", info.name, info.email);
        }

        Commands::Logout => {
            let mut controller = DashboardController::new(session, client, ViewRegistry::standard()).await;
            let target = controller.logout(&mut store)?;
            println!("Logged out; continue at {target}");
        }
    }

    Ok(())
}

/// Config file, else environment; flags override either
fn load_config(cli: &Cli) -> anyhow::Result<ClientConfig> {
    let mut config = match &cli.config {
        Some(path) => ClientConfig::load(path)?,
        None if Path::new(CONFIG_FILE).exists() => ClientConfig::load(Path::new(CONFIG_FILE))?,
        None => ClientConfig::from_env(),
    };

    if let Some(url) = &cli.api_url {
        config = config.with_base_url(url.clone());
    }
    if let Some(version) = cli.api_version {
        config = config.with_api_version(version);
    }

    config.validate().context("invalid configuration")?;
    Ok(config)
}

fn init_logging(config: &ClientConfig) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level));

    // Logs go to stderr so command output stays parseable
    if config.log_json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .init();
    }
}

/// Poll until terminal, printing each status; Ctrl-C stops the poll
async fn watch_batch(client: &StanShareClient, batch_id: &str, interval: Option<Duration>) -> anyhow::Result<()> {
    let handle = client.poll_extraction_status(
        batch_id,
        |status| {
            let progress = status
                .extra
                .get("progress")
                .map(ToString::to_string)
                .unwrap_or_default();
            println!("{} {progress}", status.status.as_str());
        },
        interval,
    )?;

    tokio::select! {
        outcome = handle.wait() => match outcome? {
            PollOutcome::Finished(status) => {
                info!(batch_id, status = status.status.as_str(), "Batch finished");
            }
            PollOutcome::Stopped => info!(batch_id, "Polling stopped"),
        },
        _ = tokio::signal::ctrl_c() => {
            let stopped = client.stop_polling();
            info!(batch_id, stopped, "Interrupted");
        }
    }

    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
