use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use ledger_leaf_core::{
    ledger, tip, AppConfig, CategorySet, LayoutOrder, LayoutSnapshot, LedgerBatch, Pipeline,
    PipelineRun, TipMessage,
};
use tracing_subscriber::EnvFilter;

mod effect;

fn main() {
    let dotenv = dotenvy::dotenv();
    init_tracing();
    if let Ok(path) = dotenv {
        tracing::debug!(path = %path.display(), "loaded environment file");
    }

    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        tracing::error!(%err, recoverable = err.is_recoverable(), "run failed");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> ledger_leaf_core::Result<()> {
    match cli.command {
        Commands::Layout { layout } => run_layout(&layout),
        Commands::Ledger {
            layout,
            ledger,
            config,
            json,
        } => run_ledger(&layout, &ledger, config.as_deref(), json),
        Commands::Tips {
            layout,
            messages,
            config,
            user,
            json,
            notify,
        } => run_tips(&layout, &messages, config.as_deref(), user, json, notify),
    }
}

fn run_layout(layout: &Path) -> ledger_leaf_core::Result<()> {
    if let Some(url) = AppConfig::from_env().leaf.layout_url() {
        tracing::info!(%url, "layouts can be refreshed from the panel controller");
    }

    let order = read_layout(layout)?;
    for (position, panel) in order.panels().iter().enumerate() {
        println!("{position:>3}  panel {:>5}  x={} y={}", panel.id, panel.x, panel.y);
    }
    Ok(())
}

fn run_ledger(
    layout: &Path,
    ledger_path: &Path,
    config: Option<&Path>,
    json: bool,
) -> ledger_leaf_core::Result<()> {
    let config = AppConfig::from_path_or_env(config)?;
    let batch = LedgerBatch::from_json(&std::fs::read_to_string(ledger_path)?)?;
    tracing::info!(
        ledger = ?batch.ledger_index,
        transactions = batch.transactions.len(),
        "ledger loaded"
    );

    let categories = config.ledger.apply(ledger::categories()?)?;
    let run = build_pipeline(layout, categories)?.run(&batch.transactions)?;
    emit(&run, &config, json)
}

fn run_tips(
    layout: &Path,
    messages: &Path,
    config: Option<&Path>,
    user: Option<String>,
    json: bool,
    notify: bool,
) -> ledger_leaf_core::Result<()> {
    let mut config = AppConfig::from_path_or_env(config)?;
    if user.is_some() {
        config.tips.user = user;
    }

    let messages = TipMessage::batch_from_json(&std::fs::read_to_string(messages)?)?;
    tracing::info!(messages = messages.len(), user = ?config.tips.user, "tip messages loaded");
    if let Some(user) = config.tips.user.as_deref() {
        for message in messages.iter().filter(|message| message.is_tip_to(user)) {
            tracing::info!(data = ?message.data, "tip received");
        }
    }

    if notify {
        let request = effect::notification_effect(&config.display);
        for _ in &messages {
            println!("{}", serde_json::to_string(&request)?);
        }
        return Ok(());
    }

    let categories = config
        .tips
        .scheme
        .apply(tip::categories(config.tips.user.as_deref())?)?;
    let run = build_pipeline(layout, categories)?.run(&messages)?;
    emit(&run, &config, json)
}

fn read_layout(path: &Path) -> ledger_leaf_core::Result<LayoutOrder> {
    LayoutSnapshot::from_json(&std::fs::read_to_string(path)?)?.into_order()
}

fn build_pipeline<E>(
    layout: &Path,
    categories: CategorySet<E>,
) -> ledger_leaf_core::Result<Pipeline<E>> {
    let snapshot = LayoutSnapshot::from_json(&std::fs::read_to_string(layout)?)?;
    Pipeline::from_snapshot(snapshot, categories)
}

fn emit(run: &PipelineRun, config: &AppConfig, json: bool) -> ledger_leaf_core::Result<()> {
    let Some(request) = effect::static_effect(&run.assignment, &config.display) else {
        tracing::info!("empty batch, leaving the panels as they are");
        return Ok(());
    };

    if let Some(url) = config.leaf.effects_url() {
        tracing::info!(%url, "effect ready for the panel controller");
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&request)?);
    } else {
        println!("{}", request.write.anim_data);
    }
    Ok(())
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .try_init();
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Paint live ledger activity onto light panels", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the panels of a layout snapshot in painting order.
    Layout {
        /// Layout JSON as returned by the panel controller.
        layout: PathBuf,
    },
    /// Colour the panels by the transactions of one closed ledger.
    Ledger {
        /// Layout JSON as returned by the panel controller.
        layout: PathBuf,
        /// Ledger JSON with expanded transactions.
        ledger: PathBuf,
        /// Optional JSON configuration file.
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Print the full effect request body instead of the animation data.
        #[arg(long)]
        json: bool,
    },
    /// Colour the panels by a batch of tip bot messages.
    Tips {
        /// Layout JSON as returned by the panel controller.
        layout: PathBuf,
        /// JSON array of tip bot messages.
        messages: PathBuf,
        /// Optional JSON configuration file.
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// User whose tips are highlighted; overrides the configuration.
        #[arg(short, long)]
        user: Option<String>,
        /// Print the full effect request body instead of the animation data.
        #[arg(long)]
        json: bool,
        /// Print one notification burst request per message instead of
        /// painting the batch.
        #[arg(long)]
        notify: bool,
    },
}
