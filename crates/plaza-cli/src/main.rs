//! PLZA save editor CLI.
//!
//! Uploads a save to the editor server, applies edits given on the command
//! line, shows the resulting diff and submits it. The modified save is
//! written to `--output`.
//!
//! Usage:
//!   # Preview a change without submitting
//!   plaza-edit main --set tid=99999 --dry-run
//!
//!   # Set every potion-ish item to 999
//!   plaza-edit main --filter potion --bulk 999 --output main.new
//!
//!   # Raise logging
//!   RUST_LOG=plaza_client=debug plaza-edit main --item 4=10

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use plaza_client::{
    constants::DEFAULT_OUTPUT_NAME, ingest, BulkOutcome, ClientConfig, EditSession,
    HttpSaveService, ItemCatalog, RecordOutcome, SubmitOutcome, SyncController,
};
use plaza_types::{CoreField, ItemId};

/// Edit a PLZA save through the editor server.
#[derive(Parser, Debug)]
#[command(name = "plaza-edit")]
#[command(about = "Edit trainer data and bag quantities of a PLZA save")]
struct Args {
    /// Save file to edit
    save: PathBuf,

    /// Core attribute edit, e.g. `name=Ash`, `gender=1`, `language=english`
    #[arg(long = "set", value_name = "FIELD=VALUE")]
    set: Vec<String>,

    /// Bag quantity edit, e.g. `4=10` or `bag_4=10`
    #[arg(long = "item", value_name = "ID=QTY")]
    items: Vec<String>,

    /// Only rows whose label contains this text are affected by --bulk
    #[arg(long)]
    filter: Option<String>,

    /// Set every visible bag row to this quantity
    #[arg(long, value_name = "QTY")]
    bulk: Option<String>,

    /// Where to write the modified save
    #[arg(short, long, default_value = DEFAULT_OUTPUT_NAME)]
    output: PathBuf,

    /// Editor server base URL (overrides config)
    #[arg(long)]
    server: Option<String>,

    /// Item database JSON (overrides config)
    #[arg(long)]
    item_db: Option<PathBuf>,

    /// Config file (default: ~/.config/plaza-edit/config.ron)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the diff but don't submit
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut config = ClientConfig::load_or_default(args.config.as_deref())?;
    if let Some(server) = &args.server {
        config.server_url = server.clone();
    }
    if let Some(item_db) = &args.item_db {
        config.item_db = Some(item_db.clone());
    }

    let catalog = match &config.item_db {
        Some(path) => ItemCatalog::load(path)
            .with_context(|| format!("loading item database {}", path.display()))?,
        None => {
            tracing::warn!("No item database configured, bag edits are unavailable");
            ItemCatalog::default()
        }
    };

    let service = Arc::new(HttpSaveService::from_config(&config)?);
    let bytes = std::fs::read(&args.save)
        .with_context(|| format!("reading {}", args.save.display()))?;
    let baseline = ingest(service.as_ref(), &upload_name(&args.save), bytes).await?;

    println!(
        "{} (TID {}, {}): {} bag entries, {} dex entries captured",
        baseline.core().name,
        baseline.core().tid,
        baseline.core().language,
        baseline.bag().len(),
        baseline.dex().captured_count(),
    );

    let mut session = EditSession::new(Arc::new(baseline), Arc::new(catalog));
    apply_edits(&mut session, &args)?;

    if !session.has_changes() {
        println!("No changes.");
        return Ok(());
    }
    println!("{}", serde_json::to_string_pretty(&session.diff())?);
    if args.dry_run {
        return Ok(());
    }

    let sync = SyncController::new(service.clone());
    match sync.submit(&mut session).await? {
        SubmitOutcome::NoChanges => println!("No changes."),
        SubmitOutcome::Applied {
            download_url,
            change_count,
        } => {
            println!("Applied {} change(s).", change_count);
            match download_url {
                Some(url) => {
                    let save = sync.download(&url).await?;
                    std::fs::write(&args.output, &save)
                        .with_context(|| format!("writing {}", args.output.display()))?;
                    println!("Wrote {} ({} bytes).", args.output.display(), save.len());
                }
                None => tracing::warn!("Server applied the changes but sent no download URL"),
            }
        }
    }
    sync.acknowledge();
    Ok(())
}

fn upload_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| DEFAULT_OUTPUT_NAME.to_string())
}

fn split_assignment(raw: &str) -> Result<(&str, &str)> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => Ok((key.trim(), value)),
        _ => bail!("expected KEY=VALUE, got {:?}", raw),
    }
}

/// Apply the command-line edits in a fixed order: core fields, hand-edited
/// items, then the filter and bulk quantity.
fn apply_edits(session: &mut EditSession, args: &Args) -> Result<()> {
    for raw in &args.set {
        let (key, value) = split_assignment(raw)?;
        let field = CoreField::from_str(key)
            .map_err(|_| anyhow::anyhow!("unknown field {:?} (name, gender, tid, language)", key))?;
        if session.core_mut().input(field, value) == RecordOutcome::Rejected {
            bail!("invalid value {:?} for {}", value, field);
        }
    }

    for raw in &args.items {
        let (key, value) = split_assignment(raw)?;
        let id = ItemId::from_wire_key(key)
            .with_context(|| format!("invalid item id {:?}", key))?;
        if session.bag_mut().input_quantity(id, value) == RecordOutcome::Rejected {
            bail!("cannot set {} to {:?}: unknown item or quantity outside 0..=999", id, value);
        }
    }

    if let Some(filter) = &args.filter {
        session.bag_mut().set_filter(filter.clone());
    }
    if let Some(bulk) = &args.bulk {
        match session.bulk_input(bulk) {
            BulkOutcome::Applied { rows } => {
                tracing::info!("Bulk quantity {} written to {} visible rows", bulk.trim(), rows)
            }
            _ => bail!("invalid bulk quantity {:?}", bulk),
        }
    }
    Ok(())
}
