//! catalog-sync - headless product editor
//!
//! ```text
//! catalog-sync show <slug>
//! catalog-sync create <title>
//! catalog-sync publish <slug>
//! catalog-sync join <slug> <collection>
//! catalog-sync leave <slug> <collection>
//! catalog-sync delete <slug>
//! ```
//!
//! Reads `CATALOG_*` settings from the environment (and `.env`).
//! `--json` switches logs to JSON lines.

use std::sync::Arc;

use anyhow::{Context, bail};
use catalog_client::logger::init_logger;
use catalog_client::{
    BroadcastBus, ClientConfig, Collaborators, NetworkTransport, SyncEngine, SyncReport,
};

enum Command {
    Show { slug: String },
    Create { title: String },
    Publish { slug: String },
    Join { slug: String, collection: String },
    Leave { slug: String, collection: String },
    Delete { slug: String },
}

struct Args {
    command: Command,
    json: bool,
}

impl Args {
    fn parse(raw: impl Iterator<Item = String>) -> anyhow::Result<Self> {
        let mut json = false;
        let mut words = Vec::new();
        for arg in raw {
            match arg.as_str() {
                "--json" => json = true,
                _ => words.push(arg),
            }
        }

        let mut words = words.into_iter();
        let verb = words.next().context("missing command")?;
        let mut next = |what: &str| words.next().with_context(|| format!("missing {}", what));

        let command = match verb.as_str() {
            "show" => Command::Show { slug: next("slug")? },
            "create" => Command::Create { title: next("title")? },
            "publish" => Command::Publish { slug: next("slug")? },
            "join" => Command::Join {
                slug: next("slug")?,
                collection: next("collection")?,
            },
            "leave" => Command::Leave {
                slug: next("slug")?,
                collection: next("collection")?,
            },
            "delete" => Command::Delete { slug: next("slug")? },
            other => bail!("unknown command: {}", other),
        };

        Ok(Self { command, json })
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    let args = Args::parse(std::env::args().skip(1))?;
    init_logger("catalog_client=info,catalog_sync=info", args.json)?;

    let config = ClientConfig::from_env()?;
    tracing::info!(base_url = %config.base_url, mode = ?config.sync_mode, "catalog-sync starting");

    let transport = Arc::new(NetworkTransport::new(&config)?);
    let bus = Arc::new(BroadcastBus::default());
    let mut events = bus.subscribe();
    tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            tracing::info!(?event, "catalog changed");
        }
    });
    let collaborators = Collaborators::new(transport).with_observer(bus);

    match args.command {
        Command::Show { slug } => {
            let mut engine = SyncEngine::load(&config, collaborators, &slug).await?;
            if let Err(e) = engine.refresh_settings().await {
                tracing::warn!(error = %e, "Display settings unavailable");
            }
            print_product(&engine);
        }
        Command::Create { title } => {
            let mut engine = SyncEngine::blank(&config, collaborators);
            engine.model_mut().set_title(title);
            report(engine.synchronize_entity().await?);
        }
        Command::Publish { slug } => {
            let mut engine = SyncEngine::load(&config, collaborators, &slug).await?;
            report(engine.publish().await?);
        }
        Command::Join { slug, collection } => {
            let mut engine = SyncEngine::load(&config, collaborators, &slug).await?;
            engine.model_mut().set_membership(collection, true);
            report(engine.synchronize_entity().await?);
        }
        Command::Leave { slug, collection } => {
            let mut engine = SyncEngine::load(&config, collaborators, &slug).await?;
            engine.model_mut().set_membership(collection, false);
            report(engine.synchronize_entity().await?);
        }
        Command::Delete { slug } => {
            let mut engine = SyncEngine::load(&config, collaborators, &slug).await?;
            let outcome = engine.delete_entity().await?;
            println!("delete: {}", outcome);
        }
    }

    Ok(())
}

fn print_product(engine: &SyncEngine) {
    let model = engine.model();
    let product = model.product();
    println!("{} ({})", product.title, model.identifier());
    match model.visible() {
        Some(true) => println!("  on shelf"),
        Some(false) => println!("  off shelf"),
        None => println!("  visibility unset"),
    }
    for variant in model.variants() {
        println!("  variant {} {}", variant.slug, variant.title);
    }
    for (collection, membership) in model.memberships() {
        let mark = if membership.has { "x" } else { " " };
        println!("  [{}] {}", mark, collection);
    }
    if let Some(currency) = &engine.settings().main_currency {
        println!("  currency {}", currency);
    }
}

fn report(report: SyncReport) {
    match report {
        SyncReport::InProgress => println!("already saving"),
        SyncReport::Created { slug } => println!("created {}", slug),
        SyncReport::CreateRejected(outcome) => println!("create rejected: {}", outcome),
        SyncReport::Updated {
            outcome,
            memberships,
        } => {
            println!("update: {}", outcome);
            match memberships {
                Some(memberships) => {
                    for result in &memberships.results {
                        println!(
                            "  {} {}: {}",
                            result.action.verb(),
                            result.collection,
                            result.outcome
                        );
                    }
                }
                None => println!("  memberships held back"),
            }
        }
    }
}
