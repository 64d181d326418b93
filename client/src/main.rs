//! HD Locator - remember where products live in the store.
//!
//! Command-line front-end over the locator repository. Products are kept in
//! a local store and, when `LOCATOR_SYNC_URL` is set, mirrored to a remote
//! JSON document that other devices can link to.

use clap::{Parser, Subcommand};
use locator_client::{app, Backend, Config, Repository};
use locator_engine::{Product, ProductFields, ProductPatch, EXPORT_FILE_NAME};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "hd-locator")]
#[command(about = "Find products by aisle and bay", version)]
struct Cli {
    /// Directory holding the local store
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
    /// Local store backend (sqlite, file or memory)
    #[arg(long, global = true)]
    backend: Option<Backend>,
    /// Remote document store endpoint
    #[arg(long, global = true)]
    sync_url: Option<String>,
    /// Skip cloud sync for this run
    #[arg(long, global = true, default_value_t = false)]
    offline: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Record a new product
    Add {
        name: String,
        aisle: String,
        #[arg(long, default_value = "")]
        bay: String,
        #[arg(long, default_value = "")]
        notes: String,
    },
    /// Change fields of an existing product
    Edit {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        aisle: Option<String>,
        #[arg(long)]
        bay: Option<String>,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Delete a product
    Rm { id: String },
    /// List products, optionally filtered by a search term
    List { query: Vec<String> },
    /// Write every product to a JSON file ("-" for stdout)
    Export {
        #[arg(long, default_value = EXPORT_FILE_NAME)]
        out: PathBuf,
    },
    /// Replace every product with the contents of an exported file
    Import { path: PathBuf },
    /// Show this device's sync key
    SyncKey,
    /// Adopt another device's sync key and its product list
    Link { key: String },
    /// Upload the current list to the remote document
    Push,
}

impl Command {
    /// Whether the linked document is pulled before the command runs.
    ///
    /// Commands that change or upload the list start from local data, so an
    /// edit made while offline is pushed rather than replaced by the remote copy.
    fn pulls_on_start(&self) -> bool {
        matches!(
            self,
            Command::List { .. } | Command::Export { .. } | Command::SyncKey
        )
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logs go to stderr so command output stays clean
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hd_locator=info,locator_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let config = load_config(&cli)?;

    let mut repository = app::open(&config).await?;
    let outcome = run(&mut repository, cli.command).await;
    repository.flush_sync().await;

    outcome
}

fn load_config(cli: &Cli) -> Result<Config, Box<dyn std::error::Error>> {
    let mut config = Config::from_env()?;
    if let Some(dir) = &cli.data_dir {
        config.data_dir = dir.clone();
    }
    if let Some(backend) = cli.backend {
        config.backend = backend;
    }
    if let Some(url) = &cli.sync_url {
        config.sync_url = Some(url.clone());
    }
    if cli.offline {
        config.sync_url = None;
    }
    config.pull_on_start = cli.command.pulls_on_start();
    Ok(config)
}

async fn run(
    repository: &mut Repository,
    command: Command,
) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Command::Add {
            name,
            aisle,
            bay,
            notes,
        } => {
            let fields = ProductFields::new(name, aisle).with_bay(bay).with_notes(notes);
            let product = repository.add(fields).await?;
            println!("Added {}", product.id);
            print_product(&product);
        }
        Command::Edit {
            id,
            name,
            aisle,
            bay,
            notes,
        } => {
            let patch = ProductPatch {
                name,
                aisle,
                bay,
                notes,
            };
            match repository.update(&id, &patch).await? {
                Some(product) => print_product(&product),
                None => println!("No product with id {}", id),
            }
        }
        Command::Rm { id } => {
            if repository.delete(&id).await? {
                println!("Deleted {}", id);
            } else {
                println!("No product with id {}", id);
            }
        }
        Command::List { query } => {
            let query = query.join(" ");
            let products = repository.list(&query);
            if products.is_empty() {
                if query.trim().is_empty() {
                    println!("No products yet. Run `hd-locator add` to get started.");
                } else {
                    println!("No products match your search.");
                }
            }
            for product in products {
                print_product(product);
            }
        }
        Command::Export { out } => {
            let json = repository.export_json()?;
            if out.as_os_str() == "-" {
                println!("{}", json);
            } else {
                tokio::fs::write(&out, json).await?;
                println!("Exported {} products to {}", repository.len(), out.display());
            }
        }
        Command::Import { path } => {
            let text = tokio::fs::read_to_string(&path).await?;
            match repository.import_json(&text).await {
                Ok(count) => println!("Imported {} products", count),
                Err(e) => {
                    tracing::debug!("Import failed: {}", e);
                    return Err("Failed to import. Make sure the file is a valid HD products JSON export.".into());
                }
            }
        }
        Command::SyncKey => match repository.sync_key().await? {
            Some(key) => println!("{}", key),
            None => println!("No sync key yet. It is created on the first change or `hd-locator push`."),
        },
        Command::Link { key } => {
            let count = repository.link(&key).await?;
            println!("Linked. {} products loaded.", count);
        }
        Command::Push => {
            repository.push_now().await?;
            if let Some(key) = repository.sync_key().await? {
                println!("Pushed {} products to {}", repository.len(), key);
            }
        }
    }
    Ok(())
}

fn print_product(product: &Product) {
    let bay = if product.bay.is_empty() {
        String::new()
    } else {
        format!("bay {}", product.bay)
    };
    print!("aisle {:>4}  {:<8}  {}", product.aisle, bay, product.name);
    if !product.notes.is_empty() {
        print!("  ({})", product.notes);
    }
    println!("  [{}]", product.id);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_read_commands_pull_on_start() {
        let pulls = |args: &[&str]| {
            let cli = Cli::try_parse_from(args).unwrap();
            load_config(&cli).unwrap().pull_on_start
        };

        assert!(pulls(&["hd-locator", "list"]));
        assert!(pulls(&["hd-locator", "export", "--out", "-"]));
        assert!(pulls(&["hd-locator", "sync-key"]));

        assert!(!pulls(&["hd-locator", "push"]));
        assert!(!pulls(&["hd-locator", "add", "Saw", "9"]));
        assert!(!pulls(&["hd-locator", "edit", "p-1", "--notes", "x"]));
        assert!(!pulls(&["hd-locator", "rm", "p-1"]));
        assert!(!pulls(&["hd-locator", "import", "hd-products.json"]));
        assert!(!pulls(&["hd-locator", "link", "abc"]));
    }
}
