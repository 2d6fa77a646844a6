mod display;
mod export;
mod import;
mod play;
mod recipes;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use larder_core::{AuthorId, DirStore, LarderConfig, RecipeId};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser)]
#[command(name = "larder")]
#[command(about = "Author, share and cook recipes step by step", long_about = None)]
struct Cli {
    /// Recipe directory (default: $LARDER_DATA_DIR or ~/.larder/recipes)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Acting author for commands that change recipes (default: $LARDER_USER)
    #[arg(long, global = true)]
    user: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Import a recipe document and store it under the acting user
    Import {
        /// Interchange JSON file
        file: PathBuf,
    },
    /// Export a stored recipe as an interchange document
    Export {
        id: RecipeId,
        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// List stored recipes
    List {
        /// Only recipes written by this author
        #[arg(long)]
        author: Option<String>,
        /// Print the listing as JSON
        #[arg(long)]
        json: bool,
    },
    /// Find recipes whose title contains the given text
    Search {
        text: String,
        /// Print the matches as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show a recipe with all of its steps
    Show { id: RecipeId },
    /// Print the consolidated ingredient list of a recipe
    Shopping { id: RecipeId },
    /// Print the ingredient catalog
    Catalog,
    /// Delete a recipe you authored
    Delete { id: RecipeId },
    /// Walk through a recipe step by step, with timers
    Play { id: RecipeId },
}

/// Everything a command needs, resolved from flags and environment.
pub struct App {
    pub config: LarderConfig,
    pub store: DirStore,
}

impl App {
    fn new(cli: &Cli) -> Result<Self> {
        let mut config = LarderConfig::from_env().context("Failed to load configuration")?;
        if let Some(dir) = &cli.data_dir {
            config.data_dir = dir.clone();
        }
        if let Some(user) = cli.user.as_deref().filter(|u| !u.trim().is_empty()) {
            config.user = Some(AuthorId::new(user.trim()));
        }
        let store = DirStore::new(&config.data_dir);
        Ok(Self { config, store })
    }

    /// The acting author; commands that write recipes require one.
    pub fn user(&self) -> Result<&AuthorId> {
        self.config
            .user
            .as_ref()
            .context("No user given; pass --user or set LARDER_USER")
    }
}

fn init_tracing() {
    let fmt_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let app = App::new(&cli)?;
    tracing::debug!(data_dir = %app.config.data_dir.display(), "starting");

    match cli.command {
        Commands::Import { file } => {
            import::import_recipe(&app, &file).await?;
        }
        Commands::Export { id, output } => {
            export::export_recipe(&app, id, output.as_deref()).await?;
        }
        Commands::List { author, json } => {
            recipes::list(&app, author.as_deref(), json).await?;
        }
        Commands::Search { text, json } => {
            recipes::search(&app, &text, json).await?;
        }
        Commands::Show { id } => {
            recipes::show(&app, id).await?;
        }
        Commands::Shopping { id } => {
            recipes::shopping(&app, id).await?;
        }
        Commands::Catalog => {
            recipes::catalog(&app).await?;
        }
        Commands::Delete { id } => {
            recipes::delete(&app, id).await?;
        }
        Commands::Play { id } => {
            play::play_recipe(&app, id).await?;
        }
    }

    Ok(())
}
