mod browse;
mod list;
mod recipe;
mod save;
mod view;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Args, Parser, Subcommand};
use recipe2md_core::{Config, Extra, RecipeMetadata};
use tracing_subscriber::EnvFilter;

use crate::recipe::Session;

#[derive(Parser)]
#[command(name = "recipe2md")]
#[command(about = "Turn recipe web pages into tidy markdown files", long_about = None)]
struct Cli {
    /// Recipe directory (overrides RECIPE2MD_DIR)
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a recipe in the terminal
    View {
        /// Recipe page URL
        url: String,
        /// Use this title instead of the one on the page
        #[arg(long)]
        name: Option<String>,
        #[command(flatten)]
        recipe: RecipeArgs,
        /// Offer to save the recipe after showing it
        #[arg(long, default_value_t = true, action = ArgAction::Set)]
        prompt_save: bool,
    },
    /// Save a recipe and its photo into the recipe directory
    Save {
        /// Recipe page URL
        url: String,
        /// Use this title instead of the one on the page
        #[arg(long)]
        name: Option<String>,
        #[command(flatten)]
        recipe: RecipeArgs,
    },
    /// Save every recipe listed in a file (one URL per line)
    List {
        /// Text file with URLs; blank lines and lines starting with # are skipped
        file: PathBuf,
        #[command(flatten)]
        recipe: RecipeArgs,
    },
    /// Pick a saved recipe and render it
    Browse,
}

/// Options shared by every command that renders a fetched recipe.
#[derive(Args, Debug, Clone)]
struct RecipeArgs {
    /// Category written to the front matter
    #[arg(long, default_value = "")]
    category: String,
    /// Flavour or diet tag (veggie, spicy, sweet, salty, sour, bitter, umami)
    #[arg(short = 'e', long = "extra", value_parser = parse_extra)]
    extras: Vec<Extra>,
    /// Translate the title, ingredients and instructions to English
    #[arg(long)]
    translate: bool,
}

impl RecipeArgs {
    fn metadata(&self, name: Option<String>) -> RecipeMetadata {
        RecipeMetadata::new()
            .with_name(name)
            .with_category(self.category.clone())
            .with_extras(self.extras.iter().copied())
            .with_translate(self.translate)
    }
}

fn parse_extra(s: &str) -> Result<Extra, String> {
    s.parse()
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::from_env().with_target_dir(cli.dir);

    match run(cli.command, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Commands, config: Config) -> anyhow::Result<()> {
    match command {
        Commands::View {
            url,
            name,
            recipe,
            prompt_save,
        } => {
            let session = Session::new(config)?;
            view::view(&session, &url, &recipe.metadata(name), prompt_save).await
        }
        Commands::Save { url, name, recipe } => {
            let session = Session::new(config)?;
            save::save(&session, &url, &recipe.metadata(name)).await
        }
        Commands::List { file, recipe } => {
            let session = Session::new(config)?;
            list::list(&session, &file, &recipe.metadata(None)).await
        }
        // Only reads the recipe directory; no HTTP client needed.
        Commands::Browse => browse::browse(&config),
    }
}
